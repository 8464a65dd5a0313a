//! Frequency to control-voltage mapping.
//!
//! One volt per octave is logarithmic in frequency, so the DAC code is the
//! position of `f` between `f_min` and `f_max` on a log scale:
//!
//! ```text
//! ratio = log10(f / f_min) / log10(f_max / f_min)
//! code  = clamp(ratio, 0, 1) * full_scale
//! ```

use libm::{log10f, powf, roundf};

use crate::settings::CvRange;

/// Maps frequencies and levels to DAC codes.
///
/// Every input, including 0, negative, NaN and infinite values, maps into
/// `[0, full_scale]`.
///
/// ```rust
/// use grundton_tracker::{CvMapper, CvRange};
///
/// let cv = CvMapper::new(CvRange::default());
/// assert_eq!(cv.code(65.41), 0);
/// assert_eq!(cv.code(2093.0), 4095);
/// assert_eq!(cv.code(0.0), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CvMapper {
    f_min: f32,
    f_max: f32,
    full_scale: u16,
    // 1 / log10(f_max / f_min); 0 for a degenerate range.
    inv_span: f32,
}

impl CvMapper {
    /// Mapper for `range`. A range with `f_max <= f_min` maps everything to 0.
    pub fn new(range: CvRange) -> Self {
        let span = if range.f_min > 0.0 && range.f_max > range.f_min {
            log10f(range.f_max / range.f_min)
        } else {
            0.0
        };
        Self {
            f_min: range.f_min,
            f_max: range.f_max,
            full_scale: range.full_scale,
            inv_span: if span.is_finite() && span > 0.0 { 1.0 / span } else { 0.0 },
        }
    }

    /// Largest code.
    pub fn full_scale(&self) -> u16 {
        self.full_scale
    }

    /// Log position of `frequency` in `[0, 1]`.
    pub fn ratio(&self, frequency: f32) -> f32 {
        if self.inv_span == 0.0 || frequency.is_nan() || frequency <= self.f_min {
            return 0.0;
        }
        if frequency >= self.f_max {
            return 1.0;
        }
        (log10f(frequency / self.f_min) * self.inv_span).clamp(0.0, 1.0)
    }

    /// DAC code for `frequency`.
    #[inline]
    pub fn code(&self, frequency: f32) -> u16 {
        self.scale(self.ratio(frequency))
    }

    /// DAC code for a level in `[0, 1]` (clamped).
    #[inline]
    pub fn level_code(&self, level: f32) -> u16 {
        let level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
        self.scale(level)
    }

    /// Frequency a code stands for. Inverse of [`code`](Self::code) up to rounding.
    pub fn frequency_at(&self, code: u16) -> f32 {
        if self.inv_span == 0.0 || self.full_scale == 0 {
            return self.f_min;
        }
        let ratio = f32::from(code.min(self.full_scale)) / f32::from(self.full_scale);
        self.f_min * powf(10.0, ratio / self.inv_span)
    }

    fn scale(&self, ratio: f32) -> u16 {
        let full = f32::from(self.full_scale);
        roundf(ratio * full).clamp(0.0, full) as u16
    }
}

impl Default for CvMapper {
    fn default() -> Self {
        Self::new(CvRange::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_and_midpoint() {
        let cv = CvMapper::default();
        assert_eq!(cv.code(65.41), 0);
        assert_eq!(cv.code(2093.0), 4095);
        let mid = libm::sqrtf(65.41 * 2093.0);
        let code = i32::from(cv.code(mid));
        assert!((code - 2048).abs() <= 1, "{code}");
    }

    #[test]
    fn octaves_are_evenly_spaced() {
        let cv = CvMapper::default();
        // Five octaves over the full range: 819 codes per octave.
        let c3 = i32::from(cv.code(130.81));
        let c4 = i32::from(cv.code(261.63));
        let c5 = i32::from(cv.code(523.25));
        assert!((c4 - c3 - 819).abs() <= 2);
        assert!((c5 - c4 - 819).abs() <= 2);
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        let cv = CvMapper::default();
        for f in [0.0, -1.0, -1e9, 10.0, f32::NAN, f32::NEG_INFINITY] {
            assert_eq!(cv.code(f), 0, "{f}");
        }
        for f in [2093.1, 1e6, f32::INFINITY, f32::MAX] {
            assert_eq!(cv.code(f), 4095, "{f}");
        }
    }

    #[test]
    fn level_code_clamps() {
        let cv = CvMapper::default();
        assert_eq!(cv.level_code(0.5), 2048);
        assert_eq!(cv.level_code(1.5), 4095);
        assert_eq!(cv.level_code(-0.1), 0);
        assert_eq!(cv.level_code(f32::NAN), 0);
    }

    #[test]
    fn degenerate_range_maps_to_zero() {
        let cv = CvMapper::new(CvRange {
            f_min: 100.0,
            f_max: 100.0,
            full_scale: 4095,
        });
        assert_eq!(cv.code(1000.0), 0);
    }

    #[test]
    fn frequency_at_inverts_code() {
        let cv = CvMapper::default();
        for f in [82.41, 110.0, 440.0, 1318.5] {
            let back = cv.frequency_at(cv.code(f));
            assert!((back - f).abs() / f < 0.001, "{f} -> {back}");
        }
    }
}
