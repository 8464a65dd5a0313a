//! DC blocking filter.
//!
//! First-order highpass (Julius O. Smith's DC blocker):
//!
//! ```text
//! H(z) = (1 - z^-1) / (1 - R*z^-1)
//! ```
//!
//! The pole radius `R` is derived from a cutoff in Hz via
//! `R = 1 - 2π * f_c / f_s`, clamped to `[0.9, 0.9999]`.
//!
//! Reference: Julius O. Smith, "Introduction to Digital Filters with Audio
//! Applications", DC Blocker.

use core::f32::consts::PI;

use crate::flush_denormal;
use crate::stage::Stage;

/// First-order DC blocker.
///
/// ```rust
/// use grundton_core::DcBlocker;
///
/// let mut blocker = DcBlocker::new(20.0, 48000.0);
/// let mut out = 0.0;
/// for _ in 0..48000 {
///     out = blocker.process(0.3);
/// }
/// assert!(out.abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct DcBlocker {
    coeff: f32,
    x_prev: f32,
    y_prev: f32,
}

impl DcBlocker {
    /// Blocker with its -3 dB point near `cutoff_hz`.
    pub fn new(cutoff_hz: f32, sample_rate: f32) -> Self {
        Self {
            coeff: (1.0 - 2.0 * PI * cutoff_hz / sample_rate).clamp(0.9, 0.9999),
            x_prev: 0.0,
            y_prev: 0.0,
        }
    }

    /// Pole radius `R`.
    pub fn coeff(&self) -> f32 {
        self.coeff
    }

    /// `y[n] = x[n] - x[n-1] + R * y[n-1]`
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = input - self.x_prev + self.coeff * self.y_prev;
        self.x_prev = input;
        self.y_prev = flush_denormal(output);
        output
    }

    /// Clear history.
    pub fn reset(&mut self) {
        self.x_prev = 0.0;
        self.y_prev = 0.0;
    }
}

impl Stage for DcBlocker {
    fn process(&mut self, input: f32) -> f32 {
        DcBlocker::process(self, input)
    }

    fn reset(&mut self) {
        DcBlocker::reset(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coefficient_is_clamped() {
        assert_eq!(DcBlocker::new(0.0, 48000.0).coeff(), 0.9999);
        assert_eq!(DcBlocker::new(20000.0, 48000.0).coeff(), 0.9);
    }

    #[test]
    fn passes_string_fundamentals() {
        let mut blocker = DcBlocker::new(20.0, 48000.0);
        let mut peak = 0.0f32;
        for n in 0..9600 {
            let x = libm::sinf(core::f32::consts::TAU * 110.0 * n as f32 / 48000.0);
            let y = blocker.process(x);
            if n > 4800 {
                peak = peak.max(y.abs());
            }
        }
        assert!(peak > 0.95, "110 Hz peak {peak}");
    }

    #[test]
    fn reset_clears_state() {
        let mut blocker = DcBlocker::new(20.0, 48000.0);
        blocker.process(1.0);
        blocker.reset();
        assert_eq!(blocker.process(0.0), 0.0);
    }
}
