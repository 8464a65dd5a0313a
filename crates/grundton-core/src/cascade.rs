//! Band-limiting cascade placed in front of a channel's pitch detector.
//!
//! A [`Cascade`] is an ordered list of interchangeable [`FilterStage`]s:
//! high-pass section(s) at the string's lowest fundamental, then low-pass
//! section(s) at its highest, then optional peaking sections for tone shaping.
//! Which variant runs (single or doubled sections, with or without peaking) is
//! decided by the [`CascadeLayout`], not by separate code paths.
//!
//! Storage is a fixed array of [`MAX_STAGES`] sections so that building a
//! cascade never allocates and processing is a tight loop over `len` stages.

use crate::biquad::{BUTTERWORTH_Q, Biquad, Response};
use crate::stage::Stage;

/// Maximum number of sections in one cascade.
pub const MAX_STAGES: usize = 6;

/// Maximum number of peaking sections in one cascade.
pub const MAX_PEAKING: usize = 2;

/// Role of a section within the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Removes energy below the string's lowest fundamental.
    Highpass,
    /// Removes energy above the string's highest fundamental.
    Lowpass,
    /// Tone-shaping bell.
    Peaking,
    /// Unused slot.
    Passthrough,
}

/// A peaking (bell) band applied after the band limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakingBand {
    /// Centre frequency in Hz.
    pub frequency: f32,
    /// Gain in dB (positive = boost).
    pub gain_db: f32,
    /// Bandwidth as Q.
    pub q: f32,
}

/// Which sections a cascade contains.
///
/// Section counts are clamped to 1..=2 when the cascade is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CascadeLayout {
    /// Number of chained high-pass sections (1 or 2).
    pub highpass_stages: u8,
    /// Number of chained low-pass sections (1 or 2).
    pub lowpass_stages: u8,
    /// Optional tone-shaping bands, applied in order.
    pub peaking: [Option<PeakingBand>; MAX_PEAKING],
}

impl CascadeLayout {
    /// One high-pass and one low-pass section (12 dB/oct each side).
    pub const SINGLE: Self = Self {
        highpass_stages: 1,
        lowpass_stages: 1,
        peaking: [None; MAX_PEAKING],
    };

    /// Two high-pass and two low-pass sections (24 dB/oct each side).
    pub const DOUBLE: Self = Self {
        highpass_stages: 2,
        lowpass_stages: 2,
        peaking: [None; MAX_PEAKING],
    };

    /// Adds a peaking band in the first free slot. Extra bands are ignored.
    #[must_use]
    pub fn with_peaking(mut self, band: PeakingBand) -> Self {
        if let Some(slot) = self.peaking.iter_mut().find(|slot| slot.is_none()) {
            *slot = Some(band);
        }
        self
    }

    /// Total number of sections this layout builds.
    pub fn stage_count(&self) -> usize {
        self.highpass_stages.clamp(1, 2) as usize
            + self.lowpass_stages.clamp(1, 2) as usize
            + self.peaking.iter().flatten().count()
    }
}

impl Default for CascadeLayout {
    fn default() -> Self {
        Self::DOUBLE
    }
}

/// One biquad section tagged with its role.
#[derive(Debug, Clone)]
pub struct FilterStage {
    kind: StageKind,
    biquad: Biquad,
}

impl FilterStage {
    /// Butterworth high-pass at `cutoff` Hz.
    pub fn highpass(cutoff: f32, sample_rate: f32) -> Self {
        Self {
            kind: StageKind::Highpass,
            biquad: Biquad::design(Response::Highpass, cutoff, BUTTERWORTH_Q, sample_rate),
        }
    }

    /// Butterworth low-pass at `cutoff` Hz.
    pub fn lowpass(cutoff: f32, sample_rate: f32) -> Self {
        Self {
            kind: StageKind::Lowpass,
            biquad: Biquad::design(Response::Lowpass, cutoff, BUTTERWORTH_Q, sample_rate),
        }
    }

    /// Peaking bell for `band`.
    pub fn peaking(band: &PeakingBand, sample_rate: f32) -> Self {
        Self {
            kind: StageKind::Peaking,
            biquad: Biquad::design(
                Response::Peaking {
                    gain_db: band.gain_db,
                },
                band.frequency,
                band.q,
                sample_rate,
            ),
        }
    }

    /// Unused slot.
    pub fn passthrough() -> Self {
        Self {
            kind: StageKind::Passthrough,
            biquad: Biquad::new(),
        }
    }

    /// Role of this section.
    pub fn kind(&self) -> StageKind {
        self.kind
    }
}

impl Stage for FilterStage {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.biquad.process(input)
    }

    fn reset(&mut self) {
        self.biquad.clear();
    }
}

/// Ordered band-limiting cascade for one string profile.
///
/// # Example
///
/// ```rust
/// use grundton_core::{Cascade, CascadeLayout, StageKind, Stage};
///
/// let mut cascade = Cascade::new(&CascadeLayout::DOUBLE, 73.4, 329.6, 48000.0);
/// assert_eq!(cascade.len(), 4);
/// assert_eq!(cascade.stages()[0].kind(), StageKind::Highpass);
/// assert_eq!(cascade.stages()[3].kind(), StageKind::Lowpass);
///
/// let _y = cascade.process(0.25);
/// ```
#[derive(Debug, Clone)]
pub struct Cascade {
    stages: [FilterStage; MAX_STAGES],
    len: usize,
}

impl Cascade {
    /// Build the cascade for a band `[low_hz, high_hz]`.
    pub fn new(layout: &CascadeLayout, low_hz: f32, high_hz: f32, sample_rate: f32) -> Self {
        let mut stages: [FilterStage; MAX_STAGES] = core::array::from_fn(|_| FilterStage::passthrough());
        let mut len = 0;

        for _ in 0..layout.highpass_stages.clamp(1, 2) {
            stages[len] = FilterStage::highpass(low_hz, sample_rate);
            len += 1;
        }
        for _ in 0..layout.lowpass_stages.clamp(1, 2) {
            stages[len] = FilterStage::lowpass(high_hz, sample_rate);
            len += 1;
        }
        for band in layout.peaking.iter().flatten() {
            stages[len] = FilterStage::peaking(band, sample_rate);
            len += 1;
        }

        Self { stages, len }
    }

    /// Number of active sections.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: a cascade has at least one high-pass and one low-pass section.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Active sections in processing order.
    pub fn stages(&self) -> &[FilterStage] {
        &self.stages[..self.len]
    }
}

impl Stage for Cascade {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        self.stages[..self.len]
            .iter_mut()
            .fold(input, |sample, stage| stage.process(sample))
    }

    fn reset(&mut self) {
        for stage in &mut self.stages[..self.len] {
            stage.reset();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48000.0;

    fn sine_gain(cascade: &mut Cascade, freq: f32) -> f32 {
        cascade.reset();
        let mut peak = 0.0f32;
        for n in 0..9600 {
            let x = libm::sinf(core::f32::consts::TAU * freq * n as f32 / SR);
            let y = cascade.process(x);
            if n > 4800 {
                peak = peak.max(y.abs());
            }
        }
        peak
    }

    #[test]
    fn stage_order_is_highpass_lowpass_peaking() {
        let layout = CascadeLayout::SINGLE.with_peaking(PeakingBand {
            frequency: 200.0,
            gain_db: 3.0,
            q: 1.0,
        });
        let cascade = Cascade::new(&layout, 73.4, 329.6, SR);
        let kinds: [StageKind; 3] = core::array::from_fn(|i| cascade.stages()[i].kind());
        assert_eq!(
            kinds,
            [StageKind::Highpass, StageKind::Lowpass, StageKind::Peaking]
        );
    }

    #[test]
    fn stage_counts_are_clamped() {
        let layout = CascadeLayout {
            highpass_stages: 0,
            lowpass_stages: 9,
            peaking: [None; MAX_PEAKING],
        };
        assert_eq!(layout.stage_count(), 3);
        assert_eq!(Cascade::new(&layout, 100.0, 400.0, SR).len(), 3);
    }

    #[test]
    fn extra_peaking_bands_are_ignored() {
        let band = PeakingBand {
            frequency: 500.0,
            gain_db: -3.0,
            q: 2.0,
        };
        let layout = CascadeLayout::DOUBLE
            .with_peaking(band)
            .with_peaking(band)
            .with_peaking(band);
        assert_eq!(layout.stage_count(), MAX_STAGES);
    }

    #[test]
    fn in_band_passes_out_of_band_attenuates() {
        let mut cascade = Cascade::new(&CascadeLayout::DOUBLE, 73.4, 329.6, SR);
        let in_band = sine_gain(&mut cascade, 150.0);
        let below = sine_gain(&mut cascade, 20.0);
        let above = sine_gain(&mut cascade, 3000.0);
        assert!(in_band > 0.5, "in-band gain {in_band}");
        assert!(below < 0.05, "20 Hz gain {below}");
        assert!(above < 0.05, "3 kHz gain {above}");
    }

    #[test]
    fn double_rolls_off_steeper_than_single() {
        let mut single = Cascade::new(&CascadeLayout::SINGLE, 73.4, 329.6, SR);
        let mut double = Cascade::new(&CascadeLayout::DOUBLE, 73.4, 329.6, SR);
        assert!(sine_gain(&mut double, 1500.0) < sine_gain(&mut single, 1500.0));
    }
}
