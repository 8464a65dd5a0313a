//! Runtime settings of the tracker.
//!
//! Everything here is fixed at startup. The two behaviours that differ between
//! builds of the module are named settings rather than hard-coded:
//! [`SwitchPolicy`] (held pitch on string change) and
//! [`TrackerSettings::envelope_gating`] (envelope drives oscillator level).

use grundton_core::{CascadeLayout, ConditionerConfig};
use grundton_synth::Waveform;

/// What happens to the held pitches when the selected string pair changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchPolicy {
    /// Keep the last confident pitch until the newly bound detector reports one.
    #[default]
    RetainHeldPitch,
    /// Drop both held pitches to 0 Hz on every change.
    ResetHeldPitch,
}

/// What the second DAC channel carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecondaryCv {
    /// Envelope of channel A, scaled to full range.
    #[default]
    EnvelopeA,
    /// Pitch CV of channel B, same scale as channel one.
    PitchB,
}

/// Frequency span and resolution of the pitch CV output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CvRange {
    /// Frequency mapped to code 0 (Hz).
    pub f_min: f32,
    /// Frequency mapped to `full_scale` (Hz).
    pub f_max: f32,
    /// Largest DAC code.
    pub full_scale: u16,
}

impl CvRange {
    /// C2 (65.41 Hz) to C7 (2093 Hz) on a 12-bit DAC.
    pub const C2_C7_12BIT: Self = Self {
        f_min: 65.41,
        f_max: 2093.0,
        full_scale: grundton_platform::FULL_SCALE_12BIT,
    };
}

impl Default for CvRange {
    fn default() -> Self {
        Self::C2_C7_12BIT
    }
}

/// Startup configuration of a [`BlockPipeline`](crate::BlockPipeline).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerSettings {
    /// Audio sample rate in Hz.
    pub sample_rate: f32,
    /// Frames per audio block.
    pub block_size: usize,
    /// Pitch detector input threshold (dBFS).
    pub threshold_db: f32,
    /// Band-limiting cascade in front of each detector.
    pub cascade: CascadeLayout,
    /// Signal conditioner tuning.
    pub conditioner: ConditionerConfig,
    /// Signal conditioning enabled at startup. Toggled by the encoder push.
    pub conditioning_enabled: bool,
    /// Envelope hold window as a multiple of the band's longest period.
    pub envelope_hold_periods: f32,
    /// When true, each oscillator's level follows its channel's envelope.
    /// Disabled by default: oscillators run at `baseline_amplitude`.
    pub envelope_gating: bool,
    /// Held pitch behaviour on string change.
    pub switch_policy: SwitchPolicy,
    /// Oscillator level when envelope gating is off.
    pub baseline_amplitude: f32,
    /// Pitch CV scaling.
    pub cv: CvRange,
    /// Second DAC channel source.
    pub secondary_cv: SecondaryCv,
    /// Oscillator waveforms before the knobs are first read.
    pub initial_waveforms: [Waveform; 2],
    /// Catalog index channel A is bound to at startup.
    pub initial_base_index: usize,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            sample_rate: 48000.0,
            block_size: 48,
            threshold_db: -45.0,
            cascade: CascadeLayout::DOUBLE,
            conditioner: ConditionerConfig::default(),
            conditioning_enabled: true,
            envelope_hold_periods: 0.6,
            envelope_gating: false,
            switch_policy: SwitchPolicy::RetainHeldPitch,
            baseline_amplitude: 0.5,
            cv: CvRange::C2_C7_12BIT,
            secondary_cv: SecondaryCv::EnvelopeA,
            initial_waveforms: [Waveform::BlepTriangle, Waveform::BlepSaw],
            initial_base_index: 0,
        }
    }
}

impl TrackerSettings {
    /// Real-time budget of one block in seconds.
    pub fn block_deadline(&self) -> f32 {
        self.block_size as f32 / self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_module() {
        let s = TrackerSettings::default();
        assert_eq!(s.switch_policy, SwitchPolicy::RetainHeldPitch);
        assert!(!s.envelope_gating);
        assert!(s.conditioning_enabled);
        assert_eq!(s.baseline_amplitude, 0.5);
        assert_eq!(s.cv.full_scale, 4095);
        assert_eq!(s.initial_waveforms, [Waveform::BlepTriangle, Waveform::BlepSaw]);
    }

    #[test]
    fn block_deadline_is_one_millisecond_by_default() {
        let deadline = TrackerSettings::default().block_deadline();
        assert!((deadline - 0.001).abs() < 1e-7);
    }
}
