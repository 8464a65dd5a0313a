//! Per-channel DSP state.
//!
//! Each input channel owns one [`ProfileDsp`] per catalog entry, built at
//! startup. Switching strings only changes which entry is *bound*; the audio
//! path never builds filters or detectors.
//!
//! Per sample, on the bound entry:
//!
//! ```text
//! raw ──┬─► cascade (HP…, LP…, peaking…) ─► [conditioner] ─► detector ─► hold
//!       └─► |raw| ─► peak envelope ─► clamp [0, 1]
//! ```

use alloc::vec::Vec;

use grundton_core::{
    Cascade, PeakEnvelope, PitchDetector, PitchEstimator, SignalConditioner, Stage, period,
};

use crate::catalog::{StringCatalog, StringProfile};
use crate::hold::PitchHold;
use crate::settings::{SwitchPolicy, TrackerSettings};

/// DSP units tuned to one string profile.
#[derive(Debug, Clone)]
pub struct ProfileDsp<D = PitchDetector> {
    cascade: Cascade,
    conditioner: SignalConditioner,
    envelope: PeakEnvelope,
    detector: D,
}

impl<D: PitchEstimator> ProfileDsp<D> {
    /// Units for `profile`.
    pub fn new(profile: &StringProfile, settings: &TrackerSettings) -> Self {
        let (low, high, sr) = (profile.low_hz(), profile.high_hz(), settings.sample_rate);
        Self {
            cascade: Cascade::new(&settings.cascade, low, high, sr),
            conditioner: SignalConditioner::new(&settings.conditioner, low, high, sr),
            envelope: PeakEnvelope::new(period(low) * settings.envelope_hold_periods, sr),
            detector: D::for_band(low, high, sr, settings.threshold_db),
        }
    }

    /// The band-limiting cascade.
    pub fn cascade(&self) -> &Cascade {
        &self.cascade
    }

    /// The pitch detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Clear all filter, envelope and detector history.
    pub fn reset(&mut self) {
        self.cascade.reset();
        self.conditioner.reset();
        self.envelope.reset();
        self.detector.reset();
    }
}

/// One input channel: the per-profile arena, the bound index, held pitch and
/// last envelope value.
#[derive(Debug, Clone)]
pub struct ChannelState<D = PitchDetector> {
    arena: Vec<ProfileDsp<D>>,
    bound: usize,
    hold: PitchHold,
    envelope: f32,
}

impl<D: PitchEstimator> ChannelState<D> {
    /// Build units for every profile in `catalog` and bind `bound` (clamped).
    pub fn new(catalog: &StringCatalog, settings: &TrackerSettings, bound: usize) -> Self {
        let arena: Vec<ProfileDsp<D>> = catalog
            .iter()
            .map(|profile| ProfileDsp::new(profile, settings))
            .collect();
        Self {
            bound: bound.min(arena.len().saturating_sub(1)),
            arena,
            hold: PitchHold::new(),
            envelope: 0.0,
        }
    }

    /// Bind catalog entry `index`.
    ///
    /// The newly bound entry starts from clean history. Under
    /// [`SwitchPolicy::ResetHeldPitch`] the held pitch drops to 0 Hz.
    /// Returns false (and does nothing) if `index` is already bound or out of range.
    pub fn bind(&mut self, index: usize, policy: SwitchPolicy) -> bool {
        if index == self.bound || index >= self.arena.len() {
            return false;
        }
        self.arena[index].reset();
        self.bound = index;
        if policy == SwitchPolicy::ResetHeldPitch {
            self.hold.reset();
        }
        true
    }

    /// Run one raw input sample through the bound entry.
    ///
    /// Returns true if the held pitch was updated.
    #[inline]
    pub fn process(&mut self, sample: f32, conditioning: bool) -> bool {
        let dsp = &mut self.arena[self.bound];

        let filtered = dsp.cascade.process(sample);
        self.envelope = dsp.envelope.process(sample.abs()).clamp(0.0, 1.0);
        let conditioned = if conditioning {
            dsp.conditioner.process(filtered)
        } else {
            filtered
        };

        let ready = dsp.detector.process(conditioned);
        self.hold.update(ready, dsp.detector.frequency())
    }

    /// Bound catalog index.
    pub fn bound_index(&self) -> usize {
        self.bound
    }

    /// Held pitch in Hz.
    pub fn held_frequency(&self) -> f32 {
        self.hold.held()
    }

    /// Envelope after the last sample, in `[0, 1]`.
    pub fn envelope(&self) -> f32 {
        self.envelope
    }

    /// Units of the bound entry.
    pub fn bound_dsp(&self) -> &ProfileDsp<D> {
        &self.arena[self.bound]
    }

    /// Number of pre-built entries.
    pub fn arena_len(&self) -> usize {
        self.arena.len()
    }
}
