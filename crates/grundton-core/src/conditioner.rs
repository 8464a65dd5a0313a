//! Signal conditioning ahead of pitch detection.
//!
//! A plucked string decays from a loud, harmonically rich attack into a long,
//! quiet tail. The conditioner evens that out so the detector sees a signal of
//! roughly constant level and nothing at all once the string is muted:
//!
//! ```text
//! input ─► DC blocker ─► one-pole smoother ─┬─► × gain ─► output
//!                                          │      ▲
//!                                          └─► envelope ─► gate + compressor
//! ```
//!
//! - The DC blocker sits an octave below the band's lowest fundamental.
//! - The smoother sits at the band's highest fundamental to shave pick noise.
//! - The gate opens above `gate_onset_db` and closes below `gate_release_db`
//!   (hysteresis, so a decaying tail does not chatter).
//! - The compressor reduces level above `compressor_threshold_db` by
//!   `compressor_ratio`, followed by `makeup_gain_db`.

use crate::dc_blocker::DcBlocker;
use crate::envelope::EnvelopeFollower;
use crate::math::{db_to_linear, linear_to_db};
use crate::one_pole::OnePole;
use crate::stage::Stage;

/// Tuning of a [`SignalConditioner`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionerConfig {
    /// Envelope attack in seconds.
    pub attack: f32,
    /// Envelope release in seconds.
    pub release: f32,
    /// Gate opens when the envelope rises above this level (dB).
    pub gate_onset_db: f32,
    /// Gate closes when the envelope falls below this level (dB).
    pub gate_release_db: f32,
    /// Compressor threshold (dB).
    pub compressor_threshold_db: f32,
    /// Compression ratio, e.g. 4.0 for 4:1.
    pub compressor_ratio: f32,
    /// Gain applied after compression (dB).
    pub makeup_gain_db: f32,
}

impl Default for ConditionerConfig {
    fn default() -> Self {
        Self {
            attack: 0.002,
            release: 0.05,
            gate_onset_db: -36.0,
            gate_release_db: -60.0,
            compressor_threshold_db: -18.0,
            compressor_ratio: 4.0,
            makeup_gain_db: 6.0,
        }
    }
}

/// Gate and compressor tuned to one string band.
///
/// # Example
///
/// ```rust
/// use grundton_core::{ConditionerConfig, SignalConditioner};
///
/// let mut sc = SignalConditioner::new(&ConditionerConfig::default(), 73.4, 329.6, 48000.0);
/// // Silence keeps the gate closed.
/// assert_eq!(sc.process(0.0), 0.0);
/// assert!(!sc.gate_open());
/// ```
#[derive(Debug, Clone)]
pub struct SignalConditioner {
    dc: DcBlocker,
    smoother: OnePole,
    envelope: EnvelopeFollower,
    onset: f32,
    release: f32,
    threshold_db: f32,
    slope: f32,
    makeup_db: f32,
    gate_open: bool,
}

impl SignalConditioner {
    /// Conditioner for the band `[low_hz, high_hz]`.
    pub fn new(config: &ConditionerConfig, low_hz: f32, high_hz: f32, sample_rate: f32) -> Self {
        let ratio = config.compressor_ratio.max(1.0);
        // Release can never sit above onset, otherwise the gate would never close.
        let release_db = config.gate_release_db.min(config.gate_onset_db);
        Self {
            dc: DcBlocker::new(low_hz * 0.5, sample_rate),
            smoother: OnePole::new(high_hz, sample_rate),
            envelope: EnvelopeFollower::new(config.attack, config.release, sample_rate),
            onset: db_to_linear(config.gate_onset_db),
            release: db_to_linear(release_db),
            threshold_db: config.compressor_threshold_db,
            slope: 1.0 - 1.0 / ratio,
            makeup_db: config.makeup_gain_db,
            gate_open: false,
        }
    }

    /// Condition one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let s = self.smoother.process(self.dc.process(input));
        let env = self.envelope.process(s);

        if self.gate_open {
            if env < self.release {
                self.gate_open = false;
            }
        } else if env > self.onset {
            self.gate_open = true;
        }
        if !self.gate_open {
            return 0.0;
        }

        let over = linear_to_db(env) - self.threshold_db;
        let reduction_db = if over > 0.0 { -over * self.slope } else { 0.0 };
        s * db_to_linear(reduction_db + self.makeup_db)
    }

    /// Whether the gate is currently open.
    pub fn gate_open(&self) -> bool {
        self.gate_open
    }

    /// Clear history and close the gate.
    pub fn reset(&mut self) {
        self.dc.reset();
        self.smoother.reset();
        self.envelope.reset();
        self.gate_open = false;
    }
}

impl Stage for SignalConditioner {
    fn process(&mut self, input: f32) -> f32 {
        SignalConditioner::process(self, input)
    }

    fn reset(&mut self) {
        SignalConditioner::reset(self);
    }
}
