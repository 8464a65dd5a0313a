//! Envelope followers for tracking string amplitude.
//!
//! Two followers with different jobs:
//!
//! - [`PeakEnvelope`] reads the raw input of a channel. Its hold window is a
//!   fraction of the string's longest period, so it settles within a couple
//!   of cycles and drops quickly after the string is muted.
//! - [`EnvelopeFollower`] is a classic attack/release detector. The signal
//!   conditioner uses it to drive its gate and compressor.

use libm::expf;

/// Windowed peak follower.
///
/// Keeps the absolute peak of two alternating windows of `hold` samples and
/// reports the larger of the two. The output therefore always covers at least
/// the last `hold` samples, rises instantly and falls to zero at most `2 * hold`
/// samples after the input goes silent.
///
/// # Example
///
/// ```rust
/// use grundton_core::PeakEnvelope;
///
/// // 0.6 of the period of the low E string.
/// let mut env = PeakEnvelope::new(0.6 / 73.4, 48000.0);
/// assert_eq!(env.process(-0.5), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct PeakEnvelope {
    hold: u32,
    count: u32,
    current: f32,
    previous: f32,
}

impl PeakEnvelope {
    /// Follower with a hold window of `hold_seconds`.
    pub fn new(hold_seconds: f32, sample_rate: f32) -> Self {
        let hold = libm::roundf(hold_seconds.max(0.0) * sample_rate).max(1.0) as u32;
        Self {
            hold,
            count: 0,
            current: 0.0,
            previous: 0.0,
        }
    }

    /// Hold window length in samples.
    pub fn hold_samples(&self) -> u32 {
        self.hold
    }

    /// Feed one sample and return the envelope. Not clamped.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let level = input.abs();
        if level > self.current {
            self.current = level;
        }
        self.count += 1;
        let out = self.current.max(self.previous);
        if self.count >= self.hold {
            self.previous = self.current;
            self.current = 0.0;
            self.count = 0;
        }
        out
    }

    /// Current envelope without consuming input.
    pub fn level(&self) -> f32 {
        self.current.max(self.previous)
    }

    /// Return to silence.
    pub fn reset(&mut self) {
        self.count = 0;
        self.current = 0.0;
        self.previous = 0.0;
    }
}

/// Attack/release envelope follower.
///
/// Peak detection with exponential smoothing, using the attack coefficient
/// while the rectified input is above the envelope and the release
/// coefficient otherwise.
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    envelope: f32,
    attack_coeff: f32,
    release_coeff: f32,
}

impl EnvelopeFollower {
    /// Follower with the given attack and release time constants in seconds.
    pub fn new(attack_seconds: f32, release_seconds: f32, sample_rate: f32) -> Self {
        Self {
            envelope: 0.0,
            attack_coeff: Self::coefficient(attack_seconds, sample_rate),
            release_coeff: Self::coefficient(release_seconds, sample_rate),
        }
    }

    /// Process a sample and return the envelope (always non-negative).
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let input_abs = input.abs();
        let coeff = if input_abs > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.envelope = coeff * self.envelope + (1.0 - coeff) * input_abs;
        self.envelope
    }

    /// Current envelope.
    pub fn level(&self) -> f32 {
        self.envelope
    }

    /// Reset the envelope to zero.
    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }

    // coeff = exp(-1 / (seconds * sample_rate)); zero time means no smoothing.
    fn coefficient(seconds: f32, sample_rate: f32) -> f32 {
        let samples = seconds * sample_rate;
        if samples <= 0.0 {
            0.0
        } else {
            expf(-1.0 / samples)
        }
    }
}
