//! One-pole lowpass used to smooth the conditioned signal.
//!
//! ```text
//! y[n] = x[n] + coeff * (y[n-1] - x[n]),   coeff = exp(-2π * freq / sample_rate)
//! ```
//!
//! 6 dB/octave, zero latency, one multiply per sample.

use crate::flush_denormal;
use crate::stage::Stage;
use libm::expf;

/// One-pole (6 dB/oct) lowpass filter.
///
/// `coeff` is always in [0, 1) for positive cutoffs.
///
/// ```rust
/// use grundton_core::OnePole;
///
/// let mut lp = OnePole::new(1318.5, 48000.0);
/// assert!(lp.process(1.0) < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct OnePole {
    state: f32,
    coeff: f32,
}

impl OnePole {
    /// Lowpass with its -3 dB point at `freq_hz`.
    pub fn new(freq_hz: f32, sample_rate: f32) -> Self {
        Self {
            state: 0.0,
            coeff: expf(-core::f32::consts::TAU * freq_hz.max(0.0) / sample_rate),
        }
    }

    /// Filter one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = flush_denormal(input + self.coeff * (self.state - input));
        self.state
    }

    /// Clear state.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }
}

impl Stage for OnePole {
    fn process(&mut self, input: f32) -> f32 {
        OnePole::process(self, input)
    }

    fn reset(&mut self) {
        OnePole::reset(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_dc() {
        let mut lp = OnePole::new(1000.0, 48000.0);
        let mut out = 0.0;
        for _ in 0..48000 {
            out = lp.process(1.0);
        }
        assert!((out - 1.0).abs() < 1e-4, "got {out}");
    }

    #[test]
    fn attenuates_nyquist() {
        let mut lp = OnePole::new(100.0, 48000.0);
        let mut sum = 0.0f32;
        for i in 0..4800 {
            let input = if i % 2 == 0 { 1.0 } else { -1.0 };
            sum += lp.process(input).abs();
        }
        assert!(sum / 4800.0 < 0.05);
    }

    #[test]
    fn reset_clears_state() {
        let mut lp = OnePole::new(1000.0, 48000.0);
        lp.process(1.0);
        lp.reset();
        assert_eq!(lp.process(0.0), 0.0);
    }
}
