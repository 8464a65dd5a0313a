//! The two output oscillators.

use crate::oscillator::{Oscillator, Waveform};

/// Left and right output oscillators.
///
/// Retuned once per block from the held pitches; between retunes each call to
/// [`next_frame`](Self::next_frame) produces one stereo sample.
#[derive(Debug, Clone)]
pub struct OscillatorPair {
    oscillators: [Oscillator; 2],
}

impl OscillatorPair {
    /// Pair at 0 Hz with the given waveforms and amplitude.
    pub fn new(sample_rate: f32, waveforms: [Waveform; 2], amplitude: f32) -> Self {
        let oscillators = waveforms.map(|waveform| {
            let mut osc = Oscillator::new(sample_rate);
            osc.set_waveform(waveform);
            osc.set_amplitude(amplitude);
            osc
        });
        Self { oscillators }
    }

    /// Select both waveforms.
    pub fn set_waveforms(&mut self, waveforms: [Waveform; 2]) {
        for (osc, waveform) in self.oscillators.iter_mut().zip(waveforms) {
            osc.set_waveform(waveform);
        }
    }

    /// Current waveforms.
    pub fn waveforms(&self) -> [Waveform; 2] {
        [self.oscillators[0].waveform(), self.oscillators[1].waveform()]
    }

    /// Set frequency and amplitude of both oscillators.
    pub fn retune(&mut self, frequencies: [f32; 2], amplitudes: [f32; 2]) {
        for ((osc, freq), amp) in self.oscillators.iter_mut().zip(frequencies).zip(amplitudes) {
            osc.set_frequency(freq);
            osc.set_amplitude(amp);
        }
    }

    /// Current frequencies in Hz.
    pub fn frequencies(&self) -> [f32; 2] {
        [self.oscillators[0].frequency(), self.oscillators[1].frequency()]
    }

    /// Current amplitudes.
    pub fn amplitudes(&self) -> [f32; 2] {
        [self.oscillators[0].amplitude(), self.oscillators[1].amplitude()]
    }

    /// Next `[left, right]` sample.
    #[inline]
    pub fn next_frame(&mut self) -> [f32; 2] {
        let [left, right] = &mut self.oscillators;
        [left.advance(), right.advance()]
    }

    /// Fill two output buffers, one frame per index.
    pub fn fill(&mut self, left: &mut [f32], right: &mut [f32]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            [*l, *r] = self.next_frame();
        }
    }

    /// Restart both oscillators at phase zero.
    pub fn reset(&mut self) {
        for osc in &mut self.oscillators {
            osc.reset();
        }
    }
}
