//! Output oscillator.
//!
//! Eight waveforms: four naive shapes, a sine, and three PolyBLEP
//! (Polynomial Band-Limited Step) shapes. The naive shapes alias at high
//! pitches on purpose; they are the rawer-sounding choices on the waveform knob.

use core::f32::consts::TAU;
use libm::sinf;

/// Oscillator waveform, in knob order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Waveform {
    /// Pure sine.
    #[default]
    Sine,
    /// Naive triangle.
    Triangle,
    /// Naive rising sawtooth.
    Saw,
    /// Naive falling sawtooth.
    Ramp,
    /// Naive square, 50% duty.
    Square,
    /// Band-limited triangle (integrated PolyBLEP square).
    BlepTriangle,
    /// Band-limited sawtooth.
    BlepSaw,
    /// Band-limited square.
    BlepSquare,
}

impl Waveform {
    /// Number of waveforms.
    pub const COUNT: usize = 8;

    /// All waveforms in knob order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Sine,
        Self::Triangle,
        Self::Saw,
        Self::Ramp,
        Self::Square,
        Self::BlepTriangle,
        Self::BlepSaw,
        Self::BlepSquare,
    ];

    /// Waveform at `index`, clamped to the last one.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::COUNT - 1)]
    }

    /// Knob index of this waveform.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sine => "sine",
            Self::Triangle => "tri",
            Self::Saw => "saw",
            Self::Ramp => "ramp",
            Self::Square => "square",
            Self::BlepTriangle => "blep-tri",
            Self::BlepSaw => "blep-saw",
            Self::BlepSquare => "blep-square",
        }
    }

    /// Waveform with the given [`name`](Self::name), ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.name().eq_ignore_ascii_case(name))
    }
}

/// Audio-rate oscillator.
///
/// # Example
///
/// ```rust
/// use grundton_synth::{Oscillator, Waveform};
///
/// let mut osc = Oscillator::new(48000.0);
/// osc.set_waveform(Waveform::BlepSaw);
/// osc.set_frequency(110.0);
/// osc.set_amplitude(0.5);
/// let sample = osc.advance();
/// assert!(sample.abs() <= 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct Oscillator {
    sample_rate: f32,
    frequency: f32,
    phase_inc: f32,
    phase: f32,
    amplitude: f32,
    waveform: Waveform,
    // Leaky integrator state for BlepTriangle.
    integrator: f32,
}

impl Oscillator {
    /// Silent sine at 0 Hz.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            frequency: 0.0,
            phase_inc: 0.0,
            phase: 0.0,
            amplitude: 1.0,
            waveform: Waveform::Sine,
            integrator: 0.0,
        }
    }

    /// Select the waveform. Phase is kept.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        if waveform != self.waveform && waveform == Waveform::BlepTriangle {
            self.integrator = 0.0;
        }
        self.waveform = waveform;
    }

    /// Current waveform.
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Frequency in Hz, clamped to `[0, sample_rate / 2]`. Non-finite input stops the oscillator.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.frequency = if freq_hz.is_finite() {
            freq_hz.clamp(0.0, self.sample_rate * 0.5)
        } else {
            0.0
        };
        self.phase_inc = self.frequency / self.sample_rate;
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Output amplitude, clamped to `[0, 1]`.
    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = if amplitude.is_nan() { 0.0 } else { amplitude.clamp(0.0, 1.0) };
    }

    /// Current amplitude.
    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    /// Restart at phase zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.integrator = 0.0;
    }

    /// Produce the next sample.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let out = self.shape(self.phase) * self.amplitude;
        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        out
    }

    #[inline]
    fn shape(&mut self, phase: f32) -> f32 {
        let dt = self.phase_inc;
        match self.waveform {
            Waveform::Sine => sinf(phase * TAU),
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
            Waveform::Saw => 2.0 * phase - 1.0,
            Waveform::Ramp => 1.0 - 2.0 * phase,
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::BlepSaw => 2.0 * phase - 1.0 - poly_blep(phase, dt),
            Waveform::BlepSquare => blep_square(phase, dt),
            Waveform::BlepTriangle => {
                // Integrating a square gives a triangle; the leak keeps DC out.
                let leak = 1.0 - dt.min(0.1);
                self.integrator = leak * self.integrator + blep_square(phase, dt) * dt * 4.0;
                self.integrator.clamp(-1.0, 1.0)
            }
        }
    }
}

#[inline]
fn blep_square(phase: f32, dt: f32) -> f32 {
    let naive = if phase < 0.5 { 1.0 } else { -1.0 };
    let falling = phase + 0.5;
    let falling = if falling >= 1.0 { falling - 1.0 } else { falling };
    naive + poly_blep(phase, dt) - poly_blep(falling, dt)
}

/// Two-sample polynomial step residual around a wrap at phase 0.
///
/// `t` is the phase in `[0, 1)`, `dt` the phase increment. Returns the value
/// to subtract at a falling step (or add at a rising one); zero away from it.
#[inline]
fn poly_blep(t: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    if t < dt {
        let n = t / dt;
        n + n - n * n - 1.0
    } else if t > 1.0 - dt {
        let n = (t - 1.0) / dt;
        n * n + n + n + 1.0
    } else {
        0.0
    }
}
