//! Biquad (bi-quadratic) sections for the band-limiting cascade.
//!
//! Coefficient design uses the RBJ Audio EQ Cookbook formulas. Only the
//! responses a string channel needs are provided: high-pass at the string's
//! lowest fundamental, low-pass at its highest, and peaking for tone shaping.

use core::f32::consts::PI;
use libm::{cosf, powf, sinf};

use crate::flush_denormal;

/// Q giving a maximally flat (Butterworth) second-order response.
pub const BUTTERWORTH_Q: f32 = core::f32::consts::FRAC_1_SQRT_2;

/// Filter response shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Response {
    /// Second-order low-pass.
    Lowpass,
    /// Second-order high-pass.
    Highpass,
    /// Peaking bell with the given gain (positive = boost).
    Peaking {
        /// Gain at the centre frequency in dB.
        gain_db: f32,
    },
}

/// Biquad coefficients normalized so that `a0 == 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    /// Feedforward coefficient for x[n].
    pub b0: f32,
    /// Feedforward coefficient for x[n-1].
    pub b1: f32,
    /// Feedforward coefficient for x[n-2].
    pub b2: f32,
    /// Feedback coefficient for y[n-1].
    pub a1: f32,
    /// Feedback coefficient for y[n-2].
    pub a2: f32,
}

impl Coefficients {
    /// Passthrough: `y[n] = x[n]`.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Design coefficients for `response` at `frequency` Hz.
    ///
    /// The frequency is clamped to `[1 Hz, 0.49 * sample_rate]` and Q to at
    /// least 0.01, so any finite input yields a stable section.
    pub fn design(response: Response, frequency: f32, q: f32, sample_rate: f32) -> Self {
        let frequency = frequency.clamp(1.0, sample_rate * 0.49);
        let q = q.max(0.01);
        let omega = 2.0 * PI * frequency / sample_rate;
        let cos_omega = cosf(omega);
        let alpha = sinf(omega) / (2.0 * q);

        let (b0, b1, b2, a0, a1, a2) = match response {
            Response::Lowpass => (
                (1.0 - cos_omega) / 2.0,
                1.0 - cos_omega,
                (1.0 - cos_omega) / 2.0,
                1.0 + alpha,
                -2.0 * cos_omega,
                1.0 - alpha,
            ),
            Response::Highpass => (
                (1.0 + cos_omega) / 2.0,
                -(1.0 + cos_omega),
                (1.0 + cos_omega) / 2.0,
                1.0 + alpha,
                -2.0 * cos_omega,
                1.0 - alpha,
            ),
            Response::Peaking { gain_db } => {
                let a = powf(10.0, gain_db / 40.0);
                (
                    1.0 + alpha * a,
                    -2.0 * cos_omega,
                    1.0 - alpha * a,
                    1.0 + alpha / a,
                    -2.0 * cos_omega,
                    1.0 - alpha / a,
                )
            }
        };

        let a0_inv = 1.0 / a0;
        Self {
            b0: b0 * a0_inv,
            b1: b1 * a0_inv,
            b2: b2 * a0_inv,
            a1: a1 * a0_inv,
            a2: a2 * a0_inv,
        }
    }
}

impl Default for Coefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Second-order IIR section, Direct Form I:
///
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2] - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone, Default)]
pub struct Biquad {
    coeffs: Coefficients,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Passthrough section.
    pub fn new() -> Self {
        Self::default()
    }

    /// Section designed for `response` at `frequency` Hz.
    pub fn design(response: Response, frequency: f32, q: f32, sample_rate: f32) -> Self {
        Self::with_coefficients(Coefficients::design(response, frequency, q, sample_rate))
    }

    /// Section with explicit coefficients and cleared history.
    pub fn with_coefficients(coeffs: Coefficients) -> Self {
        Self {
            coeffs,
            ..Self::default()
        }
    }

    /// Replace the coefficients, keeping history.
    pub fn set_coefficients(&mut self, coeffs: Coefficients) {
        self.coeffs = coeffs;
    }

    /// Current coefficients.
    pub fn coefficients(&self) -> Coefficients {
        self.coeffs
    }

    /// Process a single sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let c = &self.coeffs;
        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2
            - c.a1 * self.y1
            - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = flush_denormal(output);

        output
    }

    /// Clear the delay lines.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}
