//! Pitch estimation for a single string band.
//!
//! [`PitchDetector`] is a McLeod-style detector built on the normalized square
//! difference function (NSDF). For a window `x` of `W` samples and lag `τ`:
//!
//! ```text
//! r(τ) = Σ x[j]·x[j+τ]            (j in 0..W-τ)
//! m(τ) = Σ x[j]² + x[j+τ]²
//! n(τ) = 2·r(τ) / m(τ)            (in [-1, 1], 1 at a perfect period)
//! ```
//!
//! `r` is the autocorrelation, computed as the inverse transform of the power
//! spectrum of the zero-padded window. `microfft` only has a forward real
//! transform; the power spectrum is real and even, so a second forward
//! transform gives the same result as an inverse one, up to a factor of the
//! transform size. `m` is updated incrementally from `m(0) = 2·Σx²`.
//!
//! The lag search is restricted to the band `[sr/high, sr/low]`. Of the local
//! maxima ("key maxima"), the first one reaching 0.9 of the largest is taken
//! as the period and refined with parabolic interpolation.
//!
//! The window spans two periods of the band's lowest frequency and advances by
//! one such period, so a new estimate is ready at most every low-bound period.
//! All buffers are sized in [`PitchEstimator::for_band`]; analysis does not
//! allocate.

use alloc::vec;
use alloc::vec::Vec;

use microfft::Complex32;

use crate::math::db_to_linear;

/// Contract for per-sample pitch estimators.
///
/// `process` is called once per sample and returns `true` when a detection
/// cycle completed. [`frequency`](Self::frequency) is only meaningful right
/// after that and returns `0.0` when the estimator has no confident pitch.
pub trait PitchEstimator {
    /// Estimator for fundamentals in `[low_hz, high_hz]`, ignoring input
    /// quieter than `threshold_db` (dBFS, RMS).
    fn for_band(low_hz: f32, high_hz: f32, sample_rate: f32, threshold_db: f32) -> Self
    where
        Self: Sized;

    /// Feed one sample. Returns `true` when a new estimate is ready.
    fn process(&mut self, sample: f32) -> bool;

    /// Latest estimate in Hz, `0.0` for no confident pitch.
    fn frequency(&self) -> f32;

    /// Drop buffered input and the latest estimate.
    fn reset(&mut self);
}

/// Key maxima below this fraction of the largest one are skipped.
const KEY_MAXIMUM_RATIO: f32 = 0.9;

/// Default minimum NSDF value for an estimate to count as confident.
pub const DEFAULT_CLARITY: f32 = 0.6;

/// Largest real transform `microfft` provides.
const MAX_FFT_SIZE: usize = 4096;

/// Longest lag that fits: the padded window needs `2·lag` samples plus `lag + 1`
/// zeros.
pub const MAX_LAG: usize = (MAX_FFT_SIZE - 1) / 3;

/// NSDF pitch detector.
///
/// # Example
///
/// ```rust
/// use grundton_core::{PitchDetector, PitchEstimator};
///
/// let sr = 48000.0;
/// let mut detector = PitchDetector::for_band(98.0, 493.9, sr, -45.0);
/// let mut estimate = 0.0;
/// for n in 0..4800 {
///     let x = 0.5 * (core::f32::consts::TAU * 220.0 * n as f32 / sr).sin();
///     if detector.process(x) {
///         estimate = detector.frequency();
///     }
/// }
/// assert!((estimate - 220.0).abs() < 2.2);
/// ```
#[derive(Debug, Clone)]
pub struct PitchDetector {
    sample_rate: f32,
    min_lag: usize,
    max_lag: usize,
    window: Vec<f32>,
    filled: usize,
    spectrum: Vec<f32>,
    power: Vec<f32>,
    nsdf: Vec<f32>,
    rms_threshold: f32,
    clarity_threshold: f32,
    frequency: f32,
    clarity: f32,
}

impl PitchDetector {
    /// Lowest fundamental a detector can search for at `sample_rate`.
    ///
    /// Band bounds below this are raised to it.
    pub fn lowest_detectable(sample_rate: f32) -> f32 {
        sample_rate / MAX_LAG as f32
    }

    /// Set the minimum clarity (NSDF peak value) for a confident estimate.
    #[must_use]
    pub fn with_clarity_threshold(mut self, clarity: f32) -> Self {
        self.clarity_threshold = clarity.clamp(0.0, 1.0);
        self
    }

    /// Shortest lag searched, in samples.
    pub fn min_lag(&self) -> usize {
        self.min_lag
    }

    /// Longest lag searched, in samples. Also the hop size.
    pub fn max_lag(&self) -> usize {
        self.max_lag
    }

    /// NSDF value of the latest estimate (0 when none).
    pub fn clarity(&self) -> f32 {
        self.clarity
    }

    /// Transform size used for the autocorrelation.
    pub fn fft_size(&self) -> usize {
        self.spectrum.len()
    }

    fn analyze(&mut self) {
        self.frequency = 0.0;
        self.clarity = 0.0;

        let energy: f32 = self.window.iter().map(|x| x * x).sum();
        if libm::sqrtf(energy / self.window.len() as f32) < self.rms_threshold {
            return;
        }

        if !self.compute_nsdf(energy) {
            return;
        }

        let Some((lag, value)) = self.pick_key_maximum() else {
            return;
        };
        if value < self.clarity_threshold || lag <= 0.0 {
            return;
        }
        self.frequency = self.sample_rate / lag;
        self.clarity = value;
    }

    // Fills nsdf[0..=max_lag]. False when the transform size is unsupported.
    fn compute_nsdf(&mut self, energy: f32) -> bool {
        let n = self.spectrum.len();
        let len = self.window.len();
        self.spectrum[..len].copy_from_slice(&self.window);
        self.spectrum[len..].fill(0.0);

        let Some(fft) = real_fft(&mut self.spectrum) else {
            return false;
        };
        // rfft packs the Nyquist bin into the imaginary part of bin 0.
        self.power[0] = fft[0].re * fft[0].re;
        self.power[n / 2] = fft[0].im * fft[0].im;
        for (k, bin) in fft.iter().enumerate().skip(1) {
            let p = bin.norm_sqr();
            self.power[k] = p;
            self.power[n - k] = p;
        }

        let Some(acf) = real_fft(&mut self.power) else {
            return false;
        };
        let scale = 1.0 / n as f32;
        let window = &self.window;
        let mut norm = 2.0 * energy;
        for (tau, out) in self.nsdf.iter_mut().enumerate().take(self.max_lag + 1) {
            let r = acf[tau].re * scale;
            *out = if norm > f32::EPSILON { 2.0 * r / norm } else { 0.0 };
            norm -= window[tau] * window[tau] + window[len - 1 - tau] * window[len - 1 - tau];
        }
        true
    }

    // (interpolated lag, interpolated value) of the chosen key maximum.
    fn pick_key_maximum(&self) -> Option<(f32, f32)> {
        let nsdf = &self.nsdf;
        let is_peak = |t: usize| nsdf[t] > 0.0 && nsdf[t] > nsdf[t - 1] && nsdf[t] >= nsdf[t + 1];

        let global = (self.min_lag..self.max_lag)
            .filter(|&t| is_peak(t))
            .map(|t| nsdf[t])
            .fold(0.0f32, f32::max);
        if global <= 0.0 {
            return None;
        }

        let cutoff = KEY_MAXIMUM_RATIO * global;
        let t = (self.min_lag..self.max_lag).find(|&t| is_peak(t) && nsdf[t] >= cutoff)?;

        let (left, centre, right) = (nsdf[t - 1], nsdf[t], nsdf[t + 1]);
        let a = 0.5 * (right - 2.0 * centre + left);
        let b = 0.5 * (right - left);
        let offset = if a == 0.0 { 0.0 } else { -b / (2.0 * a) };
        let value = a * offset * offset + b * offset + centre;
        Some((t as f32 + offset, value))
    }
}

impl PitchEstimator for PitchDetector {
    fn for_band(low_hz: f32, high_hz: f32, sample_rate: f32, threshold_db: f32) -> Self {
        let low = low_hz.max(PitchDetector::lowest_detectable(sample_rate));
        let high = high_hz.max(low);
        let min_lag = ((sample_rate / high) as usize).clamp(2, MAX_LAG - 2);
        let max_lag = (libm::ceilf(sample_rate / low) as usize).clamp(min_lag + 2, MAX_LAG);
        let fft_size = (3 * max_lag + 1).next_power_of_two().max(8);

        #[cfg(feature = "tracing")]
        tracing::debug!(low_hz, high_hz, min_lag, max_lag, fft_size, "pitch detector configured");

        Self {
            sample_rate,
            min_lag,
            max_lag,
            window: vec![0.0; 2 * max_lag],
            filled: 0,
            spectrum: vec![0.0; fft_size],
            power: vec![0.0; fft_size],
            nsdf: vec![0.0; max_lag + 2],
            rms_threshold: db_to_linear(threshold_db),
            clarity_threshold: DEFAULT_CLARITY,
            frequency: 0.0,
            clarity: 0.0,
        }
    }

    #[inline]
    fn process(&mut self, sample: f32) -> bool {
        self.window[self.filled] = sample;
        self.filled += 1;
        if self.filled < self.window.len() {
            return false;
        }

        self.analyze();
        self.window.copy_within(self.max_lag.., 0);
        self.filled = self.max_lag;
        true
    }

    fn frequency(&self) -> f32 {
        self.frequency
    }

    fn reset(&mut self) {
        self.window.fill(0.0);
        self.nsdf.fill(0.0);
        self.filled = 0;
        self.frequency = 0.0;
        self.clarity = 0.0;
    }
}

fn real_fft(buf: &mut [f32]) -> Option<&mut [Complex32]> {
    use microfft::real;

    let bins: &mut [Complex32] = match buf.len() {
        8 => real::rfft_8(buf.try_into().ok()?),
        16 => real::rfft_16(buf.try_into().ok()?),
        32 => real::rfft_32(buf.try_into().ok()?),
        64 => real::rfft_64(buf.try_into().ok()?),
        128 => real::rfft_128(buf.try_into().ok()?),
        256 => real::rfft_256(buf.try_into().ok()?),
        512 => real::rfft_512(buf.try_into().ok()?),
        1024 => real::rfft_1024(buf.try_into().ok()?),
        2048 => real::rfft_2048(buf.try_into().ok()?),
        4096 => real::rfft_4096(buf.try_into().ok()?),
        _ => return None,
    };
    Some(bins)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48000.0;

    fn track(detector: &mut PitchDetector, signal: impl Fn(usize) -> f32, samples: usize) -> (f32, usize) {
        let mut estimate = 0.0;
        let mut cycles = 0;
        for n in 0..samples {
            if detector.process(signal(n)) {
                estimate = detector.frequency();
                cycles += 1;
            }
        }
        (estimate, cycles)
    }

    fn sine(freq: f32, amplitude: f32) -> impl Fn(usize) -> f32 {
        move |n| amplitude * libm::sinf(core::f32::consts::TAU * freq * n as f32 / SR)
    }

    #[test]
    fn lag_range_covers_band() {
        let detector = PitchDetector::for_band(73.4, 329.6, SR, -45.0);
        assert_eq!(detector.min_lag(), 145);
        assert_eq!(detector.max_lag(), 654);
    }

    // Type-I NSDF evaluated term by term.
    fn direct_nsdf(x: &[f32], tau: usize) -> f32 {
        let (mut acf, mut norm) = (0.0f64, 0.0f64);
        for j in 0..x.len() - tau {
            let (a, b) = (f64::from(x[j]), f64::from(x[j + tau]));
            acf += a * b;
            norm += a * a + b * b;
        }
        if norm > 0.0 { (2.0 * acf / norm) as f32 } else { 0.0 }
    }

    #[test]
    fn transform_nsdf_matches_direct_sum() {
        let mut detector = PitchDetector::for_band(73.4, 329.6, SR, -45.0);
        let signal = |n: usize| {
            let t = core::f32::consts::TAU * 123.0 * n as f32 / SR;
            0.5 * libm::sinf(t) + 0.2 * libm::sinf(3.0 * t + 0.4)
        };
        let window: Vec<f32> = (0..2 * detector.max_lag()).map(signal).collect();
        let ready = window.iter().filter(|&&x| detector.process(x)).count();
        assert_eq!(ready, 1);

        for tau in (detector.min_lag() - 1)..=detector.max_lag() {
            let expected = direct_nsdf(&window, tau);
            assert!(
                (detector.nsdf[tau] - expected).abs() < 1e-3,
                "lag {tau}: {} vs {expected}",
                detector.nsdf[tau]
            );
        }
    }

    #[test]
    fn transform_size_pads_window() {
        let detector = PitchDetector::for_band(73.4, 329.6, SR, -45.0);
        assert_eq!(detector.fft_size(), 2048);
        assert!(detector.fft_size() >= 3 * detector.max_lag() + 1);

        let narrow = PitchDetector::for_band(1000.0, 1318.5, SR, -45.0);
        assert_eq!(narrow.fft_size(), 256);
    }

    #[test]
    fn lags_are_capped_by_largest_transform() {
        let floor = PitchDetector::lowest_detectable(SR);
        assert!((floor - SR / MAX_LAG as f32).abs() < 1e-3);

        let deep = PitchDetector::for_band(20.0, 200.0, SR, -45.0);
        assert_eq!(deep.max_lag(), MAX_LAG);
        assert_eq!(deep.fft_size(), 4096);

        let fast = PitchDetector::for_band(73.4, 1318.5, 192_000.0, -45.0);
        assert_eq!(fast.max_lag(), MAX_LAG);
        assert!(fast.min_lag() + 2 <= fast.max_lag());
    }

    #[test]
    fn capped_band_still_tracks_above_floor() {
        let mut detector = PitchDetector::for_band(20.0, 200.0, SR, -45.0);
        let (f, _) = track(&mut detector, sine(55.0, 0.5), 4 * MAX_LAG);
        assert!((f - 55.0).abs() < 0.6, "got {f}");
    }

    #[test]
    fn detects_low_e_region() {
        let mut detector = PitchDetector::for_band(73.4, 329.6, SR, -45.0);
        let (f, _) = track(&mut detector, sine(110.0, 0.5), 9600);
        assert!((f - 110.0).abs() < 1.1, "got {f}");
    }

    #[test]
    fn detects_a_440() {
        let mut detector = PitchDetector::for_band(98.0, 493.9, SR, -45.0);
        let (f, _) = track(&mut detector, sine(440.0, 0.3), 9600);
        assert!((f - 440.0).abs() < 4.4, "got {f}");
    }

    #[test]
    fn harmonics_do_not_cause_octave_errors() {
        let mut detector = PitchDetector::for_band(73.4, 329.6, SR, -45.0);
        let f0 = 98.0;
        let signal = |n: usize| {
            let t = core::f32::consts::TAU * f0 * n as f32 / SR;
            0.4 * libm::sinf(t) + 0.3 * libm::sinf(2.0 * t) + 0.2 * libm::sinf(3.0 * t)
        };
        let (f, _) = track(&mut detector, signal, 9600);
        assert!((f - f0).abs() < 1.0, "got {f}");
    }

    #[test]
    fn silence_reports_zero() {
        let mut detector = PitchDetector::for_band(73.4, 329.6, SR, -45.0);
        let (f, cycles) = track(&mut detector, |_| 0.0, 9600);
        assert!(cycles > 0);
        assert_eq!(f, 0.0);
    }

    #[test]
    fn below_threshold_reports_zero() {
        let mut detector = PitchDetector::for_band(73.4, 329.6, SR, -45.0);
        // -60 dBFS peak is well under the -45 dB RMS gate.
        let (f, _) = track(&mut detector, sine(110.0, 0.001), 9600);
        assert_eq!(f, 0.0);
    }

    #[test]
    fn ready_cadence_is_one_low_period() {
        let mut detector = PitchDetector::for_band(73.4, 329.6, SR, -45.0);
        let hop = detector.max_lag();
        let mut ready_at = Vec::new();
        for n in 0..(hop * 5) {
            if detector.process(0.0) {
                ready_at.push(n);
            }
        }
        assert_eq!(ready_at[0], 2 * hop - 1);
        assert!(ready_at.windows(2).all(|w| w[1] - w[0] == hop));
    }

    #[test]
    fn reset_clears_estimate() {
        let mut detector = PitchDetector::for_band(73.4, 329.6, SR, -45.0);
        track(&mut detector, sine(110.0, 0.5), 4800);
        assert!(detector.frequency() > 0.0);
        detector.reset();
        assert_eq!(detector.frequency(), 0.0);
        assert_eq!(detector.clarity(), 0.0);
    }
}
