//! Test recording generation.

use anyhow::Context;
use clap::Args;
use grundton_io::{StereoSamples, WavSpec, write_wav_stereo};
use std::f32::consts::TAU;
use std::path::PathBuf;

#[derive(Args)]
pub struct GenerateArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Fundamental of the left channel (string A) in Hz
    #[arg(long, default_value = "82.41")]
    left: f32,

    /// Fundamental of the right channel (string B) in Hz
    #[arg(long, default_value = "110.0")]
    right: f32,

    /// Duration in seconds
    #[arg(long, default_value = "2.0")]
    duration: f32,

    /// Decay time constant in seconds (0 = sustained)
    #[arg(long, default_value = "1.5")]
    decay: f32,

    /// Re-pluck every this many seconds (0 = once)
    #[arg(long, default_value = "0.0")]
    repluck: f32,

    /// Number of harmonics (1 = pure sine)
    #[arg(long, default_value = "6")]
    harmonics: u32,

    /// Peak amplitude (0-1)
    #[arg(long, default_value = "0.5")]
    amplitude: f32,

    /// Sample rate
    #[arg(long, default_value = "48000")]
    sample_rate: u32,
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    if args.duration.is_nan() || args.duration <= 0.0 {
        anyhow::bail!("duration must be positive");
    }
    let sr = args.sample_rate as f32;
    let len = (args.duration * sr) as usize;
    let voice = Pluck {
        harmonics: args.harmonics.max(1),
        decay: args.decay,
        repluck: args.repluck,
        amplitude: args.amplitude.clamp(0.0, 1.0),
    };

    let samples = StereoSamples::new(voice.render(args.left, sr, len), voice.render(args.right, sr, len));
    let spec = WavSpec {
        channels: 2,
        sample_rate: args.sample_rate,
        bits_per_sample: 32,
    };
    write_wav_stereo(&args.output, &samples, spec).with_context(|| format!("writing {}", args.output.display()))?;

    tracing::info!(
        path = %args.output.display(),
        left = args.left,
        right = args.right,
        frames = len,
        "test recording written"
    );
    println!(
        "Generated {:.2}s plucked tones ({} Hz / {} Hz) -> {}",
        args.duration,
        args.left,
        args.right,
        args.output.display()
    );
    Ok(())
}

/// Harmonic series with 1/k amplitudes under an exponential decay.
struct Pluck {
    harmonics: u32,
    decay: f32,
    repluck: f32,
    amplitude: f32,
}

impl Pluck {
    fn render(&self, freq: f32, sr: f32, len: usize) -> Vec<f32> {
        let norm: f32 = (1..=self.harmonics).map(|k| 1.0 / k as f32).sum();
        (0..len)
            .map(|n| {
                let t = n as f32 / sr;
                let since_pluck = if self.repluck > 0.0 { t % self.repluck } else { t };
                let env = if self.decay > 0.0 {
                    (-since_pluck / self.decay).exp()
                } else {
                    1.0
                };
                let tone: f32 = (1..=self.harmonics)
                    .map(|k| (TAU * freq * k as f32 * t).sin() / k as f32)
                    .sum();
                self.amplitude * env * tone / norm
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pluck_stays_within_amplitude_and_decays() {
        let voice = Pluck {
            harmonics: 6,
            decay: 0.2,
            repluck: 0.0,
            amplitude: 0.5,
        };
        let s = voice.render(110.0, 48000.0, 48000);
        assert!(s.iter().all(|x| x.abs() <= 0.5 + 1e-4));
        let head = s[..4800].iter().fold(0.0f32, |m, x| m.max(x.abs()));
        let tail = s[43200..].iter().fold(0.0f32, |m, x| m.max(x.abs()));
        assert!(tail < head * 0.1, "head {head} tail {tail}");
    }

    #[test]
    fn repluck_restores_level() {
        let voice = Pluck {
            harmonics: 1,
            decay: 0.1,
            repluck: 0.5,
            amplitude: 1.0,
        };
        let s = voice.render(100.0, 48000.0, 48000);
        let peak = |r: std::ops::Range<usize>| s[r].iter().fold(0.0f32, |m, x| m.max(x.abs()));
        assert!(peak(24000..24480) > 0.9);
        assert!(peak(23500..24000) < 0.01);
    }
}
