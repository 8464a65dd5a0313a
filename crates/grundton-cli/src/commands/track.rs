//! Offline tracking command.
//!
//! Feeds a stereo recording through the pipeline in hardware-sized blocks,
//! with a scripted front panel, a recording DAC and a reporting thread.

use crate::commands::common::load_setup;
use crate::panel::{EncoderEvent, SimulatedPanel};
use crate::report::Reporter;
use anyhow::Context;
use clap::Args;
use grundton_core::PitchDetector;
use grundton_io::{StereoSamples, WavFormat, WavSpec, read_wav_info, read_wav_stereo, write_wav_stereo};
use grundton_platform::{BlockLoadMeter, LoadMeter, RecordingDac, StdClock};
use grundton_tracker::{BlockPipeline, StringCatalog};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

#[derive(Args)]
pub struct TrackArgs {
    /// Input WAV file (left = string A, right = string B; mono feeds both)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Write the oscillator output to this WAV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Turn the encoder at a block, as BLOCK:DELTA (repeatable)
    #[arg(long = "encoder", value_name = "BLOCK:DELTA")]
    encoder: Vec<EncoderEvent>,

    /// Press the encoder switch at a block (repeatable)
    #[arg(long = "toggle", value_name = "BLOCK")]
    toggle: Vec<u64>,

    /// Left waveform knob position (0-1)
    #[arg(long)]
    knob_a: Option<f32>,

    /// Right waveform knob position (0-1)
    #[arg(long)]
    knob_b: Option<f32>,

    /// Pace blocks to the wall clock
    #[arg(long)]
    realtime: bool,

    /// Status display refresh interval in milliseconds
    #[arg(long, default_value = "100")]
    refresh_ms: u64,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

/// End-of-run summary.
#[derive(Debug, Serialize)]
struct Summary {
    input: String,
    input_format: String,
    duration_secs: f64,
    blocks: u64,
    frames: usize,
    sample_rate: u32,
    strings: [String; 2],
    held_hz: [f32; 2],
    envelopes: [f32; 2],
    cv_codes: [u16; 2],
    conditioning: bool,
    waveforms: [&'static str; 2],
    load: Load,
    dac_writes: u64,
    selection_changes: u32,
    display: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Load {
    average: f32,
    min: f32,
    max: f32,
}

pub fn run(args: TrackArgs) -> anyhow::Result<()> {
    let (mut settings, catalog) = load_setup(args.config.as_deref())?;

    let info = read_wav_info(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
    let input_format = describe_format(info.format, info.bits_per_sample);
    tracing::info!(
        path = %args.input.display(),
        channels = info.channels,
        sample_rate = info.sample_rate,
        duration_secs = info.duration_secs,
        format = %input_format,
        "input header"
    );
    if info.num_frames == 0 {
        anyhow::bail!("{} contains no audio frames", args.input.display());
    }
    if info.channels > 2 {
        tracing::warn!(
            channels = info.channels,
            ignored = info.channels - 2,
            "input has extra channels; tracking the first two"
        );
    }

    let (input, spec) =
        read_wav_stereo(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
    tracing::info!(frames = input.len(), "input loaded");
    if spec.sample_rate as f32 != settings.sample_rate {
        tracing::warn!(
            configured = settings.sample_rate,
            file = spec.sample_rate,
            "using the input file's sample rate"
        );
        settings.sample_rate = spec.sample_rate as f32;
    }
    let floor = PitchDetector::lowest_detectable(settings.sample_rate);
    for profile in catalog.iter().filter(|p| p.low_hz() < floor) {
        tracing::warn!(
            string = profile.name(),
            low_hz = profile.low_hz(),
            floor,
            "band starts below the lowest detectable pitch at this sample rate"
        );
    }

    let block_size = settings.block_size;
    let mut pipeline: BlockPipeline = BlockPipeline::new(&catalog, settings);
    let mut panel = SimulatedPanel::new(args.encoder, args.toggle, [args.knob_a, args.knob_b]);
    let mut dac = RecordingDac::default();
    let mut meter = BlockLoadMeter::new(StdClock::new(), settings.sample_rate, block_size);

    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || flag.store(false, Ordering::Relaxed)).context("installing Ctrl-C handler")?;

    let reporter = Reporter::spawn(
        pipeline.shared(),
        catalog.clone(),
        Duration::from_millis(args.refresh_ms.max(1)),
    );

    let pb = if args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(input.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} frames ({eta})")?
            .progress_chars("##-"),
    );

    let mut output = StereoSamples::silence(input.len());
    let block_period = Duration::from_secs_f64(block_size as f64 / f64::from(spec.sample_rate));
    let start = Instant::now();
    let mut blocks = 0u64;
    let mut frames = 0usize;

    let inputs = input.left.chunks(block_size).zip(input.right.chunks(block_size));
    let outputs = output.left.chunks_mut(block_size).zip(output.right.chunks_mut(block_size));
    for ((a, b), (l, r)) in inputs.zip(outputs) {
        if !running.load(Ordering::Relaxed) {
            tracing::warn!(blocks, "interrupted");
            break;
        }
        pipeline.process_block(&mut panel, &mut dac, &mut meter, [a, b], [l, r]);
        blocks += 1;
        frames += a.len();
        pb.set_position(frames as u64);

        if args.realtime {
            let due = block_period.saturating_mul(blocks as u32);
            if let Some(wait) = due.checked_sub(start.elapsed()) {
                std::thread::sleep(wait);
            }
        }
    }
    pb.finish_and_clear();

    let report = reporter.finish()?;
    output.left.truncate(frames);
    output.right.truncate(frames);

    if let Some(path) = &args.output {
        let out_spec = WavSpec {
            channels: 2,
            sample_rate: spec.sample_rate,
            bits_per_sample: args.bit_depth,
        };
        write_wav_stereo(path, &output, out_spec).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), frames, "oscillator output written");
    }

    let source = Source {
        path: &args.input,
        format: input_format,
        duration_secs: info.duration_secs,
        sample_rate: spec.sample_rate,
    };
    let summary = summarize(source, &pipeline, &catalog, &dac, &meter, blocks, frames, report);
    tracing::info!(
        blocks,
        held_a = summary.held_hz[0],
        held_b = summary.held_hz[1],
        load = summary.load.average,
        "tracking finished"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary, settings.block_deadline());
    }
    Ok(())
}

/// Header facts about the input recording.
struct Source<'a> {
    path: &'a std::path::Path,
    format: String,
    duration_secs: f64,
    sample_rate: u32,
}

fn describe_format(format: WavFormat, bits: u16) -> String {
    match format {
        WavFormat::Pcm => format!("{bits}-bit PCM"),
        WavFormat::IeeeFloat => format!("{bits}-bit float"),
    }
}

#[allow(clippy::too_many_arguments)]
fn summarize(
    source: Source<'_>,
    pipeline: &BlockPipeline,
    catalog: &StringCatalog,
    dac: &RecordingDac,
    meter: &impl LoadMeter,
    blocks: u64,
    frames: usize,
    report: crate::report::Report,
) -> Summary {
    let (a, b) = pipeline.selection().pair();
    let name = |i| catalog.profile_at(i).map(|p| p.name().to_string()).unwrap_or_default();
    Summary {
        input: source.path.display().to_string(),
        input_format: source.format,
        duration_secs: source.duration_secs,
        blocks,
        frames,
        sample_rate: source.sample_rate,
        strings: [name(a), name(b)],
        held_hz: pipeline.held_frequencies(),
        envelopes: pipeline.envelopes(),
        cv_codes: pipeline.cv_codes(),
        conditioning: pipeline.conditioning_enabled(),
        waveforms: pipeline.oscillators().waveforms().map(|w| w.name()),
        load: Load {
            average: meter.average_load(),
            min: meter.min_load(),
            max: meter.max_load(),
        },
        dac_writes: dac.writes(),
        selection_changes: report.selection_changes,
        display: report.lines,
    }
}

fn print_summary(summary: &Summary, deadline: f32) {
    println!(
        "Tracked {} ({}, {:.2} s, {} blocks, {} frames)",
        summary.input, summary.input_format, summary.duration_secs, summary.blocks, summary.frames
    );
    println!();
    for line in &summary.display {
        println!("  | {line:<16} |");
    }
    println!();
    for ch in 0..2 {
        println!(
            "  {} {:<4} {:>9.2} Hz  env {:.3}  code {:>4}",
            ["A", "B"][ch],
            summary.strings[ch],
            summary.held_hz[ch],
            summary.envelopes[ch],
            summary.cv_codes[ch],
        );
    }
    println!("  waveforms: {} / {}", summary.waveforms[0], summary.waveforms[1]);
    println!(
        "  load: avg {:.1}%  min {:.1}%  max {:.1}% of {:.2} ms",
        summary.load.average * 100.0,
        summary.load.min * 100.0,
        summary.load.max * 100.0,
        deadline * 1000.0
    );
}
