//! The per-block real-time pipeline.
//!
//! [`BlockPipeline::process_block`] is the audio callback. For every block:
//!
//! 1. Start the load meter, poll the controls, apply encoder movement
//!    (rebinding both channels), the encoder push (toggle conditioning) and
//!    the waveform knobs.
//! 2. Per frame: run both channels and write one oscillator frame.
//! 3. Retune the oscillators from the held pitches, write both DAC codes,
//!    stop the load meter and publish the shared state.
//!
//! Nothing in here allocates, locks or fails.

use alloc::sync::Arc;

use grundton_core::{PitchDetector, PitchEstimator};
use grundton_platform::{
    CvSink, DacChannel, KnobParameter, LoadMeter, PlatformController, controls,
};
use grundton_synth::{OscillatorPair, Waveform};

use crate::catalog::StringCatalog;
use crate::channel::ChannelState;
use crate::cv::CvMapper;
use crate::selection::SelectionController;
use crate::settings::{SecondaryCv, TrackerSettings};
use crate::shared::{LoadSnapshot, StatusSnapshot, TrackerShared};

/// Two-channel pitch tracker driving two oscillators and two CV outputs.
///
/// Generic over the pitch estimator so tests can substitute a scripted one.
///
/// # Example
///
/// ```rust
/// use grundton_platform::{ControlId, ControlState, PlatformController, RecordingDac};
/// use grundton_platform::{BlockLoadMeter, StdClock};
/// use grundton_tracker::{BlockPipeline, StringCatalog, TrackerSettings};
///
/// struct Idle;
/// impl PlatformController for Idle {
///     fn read_control(&self, _: ControlId) -> Option<ControlState> { None }
///     fn encoder_increment(&self) -> i32 { 0 }
/// }
///
/// let settings = TrackerSettings::default();
/// let mut pipeline: BlockPipeline = BlockPipeline::new(&StringCatalog::guitar(), settings);
/// let mut dac = RecordingDac::default();
/// let mut meter = BlockLoadMeter::new(StdClock::new(), settings.sample_rate, settings.block_size);
///
/// let (a, b) = (vec![0.0f32; 48], vec![0.0f32; 48]);
/// let (mut l, mut r) = (vec![0.0f32; 48], vec![0.0f32; 48]);
/// pipeline.process_block(&mut Idle, &mut dac, &mut meter, [&a[..], &b[..]], [&mut l[..], &mut r[..]]);
/// assert_eq!(pipeline.shared().blocks(), 1);
/// ```
#[derive(Debug)]
pub struct BlockPipeline<D = PitchDetector> {
    settings: TrackerSettings,
    selection: SelectionController,
    channels: [ChannelState<D>; 2],
    oscillators: OscillatorPair,
    cv: CvMapper,
    wave_knob: KnobParameter,
    conditioning: bool,
    codes: [u16; 2],
    shared: Arc<TrackerShared>,
}

impl<D: PitchEstimator> BlockPipeline<D> {
    /// Build every channel's DSP arena for `catalog`.
    ///
    /// This is the only place that allocates.
    pub fn new(catalog: &StringCatalog, settings: TrackerSettings) -> Self {
        let selection = SelectionController::new(catalog).with_base(settings.initial_base_index);
        let (a, b) = selection.pair();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            strings = catalog.len(),
            base = a,
            sample_rate = settings.sample_rate,
            block_size = settings.block_size,
            "building tracker pipeline"
        );

        Self {
            selection,
            channels: [
                ChannelState::new(catalog, &settings, a),
                ChannelState::new(catalog, &settings, b),
            ],
            oscillators: OscillatorPair::new(
                settings.sample_rate,
                settings.initial_waveforms,
                settings.baseline_amplitude,
            ),
            cv: CvMapper::new(settings.cv),
            wave_knob: KnobParameter::indices(Waveform::COUNT - 1),
            conditioning: settings.conditioning_enabled,
            codes: [0; 2],
            shared: Arc::new(TrackerShared::new(&settings, a)),
            settings,
        }
    }

    /// Handle for the reporting side.
    pub fn shared(&self) -> Arc<TrackerShared> {
        Arc::clone(&self.shared)
    }

    /// Settings the pipeline was built with.
    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    /// Current string selection.
    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    /// Channel A (`0`) or B (`1`).
    pub fn channel(&self, index: usize) -> Option<&ChannelState<D>> {
        self.channels.get(index)
    }

    /// Held pitches `[A, B]`.
    pub fn held_frequencies(&self) -> [f32; 2] {
        [self.channels[0].held_frequency(), self.channels[1].held_frequency()]
    }

    /// Envelopes `[A, B]` after the last sample.
    pub fn envelopes(&self) -> [f32; 2] {
        [self.channels[0].envelope(), self.channels[1].envelope()]
    }

    /// Last DAC codes `[one, two]`.
    pub fn cv_codes(&self) -> [u16; 2] {
        self.codes
    }

    /// Signal conditioning flag.
    pub fn conditioning_enabled(&self) -> bool {
        self.conditioning
    }

    /// Oscillator pair.
    pub fn oscillators(&self) -> &OscillatorPair {
        &self.oscillators
    }

    /// Process one audio block.
    ///
    /// `input` is `[channel A, channel B]`, `output` is `[left, right]`. Only
    /// the common length of all four slices is processed; any extra output
    /// samples are zeroed.
    pub fn process_block<H, C, M>(
        &mut self,
        hw: &mut H,
        dac: &mut C,
        meter: &mut M,
        input: [&[f32]; 2],
        output: [&mut [f32]; 2],
    ) where
        H: PlatformController,
        C: CvSink,
        M: LoadMeter,
    {
        meter.on_block_start();
        hw.poll();
        self.update_controls(hw);

        let [in_a, in_b] = input;
        let [out_l, out_r] = output;
        let frames = in_a.len().min(in_b.len()).min(out_l.len()).min(out_r.len());
        let conditioning = self.conditioning;
        let [channel_a, channel_b] = &mut self.channels;

        for i in 0..frames {
            channel_a.process(in_a[i], conditioning);
            channel_b.process(in_b[i], conditioning);
            [out_l[i], out_r[i]] = self.oscillators.next_frame();
        }
        out_l[frames..].fill(0.0);
        out_r[frames..].fill(0.0);

        self.update_outputs(dac);
        meter.on_block_end();
        self.publish(meter);
    }

    fn update_controls<H: PlatformController>(&mut self, hw: &H) {
        if self.selection.apply_delta(hw.encoder_increment()) {
            let (a, b) = self.selection.pair();
            let policy = self.settings.switch_policy;
            self.channels[0].bind(a, policy);
            self.channels[1].bind(b, policy);
        }

        let waveforms = [controls::KNOB_1, controls::KNOB_2].map(|id| {
            hw.read_control(id)
                .map(|state| Waveform::from_index(self.wave_knob.map_index(state.value)))
        });
        let current = self.oscillators.waveforms();
        self.oscillators.set_waveforms([
            waveforms[0].unwrap_or(current[0]),
            waveforms[1].unwrap_or(current[1]),
        ]);

        let pressed = hw
            .read_control(controls::ENCODER_SWITCH)
            .is_some_and(|state| state.is_pressed());
        if self.selection.edge_triggered(pressed) {
            self.conditioning = !self.conditioning;
        }
    }

    fn update_outputs<C: CvSink>(&mut self, dac: &mut C) {
        let frequencies = self.held_frequencies();
        let envelopes = self.envelopes();
        let amplitudes = if self.settings.envelope_gating {
            envelopes
        } else {
            [self.settings.baseline_amplitude; 2]
        };
        self.oscillators.retune(frequencies, amplitudes);

        self.codes[0] = self.cv.code(frequencies[0]);
        self.codes[1] = match self.settings.secondary_cv {
            SecondaryCv::EnvelopeA => self.cv.level_code(envelopes[0]),
            SecondaryCv::PitchB => self.cv.code(frequencies[1]),
        };
        dac.write_code(DacChannel::One, self.codes[0]);
        dac.write_code(DacChannel::Two, self.codes[1]);
    }

    fn publish<M: LoadMeter>(&self, meter: &M) {
        self.shared.publish(&StatusSnapshot {
            base_index: self.selection.base_index(),
            frequencies: self.held_frequencies(),
            envelopes: self.envelopes(),
            conditioning: self.conditioning,
            cv_codes: self.codes,
            waveforms: self.oscillators.waveforms(),
            load: LoadSnapshot {
                average: meter.average_load(),
                min: meter.min_load(),
                max: meter.max_load(),
            },
            blocks: 0,
        });
    }
}
