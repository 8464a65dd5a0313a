//! State published by the real-time pipeline for the reporting loop.
//!
//! The audio context writes once per block; the background loop reads at its
//! own pace. Every field is a single atomic word (f32 values are stored as
//! their bit patterns in `AtomicU32`), so reads are never torn and the audio
//! context never takes a lock. Fields are independent: a snapshot may mix
//! values from two consecutive blocks.

use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU16, AtomicU32, AtomicUsize, Ordering};

use grundton_synth::Waveform;

use crate::settings::TrackerSettings;

/// Load meter readings as fractions of the block deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadSnapshot {
    /// Smoothed average.
    pub average: f32,
    /// Lowest block.
    pub min: f32,
    /// Highest block.
    pub max: f32,
}

/// Copy of the published state at one moment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusSnapshot {
    /// Catalog index of channel A (channel B is the next one).
    pub base_index: usize,
    /// Held pitches in Hz, `[A, B]`.
    pub frequencies: [f32; 2],
    /// Envelopes in `[0, 1]`, `[A, B]`.
    pub envelopes: [f32; 2],
    /// Signal conditioning enabled.
    pub conditioning: bool,
    /// Last DAC codes, `[channel one, channel two]`.
    pub cv_codes: [u16; 2],
    /// Oscillator waveforms, `[left, right]`.
    pub waveforms: [Waveform; 2],
    /// Processing load.
    pub load: LoadSnapshot,
    /// Blocks processed (wraps).
    pub blocks: u32,
}

impl StatusSnapshot {
    /// `(channel A, channel B)` catalog indices.
    pub fn pair(&self) -> (usize, usize) {
        (self.base_index, self.base_index + 1)
    }
}

#[derive(Debug)]
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    #[inline]
    fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }

    #[inline]
    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }
}

/// Shared tracker state. Written by [`BlockPipeline`](crate::BlockPipeline),
/// read anywhere through [`snapshot`](Self::snapshot).
#[derive(Debug)]
pub struct TrackerShared {
    base_index: AtomicUsize,
    frequencies: [AtomicF32; 2],
    envelopes: [AtomicF32; 2],
    conditioning: AtomicBool,
    cv_codes: [AtomicU16; 2],
    waveforms: [AtomicU8; 2],
    load: [AtomicF32; 3],
    blocks: AtomicU32,
}

impl TrackerShared {
    /// Initial state matching a freshly built pipeline.
    pub fn new(settings: &TrackerSettings, base_index: usize) -> Self {
        Self {
            base_index: AtomicUsize::new(base_index),
            frequencies: [AtomicF32::new(0.0), AtomicF32::new(0.0)],
            envelopes: [AtomicF32::new(0.0), AtomicF32::new(0.0)],
            conditioning: AtomicBool::new(settings.conditioning_enabled),
            cv_codes: [AtomicU16::new(0), AtomicU16::new(0)],
            waveforms: settings.initial_waveforms.map(|w| AtomicU8::new(w.index() as u8)),
            load: [AtomicF32::new(0.0), AtomicF32::new(0.0), AtomicF32::new(0.0)],
            blocks: AtomicU32::new(0),
        }
    }

    /// Read everything.
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            base_index: self.base_index(),
            frequencies: self.frequencies(),
            envelopes: [self.envelopes[0].load(), self.envelopes[1].load()],
            conditioning: self.conditioning(),
            cv_codes: [
                self.cv_codes[0].load(Ordering::Relaxed),
                self.cv_codes[1].load(Ordering::Relaxed),
            ],
            waveforms: [
                Waveform::from_index(self.waveforms[0].load(Ordering::Relaxed) as usize),
                Waveform::from_index(self.waveforms[1].load(Ordering::Relaxed) as usize),
            ],
            load: LoadSnapshot {
                average: self.load[0].load(),
                min: self.load[1].load(),
                max: self.load[2].load(),
            },
            blocks: self.blocks(),
        }
    }

    /// Catalog index of channel A.
    pub fn base_index(&self) -> usize {
        self.base_index.load(Ordering::Relaxed)
    }

    /// Held pitches `[A, B]`.
    pub fn frequencies(&self) -> [f32; 2] {
        [self.frequencies[0].load(), self.frequencies[1].load()]
    }

    /// Signal conditioning flag.
    pub fn conditioning(&self) -> bool {
        self.conditioning.load(Ordering::Relaxed)
    }

    /// Blocks processed so far (wraps).
    pub fn blocks(&self) -> u32 {
        self.blocks.load(Ordering::Acquire)
    }

    /// Store a full snapshot and count one more block.
    pub(crate) fn publish(&self, snapshot: &StatusSnapshot) {
        self.base_index.store(snapshot.base_index, Ordering::Relaxed);
        for i in 0..2 {
            self.frequencies[i].store(snapshot.frequencies[i]);
            self.envelopes[i].store(snapshot.envelopes[i]);
            self.cv_codes[i].store(snapshot.cv_codes[i], Ordering::Relaxed);
            self.waveforms[i].store(snapshot.waveforms[i].index() as u8, Ordering::Relaxed);
        }
        self.conditioning.store(snapshot.conditioning, Ordering::Relaxed);
        self.load[0].store(snapshot.load.average);
        self.load[1].store(snapshot.load.min);
        self.load[2].store(snapshot.load.max);
        self.blocks.fetch_add(1, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_snapshot_reflects_settings() {
        let settings = TrackerSettings::default();
        let shared = TrackerShared::new(&settings, 2);
        let snap = shared.snapshot();
        assert_eq!(snap.pair(), (2, 3));
        assert_eq!(snap.frequencies, [0.0, 0.0]);
        assert!(snap.conditioning);
        assert_eq!(snap.waveforms, settings.initial_waveforms);
        assert_eq!(snap.blocks, 0);
    }

    #[test]
    fn publish_round_trips_and_counts() {
        let shared = TrackerShared::new(&TrackerSettings::default(), 0);
        let snap = StatusSnapshot {
            base_index: 5,
            frequencies: [329.63, 0.0],
            envelopes: [0.25, 1.0],
            conditioning: false,
            cv_codes: [2500, 1024],
            waveforms: [Waveform::Square, Waveform::Ramp],
            load: LoadSnapshot {
                average: 0.2,
                min: 0.1,
                max: 0.4,
            },
            blocks: 0,
        };
        shared.publish(&snap);
        shared.publish(&snap);
        let read = shared.snapshot();
        assert_eq!(read.blocks, 2);
        assert_eq!(StatusSnapshot { blocks: 0, ..read }, snap);
    }
}
