//! Grundton Synth - output oscillators for the pitch tracker
//!
//! The tracker drives two oscillators, one per output channel, from the
//! pitches it holds. This crate provides:
//!
//! - [`Oscillator`] - Single oscillator with naive and PolyBLEP waveforms
//! - [`Waveform`] - Selectable waveform set, in knob order
//! - [`OscillatorPair`] - The two output oscillators, retuned once per block
//!
//! ```rust
//! use grundton_synth::{OscillatorPair, Waveform};
//!
//! let mut pair = OscillatorPair::new(48000.0, [Waveform::BlepTriangle, Waveform::BlepSaw], 0.5);
//! pair.retune([110.0, 220.0], [0.5, 0.5]);
//! let [_left, _right] = pair.next_frame();
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod oscillator;
pub mod pair;

pub use oscillator::{Oscillator, Waveform};
pub use pair::OscillatorPair;
