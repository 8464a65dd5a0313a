//! Grundton Core - DSP primitives for string pitch tracking
//!
//! This crate provides the per-sample building blocks a pitch-tracking module
//! runs on every input channel, designed for real-time processing with zero
//! allocation in the audio path.
//!
//! # Core Abstractions
//!
//! ## Stages
//!
//! - [`Stage`] - Object-safe trait for single-sample processors
//! - [`Cascade`] - Ordered, fixed-capacity list of [`FilterStage`]s built from a [`CascadeLayout`]
//!
//! ## Filters
//!
//! - [`Biquad`] - Second-order IIR section with RBJ cookbook [`Coefficients`]
//! - [`DcBlocker`] - First-order DC removal
//! - [`OnePole`] - 6 dB/oct smoothing lowpass
//!
//! ## Envelopes & Conditioning
//!
//! - [`PeakEnvelope`] - Windowed peak follower tuned to a string's period
//! - [`EnvelopeFollower`] - Attack/release follower
//! - [`SignalConditioner`] - Gate + compressor ahead of pitch detection
//!
//! ## Pitch
//!
//! - [`PitchEstimator`] - Contract for per-sample pitch estimators
//! - [`PitchDetector`] - Normalized square difference (McLeod) detector
//!
//! # no_std Support
//!
//! Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! grundton-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use grundton_core::{Cascade, CascadeLayout, PitchDetector, PitchEstimator, Stage};
//!
//! let mut cascade = Cascade::new(&CascadeLayout::default(), 73.4, 329.6, 48000.0);
//! let mut detector = PitchDetector::for_band(73.4, 329.6, 48000.0, -45.0);
//!
//! for n in 0..4800 {
//!     let x = (core::f32::consts::TAU * 110.0 * n as f32 / 48000.0).sin();
//!     if detector.process(cascade.process(x)) {
//!         let _hz = detector.frequency();
//!     }
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod biquad;
pub mod cascade;
pub mod conditioner;
pub mod dc_blocker;
pub mod envelope;
pub mod math;
pub mod one_pole;
pub mod pitch;
pub mod stage;

pub use biquad::{BUTTERWORTH_Q, Biquad, Coefficients, Response};
pub use cascade::{Cascade, CascadeLayout, FilterStage, MAX_PEAKING, MAX_STAGES, PeakingBand, StageKind};
pub use conditioner::{ConditionerConfig, SignalConditioner};
pub use dc_blocker::DcBlocker;
pub use envelope::{EnvelopeFollower, PeakEnvelope};
pub use math::{db_to_linear, flush_denormal, linear_to_db, period};
pub use one_pole::OnePole;
pub use pitch::{MAX_LAG, PitchDetector, PitchEstimator};
pub use stage::Stage;
