//! Grundton Tracker - real-time string pitch tracking
//!
//! The core of the module: two input channels, each tracking the pitch of one
//! string of a selectable adjacent pair, driving two oscillators and a 1 V/oct
//! control-voltage output.
//!
//! # Components
//!
//! - [`StringCatalog`] / [`StringProfile`] - Fixed, ordered frequency bands
//! - [`SelectionController`] - Encoder delta to a clamped pair of catalog indices
//! - [`ChannelState`] - Per-channel arena of pre-built DSP units, bound by index
//! - [`PitchHold`] - Keeps the last confident pitch
//! - [`CvMapper`] - Frequency to logarithmic DAC code
//! - [`BlockPipeline`] - The per-block audio callback tying it all together
//! - [`TrackerShared`] / [`StatusSnapshot`] - Lock-free state for the reporting loop
//! - [`render_status`] - Four-line status screen
//!
//! # Real-time contract
//!
//! [`BlockPipeline::process_block`] never allocates, locks or returns an
//! error. Out-of-range selections, zero pitch readings and out-of-range CV
//! values are clamped or ignored, never reported.
//!
//! # Example
//!
//! ```rust
//! use grundton_tracker::{CvMapper, SelectionController, StringCatalog};
//!
//! let catalog = StringCatalog::guitar();
//! let mut selection = SelectionController::new(&catalog);
//! selection.apply_delta(1);
//! let (a, b) = selection.pair();
//! assert_eq!(catalog.profile_at(a).unwrap().name(), "A");
//! assert_eq!(catalog.profile_at(b).unwrap().name(), "D");
//!
//! let cv = CvMapper::default();
//! assert!(cv.code(110.0) < cv.code(220.0));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod catalog;
pub mod channel;
pub mod cv;
pub mod hold;
pub mod pipeline;
pub mod selection;
pub mod settings;
pub mod shared;
pub mod status;

pub use catalog::{CatalogError, GUITAR, IndexError, StringCatalog, StringProfile};
pub use channel::{ChannelState, ProfileDsp};
pub use cv::CvMapper;
pub use hold::PitchHold;
pub use pipeline::BlockPipeline;
pub use selection::SelectionController;
pub use settings::{CvRange, SecondaryCv, SwitchPolicy, TrackerSettings};
pub use shared::{LoadSnapshot, StatusSnapshot, TrackerShared};
pub use status::{STATUS_COLS, STATUS_ROWS, format_status, render_status};
