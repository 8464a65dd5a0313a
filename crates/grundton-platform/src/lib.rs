//! Grundton Platform - hardware abstraction for the pitch tracker module
//!
//! The tracker's real-time pipeline never touches hardware directly. It talks
//! to a small set of narrow collaborators that a board support crate (or the
//! host simulation) implements:
//!
//! - [`PlatformController`] - Knobs, the rotary encoder and its push switch
//! - [`CvSink`] - Two-channel DAC accepting integer codes
//! - [`LoadMeter`] - Block-bracketed processing load measurement
//! - [`StatusDisplay`] - Fire-and-forget text display
//!
//! Plus helpers shared by every implementation:
//!
//! - [`ControlId`], [`ControlState`] - Control identity and value
//! - [`KnobParameter`] - Maps a knob position linearly onto a ranged value or index
//! - [`BlockLoadMeter`] - Smoothed average/min/max load from a [`Clock`]
//! - [`TextDisplay`] / [`LineBuf`] - Allocation-free text rendering
//!
//! # no_std Support
//!
//! ```toml
//! [dependencies]
//! grundton-platform = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod dac;
pub mod display;
pub mod knob;
pub mod load_meter;

pub use dac::{CvSink, DacChannel, FULL_SCALE_12BIT, RecordingDac};
pub use display::{LineBuf, StatusDisplay, TextDisplay};
pub use knob::KnobParameter;
#[cfg(feature = "std")]
pub use load_meter::StdClock;
pub use load_meter::{BlockLoadMeter, Clock, LoadMeter};

/// Control identifiers of the tracker module's front panel.
pub mod controls {
    use super::ControlId;

    /// Left waveform knob.
    pub const KNOB_1: ControlId = ControlId::hardware(0x00);
    /// Right waveform knob.
    pub const KNOB_2: ControlId = ControlId::hardware(0x01);
    /// Rotary encoder (relative).
    pub const ENCODER: ControlId = ControlId::hardware(0x10);
    /// Encoder push switch.
    pub const ENCODER_SWITCH: ControlId = ControlId::hardware(0x11);
}

/// Identifier of a physical control on the module.
///
/// ```rust
/// use grundton_platform::{ControlId, controls};
///
/// assert_eq!(ControlId::hardware(0x01), controls::KNOB_2);
/// assert_eq!(controls::KNOB_2.index(), 0x01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(u8);

impl ControlId {
    /// Control at `index` on the panel.
    #[inline]
    pub const fn hardware(index: u8) -> Self {
        Self(index)
    }

    /// Panel index.
    #[inline]
    pub const fn index(&self) -> u8 {
        self.0
    }
}

/// Current value of a control, normalized to 0.0..=1.0.
///
/// Knobs read their position, switches read 0.0 released and 1.0 pressed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlState {
    /// Normalized value.
    pub value: f32,
}

impl ControlState {
    /// State holding `value`.
    #[inline]
    pub const fn new(value: f32) -> Self {
        Self { value }
    }

    /// True when a switch reads as pressed.
    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.value >= 0.5
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Front-panel controls as seen by the real-time pipeline.
///
/// `poll` is called once at the start of every audio block; reads after it
/// reflect that poll. Implementations must not block.
pub trait PlatformController {
    /// Sample all controls.
    fn poll(&mut self) {}

    /// Current state of `id`, `None` if the control is absent or not readable.
    fn read_control(&self, id: ControlId) -> Option<ControlState>;

    /// Encoder detents since the previous poll (positive = clockwise).
    fn encoder_increment(&self) -> i32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_panel_ids_are_distinct() {
        let ids = [
            controls::KNOB_1,
            controls::KNOB_2,
            controls::ENCODER,
            controls::ENCODER_SWITCH,
        ];
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(controls::ENCODER_SWITCH.index(), 0x11);
    }

    #[test]
    fn switch_press_threshold() {
        assert!(!ControlState::new(0.2).is_pressed());
        assert!(ControlState::new(0.5).is_pressed());
        assert!(ControlState::new(1.0).is_pressed());
        assert!(!ControlState::default().is_pressed());
    }
}
