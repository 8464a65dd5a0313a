//! Pitch hold.

/// Latch holding the last confident pitch of one channel.
///
/// Detectors only report every so often and report 0 Hz when unsure. The hold
/// takes a reading only when the detector is ready *and* the reading is a
/// usable frequency; otherwise the previous value stays.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PitchHold {
    held: f32,
}

impl PitchHold {
    /// Hold at 0 Hz.
    pub const fn new() -> Self {
        Self { held: 0.0 }
    }

    /// Offer a reading. Returns true if it replaced the held value.
    #[inline]
    pub fn update(&mut self, ready: bool, frequency: f32) -> bool {
        if ready && frequency != 0.0 && frequency.is_finite() {
            self.held = frequency;
            true
        } else {
            false
        }
    }

    /// Held frequency in Hz (0 until the first confident reading).
    #[inline]
    pub fn held(&self) -> f32 {
        self.held
    }

    /// Back to 0 Hz.
    pub fn reset(&mut self) {
        self.held = 0.0;
    }
}
