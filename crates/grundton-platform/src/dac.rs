//! Control-voltage outputs.

/// Maximum code of a 12-bit DAC.
pub const FULL_SCALE_12BIT: u16 = 4095;

/// One of the two DAC channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DacChannel {
    /// First output (pitch CV).
    One,
    /// Second output (envelope or second pitch CV).
    Two,
}

impl DacChannel {
    /// Both channels in order.
    pub const BOTH: [Self; 2] = [Self::One, Self::Two];

    /// Zero-based channel index.
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

/// Sink for integer DAC codes.
///
/// Called from the real-time context once per block per channel. Must not
/// block. Codes are already clamped to the device range by the caller.
pub trait CvSink {
    /// Write `code` to `channel`.
    fn write_code(&mut self, channel: DacChannel, code: u16);
}

/// DAC that remembers the last code per channel and counts writes.
///
/// Used by the host simulation and in tests.
///
/// ```rust
/// use grundton_platform::{CvSink, DacChannel, RecordingDac};
///
/// let mut dac = RecordingDac::default();
/// dac.write_code(DacChannel::Two, 1000);
/// assert_eq!(dac.last(DacChannel::Two), Some(1000));
/// assert_eq!(dac.last(DacChannel::One), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingDac {
    last: [Option<u16>; 2],
    writes: u64,
}

impl RecordingDac {
    /// Last code written to `channel`.
    pub fn last(&self, channel: DacChannel) -> Option<u16> {
        self.last[channel.index()]
    }

    /// Total writes across both channels.
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl CvSink for RecordingDac {
    fn write_code(&mut self, channel: DacChannel, code: u16) {
        self.last[channel.index()] = Some(code);
        self.writes += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_per_channel() {
        let mut dac = RecordingDac::default();
        for channel in DacChannel::BOTH {
            dac.write_code(channel, channel.index() as u16 * 100);
        }
        dac.write_code(DacChannel::One, FULL_SCALE_12BIT);
        assert_eq!(dac.last(DacChannel::One), Some(FULL_SCALE_12BIT));
        assert_eq!(dac.last(DacChannel::Two), Some(100));
        assert_eq!(dac.writes(), 3);
    }
}
