//! Scripted front panel for offline runs.
//!
//! Encoder turns and switch presses are scheduled by block number. Each call
//! to [`poll`](PlatformController::poll) moves the panel to the next block.

use std::str::FromStr;

use grundton_platform::{ControlId, ControlState, PlatformController, controls};

/// An encoder turn of `delta` detents at the start of `block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderEvent {
    /// Zero-based block number.
    pub block: u64,
    /// Detents, positive clockwise.
    pub delta: i32,
}

impl FromStr for EncoderEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (block, delta) = s
            .split_once(':')
            .ok_or_else(|| format!("invalid encoder event '{s}' (expected BLOCK:DELTA)"))?;
        let block = block
            .trim()
            .parse()
            .map_err(|e| format!("invalid block in '{s}': {e}"))?;
        let delta = delta
            .trim()
            .trim_start_matches('+')
            .parse()
            .map_err(|e| format!("invalid delta in '{s}': {e}"))?;
        Ok(Self { block, delta })
    }
}

/// Front panel driven by a schedule.
#[derive(Debug, Clone, Default)]
pub struct SimulatedPanel {
    encoder: Vec<EncoderEvent>,
    presses: Vec<u64>,
    knobs: [Option<f32>; 2],
    next_block: u64,
    increment: i32,
    pressed: bool,
}

impl SimulatedPanel {
    /// Panel with the given schedule. Knobs left at `None` are absent, so the
    /// oscillators keep their configured waveforms.
    pub fn new(encoder: Vec<EncoderEvent>, presses: Vec<u64>, knobs: [Option<f32>; 2]) -> Self {
        Self {
            encoder,
            presses,
            knobs: knobs.map(|k| k.map(|v| v.clamp(0.0, 1.0))),
            ..Self::default()
        }
    }
}

impl PlatformController for SimulatedPanel {
    fn poll(&mut self) {
        let block = self.next_block;
        self.increment = self
            .encoder
            .iter()
            .filter(|e| e.block == block)
            .fold(0i32, |acc, e| acc.saturating_add(e.delta));
        // A press lasts one block, so back-to-back presses read as one.
        self.pressed = self.presses.contains(&block);
        self.next_block += 1;
    }

    fn read_control(&self, id: ControlId) -> Option<ControlState> {
        match id {
            controls::KNOB_1 => self.knobs[0].map(ControlState::new),
            controls::KNOB_2 => self.knobs[1].map(ControlState::new),
            controls::ENCODER_SWITCH => Some(ControlState::new(if self.pressed { 1.0 } else { 0.0 })),
            _ => None,
        }
    }

    fn encoder_increment(&self) -> i32 {
        self.increment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_encoder_events() {
        assert_eq!("12:-3".parse(), Ok(EncoderEvent { block: 12, delta: -3 }));
        assert_eq!("0:+2".parse(), Ok(EncoderEvent { block: 0, delta: 2 }));
        assert!("12".parse::<EncoderEvent>().is_err());
        assert!("x:1".parse::<EncoderEvent>().is_err());
        assert!("1:y".parse::<EncoderEvent>().is_err());
    }

    #[test]
    fn events_fire_on_their_block_only() {
        let mut panel = SimulatedPanel::new(
            vec![EncoderEvent { block: 1, delta: 2 }, EncoderEvent { block: 1, delta: -1 }],
            vec![2],
            [None, Some(0.5)],
        );
        let mut seen = Vec::new();
        for _ in 0..4 {
            panel.poll();
            let pressed = panel
                .read_control(controls::ENCODER_SWITCH)
                .is_some_and(|s| s.is_pressed());
            seen.push((panel.encoder_increment(), pressed));
        }
        assert_eq!(seen, vec![(0, false), (1, false), (0, true), (0, false)]);
        assert!(panel.read_control(controls::KNOB_1).is_none());
        assert_eq!(panel.read_control(controls::KNOB_2), Some(ControlState::new(0.5)));
    }

    #[test]
    fn encoder_reads_as_increment_not_state() {
        let mut panel = SimulatedPanel::new(vec![EncoderEvent { block: 0, delta: 3 }], Vec::new(), [None; 2]);
        panel.poll();
        assert_eq!(panel.encoder_increment(), 3);
        assert_eq!(panel.read_control(controls::ENCODER), None);
    }
}
