//! String pair selection.

use crate::catalog::StringCatalog;

/// Maps encoder movement to a pair of adjacent catalog indices.
///
/// Channel A is bound to `base`, channel B to `base + 1`. The base is clamped
/// to `[0, len - 2]`, so the pair is always in bounds. The encoder push is
/// handled here too, as a rising-edge detector.
///
/// ```rust
/// use grundton_tracker::{SelectionController, StringCatalog};
///
/// let mut sel = SelectionController::new(&StringCatalog::guitar());
/// assert!(sel.apply_delta(3));
/// assert_eq!(sel.pair(), (3, 4));
/// sel.apply_delta(100);
/// assert_eq!(sel.pair(), (6, 7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionController {
    base: usize,
    last_base: usize,
    switch_level: bool,
}

impl SelectionController {
    /// Selection over `catalog`, starting at the first pair.
    ///
    /// A catalog always holds at least two profiles, so every pair is in bounds.
    pub fn new(catalog: &StringCatalog) -> Self {
        Self {
            base: 0,
            last_base: catalog.last_base_index(),
            switch_level: false,
        }
    }

    /// Start at `base`, clamped.
    #[must_use]
    pub fn with_base(mut self, base: usize) -> Self {
        self.base = base.min(self.last_base);
        self
    }

    /// Move the base by `delta`, clamping. Returns true if the pair changed.
    pub fn apply_delta(&mut self, delta: i32) -> bool {
        if delta == 0 {
            return false;
        }
        let target = (self.base as i64 + i64::from(delta)).clamp(0, self.last_base as i64) as usize;
        let changed = target != self.base;
        self.base = target;
        changed
    }

    /// Current base index (channel A).
    pub fn base_index(&self) -> usize {
        self.base
    }

    /// `(channel A, channel B)` catalog indices.
    pub fn pair(&self) -> (usize, usize) {
        (self.base, self.base + 1)
    }

    /// Feed the switch level; true exactly on a released-to-pressed transition.
    pub fn edge_triggered(&mut self, pressed: bool) -> bool {
        let rising = pressed && !self.switch_level;
        self.switch_level = pressed;
        rising
    }
}
