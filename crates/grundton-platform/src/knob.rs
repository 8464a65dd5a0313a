//! Knob-to-value mapping.
//!
//! A [`KnobParameter`] turns a normalized knob position into a value in
//! `[min, max]`. The tracker maps each waveform knob over `0..=COUNT-1` and
//! truncates to pick an oscillator waveform.

/// Ranged parameter driven linearly by one knob.
///
/// # Example
///
/// ```rust
/// use grundton_platform::KnobParameter;
///
/// let waveform = KnobParameter::new(0.0, 7.0);
/// assert_eq!(waveform.map(0.5), 3.5);
/// assert_eq!(waveform.map(2.0), 7.0);
/// assert_eq!(waveform.map_index(0.999), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnobParameter {
    min: f32,
    max: f32,
}

impl KnobParameter {
    /// Parameter spanning `[min, max]`.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Parameter over the indices `0..=last`.
    pub const fn indices(last: usize) -> Self {
        Self::new(0.0, last as f32)
    }

    /// Lower bound.
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> f32 {
        self.max
    }

    /// `min + (max - min) * position`, with the position clamped to `[0, 1]`
    /// first. NaN reads as 0.
    pub fn map(&self, position: f32) -> f32 {
        let x = if position.is_nan() { 0.0 } else { position.clamp(0.0, 1.0) };
        self.min + (self.max - self.min) * x
    }

    /// Mapped value truncated to an index. The top index is only reached at
    /// full travel.
    pub fn map_index(&self, position: f32) -> usize {
        let v = self.map(position);
        if v <= 0.0 { 0 } else { v as usize }
    }
}
