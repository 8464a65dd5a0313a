//! The [`Stage`] trait shared by every single-sample processor in a channel.
//!
//! ## Design Decisions
//!
//! - **Mono**: each input channel owns its own stages, so a stage only ever
//!   sees one `f32` at a time.
//! - **Fixed at construction**: cutoff frequencies and sample rate are bound
//!   when a stage is built for a string profile. There is no
//!   `set_sample_rate`; a new profile means a different, pre-built stage.
//! - **No allocations**: all methods are callable from the audio interrupt.

/// Single-sample audio processor.
///
/// # Example
///
/// ```rust
/// use grundton_core::Stage;
///
/// struct Invert;
///
/// impl Stage for Invert {
///     fn process(&mut self, input: f32) -> f32 {
///         -input
///     }
///
///     fn reset(&mut self) {}
/// }
///
/// let mut buffer = [0.5, -0.25];
/// Invert.process_block_inplace(&mut buffer);
/// assert_eq!(buffer, [-0.5, 0.25]);
/// ```
pub trait Stage {
    /// Process one sample, advancing internal state by one sample period.
    fn process(&mut self, input: f32) -> f32;

    /// Process a buffer in place.
    fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Clear history (filter memories, envelopes) without changing tuning.
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Accumulate(f32);

    impl Stage for Accumulate {
        fn process(&mut self, input: f32) -> f32 {
            self.0 += input;
            self.0
        }

        fn reset(&mut self) {
            self.0 = 0.0;
        }
    }

    #[test]
    fn block_processing_matches_sample_processing() {
        let mut a = Accumulate(0.0);
        let mut b = Accumulate(0.0);
        let mut buffer = [1.0, 2.0, 3.0];
        a.process_block_inplace(&mut buffer);
        let expected: [f32; 3] = [b.process(1.0), b.process(2.0), b.process(3.0)];
        assert_eq!(buffer, expected);
    }

    #[test]
    fn reset_is_forwarded() {
        let mut a = Accumulate(0.0);
        a.process(4.0);
        a.reset();
        assert_eq!(a.process(1.0), 1.0);
    }
}
