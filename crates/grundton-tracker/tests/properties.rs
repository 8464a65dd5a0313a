//! Property-based tests for the tracker's control and output mapping.
//!
//! Covers selection clamping, the pitch hold latch and CV code bounds using
//! proptest for randomized encoder and frequency input.

use proptest::prelude::*;
use grundton_tracker::{
    CvMapper, CvRange, PitchHold, SelectionController, StringCatalog, StringProfile,
};

fn catalog(len: usize) -> StringCatalog {
    let profiles = (0..len)
        .map(|i| StringProfile::new(format!("string {i}"), 100.0, 200.0).unwrap())
        .collect();
    StringCatalog::new(profiles).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Any sequence of encoder increments keeps the pair adjacent and in bounds.
    #[test]
    fn selection_stays_in_bounds(
        len in 2usize..32,
        deltas in prop::collection::vec(-20i32..=20, 1..64),
    ) {
        let mut sel = SelectionController::new(&catalog(len));
        for delta in deltas {
            let before = sel.base_index();
            let changed = sel.apply_delta(delta);
            let (a, b) = sel.pair();
            prop_assert!(a <= len - 2, "base {} for len {}", a, len);
            prop_assert_eq!(b, a + 1);
            prop_assert!(b < len);
            prop_assert_eq!(changed, a != before);
        }
    }

    /// Extreme increments saturate at the end stops instead of wrapping.
    #[test]
    fn selection_saturates(len in 2usize..32, start in 0usize..32) {
        let mut sel = SelectionController::new(&catalog(len)).with_base(start);
        sel.apply_delta(i32::MAX);
        prop_assert_eq!(sel.base_index(), len - 2);
        sel.apply_delta(i32::MIN);
        prop_assert_eq!(sel.base_index(), 0);
    }

    /// The held value only ever comes from a ready, nonzero, finite reading.
    #[test]
    fn hold_only_takes_usable_readings(
        readings in prop::collection::vec((any::<bool>(), prop_oneof![
            Just(0.0f32),
            Just(f32::NAN),
            Just(f32::INFINITY),
            20.0f32..2000.0,
        ]), 1..128),
    ) {
        let mut hold = PitchHold::new();
        let mut expected = 0.0f32;
        for (ready, freq) in readings {
            let taken = hold.update(ready, freq);
            let usable = ready && freq != 0.0 && freq.is_finite();
            prop_assert_eq!(taken, usable);
            if usable {
                expected = freq;
            }
            prop_assert_eq!(hold.held().to_bits(), expected.to_bits());
        }
    }

    /// Every frequency, however odd, lands on a valid DAC code.
    #[test]
    fn cv_code_within_full_scale(freq in prop::num::f32::ANY) {
        let cv = CvMapper::new(CvRange::default());
        prop_assert!(cv.code(freq) <= cv.full_scale());
        prop_assert!(cv.level_code(freq) <= cv.full_scale());
    }

    /// Higher pitch never gives a lower code.
    #[test]
    fn cv_code_is_monotonic(a in 1.0f32..4000.0, b in 1.0f32..4000.0) {
        let cv = CvMapper::new(CvRange::default());
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(cv.code(lo) <= cv.code(hi));
    }

    /// Codes inside the range map back to within one code step.
    #[test]
    fn cv_inverse_is_close(freq in 65.41f32..2093.0) {
        let cv = CvMapper::new(CvRange::default());
        let code = cv.code(freq);
        prop_assert!(cv.code(cv.frequency_at(code)).abs_diff(code) <= 1);
    }
}
