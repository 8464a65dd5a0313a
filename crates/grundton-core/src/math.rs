//! Small numeric helpers shared by the stages.
//!
//! - [`db_to_linear`] / [`linear_to_db`] - level conversions for gate and
//!   compressor thresholds
//! - [`period`] - seconds per cycle, used to size envelopes and detector windows
//! - [`flush_denormal`] - keeps recursive filters out of the subnormal range

use libm::{expf, logf};

/// Convert decibels to linear gain.
///
/// ```rust
/// use grundton_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels. Inputs at or below `1e-10` read as -200 dB.
///
/// ```rust
/// use grundton_core::linear_to_db;
///
/// assert!(linear_to_db(1.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) + 6.02).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Period in seconds of one cycle at `frequency` Hz.
///
/// Non-positive frequencies return 0.
#[inline]
pub fn period(frequency: f32) -> f32 {
    if frequency > 0.0 { 1.0 / frequency } else { 0.0 }
}

/// Replace values below 1e-20 with zero.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}
