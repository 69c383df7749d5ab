//! Numeric guards applied to every geometry input
//!
//! Placement geometry comes from pointer events and user-edited JSON, so
//! NaN and infinities are replaced instead of propagated.

/// Return `value` if it is finite, otherwise `fallback`
pub fn safe_number(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Clamp `value` into `[min, max]`.
///
/// Non-finite values collapse to `min`. When `max < min` the upper bound
/// wins, so a range that cannot be satisfied still never exceeds `max`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    safe_number(value, min).max(min).min(max)
}

/// A strictly positive dimension, or 1.0 for zero/negative/non-finite input
pub fn positive_or_one(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        1.0
    }
}
