//! Scalar helpers shared by every simulation layer.
//!
//! All helpers treat `NaN` as the lower bound of the requested range so a
//! corrupted input never propagates past a clamp.

/// Clamp `value` into `[min, max]`, mapping `NaN` to `min`.
pub fn clamp_range(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.clamp(min, max)
}

/// Clamp `value` into `[0.0, 1.0]`.
pub fn clamp_unit(value: f64) -> f64 {
    clamp_range(value, 0.0, 1.0)
}

/// Linear interpolation from `from` to `to` by `t` (not clamped).
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    (to - from).mul_add(t, from)
}

/// Absorbs rounding left over from accumulating fractional steps.
pub const SNAP_TOLERANCE: f64 = 1e-9;

/// Move `current` toward `target` by at most `max_delta`.
///
/// Lands exactly on `target` when the remaining distance is within
/// `max_delta + SNAP_TOLERANCE`, so `n` steps of `1.0 / n` always arrive
/// in exactly `n` calls.
pub fn move_toward(current: f64, target: f64, max_delta: f64) -> f64 {
    let delta = target - current;
    if delta.abs() <= max_delta + SNAP_TOLERANCE {
        return target;
    }
    max_delta.mul_add(delta.signum(), current)
}
