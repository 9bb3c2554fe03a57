use std::f64::consts::E;

/// Velocity magnitude below which a release never snaps
const SNAP_THRESHOLD: f64 = 0.1;

/// Number of elements a released pan moves by
///
/// Grows logarithmically with speed. A positive velocity moves toward
/// earlier elements, so it yields a negative count.
pub fn compute_snap_count(velocity: f64, multiplier: f64) -> i64 {
    if !velocity.is_finite() || velocity.abs() < SNAP_THRESHOLD {
        return 0;
    }

    let count = ((velocity.abs() + E).ln().round() * multiplier).max(0.0).round() as i64;
    if velocity > 0.0 {
        -count
    } else {
        count
    }
}
