//! Small numeric helpers shared by the layout and motion code.

/// Euclidean modulo for signed item indices. Returns 0 when `len` is 0.
#[inline]
pub fn wrap_index(i: i64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    i.rem_euclid(len as i64) as usize
}

/// Sign with zero treated as positive, matching the direction convention of
/// the snap walk (a zero request walks forwards).
#[inline]
pub fn sign(v: f64) -> f64 {
    if v < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Clamp `v` into the range spanned by the two bounds, in either order.
#[inline]
pub fn clamp_between(v: f64, a: f64, b: f64) -> f64 {
    let lo = a.min(b);
    let hi = a.max(b);
    v.max(lo).min(hi)
}

/// Hermite smoothstep from `from` to `to` as `time` moves across
/// `[time_start, time_end]`. Times outside the window clamp to the ends.
pub fn hermite(time: f64, from: f64, to: f64, time_start: f64, time_end: f64) -> f64 {
    let span = time_end - time_start;
    if span <= 0.0 {
        return to;
    }
    let time = clamp_between(time, time_start, time_end);
    let t = (time - time_start) / span;
    (-2.0 * t * t * t + 3.0 * t * t) * (to - from) + from
}
