//! Easing curves for eased snaps and height transitions.
//! - named polynomial curves (the carousel default is ease-in-out-cubic)
//! - CSS-style cubic-bezier timing, inverted on x via bisection

use serde::{Deserialize, Serialize};

/// Timing curve mapping normalized progress `t ∈ [0,1]` to eased progress.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    #[default]
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    /// CSS `ease-in-out`, i.e. `cubic-bezier(0.42, 0, 0.58, 1)`.
    EaseInOut,
    /// Control points `(x1, y1, x2, y2)`.
    CubicBezier([f64; 4]),
}

impl Easing {
    /// Evaluate the curve. Input is clamped to `[0,1]`.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::EaseInQuad => t * t,
            Easing::EaseOutQuad => t * (2.0 - t),
            Easing::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    (t - 1.0) * (2.0 * t - 2.0) * (2.0 * t - 2.0) + 1.0
                }
            }
            Easing::EaseInQuart => t * t * t * t,
            Easing::EaseOutQuart => {
                let u = t - 1.0;
                1.0 - u * u * u * u
            }
            Easing::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    let u = t - 1.0;
                    1.0 - 8.0 * u * u * u * u
                }
            }
            Easing::EaseInOut => timing_curve(t, [0.42, 0.0, 0.58, 1.0]),
            Easing::CubicBezier(points) => timing_curve(t, points),
        }
    }
}

/// Linear interpolation of scalars.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// One axis of a timing curve anchored at 0 and 1, kept in polynomial form
/// `((a·s + b)·s + c)·s` for the curve parameter `s`.
#[derive(Clone, Copy)]
struct CurveAxis {
    a: f64,
    b: f64,
    c: f64,
}

impl CurveAxis {
    fn new(p1: f64, p2: f64) -> Self {
        let c = 3.0 * p1;
        let b = 3.0 * (p2 - p1) - c;
        Self { a: 1.0 - c - b, b, c }
    }

    #[inline]
    fn at(&self, s: f64) -> f64 {
        ((self.a * s + self.b) * s + self.c) * s
    }

    #[inline]
    fn slope(&self, s: f64) -> f64 {
        (3.0 * self.a * s + 2.0 * self.b) * s + self.c
    }
}

/// CSS `cubic-bezier(x1, y1, x2, y2)` at progress `t`: solve `x(s) = t`, then
/// return `y(s)`. Newton steps first; bisection when the slope flattens or a
/// step leaves `[0,1]`.
fn timing_curve(t: f64, [x1, y1, x2, y2]: [f64; 4]) -> f64 {
    let (x, y) = (CurveAxis::new(x1, x2), CurveAxis::new(y1, y2));
    let mut s = t;
    for _ in 0..8 {
        let err = x.at(s) - t;
        if err.abs() < 1e-9 {
            return y.at(s);
        }
        let d = x.slope(s);
        if d.abs() < 1e-6 {
            break;
        }
        s -= err / d;
        if !(0.0..=1.0).contains(&s) {
            break;
        }
    }
    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    s = t;
    while hi - lo > 1e-10 {
        if x.at(s) < t {
            lo = s;
        } else {
            hi = s;
        }
        s = 0.5 * (lo + hi);
    }
    y.at(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 12] = [
        Easing::Linear,
        Easing::EaseInQuad,
        Easing::EaseOutQuad,
        Easing::EaseInOutQuad,
        Easing::EaseInCubic,
        Easing::EaseOutCubic,
        Easing::EaseInOutCubic,
        Easing::EaseInQuart,
        Easing::EaseOutQuart,
        Easing::EaseInOutQuart,
        Easing::EaseInOut,
        Easing::CubicBezier([0.25, 0.1, 0.25, 1.0]),
    ];

    #[test]
    fn curves_pin_endpoints() {
        for e in ALL {
            assert!(e.apply(0.0).abs() < 1e-6, "{e:?} at 0");
            assert!((e.apply(1.0) - 1.0).abs() < 1e-6, "{e:?} at 1");
        }
    }

    #[test]
    fn symmetric_curves_hit_half_at_midpoint() {
        for e in [
            Easing::EaseInOutQuad,
            Easing::EaseInOutCubic,
            Easing::EaseInOutQuart,
            Easing::EaseInOut,
        ] {
            assert!((e.apply(0.5) - 0.5).abs() < 1e-6, "{e:?}");
        }
    }

    #[test]
    fn css_ease_in_out_matches_reference_points() {
        // cubic-bezier(0.42, 0, 0.58, 1) sampled by browsers
        assert!((Easing::EaseInOut.apply(0.25) - 0.1291).abs() < 1e-3);
        assert!((Easing::EaseInOut.apply(0.75) - 0.8709).abs() < 1e-3);
        // linear control points reproduce t
        let linear = Easing::CubicBezier([0.0, 0.0, 1.0, 1.0]);
        assert!((linear.apply(0.3) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn easing_parses_from_kebab_case() {
        let e: Easing = serde_json::from_str("\"ease-out-cubic\"").unwrap();
        assert_eq!(e, Easing::EaseOutCubic);
        let b: Easing = serde_json::from_str("{\"cubic-bezier\":[0.1,0.2,0.3,0.4]}").unwrap();
        assert_eq!(b, Easing::CubicBezier([0.1, 0.2, 0.3, 0.4]));
    }
}
