//! Motion engine primitives: the three animation modes and their math.
//!
//! The [`Motion`] enum makes the modes mutually exclusive by construction;
//! [`crate::engine::Carousel`] drives transitions between them and applies
//! the offsets they produce.
//!
//! Throw physics: velocity decays as `v(t) = v0·e^(-t/d)`, so travel is
//! `x(t) = v0·d·(1 - e^(-t/d))`. A throw lasts until the velocity drops to
//! [`THROW_STOP_VELOCITY`], i.e. `T = -d·ln(v_stop/|v0|)`.

use serde::{Deserialize, Serialize};

use crate::easing::{lerp, Easing};
use crate::math::{hermite, sign};
use crate::snap::SnapTarget;

/// Terminal velocity of a throw, px/ms.
pub const THROW_STOP_VELOCITY: f64 = 6.0 / 1000.0;
/// A throw within this distance (px) of its target is done.
pub const THROW_ARRIVAL_EPSILON: f64 = 0.1;
/// Ramp-in of a fresh auto-scroll, ms.
pub const AUTO_SCROLL_TWEEN_MS: f64 = 500.0;
/// Ramp-in when auto-scroll takes over a decaying throw, ms.
pub const AUTO_SCROLL_TAKEOVER_TWEEN_MS: f64 = 1000.0;

/// Time for a throw starting at `v0` to decay to [`THROW_STOP_VELOCITY`].
pub fn throw_duration(v0: f64, damping: f64) -> f64 {
    if v0 == 0.0 || damping <= 0.0 {
        return 0.0;
    }
    (-damping * (THROW_STOP_VELOCITY / v0.abs()).ln()).max(0.0)
}

/// Distance travelled after `elapsed` ms of a throw with initial velocity `v0`.
#[inline]
pub fn throw_travel(v0: f64, damping: f64, elapsed: f64) -> f64 {
    if damping <= 0.0 {
        return 0.0;
    }
    v0 * damping * (1.0 - (-elapsed / damping).exp())
}

/// Resolved parameters of a throw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThrowPlan {
    pub velocity: f64,
    pub duration: f64,
    pub distance: f64,
    /// Item the throw commits on arrival, when snapping.
    pub snap: Option<SnapTarget>,
}

/// Plan a throw from release velocity `v0`.
///
/// With `snap` the natural travel is handed to the resolver and the velocity
/// is back-solved so the decay curve ends exactly on the returned distance:
/// `x(T) = v·d - v_stop·d·sign(v)`, hence `v = D/d + v_stop·sign(D)`.
pub fn plan_throw<F>(v0: f64, damping: f64, snap: Option<F>) -> ThrowPlan
where
    F: FnOnce(f64) -> SnapTarget,
{
    let duration = throw_duration(v0, damping);
    let distance = throw_travel(v0, damping, duration);
    match snap {
        Some(resolve) if damping > 0.0 => {
            let target = resolve(distance);
            let velocity = target.distance / damping + THROW_STOP_VELOCITY * sign(target.distance);
            ThrowPlan {
                velocity,
                duration: throw_duration(velocity, damping),
                distance: target.distance,
                snap: Some(target),
            }
        }
        _ => ThrowPlan {
            velocity: v0,
            duration,
            distance,
            snap: None,
        },
    }
}

/// Currently running animation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Motion {
    #[default]
    Idle,
    AutoScroll(AutoScroll),
    Eased(Eased),
    Throw(Throw),
}

/// Discriminant of [`Motion`] for hosts and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MotionKind {
    Idle,
    AutoScroll,
    Eased,
    Throw,
}

impl Motion {
    pub fn kind(&self) -> MotionKind {
        match self {
            Motion::Idle => MotionKind::Idle,
            Motion::AutoScroll(_) => MotionKind::AutoScroll,
            Motion::Eased(_) => MotionKind::Eased,
            Motion::Throw(_) => MotionKind::Throw,
        }
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, Motion::Idle)
    }
}

/// Continuous scroll ramping from `v0` to the configured velocity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AutoScroll {
    pub v0: f64,
    pub start_time: f64,
    pub end_time: f64,
    pub last_time: f64,
}

impl AutoScroll {
    pub fn new(v0: f64, now: f64, tween: f64) -> Self {
        Self {
            v0,
            start_time: now,
            end_time: now + tween,
            last_time: now,
        }
    }

    /// Offset delta for the frame at `now` when cruising at `velocity`.
    pub fn step(&mut self, now: f64, velocity: f64) -> f64 {
        let v = hermite(now, self.v0, velocity, self.start_time, self.end_time);
        let delta = (now - self.last_time) * v;
        self.last_time = now;
        delta
    }
}

/// Tween of the offset towards an item boundary.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Eased {
    pub start_time: f64,
    pub start_offset: f64,
    pub target_offset: f64,
    pub target_index: usize,
    pub duration: f64,
    pub easing: Easing,
}

/// One frame of an eased tween.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EasedStep {
    Moving(f64),
    Arrived,
}

impl Eased {
    pub fn step(&self, now: f64) -> EasedStep {
        if self.duration <= 0.0 {
            return EasedStep::Arrived;
        }
        let t = (now - self.start_time) / self.duration;
        if t < 1.0 {
            let eased = self.easing.apply(t);
            EasedStep::Moving(lerp(self.start_offset, self.target_offset, eased))
        } else {
            EasedStep::Arrived
        }
    }
}

/// Exponentially decaying throw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Throw {
    pub t0: f64,
    pub start_offset: f64,
    pub damping: f64,
    pub plan: ThrowPlan,
}

/// One frame of a throw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThrowStep {
    /// Instantaneous velocity, px/ms.
    pub velocity: f64,
    /// Travel since the start of the throw.
    pub travel: f64,
    /// Near the target, or out of time.
    pub done: bool,
}

impl Throw {
    pub fn step(&self, now: f64) -> ThrowStep {
        let elapsed = now - self.t0;
        let decay = (-elapsed / self.damping).exp();
        let velocity = self.plan.velocity * decay;
        let travel = self.plan.velocity * self.damping * (1.0 - decay);
        let near_target = (self.plan.distance - travel).abs() < THROW_ARRIVAL_EPSILON;
        let out_of_time = elapsed >= self.plan.duration;
        ThrowStep {
            velocity,
            travel,
            done: near_target || out_of_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsnapped_throw_follows_decay_formula() {
        let (v0, d) = (2.5, 200.0);
        let plan = plan_throw::<fn(f64) -> SnapTarget>(v0, d, None);
        let expected = v0 * d * (1.0 - (-plan.duration / d).exp());
        assert!((plan.distance - expected).abs() < 1e-9);
        // terminal velocity is the stop threshold
        let v_end = v0 * (-plan.duration / d).exp();
        assert!((v_end - THROW_STOP_VELOCITY).abs() < 1e-12);
    }

    #[test]
    fn snapped_throw_lands_exactly_on_target() {
        let d = 200.0;
        let plan = plan_throw(
            -3.0,
            d,
            Some(|raw: f64| {
                assert!(raw < 0.0);
                SnapTarget {
                    index: 4,
                    distance: -550.0,
                }
            }),
        );
        assert_eq!(plan.snap.map(|s| s.index), Some(4));
        let landed = throw_travel(plan.velocity, d, plan.duration);
        assert!((landed - -550.0).abs() < 1e-9, "landed at {landed}");
    }

    #[test]
    fn zero_snap_distance_has_no_duration() {
        let plan = plan_throw(
            0.5,
            200.0,
            Some(|_| SnapTarget {
                index: 0,
                distance: 0.0,
            }),
        );
        assert_eq!(plan.duration, 0.0);
    }

    #[test]
    fn throw_step_finishes_within_duration() {
        let plan = plan_throw::<fn(f64) -> SnapTarget>(1.2, 200.0, None);
        let throw = Throw {
            t0: 0.0,
            start_offset: 0.0,
            damping: 200.0,
            plan,
        };
        assert!(!throw.step(16.0).done);
        assert!(throw.step(plan.duration).done);
    }

    #[test]
    fn eased_tween_arrives() {
        let e = Eased {
            start_time: 100.0,
            start_offset: 0.0,
            target_offset: -220.0,
            target_index: 2,
            duration: 700.0,
            easing: Easing::Linear,
        };
        assert_eq!(e.step(450.0), EasedStep::Moving(-110.0));
        assert_eq!(e.step(800.0), EasedStep::Arrived);
    }

    #[test]
    fn auto_scroll_ramps_to_cruise_velocity() {
        let mut a = AutoScroll::new(0.0, 0.0, AUTO_SCROLL_TWEEN_MS);
        let first = a.step(16.0, 0.1);
        assert!(first > 0.0 && first < 16.0 * 0.1);
        a.step(600.0, 0.1);
        let cruise = a.step(616.0, 0.1);
        assert!((cruise - 1.6).abs() < 1e-12);
    }
}
