//! Pointer drag tracking and release classification.
//!
//! A [`DragSession`] exists between a primary pointer-down and the matching
//! pointer-up/cancel. It records main-axis samples and, on release, turns them
//! into a [`Release`] decision for the motion engine.

use serde::{Deserialize, Serialize};

/// Cumulative movement (px) after which a press becomes a drag.
pub const DRAG_LOCK_THRESHOLD: f64 = 5.0;
/// Samples older than this (ms) at release mean the pointer had stopped.
pub const STALE_SAMPLE_MS: f64 = 50.0;
/// Below this total movement (px) the gesture counts as "did not move".
pub const MIN_MOVEMENT: f64 = 1.0;
/// Number of most recent samples averaged into the release velocity.
pub const VELOCITY_SAMPLES: usize = 5;

/// One recorded pointer move.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DragSample {
    pub t: f64,
    pub pos: f64,
    pub dt: f64,
    pub dpos: f64,
}

/// How a released drag should continue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Release {
    /// Flick: throw with velocity `v0` (px/ms) measured at time `t0`.
    Throw { v0: f64, t0: f64 },
    /// No usable velocity: settle with zero velocity.
    Settle,
}

/// Outcome of a pointer move.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveResult {
    /// Main-axis movement to apply to the carousel offset.
    pub dpos: f64,
    /// The session just crossed the drag threshold.
    pub locked_now: bool,
}

#[derive(Clone, Debug)]
pub struct DragSession {
    pub pointer_id: i32,
    start_t: f64,
    start_pos: f64,
    samples: Vec<DragSample>,
    locked: bool,
}

impl DragSession {
    pub fn start(pointer_id: i32, t: f64, pos: f64) -> Self {
        Self {
            pointer_id,
            start_t: t,
            start_pos: pos,
            samples: Vec::new(),
            locked: false,
        }
    }

    /// Whether the session has turned into a drag (native scrolling blocked).
    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[inline]
    pub fn samples(&self) -> &[DragSample] {
        &self.samples
    }

    /// Record a move at time `t` to main-axis position `pos`.
    pub fn on_move(&mut self, t: f64, pos: f64) -> MoveResult {
        let mut result = MoveResult::default();
        if !self.locked && (pos - self.start_pos).abs() >= DRAG_LOCK_THRESHOLD {
            self.locked = true;
            result.locked_now = true;
        }
        let (prev_t, prev_pos) = self
            .samples
            .last()
            .map(|s| (s.t, s.pos))
            .unwrap_or((self.start_t, self.start_pos));
        let dpos = pos - prev_pos;
        if dpos != 0.0 {
            self.samples.push(DragSample {
                t,
                pos,
                dt: t - prev_t,
                dpos,
            });
            result.dpos = dpos;
        }
        result
    }

    /// Classify the gesture at release time `now`.
    ///
    /// Returns the decision and whether a trailing click must be suppressed.
    pub fn release(self, now: f64) -> (Release, bool) {
        // The first sample carries startup noise; zero-dt samples carry no velocity.
        let samples: Vec<DragSample> = self
            .samples
            .into_iter()
            .skip(1)
            .filter(|s| s.dt > 0.0)
            .collect();
        let distance: f64 = samples.iter().map(|s| s.dpos.abs()).sum();
        let last_t = samples.last().map(|s| s.t).unwrap_or(now);
        let age = now - last_t;

        if distance < MIN_MOVEMENT && age >= STALE_SAMPLE_MS {
            // Long press without movement.
            return (Release::Settle, true);
        }
        if samples.len() >= 2 && distance >= MIN_MOVEMENT {
            if age < STALE_SAMPLE_MS {
                return (
                    Release::Throw {
                        v0: weighted_velocity(&samples),
                        t0: last_t,
                    },
                    true,
                );
            }
            return (Release::Settle, true);
        }
        (Release::Settle, false)
    }
}

/// Weighted mean of `dpos/dt` over the last [`VELOCITY_SAMPLES`] samples. The
/// i-th sample from the end (0 = most recent) has weight `i + 1`: the final
/// frames of a flick tend to undershoot, so older samples count more.
pub fn weighted_velocity(samples: &[DragSample]) -> f64 {
    let mut v = 0.0;
    let mut weight_sum = 0.0;
    for (i, s) in samples.iter().rev().take(VELOCITY_SAMPLES).enumerate() {
        let w = (i + 1) as f64;
        v += w * s.dpos / s.dt;
        weight_sum += w;
    }
    if weight_sum == 0.0 {
        0.0
    } else {
        v / weight_sum
    }
}
