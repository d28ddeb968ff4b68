//! Wheel input: delta normalisation, swipe direction, and the inertia
//! classifier that tells an active trackpad swipe from its inertial coast.

use serde::{Deserialize, Serialize};

use crate::config::Direction;
use crate::math::sign;

/// A wheel session expires this long (ms) after its last event.
pub const WHEEL_SESSION_MS: f64 = 100.0;
/// Number of most recent samples the inertia classifier looks at.
pub const INERTIA_WINDOW: usize = 8;
/// Deltas above this magnitude that repeat exactly come from notched wheels.
const NOTCHED_WHEEL_DELTA: f64 = 10.0;

/// `WheelEvent.deltaMode` values.
pub const DELTA_PIXEL: u32 = 0;
pub const DELTA_LINE: u32 = 1;
pub const DELTA_PAGE: u32 = 2;

/// Raw wheel event as delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WheelInput {
    pub t: f64,
    pub delta_x: f64,
    pub delta_y: f64,
    #[serde(default)]
    pub delta_mode: u32,
    /// Viewport height in px, used to scale line/page deltas.
    #[serde(default)]
    pub viewport_height: f64,
}

/// Normalised swipe derived from one wheel event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelSwipe {
    /// Signed swipe length in px; positive means forwards (right or down).
    pub d: f64,
    /// The swipe's octant lies on the carousel's own axis.
    pub on_axis: bool,
}

impl WheelInput {
    /// Deltas in pixels: lines are 5% of the viewport height, pages 87.5%.
    pub fn pixel_deltas(&self) -> (f64, f64) {
        let k = match self.delta_mode {
            DELTA_LINE => self.viewport_height * 0.05,
            DELTA_PAGE => self.viewport_height * 0.875,
            _ => 1.0,
        };
        (self.delta_x * k, self.delta_y * k)
    }

    pub fn swipe(&self, direction: Direction) -> WheelSwipe {
        let (dx, dy) = self.pixel_deltas();
        // -180..-135 left, -135..-45 up, -45..45 right, 45..135 down, 135..180 left
        let a = dy.atan2(dx).to_degrees();
        let forwards = (-45.0..=135.0).contains(&a);
        let d = dx.hypot(dy) * if forwards { 1.0 } else { -1.0 };
        let vertical = (-135.0..=-45.0).contains(&a) || (45.0..=135.0).contains(&a);
        let on_axis = match direction {
            Direction::Horizontal => !vertical,
            Direction::Vertical => vertical,
        };
        WheelSwipe { d, on_axis }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct WheelSample {
    t: f64,
    d: f64,
    dt: Option<f64>,
}

/// Rolling wheel state between events of one gesture.
#[derive(Clone, Debug, Default)]
pub struct WheelSession {
    samples: Vec<WheelSample>,
    direction: f64,
    /// An inertia throw has already been started for this gesture.
    pub inertia: bool,
    last_event: Option<f64>,
}

impl WheelSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// The session saw an event less than [`WHEEL_SESSION_MS`] ago.
    pub fn is_live(&self, now: f64) -> bool {
        self.last_event
            .is_some_and(|t| now - t < WHEEL_SESSION_MS)
    }

    /// Reset when the session went quiet. Returns true if it was live before.
    pub fn expire(&mut self, now: f64) -> bool {
        match self.last_event {
            Some(t) if now - t >= WHEEL_SESSION_MS => {
                self.reset();
                true
            }
            _ => false,
        }
    }

    pub fn reset(&mut self) {
        self.samples.clear();
        self.inertia = false;
        self.last_event = None;
    }

    /// Mark an event at `t` (handled or not) to keep the session alive.
    pub fn touch(&mut self, t: f64) {
        self.last_event = Some(t);
    }

    /// Record swipe `d` at time `t` and report whether the gesture is coasting.
    pub fn push_and_classify(&mut self, t: f64, d: f64) -> bool {
        let dir = sign(d);
        if self.samples.is_empty() || self.direction != dir {
            self.direction = dir;
            self.samples.clear();
            self.samples.push(WheelSample { t, d, dt: None });
        } else {
            let prev_t = self.samples.last().map(|s| s.t).unwrap_or(t);
            self.samples.push(WheelSample {
                t,
                d,
                dt: Some(t - prev_t),
            });
            if self.samples.len() > INERTIA_WINDOW {
                let excess = self.samples.len() - INERTIA_WINDOW;
                self.samples.drain(..excess);
            }
        }
        self.is_inertia()
    }

    /// Inertia when, within the window, fewer than half of the successive
    /// deltas accelerate in the gesture's direction and they are not all
    /// identical large deltas (notched wheels repeat the same value).
    pub fn is_inertia(&self) -> bool {
        let len = self.samples.len();
        if len < INERTIA_WINDOW {
            return false;
        }
        let window = &self.samples[len - INERTIA_WINDOW..];
        let mut accelerating = 0usize;
        let mut equal = 0usize;
        for pair in window.windows(2) {
            let (prev, cur) = (pair[0].d, pair[1].d);
            let dd = cur - prev;
            if dd == 0.0 {
                if prev.abs() > NOTCHED_WHEEL_DELTA && cur.abs() > NOTCHED_WHEEL_DELTA {
                    equal += 1;
                }
            } else if sign(dd) == self.direction {
                accelerating += 1;
            }
        }
        let pairs = INERTIA_WINDOW - 1;
        accelerating < (INERTIA_WINDOW as f64 / 2.0).round() as usize && equal != pairs
    }

    /// Velocity (px/ms, offset direction) implied by the latest sample.
    pub fn last_velocity(&self) -> Option<f64> {
        let last = self.samples.last()?;
        match last.dt {
            Some(dt) if dt != 0.0 => Some(-last.d / dt),
            _ => None,
        }
    }
}
