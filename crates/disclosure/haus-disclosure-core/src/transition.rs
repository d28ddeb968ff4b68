//! Keyframed height transition between two pixel heights.

use haus_carousel_core::easing::lerp;
use serde::{Deserialize, Serialize};

use crate::options::AnimationOptions;

/// Measured heights at toggle time, px.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Heights {
    /// Current rendered height of the whole details element.
    pub current: f64,
    pub summary: f64,
    pub content: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationState {
    Idle,
    Expanding,
    Shrinking,
}

/// Height tween the host applies to the details element until it finishes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HeightTransition {
    pub index: usize,
    pub start_height: f64,
    pub end_height: f64,
    pub start_time: f64,
    pub options: AnimationOptions,
    /// Open state committed when the transition finishes.
    pub open: bool,
}

impl HeightTransition {
    pub fn state(&self) -> AnimationState {
        if self.open {
            AnimationState::Expanding
        } else {
            AnimationState::Shrinking
        }
    }

    #[inline]
    pub fn is_finished(&self, now: f64) -> bool {
        now - self.start_time >= self.options.duration_ms
    }

    /// Interpolated height at `now`, clamped to the end height.
    pub fn height_at(&self, now: f64) -> f64 {
        if self.options.duration_ms <= 0.0 {
            return self.end_height;
        }
        let t = (now - self.start_time) / self.options.duration_ms;
        lerp(
            self.start_height,
            self.end_height,
            self.options.easing.apply(t),
        )
    }
}
