//! Input contracts for the carousel engine.
//!
//! Hosts translate their native events into these plain values and pass them
//! to the matching [`crate::engine::Carousel`] method. Every input carries the
//! host timestamp in milliseconds.

use serde::{Deserialize, Serialize};

use crate::config::Direction;
use crate::easing::Easing;

pub use crate::wheel::WheelInput;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerType {
    #[default]
    Mouse,
    Touch,
    Pen,
}

/// Pointer down/move/up/cancel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerInput {
    pub t: f64,
    pub pointer_id: i32,
    #[serde(default = "default_primary")]
    pub is_primary: bool,
    #[serde(default)]
    pub pointer_type: PointerType,
    /// Mouse button (0 = left). Ignored for touch and pen.
    #[serde(default)]
    pub button: i16,
    pub screen_x: f64,
    pub screen_y: f64,
}

fn default_primary() -> bool {
    true
}

impl PointerInput {
    /// Position along the carousel's axis.
    #[inline]
    pub fn main_axis(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Horizontal => self.screen_x,
            Direction::Vertical => self.screen_y,
        }
    }
}

/// Touch start, used only for the edge-swipe guard.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TouchInput {
    /// Number of active touches.
    pub touches: usize,
    /// Page x of the first touch.
    pub page_x: f64,
    pub viewport_width: f64,
}

/// Overrides for [`crate::engine::Carousel::move_into_view`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveOptions {
    pub easing: Option<Easing>,
    /// Tween length in ms; 0 jumps immediately.
    pub duration: Option<f64>,
}

/// Container and per-item main-axis sizes measured by the host.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Measurements {
    pub container_size: f64,
    pub item_sizes: Vec<f64>,
}

impl Measurements {
    pub fn uniform(container_size: f64, item_size: f64, count: usize) -> Self {
        Self {
            container_size,
            item_sizes: vec![item_size; count],
        }
    }
}
