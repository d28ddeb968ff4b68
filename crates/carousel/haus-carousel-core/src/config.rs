//! Carousel configuration: behaviour flags fixed at mount time.
//!
//! Physical layout parameters that a host's styling layer owns (gap, snap
//! anchor, uniform item size, auto-scroll velocity, disabled) live in
//! [`crate::tunables::Tunables`] instead and are re-read on every refresh.

use serde::{Deserialize, Serialize};

use crate::easing::Easing;

/// Scroll axis of the carousel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Horizontal,
    Vertical,
}

/// Where an item rests relative to the snap anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// The item's start edge sits on the anchor.
    #[default]
    Start,
    /// The item's midpoint sits on the anchor.
    Center,
}

/// Mount-time configuration. Every field has a default so hosts can pass a
/// partial JSON object.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub direction: Direction,
    pub align: Align,
    /// Time constant of the throw decay, in milliseconds. 0 disables throws.
    pub damping: f64,
    pub disable_snap: bool,
    /// Accept wheel swipes across the carousel's axis.
    pub enable_vertical_scroll: bool,
    /// Let the platform handle edge-swipe navigation gestures on touch.
    pub enable_navigation_gestures: bool,
    /// Initial active item.
    pub active_item_index: usize,
    /// Wrap around the ends. When false the carousel is a bounded sequence.
    pub loop_items: bool,
    /// Default duration for eased snaps and `move_into_view`, in milliseconds.
    pub ease_duration: f64,
    /// Default curve for eased snaps and `move_into_view`.
    pub easing: Easing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            direction: Direction::Horizontal,
            align: Align::Start,
            damping: 200.0,
            disable_snap: false,
            enable_vertical_scroll: false,
            enable_navigation_gestures: false,
            active_item_index: 0,
            loop_items: true,
            ease_duration: 700.0,
            easing: Easing::EaseInOutCubic,
        }
    }
}

impl Config {
    #[inline]
    pub fn snap(&self) -> bool {
        !self.disable_snap
    }
}
