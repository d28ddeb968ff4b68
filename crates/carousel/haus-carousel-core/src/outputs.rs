//! Output contracts from the carousel engine.
//!
//! Outputs carry the per-item transform changes of the current call and a
//! separate list of semantic events. Hosts apply changes to their item
//! elements (a translate along the carousel axis) and dispatch events.

use serde::{Deserialize, Serialize};

/// New transform for one item.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemChange {
    pub index: usize,
    /// Main-axis translation in px; `None` clears the transform.
    pub translate: Option<f64>,
}

/// Which host listener groups should currently be attached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerSet {
    /// Document-level pointer move/up/cancel.
    pub pointer: bool,
    /// Wheel listener marked non-passive for the session.
    pub wheel: bool,
}

/// Discrete signals emitted while handling input or stepping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
#[non_exhaustive]
pub enum CarouselEvent {
    /// Primary pointer went down on the carousel.
    Press,
    /// The press turned into a drag.
    DragStart,
    /// An animation will come to rest on `index`.
    Snap { index: usize },
    CapturePointer { pointer_id: i32 },
    ReleasePointer { pointer_id: i32 },
    ListenersChanged { listeners: ListenerSet },
    /// The disabled tunable flipped.
    Disabled { disabled: bool },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<ItemChange>,
    #[serde(default)]
    pub events: Vec<CarouselEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, change: ItemChange) {
        self.changes.push(change);
    }

    #[inline]
    pub fn push_event(&mut self, event: CarouselEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }

    /// Latest translate reported for `index` in this batch.
    pub fn translate_of(&self, index: usize) -> Option<Option<f64>> {
        self.changes
            .iter()
            .rev()
            .find(|c| c.index == index)
            .map(|c| c.translate)
    }
}
