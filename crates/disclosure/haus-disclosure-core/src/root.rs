//! `DisclosureRoot`: owner of the open set and every details' transition.
//!
//! Details are addressed by the index returned from [`DisclosureRoot::register`].
//! The host measures heights at click time, calls [`DisclosureRoot::toggle`],
//! then drives [`DisclosureRoot::update`] once per frame and applies the
//! reported heights until each transition finishes.

use std::collections::BTreeSet;

use log::debug;
use serde::Serialize;

use crate::error::DisclosureError;
use crate::options::{AnimationOptions, Mode};
use crate::transition::{AnimationState, HeightTransition, Heights};

/// Per-details state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetailsState {
    /// Overrides the root options when set.
    pub options: Option<AnimationOptions>,
    pub transition: Option<HeightTransition>,
}

impl DetailsState {
    pub fn animation_state(&self) -> AnimationState {
        self.transition
            .as_ref()
            .map_or(AnimationState::Idle, HeightTransition::state)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum DisclosureEvent {
    /// Inline height to apply this frame.
    Height { index: usize, height: f64 },
    /// Transition done: set `open`, clear the inline height and overflow.
    Finished { index: usize, open: bool },
}

#[derive(Clone, Debug, Default)]
pub struct DisclosureRoot {
    options: AnimationOptions,
    mode: Mode,
    open: BTreeSet<usize>,
    details: Vec<DetailsState>,
    /// Closes forced by single mode, reported on the next update.
    pending: Vec<DisclosureEvent>,
}

impl DisclosureRoot {
    pub fn new(options: AnimationOptions, mode: Mode) -> Self {
        Self {
            options,
            mode,
            ..Self::default()
        }
    }

    pub fn options(&self) -> AnimationOptions {
        self.options
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.details.len()
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    /// Add a details element and return its index.
    ///
    /// In single mode a details registered open closes the ones before it.
    pub fn register(&mut self, default_open: bool, options: Option<AnimationOptions>) -> usize {
        let index = self.details.len();
        self.details.push(DetailsState {
            options,
            transition: None,
        });
        if default_open {
            self.close_others(index);
            self.open.insert(index);
        }
        debug!("disclosure: registered {index} (open: {default_open})");
        index
    }

    pub fn details(&self, index: usize) -> Result<&DetailsState, DisclosureError> {
        self.details.get(index).ok_or(DisclosureError::UnknownIndex {
            index,
            len: self.details.len(),
        })
    }

    fn details_mut(&mut self, index: usize) -> Result<&mut DetailsState, DisclosureError> {
        let len = self.details.len();
        self.details
            .get_mut(index)
            .ok_or(DisclosureError::UnknownIndex { index, len })
    }

    /// Details override, else the root options.
    pub fn effective_options(&self, index: usize) -> Result<AnimationOptions, DisclosureError> {
        Ok(self.details(index)?.options.unwrap_or(self.options))
    }

    pub fn open_indices(&self) -> Vec<usize> {
        self.open.iter().copied().collect()
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open.contains(&index)
    }

    pub fn animation_state(&self, index: usize) -> Result<AnimationState, DisclosureError> {
        Ok(self.details(index)?.animation_state())
    }

    /// React to a summary click.
    ///
    /// A closed or shrinking details expands from its current height to
    /// `summary + content` and is open right away. Otherwise it shrinks to
    /// the summary height and closes when the transition finishes. Any running
    /// transition on the same details is cancelled first.
    pub fn toggle(
        &mut self,
        index: usize,
        heights: Heights,
        now: f64,
    ) -> Result<HeightTransition, DisclosureError> {
        for (what, v) in [
            ("current", heights.current),
            ("summary", heights.summary),
            ("content", heights.content),
        ] {
            if !v.is_finite() {
                return Err(DisclosureError::NonFiniteHeight { what });
            }
        }
        let options = self.effective_options(index)?;
        let state = self.details(index)?.animation_state();
        let expand = state == AnimationState::Shrinking || !self.is_open(index);

        let transition = HeightTransition {
            index,
            start_height: heights.current,
            end_height: if expand {
                heights.summary + heights.content
            } else {
                heights.summary
            },
            start_time: now,
            options,
            open: expand,
        };
        if expand {
            self.close_others(index);
            self.open.insert(index);
        }
        let details = self.details_mut(index)?;
        if details.transition.take().is_some() {
            debug!("disclosure: cancelled running transition on {index}");
        }
        details.transition = Some(transition);
        debug!(
            "disclosure: {index} {:?} {} -> {}",
            transition.state(),
            transition.start_height,
            transition.end_height
        );
        Ok(transition)
    }

    /// Advance every running transition to `now`.
    pub fn update(&mut self, now: f64) -> Vec<DisclosureEvent> {
        let mut events = std::mem::take(&mut self.pending);
        for (index, details) in self.details.iter_mut().enumerate() {
            let Some(tr) = details.transition else {
                continue;
            };
            if tr.is_finished(now) {
                details.transition = None;
                if !tr.open {
                    self.open.remove(&index);
                }
                events.push(DisclosureEvent::Finished {
                    index,
                    open: tr.open,
                });
            } else {
                events.push(DisclosureEvent::Height {
                    index,
                    height: tr.height_at(now),
                });
            }
        }
        events
    }

    /// Single mode: close every open details except `keep`, without animation.
    fn close_others(&mut self, keep: usize) {
        if self.mode != Mode::Single {
            return;
        }
        let others: Vec<usize> = self.open.iter().copied().filter(|&i| i != keep).collect();
        for i in others {
            self.open.remove(&i);
            if let Some(d) = self.details.get_mut(i) {
                d.transition = None;
            }
            self.pending
                .push(DisclosureEvent::Finished { index: i, open: false });
            debug!("disclosure: {i} closed by {keep}");
        }
    }
}
