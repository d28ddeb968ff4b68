//! Engine: state ownership and the public embedding API.
//!
//! Methods:
//! - new, refresh (measure → offsets → position), move_into_view
//! - pointer/wheel/touch/click input handlers
//! - update (one animation step per host frame), unmount
//!
//! Every mutating call clears the previous [`Outputs`] and returns the
//! changes and events it produced.

use std::collections::BTreeSet;

use log::{debug, error, warn};
use serde::{Deserialize, Serialize};

use crate::config::{Config, Direction};
use crate::easing::Easing;
use crate::error::CarouselError;
use crate::gesture::{DragSession, Release};
use crate::inputs::{Measurements, MoveOptions, PointerInput, PointerType, TouchInput};
use crate::layout::{ItemPosition, Layout, FAIL_SAFE_ITERATIONS};
use crate::math::{sign, wrap_index};
use crate::motion::{
    plan_throw, AutoScroll, Eased, EasedStep, Motion, MotionKind, Throw, AUTO_SCROLL_TAKEOVER_TWEEN_MS,
    AUTO_SCROLL_TWEEN_MS,
};
use crate::outputs::{CarouselEvent, ItemChange, ListenerSet, Outputs};
use crate::snap::{find_snap_distance, SnapTarget};
use crate::tunables::Tunables;
use crate::wheel::{WheelInput, WheelSession};

/// Touches starting this close (px) to a viewport edge may be navigation swipes.
pub const EDGE_GUARD_PX: f64 = 30.0;
/// Release velocities at or below this (px/ms) do not throw.
pub const MIN_THROW_VELOCITY: f64 = 0.1;

/// Result of a wheel event.
#[derive(Debug, Serialize)]
pub struct WheelResponse<'a> {
    /// The host must call `preventDefault()` on the native event.
    pub prevent_default: bool,
    pub outputs: &'a Outputs,
}

/// Read-only snapshot of the engine state, for hosts and debugging.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarouselState {
    pub active_index: usize,
    pub offset: f64,
    pub motion: MotionKind,
    pub visible: Vec<usize>,
    pub listeners: ListenerSet,
    pub disabled: bool,
}

pub struct Carousel {
    config: Config,
    tunables: Tunables,
    layout: Layout,
    active: usize,
    offset: f64,
    /// Live auto-scroll velocity; a throw may reverse its sign.
    auto_scroll: f64,
    motion: Motion,
    visible: BTreeSet<usize>,
    drag: Option<DragSession>,
    prevent_click: bool,
    wheel: WheelSession,
    listeners: ListenerSet,
    outputs: Outputs,
}

impl Default for Carousel {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Carousel {
    pub fn new(config: Config) -> Self {
        let layout = Layout::new(config.align, config.loop_items);
        Self {
            active: config.active_item_index,
            config,
            tunables: Tunables::default(),
            layout,
            offset: 0.0,
            auto_scroll: 0.0,
            motion: Motion::Idle,
            visible: BTreeSet::new(),
            drag: None,
            prevent_click: false,
            wheel: WheelSession::new(),
            listeners: ListenerSet::default(),
            outputs: Outputs::default(),
        }
    }

    // ----- accessors -----

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn tunables(&self) -> &Tunables {
        &self.tunables
    }

    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[inline]
    pub fn active_index(&self) -> usize {
        self.active
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Current auto-scroll velocity in px/ms (sign follows the last throw).
    #[inline]
    pub fn auto_scroll(&self) -> f64 {
        self.auto_scroll
    }

    #[inline]
    pub fn motion_kind(&self) -> MotionKind {
        self.motion.kind()
    }

    #[inline]
    pub fn visible_items(&self) -> &BTreeSet<usize> {
        &self.visible
    }

    #[inline]
    pub fn listeners(&self) -> ListenerSet {
        self.listeners
    }

    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.tunables.disabled
    }

    #[inline]
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    pub fn item_offset(&self, index: usize) -> f64 {
        self.layout.item_offset(index)
    }

    pub fn item_position(&self, index: usize) -> ItemPosition {
        self.layout.item_position(index, self.offset)
    }

    /// Closest item boundary to `offset + requested`.
    pub fn find_snap_distance(&self, requested: f64) -> SnapTarget {
        find_snap_distance(&self.layout, self.active, self.offset, requested)
    }

    pub fn state(&self) -> CarouselState {
        CarouselState {
            active_index: self.active,
            offset: self.offset,
            motion: self.motion.kind(),
            visible: self.visible.iter().copied().collect(),
            listeners: self.listeners,
            disabled: self.tunables.disabled,
        }
    }

    // ----- lifecycle -----

    /// Apply new measurements and tunables, then reposition.
    ///
    /// Called on mount and whenever the container or its items resize. With
    /// unchanged inputs the produced positions are identical.
    pub fn refresh(
        &mut self,
        measurements: Measurements,
        tunables: Tunables,
        now: f64,
    ) -> Result<&Outputs, CarouselError> {
        self.outputs.clear();
        let tunables = tunables.sanitized();
        if tunables.disabled != self.tunables.disabled {
            self.outputs.push_event(CarouselEvent::Disabled {
                disabled: tunables.disabled,
            });
        }

        if tunables.disabled {
            self.tunables = tunables;
            self.stop_all_animations();
            if let Some(drag) = self.drag.take() {
                self.outputs.push_event(CarouselEvent::ReleasePointer {
                    pointer_id: drag.pointer_id,
                });
            }
            self.wheel.reset();
            self.sync_listeners(now);
            let count = self.layout.len().max(measurements.item_sizes.len());
            for index in 0..count {
                self.outputs.push_change(ItemChange { index, translate: None });
            }
            self.visible.clear();
            debug!("refresh: carousel disabled, cleared {count} transforms");
            return Ok(&self.outputs);
        }

        let old_len = self.layout.len();
        self.layout
            .set_measurements(measurements.container_size, measurements.item_sizes, &tunables)?;
        if self.auto_scroll.abs() != tunables.auto_scroll.abs() {
            self.auto_scroll = tunables.auto_scroll;
        }
        self.tunables = tunables;

        let n = self.layout.len();
        if n == 0 {
            self.active = 0;
        } else if self.active >= n {
            self.active = if self.config.loop_items {
                wrap_index(self.active as i64, n)
            } else {
                n - 1
            };
        }
        // Eased and throw targets index the old item list.
        let retarget = n != old_len && matches!(self.motion, Motion::Eased(_) | Motion::Throw(_));
        if retarget {
            debug!("refresh: item count {old_len} -> {n}, cancelling {:?}", self.motion.kind());
            self.motion = Motion::Idle;
        }
        self.layout.calculate_item_offsets(self.active);
        self.run(|c| c.position_items())?;

        if retarget && n > 0 {
            self.run(|c| c.drag_throw(0.0, now, now))?;
        } else if self.auto_scroll != 0.0 {
            if self.motion.is_idle() {
                self.start_auto_scroll(0.0, AUTO_SCROLL_TWEEN_MS, now);
            }
        } else {
            self.stop_auto_scroll();
        }
        debug!(
            "refresh: items={n} container={} active={} visible={:?}",
            self.layout.container_size(),
            self.active,
            self.visible
        );
        Ok(&self.outputs)
    }

    /// Cancel everything: animations, drag and wheel sessions, listeners.
    pub fn unmount(&mut self) -> &Outputs {
        self.outputs.clear();
        self.stop_all_animations();
        if let Some(drag) = self.drag.take() {
            self.outputs.push_event(CarouselEvent::ReleasePointer {
                pointer_id: drag.pointer_id,
            });
        }
        self.wheel.reset();
        if self.listeners != ListenerSet::default() {
            self.listeners = ListenerSet::default();
            self.outputs.push_event(CarouselEvent::ListenersChanged {
                listeners: self.listeners,
            });
        }
        &self.outputs
    }

    // ----- animation control -----

    pub fn stop_all_animations(&mut self) {
        if !self.motion.is_idle() {
            debug!("stop: {:?} cancelled", self.motion.kind());
        }
        self.motion = Motion::Idle;
    }

    pub fn stop_auto_scroll(&mut self) {
        if matches!(self.motion, Motion::AutoScroll(_)) {
            self.motion = Motion::Idle;
        }
    }

    /// Ease item `index` to the snap anchor along the shortest path.
    pub fn move_into_view(
        &mut self,
        index: usize,
        options: MoveOptions,
        now: f64,
    ) -> Result<&Outputs, CarouselError> {
        self.outputs.clear();
        let n = self.layout.len();
        if n == 0 || self.tunables.disabled {
            warn!("move_into_view({index}) ignored: items={n} disabled={}", self.tunables.disabled);
            return Ok(&self.outputs);
        }
        let index = if self.config.loop_items {
            index % n
        } else {
            index.min(n - 1)
        };
        self.stop_all_animations();
        let target = self.layout.closest_distance(self.active, index);
        let easing = options.easing.unwrap_or(self.config.easing);
        let duration = options.duration.unwrap_or(self.config.ease_duration);
        self.run(|c| c.start_eased(target, index, easing, duration, now))?;
        Ok(&self.outputs)
    }

    /// Advance the running animation to `now`. Call once per host frame.
    pub fn update(&mut self, now: f64) -> Result<&Outputs, CarouselError> {
        self.outputs.clear();
        if self.wheel.expire(now) {
            self.sync_listeners(now);
        }
        self.run(|c| c.step(now))?;
        Ok(&self.outputs)
    }

    // ----- input -----

    pub fn pointer_down(&mut self, input: PointerInput) -> Result<&Outputs, CarouselError> {
        self.outputs.clear();
        if self.tunables.disabled || !input.is_primary {
            return Ok(&self.outputs);
        }
        if input.pointer_type == PointerType::Mouse && input.button != 0 {
            return Ok(&self.outputs);
        }
        self.stop_all_animations();
        let pos = input.main_axis(self.config.direction);
        self.drag = Some(DragSession::start(input.pointer_id, input.t, pos));
        self.prevent_click = false;
        self.outputs.push_event(CarouselEvent::Press);
        self.sync_listeners(input.t);
        Ok(&self.outputs)
    }

    pub fn pointer_move(&mut self, input: PointerInput) -> Result<&Outputs, CarouselError> {
        self.outputs.clear();
        if !input.is_primary {
            return Ok(&self.outputs);
        }
        let pos = input.main_axis(self.config.direction);
        let Some(drag) = self.drag.as_mut() else {
            return Ok(&self.outputs);
        };
        let moved = drag.on_move(input.t, pos);
        if moved.locked_now {
            self.outputs.push_event(CarouselEvent::DragStart);
            self.outputs.push_event(CarouselEvent::CapturePointer {
                pointer_id: input.pointer_id,
            });
        }
        if moved.dpos != 0.0 {
            self.offset += moved.dpos;
            self.run(|c| c.position_items())?;
        }
        Ok(&self.outputs)
    }

    pub fn pointer_up(&mut self, input: PointerInput) -> Result<&Outputs, CarouselError> {
        self.drag_end(input)
    }

    pub fn pointer_cancel(&mut self, input: PointerInput) -> Result<&Outputs, CarouselError> {
        self.drag_end(input)
    }

    /// Whether the host must prevent default on a touch start (edge swipe guard).
    pub fn touch_start(&self, input: TouchInput) -> bool {
        !self.config.enable_navigation_gestures
            && self.config.direction == Direction::Horizontal
            && input.touches == 1
            && (input.page_x < EDGE_GUARD_PX || input.page_x > input.viewport_width - EDGE_GUARD_PX)
    }

    /// Whether the host must prevent default on a touch move.
    pub fn touch_move(&self, cancelable: bool) -> bool {
        cancelable && self.drag.as_ref().is_some_and(DragSession::is_locked)
    }

    /// Whether a click must be swallowed because it trails a drag.
    pub fn click(&self) -> bool {
        self.prevent_click && !self.tunables.disabled
    }

    pub fn wheel(&mut self, input: WheelInput) -> Result<WheelResponse<'_>, CarouselError> {
        self.outputs.clear();
        if self.tunables.disabled {
            return Ok(WheelResponse {
                prevent_default: false,
                outputs: &self.outputs,
            });
        }
        let now = input.t;
        self.wheel.expire(now);
        let swipe = input.swipe(self.config.direction);
        let handled = swipe.on_axis || self.config.enable_vertical_scroll;
        if handled {
            let inertia = self.wheel.push_and_classify(now, swipe.d);
            if !inertia {
                self.stop_all_animations();
                self.offset -= swipe.d;
                self.run(|c| c.position_items())?;
                self.wheel.inertia = false;
            } else if !self.wheel.inertia {
                match self.wheel.last_velocity() {
                    Some(v0) if v0 != 0.0 && self.config.damping > 0.0 => {
                        debug!("wheel: inertia detected, throwing with v0={v0}");
                        self.run(|c| c.start_throw(v0, now, now))?;
                        self.wheel.inertia = true;
                    }
                    Some(_) if self.config.damping <= 0.0 => {
                        warn!("wheel: inertia ignored, damping is {}", self.config.damping);
                    }
                    _ => {}
                }
            }
        }
        self.wheel.touch(now);
        self.sync_listeners(now);
        Ok(WheelResponse {
            prevent_default: handled,
            outputs: &self.outputs,
        })
    }

    // ----- internals -----

    /// Run `f`; a failure cancels all animation before it is returned.
    fn run<F>(&mut self, f: F) -> Result<(), CarouselError>
    where
        F: FnOnce(&mut Self) -> Result<(), CarouselError>,
    {
        let result = f(self);
        if let Err(err) = &result {
            error!("carousel halted: {err}");
            self.stop_all_animations();
        }
        result
    }

    fn sync_listeners(&mut self, now: f64) {
        let next = ListenerSet {
            pointer: self.drag.is_some(),
            wheel: self.wheel.is_live(now),
        };
        if next != self.listeners {
            self.listeners = next;
            self.outputs
                .push_event(CarouselEvent::ListenersChanged { listeners: next });
        }
    }

    fn position_items(&mut self) -> Result<(), CarouselError> {
        let placement = self
            .layout
            .position_items(self.active, self.offset, &self.visible)?;
        for (index, start) in placement.placed {
            self.outputs.push_change(ItemChange {
                index,
                translate: Some(start),
            });
        }
        for index in placement.cleared {
            self.outputs.push_change(ItemChange { index, translate: None });
        }
        self.visible = placement.visible;
        Ok(())
    }

    fn commit(&mut self, index: usize) {
        let index = index.min(self.layout.len().saturating_sub(1));
        debug!("commit: active {} -> {index}", self.active);
        self.active = index;
        self.offset = 0.0;
        self.layout.calculate_item_offsets(index);
    }

    fn should_start_auto_scroll(&self) -> bool {
        self.auto_scroll != 0.0
            && !self.tunables.disabled
            && !matches!(self.motion, Motion::AutoScroll(_))
    }

    fn start_auto_scroll(&mut self, v0: f64, tween: f64, now: f64) {
        if !self.should_start_auto_scroll() {
            return;
        }
        debug!("auto-scroll: start v0={v0} target={} tween={tween}", self.auto_scroll);
        self.motion = Motion::AutoScroll(AutoScroll::new(v0, now, tween));
    }

    fn start_eased(
        &mut self,
        target_offset: f64,
        target_index: usize,
        easing: Easing,
        duration: f64,
        now: f64,
    ) -> Result<(), CarouselError> {
        if self.config.snap() {
            self.outputs.push_event(CarouselEvent::Snap { index: target_index });
        }
        if duration <= 0.0 {
            self.commit(target_index);
            return self.position_items();
        }
        debug!("eased: {} -> {target_offset} (index {target_index}) over {duration}ms", self.offset);
        self.motion = Motion::Eased(Eased {
            start_time: now,
            start_offset: self.offset,
            target_offset,
            target_index,
            duration,
            easing,
        });
        Ok(())
    }

    fn start_throw(&mut self, v0: f64, t0: f64, now: f64) -> Result<(), CarouselError> {
        let damping = self.config.damping;
        let resolver = (self.config.snap() && self.auto_scroll == 0.0).then(|| {
            let (layout, active, offset) = (&self.layout, self.active, self.offset);
            move |distance: f64| find_snap_distance(layout, active, offset, distance)
        });
        let plan = plan_throw(v0, damping, resolver);
        if let Some(target) = plan.snap {
            self.outputs.push_event(CarouselEvent::Snap { index: target.index });
        }
        if sign(plan.velocity) != sign(self.auto_scroll) {
            self.auto_scroll = -self.auto_scroll;
        }
        debug!(
            "throw: v0={v0} velocity={} duration={} distance={} snap={:?}",
            plan.velocity, plan.duration, plan.distance, plan.snap
        );
        self.motion = Motion::Throw(Throw {
            t0,
            start_offset: self.offset,
            damping,
            plan,
        });
        self.step_throw(now)
    }

    fn drag_end(&mut self, input: PointerInput) -> Result<&Outputs, CarouselError> {
        self.outputs.clear();
        if !input.is_primary {
            return Ok(&self.outputs);
        }
        let Some(drag) = self.drag.take() else {
            return Ok(&self.outputs);
        };
        self.outputs.push_event(CarouselEvent::ReleasePointer {
            pointer_id: drag.pointer_id,
        });
        self.sync_listeners(input.t);
        let (release, block_click) = drag.release(input.t);
        if block_click {
            self.prevent_click = true;
        }
        let (v0, t0) = match release {
            Release::Throw { v0, t0 } => (v0, t0),
            Release::Settle => (0.0, input.t),
        };
        self.run(|c| c.drag_throw(v0, t0, input.t))?;
        Ok(&self.outputs)
    }

    fn drag_throw(&mut self, v0: f64, t0: f64, now: f64) -> Result<(), CarouselError> {
        if v0.abs() > MIN_THROW_VELOCITY && self.config.damping > 0.0 {
            return self.start_throw(v0, t0, now);
        }
        if self.should_start_auto_scroll() {
            self.start_auto_scroll(0.0, AUTO_SCROLL_TWEEN_MS, now);
        } else if self.config.snap() {
            let target = self.find_snap_distance(0.0);
            let (easing, duration) = (self.config.easing, self.config.ease_duration);
            self.start_eased(self.offset + target.distance, target.index, easing, duration, now)?;
        }
        Ok(())
    }

    fn step(&mut self, now: f64) -> Result<(), CarouselError> {
        match self.motion {
            Motion::Idle => Ok(()),
            Motion::AutoScroll(mut auto) => {
                self.offset += auto.step(now, self.auto_scroll);
                self.motion = Motion::AutoScroll(auto);
                self.rebase_active();
                self.position_items()
            }
            Motion::Eased(eased) => {
                match eased.step(now) {
                    EasedStep::Moving(offset) => self.offset = offset,
                    EasedStep::Arrived => {
                        self.motion = Motion::Idle;
                        self.commit(eased.target_index);
                    }
                }
                self.position_items()
            }
            Motion::Throw(_) => self.step_throw(now),
        }
    }

    fn step_throw(&mut self, now: f64) -> Result<(), CarouselError> {
        let Motion::Throw(throw) = self.motion else {
            return Ok(());
        };
        let step = throw.step(now);
        if self.should_start_auto_scroll() && step.velocity.abs() <= self.auto_scroll.abs() {
            self.motion = Motion::Idle;
            self.start_auto_scroll(step.velocity, AUTO_SCROLL_TAKEOVER_TWEEN_MS, now);
            return Ok(());
        }
        if step.done {
            self.motion = Motion::Idle;
            match throw.plan.snap {
                Some(target) => self.commit(target.index),
                None => self.offset = throw.start_offset + step.travel,
            }
            self.position_items()?;
            self.start_auto_scroll(0.0, AUTO_SCROLL_TWEEN_MS, now);
        } else {
            self.offset = throw.start_offset + step.travel;
            self.position_items()?;
        }
        Ok(())
    }

    /// Keep the offset within one neighbour distance of the active item while
    /// auto-scrolling. Rendered positions do not change.
    fn rebase_active(&mut self) {
        let n = self.layout.len();
        if n == 0 {
            return;
        }
        let mut guard = 0usize;
        loop {
            let active = self.active as i64;
            let back = self.layout.distance_to_neighbor(active, 1);
            let forward = self.layout.distance_to_neighbor(active, -1);
            if !self.config.loop_items {
                let past_last = self.active + 1 == n && self.offset < 0.0;
                let past_first = self.active == 0 && self.offset > 0.0;
                if past_last || past_first {
                    debug!("auto-scroll: reached the end at index {}", self.active);
                    self.offset = 0.0;
                    self.motion = Motion::Idle;
                    break;
                }
            }
            let (step, distance) = if self.offset >= back {
                (-1, back)
            } else if self.offset <= forward {
                (1, forward)
            } else {
                break;
            };
            self.offset -= distance;
            self.active = wrap_index(active + step, n);
            guard += 1;
            if guard >= FAIL_SAFE_ITERATIONS {
                error!(
                    "[rebase_active] fail safe triggered: active={} offset={} back={back} forward={forward}",
                    self.active, self.offset
                );
                break;
            }
        }
        if guard > 0 {
            self.layout.calculate_item_offsets(self.active);
        }
    }
}
