use haus_carousel_core::{
    Carousel, CarouselEvent, Config, ListenerSet, Measurements, MotionKind, MoveOptions,
    PointerInput, PointerType, TouchInput, Tunables,
};
use haus_test_fixtures::layouts;
use serde::Deserialize;

#[derive(Deserialize)]
struct Mount {
    config: Config,
    tunables: Tunables,
    measurements: Measurements,
}

fn mount_with(name: &str, edit: impl FnOnce(&mut Config)) -> Carousel {
    let mut m: Mount = layouts::load(name).unwrap();
    edit(&mut m.config);
    let mut c = Carousel::new(m.config);
    c.refresh(m.measurements, m.tunables, 0.0).unwrap();
    c
}

fn mount(name: &str) -> Carousel {
    mount_with(name, |_| {})
}

fn touch(t: f64, x: f64) -> PointerInput {
    PointerInput {
        t,
        pointer_id: 7,
        is_primary: true,
        pointer_type: PointerType::Touch,
        button: 0,
        screen_x: x,
        screen_y: 0.0,
    }
}

fn run_until_idle(c: &mut Carousel, mut now: f64) -> f64 {
    for _ in 0..2000 {
        now += 16.0;
        c.update(now).unwrap();
        if c.motion_kind() == MotionKind::Idle {
            return now;
        }
    }
    panic!("carousel did not settle");
}

/// Press at `x0`, then move `step` px every 10 ms, `moves` times.
fn drag(c: &mut Carousel, x0: f64, step: f64, moves: usize) -> Vec<CarouselEvent> {
    let mut events = c.pointer_down(touch(0.0, x0)).unwrap().events.clone();
    for k in 1..=moves {
        let out = c.pointer_move(touch(k as f64 * 10.0, x0 + step * k as f64)).unwrap();
        events.extend(out.events.iter().cloned());
    }
    events
}

#[test]
fn press_attaches_pointer_listeners() {
    let mut c = mount("uniform-five");
    let out = c.pointer_down(touch(0.0, 100.0)).unwrap();
    assert_eq!(out.events[0], CarouselEvent::Press);
    assert!(out.events.contains(&CarouselEvent::ListenersChanged {
        listeners: ListenerSet {
            pointer: true,
            wheel: false
        }
    }));
    assert!(c.listeners().pointer);

    let out = c.pointer_up(touch(20.0, 100.0)).unwrap();
    assert!(out
        .events
        .contains(&CarouselEvent::ReleasePointer { pointer_id: 7 }));
    assert!(!c.listeners().pointer);
}

#[test]
fn drag_locks_once_and_moves_items() {
    let mut c = mount("uniform-five");
    let events = drag(&mut c, 500.0, -10.0, 3);
    let starts = events
        .iter()
        .filter(|e| **e == CarouselEvent::DragStart)
        .count();
    assert_eq!(starts, 1);
    assert!(events.contains(&CarouselEvent::CapturePointer { pointer_id: 7 }));
    assert_eq!(c.offset(), -30.0);
    assert_eq!(c.item_position(1).start, 80.0);
    assert!(c.touch_move(true));
    assert!(!c.touch_move(false));
}

#[test]
fn flick_throws_and_snaps_to_nearest_boundary() {
    let mut c = mount("uniform-five");
    drag(&mut c, 500.0, -10.0, 6);
    assert_eq!(c.offset(), -60.0);

    let out = c.pointer_up(touch(65.0, 440.0)).unwrap();
    assert!(out.events.contains(&CarouselEvent::Snap { index: 2 }));
    assert_eq!(c.motion_kind(), MotionKind::Throw);
    assert!(c.click(), "click after a drag is swallowed");

    let settled = run_until_idle(&mut c, 65.0);
    assert_eq!(c.active_index(), 2);
    assert_eq!(c.offset(), 0.0);
    // back-solved throw: v = 160/200 + 0.006, T = d·ln(|v|/0.006)
    let duration = 200.0 * (0.806f64 / 0.006).ln();
    assert!(settled - 60.0 <= duration * 1.5);
}

#[test]
fn long_press_snaps_back_and_blocks_click() {
    let mut c = mount("uniform-five");
    c.pointer_down(touch(0.0, 100.0)).unwrap();
    c.pointer_move(touch(10.0, 100.25)).unwrap();
    c.pointer_move(touch(20.0, 100.5)).unwrap();
    let out = c.pointer_up(touch(100.0, 100.5)).unwrap();
    assert!(out.events.contains(&CarouselEvent::Snap { index: 0 }));
    assert_eq!(c.motion_kind(), MotionKind::Eased);
    assert!(c.click());
    run_until_idle(&mut c, 100.0);
    assert_eq!(c.active_index(), 0);
    assert_eq!(c.offset(), 0.0);
}

#[test]
fn stale_drag_settles_without_throw() {
    let mut c = mount("uniform-five");
    drag(&mut c, 100.0, 10.0, 4);
    c.pointer_up(touch(240.0, 140.0)).unwrap();
    assert_eq!(c.motion_kind(), MotionKind::Eased);
    assert!(c.click());
    run_until_idle(&mut c, 240.0);
    assert_eq!(c.active_index(), 0);
    assert_eq!(c.offset(), 0.0);
}

#[test]
fn quick_tap_lets_click_through() {
    let mut c = mount("uniform-five");
    c.pointer_down(touch(0.0, 100.0)).unwrap();
    c.pointer_up(touch(20.0, 100.0)).unwrap();
    assert!(!c.click());
}

#[test]
fn next_press_resets_click_suppression() {
    let mut c = mount("uniform-five");
    drag(&mut c, 500.0, -10.0, 6);
    c.pointer_up(touch(65.0, 440.0)).unwrap();
    assert!(c.click());
    c.pointer_down(touch(100.0, 300.0)).unwrap();
    assert!(!c.click());
}

#[test]
fn press_stops_running_animation() {
    let mut c = mount("uniform-five");
    c.move_into_view(2, MoveOptions::default(), 0.0).unwrap();
    c.update(100.0).unwrap();
    let offset = c.offset();
    assert!(offset < 0.0);
    c.pointer_down(touch(110.0, 50.0)).unwrap();
    assert_eq!(c.motion_kind(), MotionKind::Idle);
    assert_eq!(c.offset(), offset);
}

#[test]
fn secondary_and_right_button_presses_are_ignored() {
    let mut c = mount("uniform-five");
    let mut right = touch(0.0, 10.0);
    right.pointer_type = PointerType::Mouse;
    right.button = 2;
    assert!(c.pointer_down(right).unwrap().is_empty());

    let mut secondary = touch(0.0, 10.0);
    secondary.is_primary = false;
    assert!(c.pointer_down(secondary).unwrap().is_empty());
    assert_eq!(c.listeners(), ListenerSet::default());

    // moves without a session do nothing
    assert!(c.pointer_move(touch(10.0, 50.0)).unwrap().is_empty());
    assert_eq!(c.offset(), 0.0);
}

#[test]
fn vertical_carousel_tracks_screen_y() {
    let mut c = mount_with("uniform-five", |cfg| {
        cfg.direction = haus_carousel_core::Direction::Vertical
    });
    c.pointer_down(touch(0.0, 0.0)).unwrap();
    let mut input = touch(10.0, 300.0);
    input.screen_y = -12.0;
    c.pointer_move(input).unwrap();
    assert_eq!(c.offset(), -12.0);
}

#[test]
fn edge_touches_are_guarded_on_horizontal_carousels() {
    let c = mount("uniform-five");
    let at = |page_x: f64, touches: usize| TouchInput {
        touches,
        page_x,
        viewport_width: 400.0,
    };
    assert!(c.touch_start(at(10.0, 1)));
    assert!(c.touch_start(at(385.0, 1)));
    assert!(!c.touch_start(at(200.0, 1)));
    assert!(!c.touch_start(at(10.0, 2)));

    let c = mount_with("uniform-five", |cfg| cfg.enable_navigation_gestures = true);
    assert!(!c.touch_start(at(10.0, 1)));
}

#[test]
fn disabled_carousel_ignores_input() {
    let m: Mount = layouts::load("uniform-five").unwrap();
    let mut c = Carousel::new(m.config);
    let tunables = Tunables {
        disabled: true,
        ..m.tunables
    };
    c.refresh(m.measurements, tunables, 0.0).unwrap();
    assert!(c.pointer_down(touch(0.0, 10.0)).unwrap().is_empty());
    assert!(!c.click());
}

#[test]
fn disabling_mid_drag_releases_the_pointer() {
    let m: Mount = layouts::load("uniform-five").unwrap();
    let mut c = Carousel::new(m.config);
    c.refresh(m.measurements.clone(), m.tunables.clone(), 0.0).unwrap();
    c.pointer_down(touch(0.0, 10.0)).unwrap();
    let tunables = Tunables {
        disabled: true,
        ..m.tunables
    };
    let out = c.refresh(m.measurements, tunables, 5.0).unwrap();
    assert!(out
        .events
        .contains(&CarouselEvent::ReleasePointer { pointer_id: 7 }));
    assert_eq!(c.listeners(), ListenerSet::default());
}
