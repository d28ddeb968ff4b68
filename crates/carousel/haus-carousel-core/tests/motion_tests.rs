use haus_carousel_core::motion::{plan_throw, throw_travel, Throw, THROW_STOP_VELOCITY};
use haus_carousel_core::{
    Carousel, Config, Measurements, MotionKind, PointerInput, PointerType, SnapTarget, Tunables,
};
use haus_test_fixtures::layouts;
use serde::Deserialize;

#[derive(Deserialize)]
struct Mount {
    config: Config,
    tunables: Tunables,
    measurements: Measurements,
}

fn mount_with(name: &str, edit: impl FnOnce(&mut Tunables)) -> Carousel {
    let mut m: Mount = layouts::load(name).unwrap();
    edit(&mut m.tunables);
    let mut c = Carousel::new(m.config);
    c.refresh(m.measurements, m.tunables, 0.0).unwrap();
    c
}

fn touch(t: f64, x: f64) -> PointerInput {
    PointerInput {
        t,
        pointer_id: 1,
        is_primary: true,
        pointer_type: PointerType::Touch,
        button: 0,
        screen_x: x,
        screen_y: 0.0,
    }
}

/// Drag from `x0` by `step` px every 10 ms starting at `t0`; release 5 ms
/// after the last move.
fn flick(c: &mut Carousel, t0: f64, x0: f64, step: f64, moves: usize) -> f64 {
    c.pointer_down(touch(t0, x0)).unwrap();
    for k in 1..=moves {
        c.pointer_move(touch(t0 + 10.0 * k as f64, x0 + step * k as f64))
            .unwrap();
    }
    let release = t0 + 10.0 * moves as f64 + 5.0;
    c.pointer_up(touch(release, x0 + step * moves as f64))
        .unwrap();
    release
}

#[test]
fn throw_terminates_within_one_and_a_half_durations() {
    for damping in [100.0, 200.0, 400.0] {
        for v0 in [0.5, 1.0, 2.0, 5.0, -3.0] {
            let plan = plan_throw::<fn(f64) -> SnapTarget>(v0, damping, None);
            let expected = v0 * damping * (1.0 - (-plan.duration / damping).exp());
            assert!((plan.distance - expected).abs() < 1e-9);

            let throw = Throw {
                t0: 0.0,
                start_offset: 0.0,
                damping,
                plan,
            };
            let mut now = 0.0;
            while !throw.step(now).done {
                now += 16.0;
                assert!(now <= plan.duration * 1.5, "v0={v0} d={damping} ran past 1.5x");
            }
        }
    }
}

#[test]
fn throw_velocity_decays_to_stop_threshold() {
    let plan = plan_throw::<fn(f64) -> SnapTarget>(-2.0, 200.0, None);
    let throw = Throw {
        t0: 0.0,
        start_offset: 0.0,
        damping: 200.0,
        plan,
    };
    let step = throw.step(plan.duration);
    assert!((step.velocity + THROW_STOP_VELOCITY).abs() < 1e-12);
    assert!((step.travel - throw_travel(-2.0, 200.0, plan.duration)).abs() < 1e-9);
}

#[test]
fn auto_scroll_ramps_in_over_half_a_second() {
    let mut c = mount_with("autoscroll-strip", |_| {});
    assert_eq!(c.motion_kind(), MotionKind::AutoScroll);
    c.update(16.0).unwrap();
    let first = c.offset();
    assert!(first < 0.0 && first > -1.6, "ramping: {first}");

    c.update(600.0).unwrap();
    let before = c.offset();
    c.update(616.0).unwrap();
    let delta = c.offset() - before;
    // cruising at -0.1 px/ms, unless a rebase happened in between
    assert!((delta + 1.6).abs() < 1e-9 || (delta + 1.6 - 100.0).abs() < 1e-9);
}

#[test]
fn auto_scroll_rebases_the_active_item() {
    let mut c = mount_with("autoscroll-strip", |_| {});
    let mut now = 0.0;
    for _ in 0..312 {
        now += 16.0;
        c.update(now).unwrap();
        assert!(c.offset() > -100.0 && c.offset() <= 0.0);
    }
    // ~25 px of ramp plus 0.1 px/ms afterwards: 475 px at a stride of 100
    assert_eq!(c.active_index(), 4);
    assert!(c.offset() > -80.0 && c.offset() < -70.0, "offset {}", c.offset());
}

#[test]
fn rebase_keeps_rendered_positions() {
    let mut c = mount_with("autoscroll-strip", |_| {});
    let mut now = 0.0;
    let mut prev = c.item_position(c.active_index()).start;
    let mut prev_active = c.active_index();
    for _ in 0..200 {
        now += 16.0;
        c.update(now).unwrap();
        let active = c.active_index();
        if active != prev_active {
            // the old active item now sits one stride before the new one
            let old = c.item_position(prev_active).start;
            assert!((old - (c.item_position(active).start - 100.0)).abs() < 1e-9);
            assert!(old <= prev);
            prev_active = active;
        }
        prev = c.item_position(active).start;
    }
}

#[test]
fn throw_hands_off_to_auto_scroll() {
    let mut c = mount_with("autoscroll-strip", |_| {});
    let release = flick(&mut c, 1000.0, 400.0, -10.0, 6);
    assert_eq!(c.motion_kind(), MotionKind::Throw);
    assert_eq!(c.auto_scroll(), -0.1);

    let mut now = release;
    while c.motion_kind() == MotionKind::Throw {
        now += 16.0;
        c.update(now).unwrap();
        assert!(now < 3000.0);
    }
    assert_eq!(c.motion_kind(), MotionKind::AutoScroll);
    // |v| reaches 0.1 at t0 + d·ln(10)
    let handoff = 1060.0 + 200.0 * 10f64.ln();
    assert!(now >= handoff && now < handoff + 16.0, "handoff at {now}");
}

#[test]
fn opposing_throw_reverses_auto_scroll() {
    let mut c = mount_with("autoscroll-strip", |_| {});
    flick(&mut c, 1000.0, 400.0, 10.0, 6);
    assert_eq!(c.auto_scroll(), 0.1);
}

#[test]
fn bounded_auto_scroll_stops_at_the_last_item() {
    let mut c = mount_with("bounded-six", |t| t.auto_scroll = -0.2);
    assert_eq!(c.motion_kind(), MotionKind::AutoScroll);
    let mut now = 0.0;
    while c.motion_kind() != MotionKind::Idle {
        now += 16.0;
        c.update(now).unwrap();
        assert!(now < 10_000.0);
    }
    assert_eq!(c.active_index(), 5);
    assert_eq!(c.offset(), 0.0);
}

#[test]
fn bounded_flick_past_the_end_lands_on_last_item() {
    let mut c = mount_with("bounded-six", |_| {});
    let release = flick(&mut c, 0.0, 1000.0, -50.0, 20);
    assert_eq!(c.offset(), -1000.0);
    assert_eq!(c.motion_kind(), MotionKind::Throw);
    let mut now = release;
    while c.motion_kind() != MotionKind::Idle {
        now += 16.0;
        c.update(now).unwrap();
        assert!(now < 5000.0);
    }
    assert_eq!(c.active_index(), 5);
    assert_eq!(c.offset(), 0.0);
}

#[test]
fn stop_all_animations_is_idempotent() {
    let mut c = mount_with("autoscroll-strip", |_| {});
    c.stop_all_animations();
    c.stop_all_animations();
    assert_eq!(c.motion_kind(), MotionKind::Idle);
    c.stop_auto_scroll();
    assert_eq!(c.motion_kind(), MotionKind::Idle);
}
