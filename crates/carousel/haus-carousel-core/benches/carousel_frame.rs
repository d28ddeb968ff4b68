//! Per-frame cost of the carousel engine.
//!
//! Measures:
//! - one auto-scroll frame (step + position pass)
//! - a full eased snap from start to rest
//! - a refresh of a mixed-size layout

use criterion::{criterion_group, criterion_main, Criterion};
use haus_carousel_core::{Carousel, Config, Measurements, MotionKind, Tunables};
use haus_test_fixtures::layouts;
use serde::Deserialize;
use std::hint::black_box;

#[derive(Clone, Deserialize)]
struct Mount {
    config: Config,
    tunables: Tunables,
    measurements: Measurements,
}

fn load(name: &str) -> Mount {
    layouts::load(name).unwrap()
}

fn mounted(m: &Mount) -> Carousel {
    let mut c = Carousel::new(m.config.clone());
    c.refresh(m.measurements.clone(), m.tunables.clone(), 0.0)
        .unwrap();
    c
}

fn bench_auto_scroll_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("carousel_frame");
    let m = load("autoscroll-strip");
    let mut carousel = mounted(&m);
    let mut now = 0.0;

    group.bench_function("auto_scroll_frame", |b| {
        b.iter(|| {
            now += 16.0;
            black_box(carousel.update(now).unwrap());
        });
    });

    group.finish();
}

fn bench_snap_to_rest(c: &mut Criterion) {
    let mut group = c.benchmark_group("carousel_frame");
    let m = load("center-mixed");

    group.bench_function("snap_to_rest", |b| {
        b.iter(|| {
            let mut carousel = mounted(&m);
            let target = carousel.find_snap_distance(-900.0);
            carousel
                .move_into_view(target.index, Default::default(), 0.0)
                .unwrap();
            let mut now = 0.0;
            while carousel.motion_kind() != MotionKind::Idle {
                now += 16.0;
                carousel.update(now).unwrap();
            }
            black_box(carousel.active_index());
        });
    });

    group.finish();
}

fn bench_refresh(c: &mut Criterion) {
    let mut group = c.benchmark_group("carousel_frame");
    let m = load("center-mixed");
    let mut carousel = mounted(&m);

    group.bench_function("refresh_mixed", |b| {
        b.iter(|| {
            let out = carousel
                .refresh(m.measurements.clone(), m.tunables.clone(), 0.0)
                .unwrap();
            black_box(out.changes.len());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_auto_scroll_frame, bench_snap_to_rest, bench_refresh);
criterion_main!(benches);
