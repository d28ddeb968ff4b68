//! Snap resolver: nearest committable item boundary for a requested travel.

use log::error;
use serde::{Deserialize, Serialize};

use crate::layout::{Layout, FAIL_SAFE_ITERATIONS};
use crate::math::{sign, wrap_index};

/// Item to commit and the exact travel that lands on it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnapTarget {
    pub index: usize,
    pub distance: f64,
}

/// Find the item boundary closest to `offset + requested`, starting from the
/// item at `active` whose rest position is `offset` away.
///
/// The walk goes neighbour by neighbour in the direction of the target and
/// stops once it has passed it, keeping the closest boundary seen. In bounded
/// mode it also stops at the first/last item.
pub fn find_snap_distance(layout: &Layout, active: usize, offset: f64, requested: f64) -> SnapTarget {
    let target = offset + requested;
    if target == 0.0 || layout.is_empty() {
        return SnapTarget {
            index: active,
            distance: -offset,
        };
    }
    let n = layout.len() as i64;
    let dir = sign(target) as i64;
    let mut index = active as i64;
    let mut travelled = 0.0;
    let mut best_travel = 0.0;
    let mut best_index = index;
    let mut best_diff = target.abs();
    let mut guard = 0usize;
    loop {
        let next = index - dir;
        if !layout.loop_items() && (next < 0 || next >= n) {
            break;
        }
        travelled += layout.distance_to_neighbor(index, dir);
        index = next;
        let delta = target - travelled;
        if best_diff > delta.abs() {
            best_diff = delta.abs();
            best_travel = travelled;
            best_index = index;
        }
        guard += 1;
        if guard >= FAIL_SAFE_ITERATIONS {
            error!(
                "[find_snap_distance] fail safe triggered: index={index} requested={requested} dir={dir} travelled={travelled} delta={delta} target={target} best_diff={best_diff} best_travel={best_travel} best_index={best_index} offset={offset} active={active}"
            );
            break;
        }
        if delta * dir as f64 <= 0.0 {
            break;
        }
    }
    SnapTarget {
        index: wrap_index(best_index, layout.len()),
        distance: best_travel - offset,
    }
}
