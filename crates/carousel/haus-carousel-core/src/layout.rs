//! Layout engine: neighbour distances, the per-item offset map, and the
//! visible-item positioning pass.
//!
//! Coordinates are main-axis pixels relative to the container start. An
//! item's *offset* is its signed rest distance from the active item (items
//! after the active one have negative offsets); its *position* is
//! `offset + snap_start - item_offset`.

use std::collections::BTreeSet;

use log::error;
use serde::{Deserialize, Serialize};

use crate::config::Align;
use crate::error::CarouselError;
use crate::math::wrap_index;
use crate::tunables::Tunables;

/// Upper bound on iterations of any layout or snap walk. Valid layouts stay
/// far below it; tripping it means the measurements are corrupt.
pub const FAIL_SAFE_ITERATIONS: usize = 50_000;

/// Start and end edge of an item in container coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ItemPosition {
    pub start: f64,
    pub end: f64,
}

/// Result of one positioning pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Placement {
    /// Items placed this pass with their start edge, in placement order.
    pub placed: Vec<(usize, f64)>,
    /// Items visible in the previous pass that are no longer visible.
    pub cleared: Vec<usize>,
    /// The new visible set.
    pub visible: BTreeSet<usize>,
}

#[derive(Clone, Debug)]
pub struct Layout {
    align: Align,
    loop_items: bool,
    container_size: f64,
    gap: f64,
    snap_start: f64,
    item_size: Option<f64>,
    sizes: Vec<f64>,
    offsets: Vec<f64>,
}

impl Layout {
    pub fn new(align: Align, loop_items: bool) -> Self {
        Self {
            align,
            loop_items,
            container_size: 0.0,
            gap: 0.0,
            snap_start: 0.0,
            item_size: None,
            sizes: Vec::new(),
            offsets: Vec::new(),
        }
    }

    /// Replace all measurements. On error the previous measurements are kept.
    pub fn set_measurements(
        &mut self,
        container_size: f64,
        sizes: Vec<f64>,
        tunables: &Tunables,
    ) -> Result<(), CarouselError> {
        if !container_size.is_finite() {
            return Err(CarouselError::NonFiniteMeasurement {
                what: "container size".into(),
            });
        }
        if let Some(i) = sizes.iter().position(|s| !s.is_finite()) {
            return Err(CarouselError::NonFiniteMeasurement {
                what: format!("size of item {i}"),
            });
        }
        let tunables = tunables.sanitized();
        let sizes: Vec<f64> = sizes.into_iter().map(|s| s.max(0.0)).collect();
        // Every step of a walk must make progress: gap + size > 0 for all items.
        for (index, size) in sizes.iter().enumerate() {
            let stride = tunables.gap + size;
            if stride <= 0.0 {
                return Err(CarouselError::DegenerateLayout { index, stride });
            }
        }
        if let Some(uniform) = tunables.uniform_item_size() {
            if uniform + tunables.gap <= 0.0 {
                return Err(CarouselError::DegenerateLayout {
                    index: 0,
                    stride: uniform + tunables.gap,
                });
            }
        }
        self.container_size = container_size.max(0.0);
        self.gap = tunables.gap;
        self.snap_start = tunables.snap_start();
        self.item_size = tunables.uniform_item_size();
        self.offsets = vec![0.0; sizes.len()];
        self.sizes = sizes;
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    #[inline]
    pub fn align(&self) -> Align {
        self.align
    }

    #[inline]
    pub fn loop_items(&self) -> bool {
        self.loop_items
    }

    #[inline]
    pub fn container_size(&self) -> f64 {
        self.container_size
    }

    #[inline]
    pub fn gap(&self) -> f64 {
        self.gap
    }

    #[inline]
    pub fn snap_start(&self) -> f64 {
        self.snap_start
    }

    /// Measured size of item `index` (wrapped), 0 when there are no items.
    #[inline]
    pub fn size(&self, index: i64) -> f64 {
        if self.sizes.is_empty() {
            return 0.0;
        }
        self.sizes[wrap_index(index, self.sizes.len())]
    }

    /// Signed distance travelled when the item at `index` is replaced by its
    /// neighbour `index - dir` at the snap anchor. `dir` is +1 or -1.
    pub fn distance_to_neighbor(&self, index: i64, dir: i64) -> f64 {
        let d = dir as f64;
        match self.align {
            Align::Center => {
                let curr_half = self.size(index) / 2.0;
                let next_half = self.size(index - dir) / 2.0;
                d * (self.gap + curr_half + next_half)
            }
            Align::Start => d * (self.gap + self.size(index - dir.max(0))),
        }
    }

    /// Signed travel needed to bring `index` to the snap anchor from `active`,
    /// along the shorter way round (loop mode) or the direct way (bounded).
    pub fn closest_distance(&self, active: usize, index: usize) -> f64 {
        let n = self.len() as i64;
        if n == 0 {
            return 0.0;
        }
        let (a, i) = (active as i64, index as i64);
        let delta = if self.loop_items {
            let (forward, backward) = if a > i {
                (i + n - a, i - a)
            } else {
                (i - a, i - n - a)
            };
            if forward.abs() < backward.abs() {
                forward
            } else {
                backward
            }
        } else {
            i - a
        };
        let step = delta.signum();
        let mut distance = 0.0;
        let mut k = 0;
        while k != delta {
            distance += self.distance_to_neighbor(a + k, -step);
            k += step;
        }
        distance
    }

    /// Rebuild the offset map relative to `active`.
    pub fn calculate_item_offsets(&mut self, active: usize) {
        let n = self.len();
        self.offsets.clear();
        self.offsets.resize(n, 0.0);
        if n == 0 {
            return;
        }
        let active = active.min(n - 1);
        if let Some(size) = self.item_size {
            for i in 0..n {
                self.offsets[i] = (active as f64 - i as f64) * (size + self.gap);
            }
            return;
        }
        // Offset of the active item is 0 by definition; build outward.
        for i in (0..active).rev() {
            let inner = i as i64 + 1;
            self.offsets[i] = self.offsets[i + 1] + self.distance_to_neighbor(inner, 1);
        }
        for i in active + 1..n {
            let inner = i as i64 - 1;
            self.offsets[i] = self.offsets[i - 1] + self.distance_to_neighbor(inner, -1);
        }
    }

    #[inline]
    pub fn item_offset(&self, index: usize) -> f64 {
        self.offsets.get(index).copied().unwrap_or(0.0)
    }

    pub fn item_position(&self, index: usize, offset: f64) -> ItemPosition {
        let size = self.size(index as i64);
        let pos = offset + self.snap_start - self.item_offset(index);
        match self.align {
            Align::Center => ItemPosition {
                start: pos - size / 2.0,
                end: pos + size / 2.0,
            },
            Align::Start => ItemPosition {
                start: pos,
                end: pos + size,
            },
        }
    }

    /// Place every visible item, walking outward from `active`.
    ///
    /// `previous` is the visible set of the last pass; anything in it that is
    /// not visible now is reported in [`Placement::cleared`].
    pub fn position_items(
        &self,
        active: usize,
        offset: f64,
        previous: &BTreeSet<usize>,
    ) -> Result<Placement, CarouselError> {
        let mut placement = Placement::default();
        if self.is_empty() {
            placement.cleared = previous.iter().copied().collect();
            return Ok(placement);
        }
        let n = self.len() as i64;
        let ItemPosition { start, end } = self.item_position(active, offset);
        self.place(&mut placement, active, start, end)?;

        // Walk towards the container end.
        let mut index = active as i64 + 1;
        let mut start_edge = end + self.gap;
        let mut guard = 0usize;
        while start_edge < self.container_size {
            if !self.loop_items && index >= n {
                break;
            }
            let i = wrap_index(index, self.len());
            let end_edge = start_edge + self.size(index);
            self.place(&mut placement, i, start_edge, end_edge)?;
            index += 1;
            start_edge = end_edge + self.gap;
            guard += 1;
            if guard >= FAIL_SAFE_ITERATIONS {
                error!(
                    "[position_items] fail safe triggered walking right: active={active} offset={offset} index={index} start_edge={start_edge} container={} gap={} items={}",
                    self.container_size,
                    self.gap,
                    self.len()
                );
                break;
            }
        }

        // Walk towards the container start.
        let mut index = active as i64 - 1;
        let mut end_edge = start - self.gap;
        let mut guard = 0usize;
        while end_edge > 0.0 {
            if !self.loop_items && index < 0 {
                break;
            }
            let i = wrap_index(index, self.len());
            let start_edge = end_edge - self.size(index);
            self.place(&mut placement, i, start_edge, end_edge)?;
            index -= 1;
            end_edge = start_edge - self.gap;
            guard += 1;
            if guard >= FAIL_SAFE_ITERATIONS {
                error!(
                    "[position_items] fail safe triggered walking left: active={active} offset={offset} index={index} end_edge={end_edge} container={} gap={} items={}",
                    self.container_size,
                    self.gap,
                    self.len()
                );
                break;
            }
        }

        placement.cleared = previous
            .iter()
            .filter(|i| !placement.visible.contains(i))
            .copied()
            .collect();
        Ok(placement)
    }

    fn place(
        &self,
        placement: &mut Placement,
        index: usize,
        start: f64,
        end: f64,
    ) -> Result<(), CarouselError> {
        let visible = start < self.container_size && end > 0.0;
        if !visible {
            return Ok(());
        }
        if !placement.visible.insert(index) {
            error!(
                "[position_items] item {index} positioned twice (start={start} end={end} container={} items={})",
                self.container_size,
                self.len()
            );
            return Err(CarouselError::DuplicatePlacement { index });
        }
        placement.placed.push((index, start));
        Ok(())
    }
}
