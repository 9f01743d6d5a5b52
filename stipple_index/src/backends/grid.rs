// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform grid backend for 3D points.
//!
//! This backend buckets points into fixed-size grid cells and answers sphere
//! queries by touching only the cells overlapping the sphere's AABB. It is
//! intended for workloads with:
//! - moderately uniform spatial density (scanned or photogrammetric clouds),
//! - a build-once access pattern, and
//! - query radii that are small compared to the full cloud extent.

use alloc::vec::Vec;
use core::fmt::Debug;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::backend::Backend;
use crate::types::{Scalar, dist2};
use crate::util::icbrt_ceil;

/// Scalar types supported by the grid backend.
///
/// This is kept separate from [`Scalar`] so that the grid implementation can
/// use type-specific logic for cell mapping and cell-size heuristics.
pub trait GridScalar: Scalar {
    /// Map a scalar coordinate to a grid coordinate along one axis.
    ///
    /// The mapping is based on an origin and uniform cell size. Implementations
    /// are expected to be monotonic in `value` for fixed `origin` and
    /// `cell_size`.
    fn cell_coord(value: Self, origin: Self, cell_size: Self) -> i32;

    /// Derive a cell size from a cloud's bounding diagonal and point count.
    ///
    /// The heuristic targets a handful of points per cell for uniformly
    /// distributed clouds while keeping the cell count bounded.
    fn auto_cell_size(diagonal: Self, len: usize) -> Self;
}

impl GridScalar for f32 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Grid cell indices are intentionally i32; out-of-range values are saturated."
    )]
    #[inline]
    fn cell_coord(value: Self, origin: Self, cell_size: Self) -> i32 {
        debug_assert!(
            cell_size > 0.0,
            "grid cell_size must be strictly positive (f32)"
        );
        let t = (value - origin) / cell_size;
        if t >= i32::MAX as Self {
            return i32::MAX;
        }
        if t <= i32::MIN as Self {
            return i32::MIN;
        }
        let coord = t as i32;

        // Round towards -∞ (the cast above has already truncated).
        if t < 0.0 && (coord as Self) > t {
            coord.saturating_sub(1)
        } else {
            coord
        }
    }

    #[allow(
        clippy::cast_precision_loss,
        reason = "The heuristic only needs a rough magnitude."
    )]
    #[inline]
    fn auto_cell_size(diagonal: Self, len: usize) -> Self {
        if !(diagonal > 0.0) {
            return 1.0;
        }
        let k = icbrt_ceil(len.max(1)) as Self;
        diagonal * 4.0 / k
    }
}

impl GridScalar for f64 {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Grid cell indices are intentionally i32; out-of-range values are saturated."
    )]
    #[inline]
    fn cell_coord(value: Self, origin: Self, cell_size: Self) -> i32 {
        debug_assert!(
            cell_size > 0.0,
            "grid cell_size must be strictly positive (f64)"
        );
        let t = (value - origin) / cell_size;
        if t >= Self::from(i32::MAX) {
            return i32::MAX;
        }
        if t <= Self::from(i32::MIN) {
            return i32::MIN;
        }
        let coord = t as i32;

        // Round towards -∞ (the cast above has already truncated).
        if t < 0.0 && Self::from(coord) > t {
            coord.saturating_sub(1)
        } else {
            coord
        }
    }

    #[allow(
        clippy::cast_precision_loss,
        reason = "The heuristic only needs a rough magnitude."
    )]
    #[inline]
    fn auto_cell_size(diagonal: Self, len: usize) -> Self {
        if !(diagonal > 0.0) {
            return 1.0;
        }
        let k = icbrt_ceil(len.max(1)) as Self;
        diagonal * 4.0 / k
    }
}

/// Uniform 3D grid backend with fixed cell size.
pub struct Grid<T: GridScalar> {
    cell_size: T,
    origin_x: T,
    origin_y: T,
    origin_z: T,
    cells: HashMap<(i32, i32, i32), Cell>,
    slots: Vec<Option<(T, T, T)>>,
}

#[derive(Default)]
struct Cell {
    slots: SmallVec<[usize; 8]>,
}

impl<T: GridScalar> Debug for Grid<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total_slots = self.slots.len();
        let live_slots = self.slots.iter().filter(|s| s.is_some()).count();
        let num_cells = self.cells.len();
        f.debug_struct("Grid")
            .field("cell_size", &self.cell_size)
            .field("origin_x", &self.origin_x)
            .field("origin_y", &self.origin_y)
            .field("origin_z", &self.origin_z)
            .field("total_slots", &total_slots)
            .field("live_slots", &live_slots)
            .field("cells", &num_cells)
            .finish_non_exhaustive()
    }
}

impl<T: GridScalar> Grid<T> {
    /// Create a new grid backend with the given cell size and origin at (0, 0, 0).
    pub fn new(cell_size: T) -> Self {
        debug_assert!(cell_size > T::zero(), "cell_size must be strictly positive");
        Self {
            cell_size,
            origin_x: T::zero(),
            origin_y: T::zero(),
            origin_z: T::zero(),
            cells: HashMap::new(),
            slots: Vec::new(),
        }
    }

    /// Create a new grid backend with the given cell size and origin.
    pub fn with_origin(cell_size: T, origin_x: T, origin_y: T, origin_z: T) -> Self {
        debug_assert!(cell_size > T::zero(), "cell_size must be strictly positive");
        Self {
            cell_size,
            origin_x,
            origin_y,
            origin_z,
            cells: HashMap::new(),
            slots: Vec::new(),
        }
    }

    /// The configured cell size.
    ///
    /// Higher layers use this as a step-size hint when marching rays across
    /// the grid.
    pub fn cell_size(&self) -> T {
        self.cell_size
    }

    fn ensure_slot(&mut self, slot: usize) {
        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, || None);
        }
    }

    fn cell_of(&self, x: T, y: T, z: T) -> (i32, i32, i32) {
        (
            T::cell_coord(x, self.origin_x, self.cell_size),
            T::cell_coord(y, self.origin_y, self.cell_size),
            T::cell_coord(z, self.origin_z, self.cell_size),
        )
    }

    fn cell_range(&self, min: T, max: T, origin: T) -> (i32, i32) {
        let c0 = T::cell_coord(min, origin, self.cell_size);
        let c1 = T::cell_coord(max, origin, self.cell_size);
        if c0 <= c1 { (c0, c1) } else { (c1, c0) }
    }
}

impl<T: GridScalar> Backend<T> for Grid<T> {
    fn reserve(&mut self, n: usize) {
        self.slots.reserve(n);
    }

    fn insert(&mut self, slot: usize, x: T, y: T, z: T) {
        self.ensure_slot(slot);
        let cell = self.cell_of(x, y, z);
        self.cells.entry(cell).or_default().slots.push(slot);
        self.slots[slot] = Some((x, y, z));
    }

    fn clear(&mut self) {
        self.cells.clear();
        self.slots.clear();
    }

    fn visit_sphere<F: FnMut(usize)>(&self, cx: T, cy: T, cz: T, radius: T, mut f: F) {
        let r = T::max(radius, T::zero());
        let r2 = T::widen(r) * T::widen(r);

        let (ix0, ix1) = self.cell_range(T::sub(cx, r), T::add(cx, r), self.origin_x);
        let (iy0, iy1) = self.cell_range(T::sub(cy, r), T::add(cy, r), self.origin_y);
        let (iz0, iz1) = self.cell_range(T::sub(cz, r), T::add(cz, r), self.origin_z);

        for ix in ix0..=ix1 {
            for iy in iy0..=iy1 {
                for iz in iz0..=iz1 {
                    let Some(cell) = self.cells.get(&(ix, iy, iz)) else {
                        continue;
                    };
                    for &slot in &cell.slots {
                        let (x, y, z) = self.slots[slot]
                            .expect("grid invariant violated: cell references vacant slot");
                        if dist2(x, y, z, cx, cy, cz) <= r2 {
                            f(slot);
                        }
                    }
                }
            }
        }
    }
}

/// Grid backend over `f32` coordinates.
pub type GridF32 = Grid<f32>;
/// Grid backend over `f64` coordinates.
pub type GridF64 = Grid<f64>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn insert_and_query_across_cells() {
        let mut grid: GridF64 = GridF64::new(1.0);
        grid.insert(0, 0.1, 0.1, 0.1);
        grid.insert(1, 2.5, 0.1, 0.1);
        grid.insert(2, 0.1, 0.1, 3.5);

        let mut hits = Vec::new();
        grid.visit_sphere(0.0, 0.0, 0.0, 0.5, |s| hits.push(s));
        assert_eq!(hits, vec![0]);

        hits.clear();
        grid.visit_sphere(0.0, 0.0, 0.0, 4.0, |s| hits.push(s));
        hits.sort_unstable();
        assert_eq!(hits, vec![0, 1, 2]);
    }

    #[test]
    fn negative_coordinates() {
        let mut grid: GridF64 = GridF64::new(10.0);
        grid.insert(0, -25.0, -25.0, -25.0);
        let mut hits = Vec::new();
        grid.visit_sphere(-24.0, -25.0, -25.0, 2.0, |s| hits.push(s));
        assert_eq!(hits, vec![0]);
    }

    #[test]
    fn each_point_reported_once() {
        // A query sphere spanning many cells must still report each resident
        // point exactly once (single cell membership).
        let mut grid: GridF32 = GridF32::new(0.5);
        grid.insert(7, 1.0, 1.0, 1.0);
        let mut hits = Vec::new();
        grid.visit_sphere(1.0, 1.0, 1.0, 5.0, |s| hits.push(s));
        assert_eq!(hits, vec![7]);
    }

    #[test]
    fn cell_coord_saturates() {
        assert_eq!(GridScalar::cell_coord(1e20_f32, 0.0, 1.0), i32::MAX);
        assert_eq!(GridScalar::cell_coord(-1e20_f32, 0.0, 1.0), i32::MIN);
        assert_eq!(GridScalar::cell_coord(1e20_f64, 0.0, 1.0), i32::MAX);
        assert_eq!(GridScalar::cell_coord(-1e20_f64, 0.0, 1.0), i32::MIN);
    }

    #[test]
    fn cell_coord_rounds_toward_negative_infinity() {
        assert_eq!(GridScalar::cell_coord(-0.5_f64, 0.0, 1.0), -1);
        assert_eq!(GridScalar::cell_coord(0.5_f64, 0.0, 1.0), 0);
        assert_eq!(GridScalar::cell_coord(-1.0_f64, 0.0, 1.0), -1);
    }

    #[test]
    fn auto_cell_size_positive() {
        assert!(GridScalar::auto_cell_size(10.0_f64, 1_000_000) > 0.0);
        assert!(GridScalar::auto_cell_size(0.0_f64, 100) > 0.0);
        assert!(GridScalar::auto_cell_size(10.0_f32, 0) > 0.0);
    }
}
