// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `PointIndex` API and generic implementation over a pluggable backend.

use alloc::vec::Vec;

use crate::backend::Backend;
use crate::backends::FlatVec;
use crate::types::{Aabb3, Scalar};

/// A static point index parameterized by a spatial backend.
///
/// Built once from a slice of points and immutable afterwards. The index
/// size always equals the point count of the cloud it was built from; a new
/// cloud means a new index.
#[derive(Debug)]
pub struct PointIndexGeneric<T: Scalar, B: Backend<T>> {
    len: usize,
    bounds: Option<Aabb3<T>>,
    backend: B,
}

impl<T: Scalar, B: Backend<T>> PointIndexGeneric<T, B> {
    /// Build an index over `points` using an explicit backend instance.
    ///
    /// This is useful when higher layers want to choose a backend type or
    /// configure it before wiring it into the index.
    pub fn with_backend(points: &[[T; 3]], mut backend: B) -> Self {
        backend.clear();
        backend.reserve(points.len());
        let mut bounds: Option<Aabb3<T>> = None;
        for (slot, p) in points.iter().enumerate() {
            let [x, y, z] = *p;
            backend.insert(slot, x, y, z);
            match &mut bounds {
                Some(b) => b.union_point(x, y, z),
                None => bounds = Some(Aabb3::from_point(x, y, z)),
            }
        }
        Self {
            len: points.len(),
            bounds,
            backend,
        }
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the index holds no points.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Axis-aligned bounds of the indexed points, or `None` for an empty
    /// index.
    pub fn bounds(&self) -> Option<&Aabb3<T>> {
        self.bounds.as_ref()
    }

    /// Access the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Visit indices of points within `radius` of the center (inclusive).
    ///
    /// Does not allocate result storage. An empty index visits nothing; this
    /// is a defined result, not an error, since a query may race a load.
    pub fn visit_sphere<F: FnMut(usize)>(&self, cx: T, cy: T, cz: T, radius: T, f: F) {
        self.backend.visit_sphere(cx, cy, cz, radius, f);
    }

    /// Collect indices of points within `radius` of the center (inclusive).
    pub fn query_sphere(&self, cx: T, cy: T, cz: T, radius: T) -> Vec<usize> {
        let mut out = Vec::new();
        self.visit_sphere(cx, cy, cz, radius, |i| out.push(i));
        out
    }
}

/// Default index using a flat vector backend.
pub type PointIndex<T> = PointIndexGeneric<T, FlatVec<T>>;

impl<T: Scalar> PointIndex<T> {
    /// Build a linear-scan index over `points`.
    pub fn new(points: &[[T; 3]]) -> Self {
        Self::with_backend(points, FlatVec::new())
    }
}

#[cfg(feature = "backend_grid")]
mod grid_ctors {
    use super::{Aabb3, PointIndex, PointIndexGeneric, Scalar};
    use crate::backends::grid::{Grid, GridScalar};

    impl<T: GridScalar> PointIndex<T> {
        /// Build a grid-backed index over `points` with an explicit cell size.
        pub fn with_grid(points: &[[T; 3]], cell_size: T) -> PointIndexGeneric<T, Grid<T>> {
            PointIndexGeneric::with_backend(points, Grid::new(cell_size))
        }

        /// Build a grid-backed index over `points`, deriving the cell size
        /// from the cloud's bounding diagonal and point count.
        pub fn with_auto_grid(points: &[[T; 3]]) -> PointIndexGeneric<T, Grid<T>> {
            let diagonal = bounding_diagonal(points);
            let cell = T::auto_cell_size(diagonal, points.len());
            PointIndexGeneric::with_backend(points, Grid::new(cell))
        }
    }

    /// Largest per-axis extent of the points, used as the diagonal proxy for
    /// the cell-size heuristic. Avoids a square root so the crate stays free
    /// of float intrinsics.
    fn bounding_diagonal<T: Scalar>(points: &[[T; 3]]) -> T {
        let mut bounds: Option<Aabb3<T>> = None;
        for p in points {
            let [x, y, z] = *p;
            match &mut bounds {
                Some(b) => b.union_point(x, y, z),
                None => bounds = Some(Aabb3::from_point(x, y, z)),
            }
        }
        match bounds {
            Some(b) => {
                let [sx, sy, sz] = b.size();
                T::max(sx, T::max(sy, sz))
            }
            None => T::zero(),
        }
    }
}

impl<T: Scalar> Default for PointIndex<T> {
    fn default() -> Self {
        Self::new(&[])
    }
}
