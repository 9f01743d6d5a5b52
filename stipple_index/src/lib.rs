// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=stipple_index --heading-base-level=0

//! Stipple Index: a static 3D point index with radius queries.
//!
//! Stipple Index answers one question fast: *which points of a cloud lie
//! within a given distance of a given center?* It is the broad phase of the
//! brush pipeline — the narrow phase (exact screen-space coverage) lives in
//! higher layers.
//!
//! - Build once from a slice of points; the index is immutable afterwards and
//!   is rebuilt wholesale whenever a new cloud is loaded.
//! - Query by sphere, either collecting indices or visiting them with a
//!   closure (no result allocation).
//! - The index also accumulates the cloud's axis-aligned bounds during the
//!   build, since camera fitting consumes the same data.
//!
//! It is generic over the scalar type `T` and does not depend on any geometry
//! crate. Backends are pluggable via a simple trait so the spatial strategy
//! can be swapped without API churn. The default backend is a flat vector
//! (linear scan); a uniform grid backend (feature `backend_grid`, default)
//! buckets points into fixed-size cells.
//!
//! ## Features
//!
//! - `backend_grid` *(default)*: enables a uniform grid backend backed by
//!   `hashbrown`. Disable this feature to avoid the `hashbrown` dependency
//!   and grid types.
//!
//! # Example
//!
//! ```rust
//! use stipple_index::PointIndex;
//!
//! let points = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [10.0, 0.0, 0.0]];
//! let idx: PointIndex<f64> = PointIndex::new(&points);
//! assert_eq!(idx.len(), 3);
//!
//! // Both points near the origin are found, the far one is not.
//! let mut hits = idx.query_sphere(0.0, 0.0, 0.0, 1.5);
//! hits.sort_unstable();
//! assert_eq!(hits, vec![0, 1]);
//! ```
//!
//! With the `backend_grid` feature enabled (default) a grid-backed index can
//! be built with an explicit cell size:
//!
//! ```rust
//! # #[cfg(feature = "backend_grid")]
//! # {
//! use stipple_index::PointIndex;
//!
//! let points = [[0.0_f32, 0.0, 0.0], [0.5, 0.5, 0.0]];
//! let idx = PointIndex::with_grid(&points, 4.0);
//! assert_eq!(idx.query_sphere(0.0, 0.0, 0.0, 1.0).len(), 2);
//! # }
//! ```
//!
//! ## Choosing a backend
//!
//! - `FlatVec` (default type alias): simplest and smallest, linear scans.
//!   Good for very small clouds or for differential testing.
//! - `Grid` *(feature `backend_grid`)*: uniform grid with configurable cell
//!   size. The right choice for brush-sized queries against clouds of
//!   roughly uniform density; [`PointIndex::with_auto_grid`] derives a cell
//!   size from the cloud's bounding diagonal and point count.
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs for point coordinates. Debug builds may
//! assert. Distance tests use widened accumulator types (f32→f64) so squared
//! distances do not lose precision.

#![no_std]

extern crate alloc;

mod backend;
pub mod backends;
mod index;
mod types;
pub(crate) mod util;

pub use backend::Backend;
pub use index::{PointIndex, PointIndexGeneric};
pub use types::{Aabb3, Scalar, ScalarAcc};

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn build_and_query() {
        let points = [[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [5.0, 5.0, 5.0]];
        let idx: PointIndex<f64> = PointIndex::new(&points);
        assert_eq!(idx.len(), 3);

        let mut hits = idx.query_sphere(0.5, 0.5, 0.5, 1.0);
        hits.sort_unstable();
        assert_eq!(hits, vec![0, 1]);
    }

    #[test]
    fn empty_index_answers_empty() {
        let idx: PointIndex<f64> = PointIndex::new(&[]);
        assert!(idx.is_empty());
        assert!(idx.bounds().is_none());
        assert!(idx.query_sphere(0.0, 0.0, 0.0, 1e9).is_empty());
    }

    #[test]
    fn bounds_cover_all_points() {
        let points = [[-1.0, 2.0, 3.0], [4.0, -5.0, 6.0], [0.0, 0.0, 0.0]];
        let idx: PointIndex<f64> = PointIndex::new(&points);
        let b = idx.bounds().expect("non-empty cloud has bounds");
        for p in &points {
            assert!(b.contains_point(p[0], p[1], p[2]));
        }
    }

    #[cfg(feature = "backend_grid")]
    #[test]
    fn grid_and_flat_agree() {
        // A small lattice; results must match between backends.
        let mut points = alloc::vec::Vec::new();
        for x in 0..5 {
            for y in 0..5 {
                points.push([f64::from(x), f64::from(y), 0.0]);
            }
        }
        let flat: PointIndex<f64> = PointIndex::new(&points);
        let grid = PointIndex::with_grid(&points, 1.5);

        let mut a = flat.query_sphere(2.0, 2.0, 0.0, 1.2);
        let mut b = grid.query_sphere(2.0, 2.0, 0.0, 1.2);
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }
}
