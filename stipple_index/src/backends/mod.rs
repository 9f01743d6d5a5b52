// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend implementations for different spatial strategies.
//!
//! - `flatvec`: flat vector with linear scans (small, simple).
//! - `grid` (feature `backend_grid`): uniform 3D grid with configurable cell size.
//!
//! Grid note
//! ---------
//! Unlike a box index, every point occupies exactly one grid cell, so sphere
//! queries never need per-slot deduplication: we walk the cells overlapping
//! the sphere's AABB and distance-test each resident point once.

pub(crate) mod flatvec;
#[cfg(feature = "backend_grid")]
pub(crate) mod grid;

pub use flatvec::FlatVec;
#[cfg(feature = "backend_grid")]
pub use grid::{Grid, GridF32, GridF64, GridScalar};
