// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for spatial indexing implementations.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::types::Scalar;

/// Spatial backend abstraction used by [`PointIndexGeneric`][crate::PointIndexGeneric].
///
/// Backends store points by slot and answer sphere queries. The index builds
/// the backend once per cloud load; there is no removal or update.
pub trait Backend<T: Scalar> {
    /// Reserve space for at least `n` slots.
    fn reserve(&mut self, n: usize);

    /// Insert a point into the spatial structure.
    fn insert(&mut self, slot: usize, x: T, y: T, z: T);

    /// Clear all spatial structures.
    fn clear(&mut self);

    /// Visit slots whose point lies within `radius` of the center (inclusive).
    fn visit_sphere<F: FnMut(usize)>(&self, cx: T, cy: T, cz: T, radius: T, f: F);

    /// Query slots whose point lies within `radius` of the center (inclusive).
    ///
    /// The default implementation collects [`visit_sphere`][Backend::visit_sphere].
    fn query_sphere<'a>(
        &'a self,
        cx: T,
        cy: T,
        cz: T,
        radius: T,
    ) -> Box<dyn Iterator<Item = usize> + 'a> {
        let mut out = Vec::new();
        self.visit_sphere(cx, cy, cz, radius, |i| out.push(i));
        Box::new(out.into_iter())
    }
}
