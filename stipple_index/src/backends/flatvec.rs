// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector backend with linear scans.

use alloc::vec::Vec;

use crate::backend::Backend;
use crate::types::{Scalar, dist2};

/// Flat vector backend: every query scans all slots.
///
/// Smallest possible implementation; useful for tiny clouds and as a
/// reference oracle for other backends.
#[derive(Clone, Debug, Default)]
pub struct FlatVec<T> {
    slots: Vec<Option<(T, T, T)>>,
}

impl<T: Scalar> FlatVec<T> {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    fn ensure_slot(&mut self, slot: usize) {
        if self.slots.len() <= slot {
            self.slots.resize_with(slot + 1, || None);
        }
    }
}

impl<T: Scalar> Backend<T> for FlatVec<T> {
    fn reserve(&mut self, n: usize) {
        self.slots.reserve(n);
    }

    fn insert(&mut self, slot: usize, x: T, y: T, z: T) {
        self.ensure_slot(slot);
        self.slots[slot] = Some((x, y, z));
    }

    fn clear(&mut self) {
        self.slots.clear();
    }

    fn visit_sphere<F: FnMut(usize)>(&self, cx: T, cy: T, cz: T, radius: T, mut f: F) {
        let r = T::max(radius, T::zero());
        let r2 = T::widen(r) * T::widen(r);
        for (slot, entry) in self.slots.iter().enumerate() {
            if let Some((x, y, z)) = *entry
                && dist2(x, y, z, cx, cy, cz) <= r2
            {
                f(slot);
            }
        }
    }
}
