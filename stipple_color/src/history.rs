// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke-grained undo/redo stacks.

use alloc::vec::Vec;

use crate::Rgb8;

/// One undoable unit: the indices a stroke touched and their colors as they
/// were immediately before the stroke.
///
/// Entries never snapshot whole buffers — only the touched indices.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    pub(crate) indices: Vec<usize>,
    pub(crate) colors: Vec<Rgb8>,
}

impl HistoryEntry {
    /// The point indices this entry covers.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of points covered.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the entry covers no points.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Undo and redo stacks of [`HistoryEntry`] values.
///
/// The redo stack is cleared whenever a new stroke commits; entries are
/// popped and re-pushed in strict stack order.
#[derive(Clone, Debug, Default)]
pub struct History {
    pub(crate) undo: Vec<HistoryEntry>,
    pub(crate) redo: Vec<HistoryEntry>,
}

impl History {
    /// Create empty stacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries available to undo.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Number of entries available to redo.
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Drop both stacks.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}
