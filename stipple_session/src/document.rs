// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The loaded cloud: positions, spatial index, color layers.

use alloc::vec::Vec;

use glam::DVec3;

use stipple_color::{ColorLayers, Rgb8};
use stipple_index::backends::Grid;
use stipple_index::{Aabb3, PointIndex, PointIndexGeneric};

/// The index type documents build: a grid over f64 positions.
pub type CloudIndex = PointIndexGeneric<f64, Grid<f64>>;

/// Where the reference colors came from at load time.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OriginalSource {
    /// A paired pristine file with a matching point count.
    PairedFile,
    /// The annotated file's own colors; used when no original was supplied
    /// or the supplied buffer's length did not match the point count
    /// (misaligned originals are rejected rather than applied by index).
    AnnotatedFallback,
}

/// One loaded point cloud with everything the annotation engine needs.
///
/// Positions are immutable after load; navigation replaces the whole
/// document, which atomically replaces the index and all three color
/// buffers together.
#[derive(Debug)]
pub struct CloudDocument {
    positions: Vec<DVec3>,
    index: CloudIndex,
    layers: ColorLayers,
    original_source: OriginalSource,
}

impl CloudDocument {
    /// Build a document from loaded arrays.
    ///
    /// `annotated` colors default to black when absent (or length-mismatched,
    /// which is treated as absent). `original` colors are installed only
    /// when their length matches the point count; otherwise the annotated
    /// colors double as originals — never misalign buffers by index.
    pub fn new(
        positions: Vec<DVec3>,
        annotated: Option<Vec<Rgb8>>,
        original: Option<Vec<Rgb8>>,
    ) -> Self {
        let n = positions.len();
        let annotated = match annotated {
            Some(colors) if colors.len() == n => colors,
            _ => alloc::vec![Rgb8::BLACK; n],
        };

        let pts: Vec<[f64; 3]> = positions.iter().map(|p| p.to_array()).collect();
        let index = PointIndex::with_auto_grid(&pts);

        let mut layers = ColorLayers::new(annotated);
        let mut original_source = OriginalSource::AnnotatedFallback;
        if let Some(colors) = original
            && layers.set_original(colors).is_ok()
        {
            original_source = OriginalSource::PairedFile;
        }

        Self {
            positions,
            index,
            layers,
            original_source,
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the cloud has no points.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The immutable point positions.
    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    /// The spatial index over the positions.
    pub fn index(&self) -> &CloudIndex {
        &self.index
    }

    /// The cloud's axis-aligned bounds, or `None` when empty.
    pub fn bounds(&self) -> Option<&Aabb3<f64>> {
        self.index.bounds()
    }

    /// The color layers.
    pub fn layers(&self) -> &ColorLayers {
        &self.layers
    }

    /// Mutable access to the color layers.
    pub fn layers_mut(&mut self) -> &mut ColorLayers {
        &mut self.layers
    }

    /// Where the reference colors came from.
    pub fn original_source(&self) -> OriginalSource {
        self.original_source
    }

    /// Split borrows for brush stamping: the index and positions stay
    /// shared while the layers are mutated.
    pub(crate) fn parts_mut(&mut self) -> (&CloudIndex, &[DVec3], &mut ColorLayers) {
        (&self.index, &self.positions, &mut self.layers)
    }

    /// The color buffer to persist; see
    /// [`ColorLayers::save_colors`][stipple_color::ColorLayers::save_colors].
    pub fn save_colors(&self, bake_enhancement: bool) -> Vec<Rgb8> {
        self.layers.save_colors(bake_enhancement)
    }
}
