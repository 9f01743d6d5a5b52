// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The three-buffer color model and its compositing rules.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use kurbo::common::FloatFuncs as _;

use crate::history::{History, HistoryEntry};
use crate::{Rgb8, tone};

/// Below this alpha the annotation layer is treated as fully transparent.
const ALPHA_OFF: f64 = 0.001;
/// Above this alpha the annotation layer is treated as fully opaque.
///
/// The short-circuits avoid float blend error at the boundaries: at alpha 1
/// an edited point shows exactly its edited color, bit for bit.
const ALPHA_FULL: f64 = 0.999;

/// What a paint operation writes into the edited buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PaintSource {
    /// Write this color (normal painting).
    Color(Rgb8),
    /// Restore each point's original color (eraser, repair, clone).
    Original,
}

/// A supplied buffer did not match the cloud's point count.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BufferLengthError {
    /// The cloud's point count.
    pub expected: usize,
    /// The supplied buffer's length.
    pub actual: usize,
}

impl fmt::Display for BufferLengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "buffer length {} does not match point count {}",
            self.actual, self.expected
        )
    }
}

impl core::error::Error for BufferLengthError {}

/// The layered color state of one loaded cloud.
///
/// Owns the `original`/`enhancement`/`edited` buffers, the session dirty
/// mask, the annotation display controls, and the undo/redo history. All
/// buffers have the same length; a new cloud means a new `ColorLayers`.
#[derive(Clone, Debug)]
pub struct ColorLayers {
    original: Vec<Rgb8>,
    enhancement: Vec<Rgb8>,
    edited: Vec<Rgb8>,
    /// Points touched this session. Gates UI affordances only; "has unsaved
    /// edits" is always recomputed from the buffers.
    session_dirty: Vec<bool>,
    alpha: f64,
    annotations_visible: bool,
    history: History,
    /// Full snapshot of `edited` taken at stroke start; the rollback basis
    /// from which the stroke's single history entry is cut.
    stroke_basis: Option<Vec<Rgb8>>,
}

impl ColorLayers {
    /// Create the layers for a freshly loaded cloud.
    ///
    /// `annotated` is the color buffer read from the annotated file (or all
    /// black when the file carries none). Until [`set_original`][Self::set_original]
    /// supplies a pristine buffer, the annotated colors double as the
    /// originals.
    pub fn new(annotated: Vec<Rgb8>) -> Self {
        let original = annotated.clone();
        let enhancement = original.clone();
        let n = annotated.len();
        Self {
            original,
            enhancement,
            edited: annotated,
            session_dirty: vec![false; n],
            alpha: 1.0,
            annotations_visible: true,
            history: History::new(),
            stroke_basis: None,
        }
    }

    /// Install a pristine original buffer loaded from a paired file.
    ///
    /// Rejected when the length does not match the point count; the caller
    /// should keep the annotated-as-original fallback rather than misalign
    /// arrays by index. Resets the enhancement to the new originals.
    pub fn set_original(&mut self, original: Vec<Rgb8>) -> Result<(), BufferLengthError> {
        if original.len() != self.edited.len() {
            return Err(BufferLengthError {
                expected: self.edited.len(),
                actual: original.len(),
            });
        }
        self.enhancement = original.clone();
        self.original = original;
        Ok(())
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.edited.len()
    }

    /// Whether the cloud has no points.
    pub fn is_empty(&self) -> bool {
        self.edited.is_empty()
    }

    /// The reference colors.
    pub fn original(&self) -> &[Rgb8] {
        &self.original
    }

    /// The contrast-enhanced view of the originals.
    pub fn enhancement(&self) -> &[Rgb8] {
        &self.enhancement
    }

    /// The annotation layer (what gets saved).
    pub fn edited(&self) -> &[Rgb8] {
        &self.edited
    }

    /// The per-point session dirty mask.
    pub fn session_dirty(&self) -> &[bool] {
        &self.session_dirty
    }

    /// Whether any point was touched this session.
    pub fn any_session_dirty(&self) -> bool {
        self.session_dirty.iter().any(|&d| d)
    }

    /// The annotation blend alpha.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Set the annotation blend alpha, clamped to `[0, 1]`.
    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    /// Whether annotations are drawn at all.
    pub fn annotations_visible(&self) -> bool {
        self.annotations_visible
    }

    /// Show or hide the annotation layer.
    pub fn set_annotations_visible(&mut self, visible: bool) {
        self.annotations_visible = visible;
    }

    /// The undo/redo stacks.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Whether the edited buffer differs from the originals anywhere.
    ///
    /// Recomputed elementwise on every call: after an undo that restores the
    /// last remaining edit, this goes back to `false` without any cached
    /// state to invalidate.
    pub fn has_edits(&self) -> bool {
        self.edited
            .iter()
            .zip(&self.original)
            .any(|(e, o)| e != o)
    }

    /// Whether point `i` currently differs from its original color.
    pub fn is_edited(&self, i: usize) -> bool {
        match (self.edited.get(i), self.original.get(i)) {
            (Some(e), Some(o)) => e != o,
            _ => false,
        }
    }

    /// Write `source` into the edited buffer at `indices`.
    ///
    /// Marks the session dirty bits. Does not touch history: callers bracket
    /// whole strokes with [`begin_stroke`][Self::begin_stroke] /
    /// [`commit_stroke`][Self::commit_stroke] so one gesture collapses into
    /// one undo entry. Out-of-range indices are ignored.
    pub fn apply(&mut self, indices: &[usize], source: PaintSource) {
        for &i in indices {
            if i >= self.edited.len() {
                continue;
            }
            self.edited[i] = match source {
                PaintSource::Color(c) => c,
                PaintSource::Original => self.original[i],
            };
            self.session_dirty[i] = true;
        }
    }

    /// Snapshot the edited buffer as the rollback basis of a new stroke.
    pub fn begin_stroke(&mut self) {
        self.stroke_basis = Some(self.edited.clone());
    }

    /// Whether a stroke basis is currently held.
    pub fn stroke_in_progress(&self) -> bool {
        self.stroke_basis.is_some()
    }

    /// Commit the in-flight stroke as a single history entry covering
    /// `indices`, discarding the full-buffer snapshot.
    ///
    /// Clears the redo stack. Returns `false` (and records nothing) when no
    /// stroke was begun or the index set is empty.
    pub fn commit_stroke(&mut self, indices: &[usize]) -> bool {
        let Some(basis) = self.stroke_basis.take() else {
            return false;
        };
        let kept: Vec<usize> = indices.iter().copied().filter(|&i| i < basis.len()).collect();
        if kept.is_empty() {
            return false;
        }
        let colors = kept.iter().map(|&i| basis[i]).collect();
        self.history.undo.push(HistoryEntry {
            indices: kept,
            colors,
        });
        self.history.redo.clear();
        true
    }

    /// Abandon the in-flight stroke without recording history.
    ///
    /// Whatever the stroke already wrote into `edited` stays written; this
    /// mirrors the long-standing behavior of pointer-leaves-viewport and is
    /// deliberate, not an oversight.
    pub fn cancel_stroke(&mut self) {
        self.stroke_basis = None;
    }

    /// Undo the most recent history entry.
    ///
    /// Swaps the recorded colors back into `edited`, pushes the inverse onto
    /// the redo stack, and returns the affected indices so callers can
    /// recomposite incrementally. No-op on an empty stack.
    ///
    /// The session dirty mask is untouched: touched-ness is monotonic within
    /// a session, and replaying history does not un-touch a point any more
    /// than erasing it does. "Has unsaved edits" is always recomputed from
    /// the buffers instead.
    pub fn undo(&mut self) -> Option<Vec<usize>> {
        let entry = self.history.undo.pop()?;
        let current: Vec<Rgb8> = entry.indices.iter().map(|&i| self.edited[i]).collect();
        for (&i, &c) in entry.indices.iter().zip(&entry.colors) {
            self.edited[i] = c;
        }
        let affected = entry.indices.clone();
        self.history.redo.push(HistoryEntry {
            indices: entry.indices,
            colors: current,
        });
        Some(affected)
    }

    /// Redo the most recently undone entry.
    ///
    /// Exact inverse of [`undo`][Self::undo]. No-op on an empty stack.
    pub fn redo(&mut self) -> Option<Vec<usize>> {
        let entry = self.history.redo.pop()?;
        let current: Vec<Rgb8> = entry.indices.iter().map(|&i| self.edited[i]).collect();
        for (&i, &c) in entry.indices.iter().zip(&entry.colors) {
            self.edited[i] = c;
        }
        let affected = entry.indices.clone();
        self.history.undo.push(HistoryEntry {
            indices: entry.indices,
            colors: current,
        });
        Some(affected)
    }

    /// The display base: the enhancement when it is current, otherwise the
    /// originals (a stale or absent enhancement must never misalign).
    fn base(&self) -> &[Rgb8] {
        if self.enhancement.len() == self.original.len() {
            &self.enhancement
        } else {
            &self.original
        }
    }

    /// The display color of point `i` under the current controls.
    fn display_color(&self, i: usize) -> Rgb8 {
        let base = self.base()[i];
        if !self.annotations_visible || self.alpha <= ALPHA_OFF {
            return base;
        }
        if self.edited[i] == self.original[i] {
            return base;
        }
        if self.alpha >= ALPHA_FULL {
            return self.edited[i];
        }
        blend(self.edited[i], base, self.alpha)
    }

    /// Compute the full display buffer.
    pub fn composite(&self) -> Vec<Rgb8> {
        (0..self.len()).map(|i| self.display_color(i)).collect()
    }

    /// Compute display colors for a subset of points, for incremental
    /// redraw during a stroke. Out-of-range indices are skipped.
    pub fn composite_subset(&self, indices: &[usize]) -> Vec<(usize, Rgb8)> {
        indices
            .iter()
            .copied()
            .filter(|&i| i < self.len())
            .map(|i| (i, self.display_color(i)))
            .collect()
    }

    /// Recompute the enhancement with a gamma tone curve over the originals.
    ///
    /// Only unedited points' displayed colors change; edited points always
    /// show their edited color.
    pub fn set_enhancement_gamma(&mut self, gamma: f64) {
        self.enhancement = tone::gamma_curve(&self.original, gamma);
    }

    /// Recompute the enhancement with percentile auto-contrast over the
    /// originals.
    pub fn set_enhancement_auto_contrast(&mut self) {
        self.enhancement = tone::auto_contrast(&self.original);
    }

    /// Reset the enhancement to the plain originals.
    pub fn reset_enhancement(&mut self) {
        self.enhancement = self.original.clone();
    }

    /// The buffer to persist.
    ///
    /// Always the edited layer; with `bake_enhancement`, points that were
    /// never edited are written out with the enhancement applied instead of
    /// their raw originals.
    pub fn save_colors(&self, bake_enhancement: bool) -> Vec<Rgb8> {
        let mut out = self.edited.clone();
        if bake_enhancement {
            let base = self.base();
            for i in 0..out.len() {
                if self.edited[i] == self.original[i] {
                    out[i] = base[i];
                }
            }
        }
        out
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Blend inputs are in [0, 255] by construction; the rounded result fits u8."
)]
fn blend(fg: Rgb8, bg: Rgb8, alpha: f64) -> Rgb8 {
    let ch = |f: u8, b: u8| -> u8 {
        (alpha * f64::from(f) + (1.0 - alpha) * f64::from(b)).round() as u8
    };
    Rgb8::new(ch(fg.r, bg.r), ch(fg.g, bg.g), ch(fg.b, bg.b))
}
