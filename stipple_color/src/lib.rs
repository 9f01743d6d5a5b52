// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=stipple_color --heading-base-level=0

//! Stipple Color: the layered per-point color model for cloud annotation.
//!
//! A loaded cloud carries three parallel color buffers:
//!
//! - `original`: the reference colors, read-only after load. Loaded from a
//!   paired pristine file when one exists, otherwise copied from the
//!   annotated file itself.
//! - `enhancement`: a contrast-boosted view derived from `original` by a
//!   monotonic tone curve. Recomputed whenever the contrast controls change,
//!   never edited by the user.
//! - `edited`: the annotation layer. Starts as the annotated file's on-disk
//!   colors, is mutated by strokes and undo/redo, and is what gets saved.
//!
//! All three buffers stay in lockstep with the cloud identity: loading a new
//! cloud replaces the whole [`ColorLayers`] value.
//!
//! Display colors are composited on demand: unedited points show the
//! enhancement (contrast never destroys data — it only changes what is
//! drawn), edited points show the edited color blended over the base by the
//! annotation alpha.
//!
//! Undo is stroke-grained: a whole pointer-down-to-pointer-up gesture
//! collapses into one history entry snapshotting the pre-stroke colors of
//! exactly the touched indices.
//!
//! # Example
//!
//! ```rust
//! use stipple_color::{ColorLayers, PaintSource, Rgb8};
//!
//! let black = Rgb8::BLACK;
//! let red = Rgb8::new(255, 0, 0);
//!
//! let mut layers = ColorLayers::new(vec![black; 4]);
//! layers.begin_stroke();
//! layers.apply(&[0, 2], PaintSource::Color(red));
//! layers.commit_stroke(&[0, 2]);
//!
//! assert_eq!(layers.composite()[0], red);
//! assert_eq!(layers.composite()[1], black);
//! assert!(layers.has_edits());
//!
//! assert!(layers.undo().is_some());
//! assert!(!layers.has_edits());
//! ```

#![no_std]

extern crate alloc;

mod history;
mod layers;
pub mod tone;

pub use history::{History, HistoryEntry};
pub use layers::{BufferLengthError, ColorLayers, PaintSource};

/// An 8-bit RGB color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Black, the default color for clouds loaded without a color attribute.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Create a color from its channels.
    #[inline(always)]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The channels as an array.
    #[inline]
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb8 {
    #[inline]
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl Default for Rgb8 {
    fn default() -> Self {
        Self::BLACK
    }
}
