// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tool modes.

use stipple_camera::Pane;

/// The active annotation tool.
///
/// One exhaustive enum instead of loose boolean toggles: Repair and Clone
/// are mutually exclusive by construction, and every derived policy (what a
/// stroke writes, which pane accepts input, whether the second pane is
/// shown) is a total function of the mode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Paint the currently picked color in the working pane.
    #[default]
    Normal,
    /// Restore original colors in the working pane.
    Eraser,
    /// Side-by-side repair: split view, erase-to-original in the working
    /// pane with the pristine reference visible.
    Repair,
    /// Clone from the reference: split view, strokes in the *reference*
    /// pane restore originals in the working copy.
    Clone,
}

impl Mode {
    /// The viewport whose pointer events paint in this mode.
    pub fn accepting_pane(self) -> Pane {
        match self {
            Self::Clone => Pane::Reference,
            _ => Pane::Working,
        }
    }

    /// Whether strokes write original colors (rather than the picked color).
    pub fn paints_original(self) -> bool {
        !matches!(self, Self::Normal)
    }

    /// Whether this mode shows the reference pane with a linked camera.
    pub fn wants_split(self) -> bool {
        matches!(self, Self::Repair | Self::Clone)
    }
}
