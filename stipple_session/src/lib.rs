// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=stipple_session --heading-base-level=0

//! Stipple Session: the interactive annotation engine, assembled.
//!
//! This crate wires the lower layers (spatial index, color layers, camera
//! rig, brush) into one [`AnnotationSession`] driven by a normalized
//! pointer-event stream plus discrete commands. The host owns windowing,
//! file I/O and rendering; the session owns every decision about what a
//! gesture means.
//!
//! ## Strokes
//!
//! The session is an explicit two-state machine, `Idle ⇄ StrokeActive`,
//! with the in-flight stroke held as a single value rather than scattered
//! flags. Pointer-down in the accepting viewport begins a stroke (holding
//! Shift constrains it to a straight line from the anchor); pointer-moves
//! are throttled, interpolated, and applied; pointer-up commits the whole
//! gesture as one undo entry. A stroke abandoned mid-air (pointer left the
//! viewport) keeps its partial edits but records no history entry — this
//! asymmetry is deliberate and preserved from long-standing behavior.
//!
//! ## Modes
//!
//! [`Mode`] is one exhaustive enum: Normal paints the picked color, Eraser
//! and Repair restore originals in the working pane, Clone restores
//! originals by painting in the *reference* pane. Repair and Clone cannot
//! be active simultaneously because the type cannot express it. Entering or
//! leaving a split mode links or unlinks the camera rig and schedules a
//! debounced shared fit.
//!
//! ## Rendering contract
//!
//! Every mutating call returns a [`Refresh`] telling the host the cheapest
//! sufficient redraw: nothing, a subset of point colors, the whole display
//! buffer, or the cameras. Display colors come from
//! [`AnnotationSession::composite`] / [`composite_subset`][AnnotationSession::composite_subset];
//! camera state from [`AnnotationSession::camera`] or, in split mode, from
//! subscribing to the shared hub.

#![no_std]

extern crate alloc;

mod document;
mod events;
mod mode;
mod session;

pub use document::{CloudDocument, CloudIndex, OriginalSource};
pub use events::{Modifiers, PointerButtons, PointerEvent};
pub use mode::Mode;
pub use session::{AnnotationSession, Refresh};

// The pane identifier is shared with the camera rig.
pub use stipple_camera::Pane;
