// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=stipple_camera --heading-base-level=0

//! Stipple Camera: camera state and the dual-viewport synchronization engine.
//!
//! This crate owns everything between pointer coordinates and world space:
//!
//! - [`CameraState`]: position, focal point, view up and lens settings, with
//!   a perspective or parallel [`Projection`]. All direction handling is
//!   defensive: degenerate (zero-length or non-finite) vectors fall back to
//!   a default view instead of propagating NaNs, since transient degenerate
//!   states arise during mode transitions.
//! - Projection math: [`CameraState::project`], [`CameraState::pixel_ray`],
//!   [`CameraState::unproject_on_focal_plane`] and
//!   [`CameraState::pixel_world_size`], the primitives the brush pipeline
//!   uses to translate a pixel radius into a world radius.
//! - [`ViewPreset`]: ten canonical orientations (six axis-aligned, four
//!   isometric). Applying a preset changes orientation only; re-fitting is
//!   the caller's debounced concern.
//! - Fitting: [`fit_to_bounds`] for one viewport and [`fit_shared_once`]
//!   for split mode, where a single camera must satisfy both viewports'
//!   aspect ratios in one pass (alternately fitting each pane oscillates
//!   visibly and is deliberately not offered).
//! - [`zoom_at_cursor`]: scroll zoom that keeps the world point under the
//!   cursor fixed on screen, with a corrective second pass.
//! - [`SharedCamera`] and [`CameraRig`]: the split-mode camera is shared
//!   through an explicit subscribe/notify hub rather than incidental
//!   aliasing, with a re-entrancy guard and atomic update batching.
//! - [`FitScheduler`]: coalesces bursts of fit requests (resizes, preset
//!   changes, mode toggles) into a single fit ~33 ms later.
//!
//! The crate never reads a clock and never draws; hosts feed it timestamps
//! and subscribe for change notifications.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Point, Size};
//! use stipple_camera::{CameraState, ViewPreset, fit_to_bounds, FIT_PADDING};
//! use stipple_index::Aabb3;
//!
//! let bounds = Aabb3::new(0.0, 0.0, 0.0, 2.0, 2.0, 1.0);
//! let viewport = Size::new(800.0, 600.0);
//!
//! let mut cam = CameraState::default();
//! ViewPreset::Top.apply(&mut cam);
//! fit_to_bounds(&mut cam, &bounds, viewport, FIT_PADDING);
//!
//! // The whole cloud projects inside the viewport.
//! let corner = cam.project(glam::DVec3::new(2.0, 2.0, 1.0), viewport).unwrap();
//! assert!(corner.x >= 0.0 && corner.x <= 800.0);
//! assert!(corner.y >= 0.0 && corner.y <= 600.0);
//! ```

#![no_std]

extern crate alloc;

mod fit;
mod preset;
mod rig;
mod schedule;
mod state;
mod zoom;

pub use fit::{FIT_PADDING, fit_shared_once, fit_to_bounds};
pub use preset::ViewPreset;
pub use rig::{CameraRig, ListenerId, Pane, SharedCamera};
pub use schedule::{FIT_DEBOUNCE_MS, FitScheduler};
pub use state::{CameraState, DEFAULT_VFOV, Projection, Ray};
pub use zoom::{ZOOM_BASE, zoom_at_cursor};
