// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cursor-anchored scroll zoom.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use kurbo::{Point, Size};

use crate::state::{CameraState, Projection};

/// Zoom factor per 120 wheel-delta units (one detent on most mice).
pub const ZOOM_BASE: f64 = 1.2;

/// Zoom `cam` by the wheel delta while keeping the world point under the
/// cursor fixed on screen.
///
/// The anchor is the cursor's unprojection onto the focal plane. Perspective
/// cameras contract the eye and focal point towards the anchor; parallel
/// cameras scale the half-height and shift so the anchor keeps its offset
/// from the focal point. A corrective second pass re-unprojects the same
/// pixel and pans by the residual, because the primary step alone drifts the
/// anchor slightly under perspective.
///
/// When the camera is shared between two viewports, wrap the call in
/// [`SharedCamera::update_atomic`][crate::SharedCamera::update_atomic] so
/// observers redraw once, after both passes.
pub fn zoom_at_cursor(cam: &mut CameraState, cursor: Point, viewport: Size, wheel_delta: f64) {
    if wheel_delta == 0.0 {
        return;
    }
    let factor = ZOOM_BASE.powf(wheel_delta / 120.0);
    if !factor.is_finite() || factor <= 0.0 {
        return;
    }

    let pos0 = cam.position;
    let fp0 = cam.focal_point;
    let up0 = cam.view_up;
    let forward0 = cam.view_direction();

    let anchor = cam
        .pixel_ray(cursor, viewport)
        .intersect_plane(fp0, forward0)
        .filter(|a| a.is_finite())
        .unwrap_or(fp0);

    match &mut cam.projection {
        Projection::Perspective => {
            cam.position = anchor + (pos0 - anchor) / factor;
            cam.focal_point = anchor + (fp0 - anchor) / factor;
        }
        Projection::Parallel { half_height } => {
            *half_height = (*half_height / factor).max(1e-12);
            let shift = (anchor - fp0) * (1.0 - 1.0 / factor);
            cam.focal_point = fp0 + shift;
            cam.position = pos0 + shift;
        }
    }
    cam.view_up = up0;

    // Second, corrective pass: the same pixel must unproject to the anchor
    // again; pan away any residual drift.
    let forward1 = cam.view_direction();
    if let Some(q) = cam
        .pixel_ray(cursor, viewport)
        .intersect_plane(anchor, forward1)
    {
        let pan = anchor - q;
        if pan.is_finite() {
            cam.position += pan;
            cam.focal_point += pan;
        }
    }
}
