// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fitting cameras to cloud bounds, for one viewport or two.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use glam::DVec3;
use kurbo::Size;
use stipple_index::Aabb3;

use crate::state::{CameraState, Projection, aspect};

/// Padding factor applied to fits so the cloud does not touch the viewport
/// edges.
pub const FIT_PADDING: f64 = 1.08;

/// Smallest usable aspect / scale guard.
const FIT_EPS: f64 = 1e-6;

fn center_of(bounds: &Aabb3<f64>) -> DVec3 {
    let [cx, cy, cz] = bounds.center();
    DVec3::new(cx, cy, cz)
}

fn bounding_radius(bounds: &Aabb3<f64>) -> f64 {
    let [sx, sy, sz] = bounds.size();
    0.5 * (sx * sx + sy * sy + sz * sz).sqrt()
}

fn corners_of(bounds: &Aabb3<f64>) -> [DVec3; 8] {
    let mut out = [DVec3::ZERO; 8];
    let mut i = 0;
    for &x in &[bounds.min_x, bounds.max_x] {
        for &y in &[bounds.min_y, bounds.max_y] {
            for &z in &[bounds.min_z, bounds.max_z] {
                out[i] = DVec3::new(x, y, z);
                i += 1;
            }
        }
    }
    out
}

/// Half extents of the bounds measured along the camera's right/up axes.
///
/// Translation cancels out of an extent, so only the eight corners against
/// the rotation part of the view are needed.
fn half_extents_in_camera(cam: &CameraState, bounds: &Aabb3<f64>) -> (f64, f64) {
    let b = cam.basis();
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for corner in corners_of(bounds) {
        let cx = corner.dot(b.right);
        let cy = corner.dot(b.up);
        min_x = min_x.min(cx);
        max_x = max_x.max(cx);
        min_y = min_y.min(cy);
        max_y = max_y.max(cy);
    }
    (0.5 * (max_x - min_x), 0.5 * (max_y - min_y))
}

/// The eye distance from the bounds center a perspective camera needs so
/// every corner projects inside one viewport's frustum.
///
/// Per corner: a point with lateral offset `l` at depth `dist + d` is
/// visible when `l <= (dist + d) * tan(fov/2)`, so the corner demands
/// `dist >= l / tan(fov/2) - d`. Corners nearer the eye than the centroid
/// have negative `d` and dominate; using projected extents alone would clip
/// them.
fn perspective_distance_needed(cam: &CameraState, bounds: &Aabb3<f64>, aspect: f64) -> f64 {
    let b = cam.basis();
    let center = center_of(bounds);
    let tan_v = (0.5 * cam.vfov.max(1e-3)).tan();
    let tan_h = tan_v * aspect.max(FIT_EPS);
    let mut needed = 0.0_f64;
    for corner in corners_of(bounds) {
        let o = corner - center;
        let x = o.dot(b.right).abs();
        let y = o.dot(b.up).abs();
        let d = o.dot(b.forward);
        needed = needed.max((y / tan_v).max(x / tan_h) - d);
    }
    needed.max(FIT_EPS)
}

/// Fit `cam` so the bounds fill one viewport, without changing orientation.
///
/// Perspective cameras move the eye to `r / tan(min(vfov, hfov)/2) · pad`
/// from the bounds center, where `r` is the bounding-sphere radius.
/// Parallel cameras keep the eye and set the half-height from the bounds'
/// camera-space extents. Empty bounds are left alone.
pub fn fit_to_bounds(cam: &mut CameraState, bounds: &Aabb3<f64>, viewport: Size, pad: f64) {
    let r = bounding_radius(bounds);
    if !(r > 0.0) {
        return;
    }
    let center = center_of(bounds);
    let dir = cam.view_direction();
    let a = aspect(viewport);

    match cam.projection {
        Projection::Perspective => {
            let vfov = cam.vfov.max(1e-3);
            let hfov = 2.0 * ((0.5 * vfov).tan() * a).atan();
            let eff = vfov.min(hfov).max(1e-3);
            let dist = r / (0.5 * eff).tan() * pad;
            cam.focal_point = center;
            cam.position = center - dir * dist;
        }
        Projection::Parallel { .. } => {
            let (half_w, half_h) = half_extents_in_camera(cam, bounds);
            let scale = half_h.max(half_w / a.max(FIT_EPS)).max(FIT_EPS) * pad;
            cam.focal_point = center;
            if !cam.position.is_finite() || (cam.position - center).length() < FIT_EPS {
                cam.position = center - dir * (r * 2.0 + 1.0);
            }
            cam.projection = Projection::Parallel { half_height: scale };
        }
    }
}

/// Fit one shared camera so the bounds fit **both** viewports, in a single
/// pass.
///
/// The required distance (perspective) or half-height (parallel) is computed
/// for each viewport's aspect ratio and the maximum is taken, so the cloud
/// is never clipped in either pane. Fitting each pane in turn instead
/// oscillates visibly between two answers and must not be done.
pub fn fit_shared_once(
    cam: &mut CameraState,
    bounds: &Aabb3<f64>,
    viewport_a: Size,
    viewport_b: Size,
    pad: f64,
) {
    let r = bounding_radius(bounds);
    if !(r > 0.0) {
        return;
    }
    let center = center_of(bounds);
    let dir = cam.view_direction();
    let a1 = aspect(viewport_a);
    let a2 = aspect(viewport_b);

    match cam.projection {
        Projection::Perspective => {
            let d1 = perspective_distance_needed(cam, bounds, a1);
            let d2 = perspective_distance_needed(cam, bounds, a2);
            let dist = d1.max(d2) * pad;
            cam.focal_point = center;
            cam.position = center - dir * dist;
        }
        Projection::Parallel { .. } => {
            let (half_w, half_h) = half_extents_in_camera(cam, bounds);
            let s1 = half_h.max(half_w / a1.max(FIT_EPS));
            let s2 = half_h.max(half_w / a2.max(FIT_EPS));
            let scale = s1.max(s2).max(FIT_EPS) * pad;
            cam.focal_point = center;
            if !cam.position.is_finite() || (cam.position - center).length() < FIT_EPS {
                cam.position = center - dir * (r * 2.0 + 1.0);
            }
            cam.projection = Projection::Parallel { half_height: scale };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preset::ViewPreset;

    fn test_bounds() -> Aabb3<f64> {
        Aabb3::new(-3.0, -1.0, 0.0, 3.0, 1.0, 2.0)
    }

    fn assert_inside(cam: &CameraState, bounds: &Aabb3<f64>, viewport: Size) {
        for corner in corners_of(bounds) {
            let p = cam
                .project(corner, viewport)
                .expect("fitted corner must project");
            assert!(
                p.x >= -1e-6 && p.x <= viewport.width + 1e-6,
                "x out of viewport: {p:?} in {viewport:?}"
            );
            assert!(
                p.y >= -1e-6 && p.y <= viewport.height + 1e-6,
                "y out of viewport: {p:?} in {viewport:?}"
            );
        }
    }

    #[test]
    fn perspective_fit_contains_bounds() {
        let bounds = test_bounds();
        let viewport = Size::new(800.0, 600.0);
        let mut cam = CameraState::default();
        ViewPreset::IsoNe.apply(&mut cam);
        fit_to_bounds(&mut cam, &bounds, viewport, FIT_PADDING);
        assert_inside(&cam, &bounds, viewport);
    }

    #[test]
    fn parallel_fit_contains_bounds() {
        let bounds = test_bounds();
        let viewport = Size::new(640.0, 480.0);
        let mut cam = CameraState {
            position: DVec3::new(0.0, 0.0, 20.0),
            projection: Projection::Parallel { half_height: 1.0 },
            ..CameraState::default()
        };
        fit_to_bounds(&mut cam, &bounds, viewport, FIT_PADDING);
        assert_inside(&cam, &bounds, viewport);
    }

    #[test]
    fn fit_keeps_orientation() {
        let bounds = test_bounds();
        let mut cam = CameraState::default();
        ViewPreset::IsoSw.apply(&mut cam);
        let dir_before = cam.view_direction();
        fit_to_bounds(&mut cam, &bounds, Size::new(800.0, 600.0), FIT_PADDING);
        assert!((cam.view_direction() - dir_before).length() < 1e-9);
    }

    #[test]
    fn shared_fit_safe_for_both_aspects() {
        // Wide and narrow panes against the same camera: the bounds must be
        // visible in both, for perspective and parallel projections alike.
        let bounds = test_bounds();
        let wide = Size::new(1600.0, 900.0);
        let narrow = Size::new(400.0, 300.0);

        let mut cam = CameraState::default();
        ViewPreset::IsoNw.apply(&mut cam);
        fit_shared_once(&mut cam, &bounds, wide, narrow, FIT_PADDING);
        assert_inside(&cam, &bounds, wide);
        assert_inside(&cam, &bounds, narrow);

        let mut cam = CameraState {
            position: DVec3::new(0.0, 0.0, 20.0),
            projection: Projection::Parallel { half_height: 1.0 },
            ..CameraState::default()
        };
        fit_shared_once(&mut cam, &bounds, wide, narrow, FIT_PADDING);
        assert_inside(&cam, &bounds, wide);
        assert_inside(&cam, &bounds, narrow);
    }

    #[test]
    fn shared_fit_is_single_pass_stable() {
        // Re-running the shared fit must not oscillate.
        let bounds = test_bounds();
        let a = Size::new(1024.0, 768.0);
        let b = Size::new(512.0, 512.0);
        let mut cam = CameraState::default();
        ViewPreset::IsoSe.apply(&mut cam);
        fit_shared_once(&mut cam, &bounds, a, b, FIT_PADDING);
        let first = cam;
        fit_shared_once(&mut cam, &bounds, a, b, FIT_PADDING);
        assert!((cam.position - first.position).length() < 1e-9);
    }

    #[test]
    fn empty_bounds_are_ignored() {
        let bounds = Aabb3::from_point(1.0, 1.0, 1.0);
        let mut cam = CameraState::default();
        let before = cam;
        fit_to_bounds(&mut cam, &bounds, Size::new(100.0, 100.0), FIT_PADDING);
        assert_eq!(cam, before);
    }

    #[test]
    fn top_fit_centers_cloud() {
        let bounds = test_bounds();
        let viewport = Size::new(800.0, 600.0);
        let mut cam = CameraState::default();
        ViewPreset::Top.apply(&mut cam);
        fit_to_bounds(&mut cam, &bounds, viewport, FIT_PADDING);
        assert_eq!(cam.focal_point, DVec3::new(0.0, 0.0, 1.0));
        let center = cam
            .project(DVec3::new(0.0, 0.0, 1.0), viewport)
            .expect("center projects");
        assert!((center.x - 400.0).abs() < 1e-6);
        assert!((center.y - 300.0).abs() < 1e-6);
    }
}
