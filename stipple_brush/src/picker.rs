// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ray casting against the cloud's rendered point sprites.

use glam::DVec3;
use kurbo::{Point, Size};
use stipple_camera::CameraState;
use stipple_index::{Aabb3, Backend, PointIndexGeneric};

/// Upper bound on ray-march samples across the cloud bounds.
const PICK_MAX_STEPS: usize = 128;

/// Extra pick tolerance in pixels beyond the sprite radius.
///
/// Renderer picks land on the sprite's drawn disc; one pixel of slack keeps
/// edge hits from flickering between hit and miss.
const PICK_SLACK_PX: f64 = 1.0;

/// A successful cursor-to-cloud pick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PickHit {
    /// Index of the picked point.
    pub index: usize,
    /// The picked point's position (the brush center in world space).
    pub position: DVec3,
}

/// Cast the cursor's pixel ray against the cloud and return the nearest
/// point whose rendered sprite the ray passes through.
///
/// Marches the ray across the cloud bounds, radius-querying the index at
/// each step and keeping the candidate with the smallest ray parameter
/// whose perpendicular distance to the ray is within the sprite's world
/// size at its depth. Returns `None` when the ray misses every sprite or
/// the index is empty (a stroke may begin microseconds before a load
/// finishes) — both are defined results, not errors.
///
/// For an unchanged camera the result is deterministic: the same pixel
/// picks the same point.
pub fn pick<B: Backend<f64>>(
    cursor: Point,
    camera: &CameraState,
    viewport: Size,
    index: &PointIndexGeneric<f64, B>,
    positions: &[DVec3],
    sprite_radius_px: f64,
) -> Option<PickHit> {
    let bounds = index.bounds()?;
    let ray = camera.pixel_ray(cursor, viewport);
    let tol_px = sprite_radius_px.max(1.0) + PICK_SLACK_PX;

    // World tolerance at the bounds center seeds the slab inflation and the
    // march step; per-candidate tolerance is recomputed at the candidate's
    // own depth.
    let [cx, cy, cz] = bounds.center();
    let center = DVec3::new(cx, cy, cz);
    let center_tol = camera
        .pixel_world_size(center, viewport)
        .map_or(0.0, |px| px * tol_px);

    let (t0, t1) = slab_intersect(&ray, bounds, center_tol.max(1e-9))?;
    let span = t1 - t0;
    let step = (span / PICK_MAX_STEPS as f64).max(center_tol).max(1e-9);

    let mut best: Option<(usize, f64)> = None;
    let mut t = t0;
    loop {
        let sample = ray.at(t);
        if let Some(px_world) = camera.pixel_world_size(sample, viewport) {
            let tol = px_world * tol_px;
            let query_r = 0.5 * step + tol;
            index.visit_sphere(sample.x, sample.y, sample.z, query_r, |i| {
                let Some(p) = positions.get(i) else {
                    return;
                };
                let to_p = *p - ray.origin;
                let along = to_p.dot(ray.direction);
                if along < 0.0 {
                    return;
                }
                let perp = (to_p - ray.direction * along).length();
                let p_tol = camera
                    .pixel_world_size(*p, viewport)
                    .map_or(tol, |px| px * tol_px);
                if perp <= p_tol && best.is_none_or(|(_, b)| along < b) {
                    best = Some((i, along));
                }
            });
        }

        // Later samples only yield larger ray parameters; once the best hit
        // is conclusively nearer, stop marching.
        if let Some((_, b)) = best
            && t > b + step
        {
            break;
        }
        if t >= t1 {
            break;
        }
        t = (t + step).min(t1);
    }

    best.map(|(index, _)| PickHit {
        index,
        position: positions[index],
    })
}

/// Intersect a ray with the bounds inflated by `margin`; returns the entry
/// and exit parameters clamped to the forward half of the ray.
fn slab_intersect(
    ray: &stipple_camera::Ray,
    bounds: &Aabb3<f64>,
    margin: f64,
) -> Option<(f64, f64)> {
    let mins = [
        bounds.min_x - margin,
        bounds.min_y - margin,
        bounds.min_z - margin,
    ];
    let maxs = [
        bounds.max_x + margin,
        bounds.max_y + margin,
        bounds.max_z + margin,
    ];
    let origin = ray.origin.to_array();
    let dir = ray.direction.to_array();

    let mut t_enter = f64::NEG_INFINITY;
    let mut t_exit = f64::INFINITY;
    for axis in 0..3 {
        if dir[axis].abs() < 1e-15 {
            if origin[axis] < mins[axis] || origin[axis] > maxs[axis] {
                return None;
            }
            continue;
        }
        let ta = (mins[axis] - origin[axis]) / dir[axis];
        let tb = (maxs[axis] - origin[axis]) / dir[axis];
        let (near, far) = if ta <= tb { (ta, tb) } else { (tb, ta) };
        t_enter = t_enter.max(near);
        t_exit = t_exit.min(far);
    }
    if t_exit < t_enter || t_exit < 0.0 {
        return None;
    }
    Some((t_enter.max(0.0), t_exit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use stipple_camera::Projection;
    use stipple_index::PointIndex;

    fn line_cloud() -> (Vec<DVec3>, PointIndex<f64>) {
        // Three points stacked along the view axis at z = 2, 0, -2.
        let positions: Vec<DVec3> = [
            [0.0, 0.0, 2.0],
            [0.0, 0.0, 0.0],
            [0.0, 0.0, -2.0],
        ]
        .iter()
        .map(|p| DVec3::from_array(*p))
        .collect();
        let pts: Vec<[f64; 3]> = positions.iter().map(|p| p.to_array()).collect();
        (positions.clone(), PointIndex::new(&pts))
    }

    fn down_camera() -> CameraState {
        CameraState {
            position: DVec3::new(0.0, 0.0, 10.0),
            focal_point: DVec3::ZERO,
            view_up: DVec3::Y,
            projection: Projection::Parallel { half_height: 4.0 },
            ..CameraState::default()
        }
    }

    const VIEWPORT: Size = Size::new(200.0, 200.0);

    #[test]
    fn picks_nearest_sprite_along_ray() {
        let (positions, index) = line_cloud();
        let hit = pick(
            Point::new(100.0, 100.0),
            &down_camera(),
            VIEWPORT,
            &index,
            &positions,
            1.0,
        )
        .expect("stacked sprites under the cursor must pick");
        // All three are under the pixel; the topmost (nearest the eye) wins.
        assert_eq!(hit.index, 0);
        assert_eq!(hit.position, DVec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn same_pixel_picks_deterministically() {
        let (positions, index) = line_cloud();
        let cam = down_camera();
        let cursor = Point::new(100.0, 100.0);
        let a = pick(cursor, &cam, VIEWPORT, &index, &positions, 1.0);
        let b = pick(cursor, &cam, VIEWPORT, &index, &positions, 1.0);
        assert_eq!(a, b);
    }

    #[test]
    fn off_cloud_pixel_misses() {
        let (positions, index) = line_cloud();
        assert!(
            pick(
                Point::new(5.0, 5.0),
                &down_camera(),
                VIEWPORT,
                &index,
                &positions,
                1.0,
            )
            .is_none()
        );
    }

    #[test]
    fn empty_index_misses_without_error() {
        let positions: Vec<DVec3> = Vec::new();
        let index = PointIndex::new(&[]);
        assert!(
            pick(
                Point::new(100.0, 100.0),
                &down_camera(),
                VIEWPORT,
                &index,
                &positions,
                1.0,
            )
            .is_none()
        );
    }

    #[test]
    fn perspective_pick_hits_point_under_cursor() {
        let positions: Vec<DVec3> = alloc::vec![DVec3::new(0.0, 0.0, 0.0)];
        let index = PointIndex::new(&[[0.0, 0.0, 0.0]]);
        let cam = CameraState {
            position: DVec3::new(0.0, 0.0, 8.0),
            focal_point: DVec3::ZERO,
            view_up: DVec3::Y,
            ..CameraState::default()
        };
        let hit = pick(
            Point::new(100.0, 100.0),
            &cam,
            VIEWPORT,
            &index,
            &positions,
            2.0,
        )
        .expect("point at the focal point sits under the center pixel");
        assert_eq!(hit.index, 0);
    }

    #[test]
    fn slab_handles_parallel_ray_outside_bounds() {
        let ray = stipple_camera::Ray {
            origin: DVec3::new(5.0, 0.0, 10.0),
            direction: DVec3::new(0.0, 0.0, -1.0),
        };
        let bounds = Aabb3::new(-1.0, -1.0, -1.0, 1.0, 1.0, 1.0);
        assert!(slab_intersect(&ray, &bounds, 0.1).is_none());
    }

    #[test]
    fn slab_clamps_to_forward_ray() {
        let ray = stipple_camera::Ray {
            origin: DVec3::new(0.0, 0.0, 0.0),
            direction: DVec3::new(0.0, 0.0, -1.0),
        };
        let bounds = Aabb3::new(-1.0, -1.0, -3.0, 1.0, 1.0, 3.0);
        let (t0, t1) = slab_intersect(&ray, &bounds, 0.0).expect("ray starts inside");
        assert_eq!(t0, 0.0);
        assert!((t1 - 3.0).abs() < 1e-12);
    }
}
