// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Camera state and projection math.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use glam::DVec3;
use kurbo::{Point, Size};

/// Default vertical field of view: 30 degrees, in radians.
pub const DEFAULT_VFOV: f64 = 30.0 * core::f64::consts::PI / 180.0;

/// Length below which a direction vector is treated as degenerate.
const DEGENERATE_EPS: f64 = 1e-12;

/// Projection kind of a camera.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Projection {
    /// Perspective projection; zoom state lives in the camera distance.
    Perspective,
    /// Parallel (orthographic) projection.
    Parallel {
        /// Half of the world-space height visible in the viewport.
        half_height: f64,
    },
}

/// Full state of one viewport camera.
///
/// `vfov` is the lens angle used by perspective projections; it is kept even
/// while the projection is parallel so that switching back does not lose it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraState {
    /// Eye position in world space.
    pub position: DVec3,
    /// The point the camera looks at; also the plane cursor anchoring
    /// happens on.
    pub focal_point: DVec3,
    /// Approximate up direction; re-orthogonalized against the view
    /// direction on use.
    pub view_up: DVec3,
    /// Vertical field of view in radians (perspective projections).
    pub vfov: f64,
    /// Perspective or parallel projection.
    pub projection: Projection,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            position: DVec3::new(0.0, 0.0, 1.0),
            focal_point: DVec3::ZERO,
            view_up: DVec3::Y,
            vfov: DEFAULT_VFOV,
            projection: Projection::Perspective,
        }
    }
}

/// A ray in world space with unit direction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    /// Ray origin.
    pub origin: DVec3,
    /// Unit direction.
    pub direction: DVec3,
}

impl Ray {
    /// The point at parameter `t` along the ray.
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }

    /// Intersect with the plane through `point` with normal `normal`.
    ///
    /// Returns `None` when the ray is (numerically) parallel to the plane.
    pub fn intersect_plane(&self, point: DVec3, normal: DVec3) -> Option<DVec3> {
        let denom = self.direction.dot(normal);
        if denom.abs() < DEGENERATE_EPS {
            return None;
        }
        let t = (point - self.origin).dot(normal) / denom;
        Some(self.at(t))
    }
}

/// Orthonormal camera frame. `forward` points from the eye towards the
/// focal point.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Basis {
    pub(crate) right: DVec3,
    pub(crate) up: DVec3,
    pub(crate) forward: DVec3,
}

impl CameraState {
    /// Unit view direction, with a defensive fallback.
    ///
    /// A non-finite or zero-length direction yields looking down −Z. This is
    /// a recoverability guarantee, not a promise about the resulting view:
    /// degenerate cameras arise transiently during mode transitions and must
    /// not poison downstream math with NaNs.
    pub fn view_direction(&self) -> DVec3 {
        let d = self.focal_point - self.position;
        if d.is_finite() && d.length_squared() > DEGENERATE_EPS {
            d.normalize()
        } else {
            DVec3::NEG_Z
        }
    }

    /// Distance from the eye to the focal point, at least `DEGENERATE_EPS`.
    pub fn focal_distance(&self) -> f64 {
        let d = self.focal_point - self.position;
        if d.is_finite() {
            d.length().max(DEGENERATE_EPS)
        } else {
            1.0
        }
    }

    pub(crate) fn basis(&self) -> Basis {
        let forward = self.view_direction();
        let up_hint = if self.view_up.is_finite() && self.view_up.length_squared() > DEGENERATE_EPS
        {
            self.view_up.normalize()
        } else {
            DVec3::Y
        };
        let mut right = forward.cross(up_hint);
        if right.length_squared() < DEGENERATE_EPS {
            // Up is parallel to the view direction; pick any perpendicular.
            let alt = if forward.x.abs() < 0.9 {
                DVec3::X
            } else {
                DVec3::Y
            };
            right = forward.cross(alt);
        }
        let right = right.normalize();
        let up = right.cross(forward);
        Basis { right, up, forward }
    }

    /// Half the world-space extents visible at `depth`, given the viewport
    /// aspect ratio. For parallel projections the depth is irrelevant.
    fn half_extents_at(&self, depth: f64, aspect: f64) -> (f64, f64) {
        let half_h = match self.projection {
            Projection::Perspective => depth * (0.5 * self.vfov).tan(),
            Projection::Parallel { half_height } => half_height.max(DEGENERATE_EPS),
        };
        (half_h * aspect, half_h)
    }

    /// Project a world point to y-down viewport coordinates.
    ///
    /// Returns `None` for points at or behind a perspective eye; parallel
    /// projections map every point.
    pub fn project(&self, world: DVec3, viewport: Size) -> Option<Point> {
        let b = self.basis();
        let v = world - self.position;
        let x = v.dot(b.right);
        let y = v.dot(b.up);
        let depth = v.dot(b.forward);
        if matches!(self.projection, Projection::Perspective) && depth <= DEGENERATE_EPS {
            return None;
        }
        let (half_w, half_h) = self.half_extents_at(depth, aspect(viewport));
        let ndc_x = x / half_w;
        let ndc_y = y / half_h;
        Some(Point::new(
            (ndc_x + 1.0) * 0.5 * viewport.width,
            (1.0 - ndc_y) * 0.5 * viewport.height,
        ))
    }

    /// The world-space ray through a viewport pixel.
    pub fn pixel_ray(&self, screen: Point, viewport: Size) -> Ray {
        let b = self.basis();
        let w = viewport.width.max(1.0);
        let h = viewport.height.max(1.0);
        let ndc_x = 2.0 * screen.x / w - 1.0;
        let ndc_y = 1.0 - 2.0 * screen.y / h;
        match self.projection {
            Projection::Perspective => {
                let tan_half = (0.5 * self.vfov).tan();
                let dir = (b.right * (ndc_x * tan_half * aspect(viewport))
                    + b.up * (ndc_y * tan_half)
                    + b.forward)
                    .normalize();
                Ray {
                    origin: self.position,
                    direction: dir,
                }
            }
            Projection::Parallel { half_height } => {
                let half_h = half_height.max(DEGENERATE_EPS);
                let half_w = half_h * aspect(viewport);
                Ray {
                    origin: self.position + b.right * (ndc_x * half_w) + b.up * (ndc_y * half_h),
                    direction: b.forward,
                }
            }
        }
    }

    /// Unproject a pixel onto the plane through the focal point,
    /// perpendicular to the view direction.
    pub fn unproject_on_focal_plane(&self, screen: Point, viewport: Size) -> Option<DVec3> {
        let forward = self.view_direction();
        self.pixel_ray(screen, viewport)
            .intersect_plane(self.focal_point, forward)
    }

    /// World-space length of one screen pixel at the depth of `world`.
    ///
    /// Unprojects two screen points one pixel apart onto the plane of
    /// `world` and measures their separation; the larger of the horizontal
    /// and vertical estimate is returned to stay conservative under
    /// perspective distortion. `None` when `world` does not project.
    pub fn pixel_world_size(&self, world: DVec3, viewport: Size) -> Option<f64> {
        let screen = self.project(world, viewport)?;
        let normal = self.view_direction();
        let p0 = self
            .pixel_ray(screen, viewport)
            .intersect_plane(world, normal)?;
        let px = self
            .pixel_ray(Point::new(screen.x + 1.0, screen.y), viewport)
            .intersect_plane(world, normal)?;
        let py = self
            .pixel_ray(Point::new(screen.x, screen.y + 1.0), viewport)
            .intersect_plane(world, normal)?;
        Some((px - p0).length().max((py - p0).length()))
    }
}

pub(crate) fn aspect(viewport: Size) -> f64 {
    viewport.width.max(1.0) / viewport.height.max(1.0)
}
