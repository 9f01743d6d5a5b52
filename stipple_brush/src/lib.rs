// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=stipple_brush --heading-base-level=0

//! Stipple Brush: what-you-see-is-what-you-get brush coverage for point
//! clouds.
//!
//! Points are rendered as round sprites of some pixel radius `s`. The brush
//! is a screen-space circle of radius `r`. A point counts as painted only if
//! its sprite fits entirely inside the brush circle — the painted set is
//! exactly what the cursor ring visually covers:
//!
//! ```text
//! distance(point_screen, cursor) <= r - s
//! ```
//!
//! When `r <= s` (a brush smaller than a point sprite) that rule would paint
//! nothing, so coverage falls back to circle-circle intersection
//! (`distance <= r + s`), which keeps tiny brushes usable and guarantees
//! the sprite under the cursor is paintable.
//!
//! Computing this naively would project every point of the cloud per brush
//! stamp. Instead [`touched_indices`] runs in two phases:
//!
//! 1. **World preselect**: unproject the cursor to a world-space brush
//!    center via [`pick`], then radius-query the spatial index at
//!    `(r + s) · pixel_world_size · inflation`. The inflation (~1.25) keeps
//!    the candidate set a safe superset despite perspective distortion.
//! 2. **Exact screen test**: project only the candidates and apply the
//!    containment (or intersection-fallback) rule.
//!
//! The [`stroke`] module supplies the path interpolators that turn a
//! pointer-drag into a dense series of brush stamps, plus the paint-rate
//! throttle.

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

use glam::DVec3;
use kurbo::{Point, Size};
use stipple_camera::CameraState;
use stipple_index::{Backend, PointIndexGeneric};

mod picker;
pub mod stroke;

pub use picker::{PickHit, pick};

/// Default candidate-set inflation for the world preselect.
pub const COVERAGE_INFLATION: f64 = 1.25;

/// Below this effective containment radius (in pixels) the brush switches
/// to the circle-intersection fallback.
const CONTAINMENT_CUTOVER_PX: f64 = 0.5;

const BRUSH_RADIUS_MIN_PX: f64 = 1.0;
const BRUSH_RADIUS_MAX_PX: f64 = 200.0;
const SPRITE_RADIUS_MIN_PX: f64 = 0.5;
const SPRITE_RADIUS_MAX_PX: f64 = 10.0;

/// Brush geometry in screen space.
///
/// Radii are clamped to their usable ranges on construction and update, so
/// a slider wired straight to [`set_radius_px`][Self::set_radius_px] cannot
/// produce a degenerate brush.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BrushParams {
    radius_px: f64,
    sprite_radius_px: f64,
    coverage_inflation: f64,
}

impl BrushParams {
    /// Create brush parameters, clamping both radii.
    pub fn new(radius_px: f64, sprite_radius_px: f64) -> Self {
        let mut out = Self {
            radius_px: 0.0,
            sprite_radius_px: 0.0,
            coverage_inflation: COVERAGE_INFLATION,
        };
        out.set_radius_px(radius_px);
        out.set_sprite_radius_px(sprite_radius_px);
        out
    }

    /// The brush radius in pixels.
    pub fn radius_px(&self) -> f64 {
        self.radius_px
    }

    /// Set the brush radius, clamped to `[1, 200]` pixels.
    pub fn set_radius_px(&mut self, radius_px: f64) {
        self.radius_px = radius_px.clamp(BRUSH_RADIUS_MIN_PX, BRUSH_RADIUS_MAX_PX);
    }

    /// The rendered point-sprite radius in pixels.
    pub fn sprite_radius_px(&self) -> f64 {
        self.sprite_radius_px
    }

    /// Set the sprite radius, clamped to `[0.5, 10]` pixels.
    pub fn set_sprite_radius_px(&mut self, sprite_radius_px: f64) {
        self.sprite_radius_px =
            sprite_radius_px.clamp(SPRITE_RADIUS_MIN_PX, SPRITE_RADIUS_MAX_PX);
    }

    /// The world-preselect inflation factor.
    pub fn coverage_inflation(&self) -> f64 {
        self.coverage_inflation
    }

    /// Set the preselect inflation, clamped to `[1.0, 2.0]`.
    pub fn set_coverage_inflation(&mut self, inflation: f64) {
        self.coverage_inflation = inflation.clamp(1.0, 2.0);
    }

    /// The radius of the visual paint footprint, for hosts drawing the
    /// cursor ring: `r - s`, at least one pixel.
    ///
    /// With the strict containment rule this ring shows exactly which sprite
    /// centers will paint.
    pub fn cursor_footprint_radius(&self) -> f64 {
        (self.radius_px - self.sprite_radius_px).max(1.0)
    }
}

impl Default for BrushParams {
    fn default() -> Self {
        Self::new(10.0, 1.0)
    }
}

/// The exact set of point indices the brush covers at one cursor position.
///
/// Returns the empty set when the cursor ray misses the cloud — a defined
/// no-op, not an error. The result is unordered and duplicate-free.
///
/// Given a fixed camera, cursor and sprite radius, the result grows
/// monotonically with the brush radius within each coverage regime; the
/// hand-off from the tiny-brush intersection fallback to strict
/// containment happens just past `r == s`, where the fallback is the more
/// generous rule.
pub fn touched_indices<B: Backend<f64>>(
    cursor: Point,
    brush: &BrushParams,
    camera: &CameraState,
    viewport: Size,
    index: &PointIndexGeneric<f64, B>,
    positions: &[DVec3],
) -> Vec<usize> {
    let Some(hit) = pick(
        cursor,
        camera,
        viewport,
        index,
        positions,
        brush.sprite_radius_px,
    ) else {
        return Vec::new();
    };
    let Some(px_world) = camera.pixel_world_size(hit.position, viewport) else {
        return Vec::new();
    };

    let r = brush.radius_px;
    let s = brush.sprite_radius_px;
    let world_r = ((r + s) * px_world * brush.coverage_inflation).max(1e-9);

    // Strict containment, falling back to circle intersection for brushes
    // no larger than a sprite.
    let r_in = r - s;
    let limit2 = if r_in > CONTAINMENT_CUTOVER_PX {
        r_in * r_in
    } else {
        (r + s) * (r + s)
    };

    let mut kept = Vec::new();
    index.visit_sphere(
        hit.position.x,
        hit.position.y,
        hit.position.z,
        world_r,
        |i| {
            let Some(p) = positions.get(i) else {
                return;
            };
            let Some(screen) = camera.project(*p, viewport) else {
                return;
            };
            let dx = screen.x - cursor.x;
            let dy = screen.y - cursor.y;
            if dx * dx + dy * dy <= limit2 {
                kept.push(i);
            }
        },
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use stipple_camera::Projection;
    use stipple_index::PointIndex;

    /// Four coplanar points on the unit square.
    fn quad() -> Vec<DVec3> {
        [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
        ]
        .iter()
        .map(|p| DVec3::from_array(*p))
        .collect()
    }

    fn quad_index(positions: &[DVec3]) -> PointIndex<f64> {
        let pts: Vec<[f64; 3]> = positions.iter().map(|p| p.to_array()).collect();
        PointIndex::new(&pts)
    }

    /// Top-down parallel camera over the quad; 100×100 viewport maps the
    /// 4-unit half-height to 0.04 world units per pixel.
    fn top_down() -> CameraState {
        CameraState {
            position: DVec3::new(0.5, 0.5, 10.0),
            focal_point: DVec3::new(0.5, 0.5, 0.0),
            view_up: DVec3::Y,
            projection: Projection::Parallel { half_height: 2.0 },
            ..CameraState::default()
        }
    }

    const VIEWPORT: Size = Size::new(100.0, 100.0);

    /// Pixel position of the first quad point under `top_down`.
    const P0_SCREEN: Point = Point::new(37.5, 62.5);

    #[test]
    fn clamping() {
        let mut brush = BrushParams::new(500.0, 100.0);
        assert_eq!(brush.radius_px(), 200.0);
        assert_eq!(brush.sprite_radius_px(), 10.0);
        brush.set_radius_px(0.0);
        assert_eq!(brush.radius_px(), 1.0);
        brush.set_sprite_radius_px(0.0);
        assert_eq!(brush.sprite_radius_px(), 0.5);
    }

    #[test]
    fn cursor_footprint_radius_tracks_sprite() {
        let brush = BrushParams::new(20.0, 4.0);
        assert_eq!(brush.cursor_footprint_radius(), 16.0);
        let tiny = BrushParams::new(1.0, 4.0);
        assert_eq!(tiny.cursor_footprint_radius(), 1.0);
    }

    #[test]
    fn large_brush_covers_whole_quad() {
        let positions = quad();
        let index = quad_index(&positions);
        let brush = BrushParams::new(40.0, 1.0);
        let mut touched = touched_indices(
            P0_SCREEN,
            &brush,
            &top_down(),
            VIEWPORT,
            &index,
            &positions,
        );
        touched.sort_unstable();
        assert_eq!(touched, alloc::vec![0, 1, 2, 3]);
    }

    #[test]
    fn small_brush_covers_only_hit_point() {
        let positions = quad();
        let index = quad_index(&positions);
        // Neighbors are 25 px away; a 20 px brush (19 px effective) keeps
        // only the point under the cursor.
        let brush = BrushParams::new(20.0, 1.0);
        let touched = touched_indices(
            P0_SCREEN,
            &brush,
            &top_down(),
            VIEWPORT,
            &index,
            &positions,
        );
        assert_eq!(touched, alloc::vec![0]);
    }

    #[test]
    fn coverage_is_monotonic_in_radius() {
        let positions = quad();
        let index = quad_index(&positions);
        let camera = top_down();
        let mut previous: Vec<usize> = Vec::new();
        for radius in [1.0, 5.0, 20.0, 30.0, 50.0, 80.0] {
            let brush = BrushParams::new(radius, 1.0);
            let mut touched =
                touched_indices(P0_SCREEN, &brush, &camera, VIEWPORT, &index, &positions);
            touched.sort_unstable();
            for i in &previous {
                assert!(
                    touched.contains(i),
                    "radius {radius} lost index {i}: {touched:?}"
                );
            }
            previous = touched;
        }
    }

    #[test]
    fn tiny_brush_intersection_fallback_hits_nearest_point() {
        let positions = quad();
        let index = quad_index(&positions);
        // Brush no larger than the sprite: the containment rule would paint
        // nothing, the fallback still paints the sprite under the cursor.
        let brush = BrushParams::new(1.0, 2.0);
        let touched = touched_indices(
            P0_SCREEN,
            &brush,
            &top_down(),
            VIEWPORT,
            &index,
            &positions,
        );
        assert_eq!(touched, alloc::vec![0]);
    }

    #[test]
    fn miss_returns_empty_set() {
        let positions = quad();
        let index = quad_index(&positions);
        let brush = BrushParams::new(10.0, 1.0);
        // A corner of the viewport far from every sprite.
        let touched = touched_indices(
            Point::new(2.0, 2.0),
            &brush,
            &top_down(),
            VIEWPORT,
            &index,
            &positions,
        );
        assert!(touched.is_empty());
    }

    #[test]
    fn empty_cloud_returns_empty_set() {
        let positions: Vec<DVec3> = Vec::new();
        let index = quad_index(&positions);
        let brush = BrushParams::default();
        let touched = touched_indices(
            Point::new(50.0, 50.0),
            &brush,
            &top_down(),
            VIEWPORT,
            &index,
            &positions,
        );
        assert!(touched.is_empty());
    }
}
