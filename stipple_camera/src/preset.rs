// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canonical view orientations.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use glam::DVec3;

use crate::state::{CameraState, Projection};

/// The ten canonical view orientations.
///
/// Top and Bottom are plan views and use a parallel projection with +Y as
/// screen-up; the side and isometric views are perspective with +Z up.
/// Isometric presets are named for the world quadrant the camera sits in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ViewPreset {
    /// Looking straight down −Z.
    Top,
    /// Looking straight up +Z.
    Bottom,
    /// Looking along +Y.
    Front,
    /// Looking along −Y.
    Back,
    /// Looking along +X.
    Right,
    /// Looking along −X.
    Left,
    /// Isometric from the (−X, −Y, +Z) corner.
    IsoSw,
    /// Isometric from the (+X, −Y, +Z) corner.
    IsoSe,
    /// Isometric from the (−X, +Y, +Z) corner.
    IsoNw,
    /// Isometric from the (+X, +Y, +Z) corner.
    IsoNe,
}

impl ViewPreset {
    /// All presets, in host-facing order.
    pub const ALL: [Self; 10] = [
        Self::Top,
        Self::Bottom,
        Self::Front,
        Self::Back,
        Self::Right,
        Self::Left,
        Self::IsoSw,
        Self::IsoSe,
        Self::IsoNw,
        Self::IsoNe,
    ];

    /// Look up a preset by its position in [`ALL`][Self::ALL].
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The position of this preset in [`ALL`][Self::ALL].
    pub fn index(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Bottom => 1,
            Self::Front => 2,
            Self::Back => 3,
            Self::Right => 4,
            Self::Left => 5,
            Self::IsoSw => 6,
            Self::IsoSe => 7,
            Self::IsoNw => 8,
            Self::IsoNe => 9,
        }
    }

    /// The unit direction of projection (from the eye towards the scene).
    pub fn direction(self) -> DVec3 {
        let v = match self {
            Self::Top => DVec3::new(0.0, 0.0, -1.0),
            Self::Bottom => DVec3::new(0.0, 0.0, 1.0),
            Self::Front => DVec3::new(0.0, 1.0, 0.0),
            Self::Back => DVec3::new(0.0, -1.0, 0.0),
            Self::Right => DVec3::new(1.0, 0.0, 0.0),
            Self::Left => DVec3::new(-1.0, 0.0, 0.0),
            Self::IsoSw => DVec3::new(1.0, 1.0, -1.0),
            Self::IsoSe => DVec3::new(-1.0, 1.0, -1.0),
            Self::IsoNw => DVec3::new(1.0, -1.0, -1.0),
            Self::IsoNe => DVec3::new(-1.0, -1.0, -1.0),
        };
        v.normalize()
    }

    /// The view-up vector for this orientation.
    pub fn view_up(self) -> DVec3 {
        match self {
            Self::Top | Self::Bottom => DVec3::Y,
            _ => DVec3::Z,
        }
    }

    /// Whether this preset uses a parallel projection.
    pub fn uses_parallel_projection(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// Re-orient `cam` to this preset without changing zoom.
    ///
    /// The eye keeps its distance from the focal point. Switching between
    /// projection kinds converts the zoom so the visible extent is
    /// preserved: the parallel half-height becomes `distance · tan(vfov/2)`
    /// and vice versa the distance is already encoded in the eye position.
    pub fn apply(self, cam: &mut CameraState) {
        let dist = cam.focal_distance();
        let dop = self.direction();
        cam.view_up = self.view_up();
        cam.position = cam.focal_point - dop * dist;
        cam.projection = match (self.uses_parallel_projection(), cam.projection) {
            (true, Projection::Parallel { half_height }) => {
                Projection::Parallel { half_height }
            }
            (true, Projection::Perspective) => Projection::Parallel {
                half_height: dist * (0.5 * cam.vfov).tan(),
            },
            (false, _) => Projection::Perspective,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_round_trip() {
        for (i, preset) in ViewPreset::ALL.iter().enumerate() {
            assert_eq!(preset.index(), i);
            assert_eq!(ViewPreset::from_index(i), Some(*preset));
        }
        assert_eq!(ViewPreset::from_index(10), None);
    }

    #[test]
    fn directions_are_unit_length() {
        for preset in ViewPreset::ALL {
            assert!((preset.direction().length() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn apply_keeps_distance() {
        let mut cam = CameraState {
            position: DVec3::new(0.0, 0.0, 7.5),
            focal_point: DVec3::new(1.0, 2.0, 3.0),
            ..CameraState::default()
        };
        let before = cam.focal_distance();
        ViewPreset::IsoNe.apply(&mut cam);
        assert!((cam.focal_distance() - before).abs() < 1e-9);
        assert_eq!(cam.projection, Projection::Perspective);
        assert_eq!(cam.view_up, DVec3::Z);
    }

    #[test]
    fn top_switches_to_parallel_preserving_extent() {
        let mut cam = CameraState {
            position: DVec3::new(0.0, 0.0, 10.0),
            focal_point: DVec3::ZERO,
            ..CameraState::default()
        };
        let expected = 10.0 * (0.5 * cam.vfov).tan();
        ViewPreset::Top.apply(&mut cam);
        match cam.projection {
            Projection::Parallel { half_height } => {
                assert!((half_height - expected).abs() < 1e-9);
            }
            Projection::Perspective => panic!("top view must be parallel"),
        }
        // Looking straight down with +Y up.
        assert!((cam.view_direction() - DVec3::NEG_Z).length() < 1e-12);
        assert_eq!(cam.view_up, DVec3::Y);
    }

    #[test]
    fn parallel_zoom_survives_preset_round_trip() {
        let mut cam = CameraState {
            position: DVec3::new(0.0, 0.0, 10.0),
            focal_point: DVec3::ZERO,
            view_up: DVec3::Y,
            projection: Projection::Parallel { half_height: 3.0 },
            ..CameraState::default()
        };
        ViewPreset::Bottom.apply(&mut cam);
        assert_eq!(cam.projection, Projection::Parallel { half_height: 3.0 });
    }
}
