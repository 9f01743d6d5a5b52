// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared-camera split view: one camera, two aspect ratios, anchored zoom.

use kurbo::{Point, Size};
use stipple_camera::{
    CameraRig, CameraState, FIT_PADDING, Pane, ViewPreset, fit_shared_once, zoom_at_cursor,
};
use stipple_index::Aabb3;

fn main() {
    let bounds = Aabb3::new(-4.0, -2.0, 0.0, 4.0, 2.0, 3.0);
    let wide = Size::new(1280.0, 720.0);
    let narrow = Size::new(480.0, 640.0);

    let mut cam = CameraState::default();
    ViewPreset::IsoNe.apply(&mut cam);

    let mut rig = CameraRig::new(cam);
    let hub = rig.link();
    hub.subscribe(|cam| println!("observer: camera moved to {:?}", cam.position));

    // One fit satisfying both panes at once; the observer fires once.
    rig.shared_mut().unwrap().update(|cam| {
        fit_shared_once(cam, &bounds, wide, narrow, FIT_PADDING);
    });

    // Corner visibility in both panes.
    let cam = rig.camera(Pane::Working);
    for (label, viewport) in [("wide", wide), ("narrow", narrow)] {
        let p = cam
            .project(glam::DVec3::new(4.0, 2.0, 3.0), viewport)
            .expect("fitted corner projects");
        println!("{label}: corner at ({:.1}, {:.1}) in {viewport:?}", p.x, p.y);
    }

    // Zoom three detents at a fixed cursor; atomic, so the observer fires
    // once per wheel event, not once per internal pass.
    let cursor = Point::new(300.0, 200.0);
    for _ in 0..3 {
        rig.shared_mut().unwrap().update_atomic(|hub| {
            hub.update(|cam| zoom_at_cursor(cam, cursor, wide, 120.0));
        });
    }

    rig.unlink();
    println!("unlinked: panes keep the zoomed view independently");
}
