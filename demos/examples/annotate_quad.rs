// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint a tiny cloud end to end: load, stroke, composite, undo.

use glam::DVec3;
use kurbo::Size;
use stipple_color::Rgb8;
use stipple_session::{AnnotationSession, CloudDocument, Modifiers, Pane};

fn main() {
    // Four black points on the unit square, as a file loader would hand
    // them over.
    let positions = vec![
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(1.0, 0.0, 0.0),
        DVec3::new(0.0, 1.0, 0.0),
        DVec3::new(1.0, 1.0, 0.0),
    ];
    let document = CloudDocument::new(positions, None, None);

    let mut session = AnnotationSession::new(document);
    session.resize(Pane::Working, Size::new(100.0, 100.0), 0);
    session.resize(Pane::Reference, Size::new(100.0, 100.0), 0);
    session.poll(1000);

    session.set_paint_color(Rgb8::new(255, 0, 0));
    session.set_brush_radius(150.0);

    // One stroke over the first point; the brush is wide enough to cover
    // the whole quad.
    let cursor = session
        .camera(Pane::Working)
        .project(session.document().positions()[0], Size::new(100.0, 100.0))
        .expect("fitted point projects");
    session.pointer_down(Pane::Working, cursor, Modifiers::empty(), 2000);
    session.pointer_up(Pane::Working, cursor, 2020);

    println!("edited:    {:?}", session.document().layers().edited());
    println!("display:   {:?}", session.composite());
    println!(
        "history:   {} entr{}",
        session.document().layers().history().undo_depth(),
        if session.document().layers().history().undo_depth() == 1 {
            "y"
        } else {
            "ies"
        }
    );

    session.undo();
    println!("after undo: {:?}", session.document().layers().edited());
    println!("unsaved edits: {}", session.has_unsaved_edits());
}
