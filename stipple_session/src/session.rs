// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The annotation session state machine.

use alloc::vec::Vec;

use hashbrown::HashSet;
use kurbo::{Point, Size};

use stipple_brush::stroke::{LineWalker, PaintThrottle, StrokeWalker};
use stipple_brush::{BrushParams, touched_indices};
use stipple_camera::{
    CameraRig, CameraState, FIT_PADDING, FitScheduler, Pane, ViewPreset, fit_shared_once,
    fit_to_bounds, zoom_at_cursor,
};
use stipple_color::{PaintSource, Rgb8};

use crate::document::CloudDocument;
use crate::events::{Modifiers, PointerButtons, PointerEvent};
use crate::mode::Mode;

/// What the host must redraw after a session call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Refresh {
    /// Nothing changed.
    None,
    /// The display colors of these points changed; recomposite just them.
    Subset(Vec<usize>),
    /// Recomposite the whole display buffer.
    Full,
    /// Camera state changed; re-render both panes from their cameras.
    Camera,
}

impl Refresh {
    fn from_indices(mut indices: Vec<usize>) -> Self {
        if indices.is_empty() {
            return Self::None;
        }
        indices.sort_unstable();
        indices.dedup();
        Self::Subset(indices)
    }
}

/// The in-flight stroke: one value instead of scattered flags, so
/// "no stroke" and "stroke active" are the only representable states.
#[derive(Debug)]
struct Stroke {
    pane: Pane,
    touched: HashSet<usize>,
    walker: Walker,
}

#[derive(Debug)]
enum Walker {
    Free(StrokeWalker),
    Line(LineWalker),
}

/// The interactive annotation engine.
///
/// Owns the document, the camera rig, the brush, the mode, and the stroke
/// state machine. Single-threaded and synchronous: every call reads a
/// consistent camera and buffer snapshot, and pointer events must arrive in
/// order.
#[derive(Debug)]
pub struct AnnotationSession {
    document: CloudDocument,
    rig: CameraRig,
    mode: Mode,
    brush: BrushParams,
    paint_color: Rgb8,
    preset: ViewPreset,
    throttle: PaintThrottle,
    fits: FitScheduler,
    working_viewport: Size,
    reference_viewport: Size,
    stroke: Option<Stroke>,
}

impl AnnotationSession {
    /// Create a session over a loaded document, starting in the top-down
    /// view with the cloud fitted.
    pub fn new(document: CloudDocument) -> Self {
        let preset = ViewPreset::Top;
        let mut camera = CameraState::default();
        preset.apply(&mut camera);
        let mut session = Self {
            document,
            rig: CameraRig::new(camera),
            mode: Mode::Normal,
            brush: BrushParams::default(),
            paint_color: Rgb8::new(255, 0, 0),
            preset,
            throttle: PaintThrottle::new(),
            fits: FitScheduler::new(),
            working_viewport: Size::new(800.0, 600.0),
            reference_viewport: Size::new(800.0, 600.0),
            stroke: None,
        };
        session.fit_now();
        session
    }

    /// Replace the document wholesale (navigation to another cloud).
    ///
    /// Any in-flight stroke is dropped with the old buffers; tool settings
    /// survive, history does not (it lives in the document's layers).
    pub fn load(&mut self, document: CloudDocument) -> Refresh {
        self.stroke = None;
        self.throttle.reset();
        self.document = document;
        self.fit_now();
        Refresh::Full
    }

    /// The loaded document.
    pub fn document(&self) -> &CloudDocument {
        &self.document
    }

    /// The active tool mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The brush geometry.
    pub fn brush(&self) -> &BrushParams {
        &self.brush
    }

    /// The current paint color.
    pub fn paint_color(&self) -> Rgb8 {
        self.paint_color
    }

    /// The active view preset.
    pub fn view_preset(&self) -> ViewPreset {
        self.preset
    }

    /// The camera rig (subscribe to the shared hub here in split mode).
    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    /// Mutable camera rig access.
    pub fn rig_mut(&mut self) -> &mut CameraRig {
        &mut self.rig
    }

    /// The camera governing `pane`.
    pub fn camera(&self, pane: Pane) -> CameraState {
        self.rig.camera(pane)
    }

    /// Whether a stroke is in flight.
    pub fn stroke_active(&self) -> bool {
        self.stroke.is_some()
    }

    /// Whether the edited buffer differs from the originals anywhere.
    pub fn has_unsaved_edits(&self) -> bool {
        self.document.layers().has_edits()
    }

    /// Whether any point was touched this session (gates UI affordances).
    pub fn any_session_dirty(&self) -> bool {
        self.document.layers().any_session_dirty()
    }

    /// The full display buffer; see [`stipple_color::ColorLayers::composite`].
    pub fn composite(&self) -> Vec<Rgb8> {
        self.document.layers().composite()
    }

    /// Display colors for a subset of points.
    pub fn composite_subset(&self, indices: &[usize]) -> Vec<(usize, Rgb8)> {
        self.document.layers().composite_subset(indices)
    }

    /// The color buffer to persist.
    pub fn save_colors(&self, bake_enhancement: bool) -> Vec<Rgb8> {
        self.document.save_colors(bake_enhancement)
    }

    /// Dispatch one normalized pointer event.
    pub fn handle(&mut self, event: PointerEvent) -> Refresh {
        match event {
            PointerEvent::Down {
                pane,
                pos,
                modifiers,
                time_ms,
            } => self.pointer_down(pane, pos, modifiers, time_ms),
            PointerEvent::Move {
                pane,
                pos,
                buttons,
                time_ms,
            } => self.pointer_move(pane, pos, buttons, time_ms),
            PointerEvent::Up { pane, pos, time_ms } => self.pointer_up(pane, pos, time_ms),
            PointerEvent::Wheel {
                pane, pos, delta, ..
            } => self.wheel(pane, pos, delta),
        }
    }

    /// Begin a stroke, stamping once at the down position.
    ///
    /// Only the mode's accepting pane starts strokes; Shift at stroke start
    /// selects the straight-line walker.
    pub fn pointer_down(
        &mut self,
        pane: Pane,
        pos: Point,
        modifiers: Modifiers,
        time_ms: u64,
    ) -> Refresh {
        if self.stroke.is_some() || self.document.is_empty() {
            return Refresh::None;
        }
        if pane != self.mode.accepting_pane() {
            return Refresh::None;
        }

        self.document.layers_mut().begin_stroke();
        self.throttle.reset();
        let _ = self.throttle.ready(time_ms);

        let walker = if modifiers.contains(Modifiers::SHIFT) {
            Walker::Line(LineWalker::new(pos))
        } else {
            let mut free = StrokeWalker::new();
            free.start(pos);
            Walker::Free(free)
        };
        let mut stroke = Stroke {
            pane,
            touched: HashSet::new(),
            walker,
        };

        let stamped = self.stamp_at(pane, &[pos]);
        stroke.touched.extend(stamped.iter().copied());
        self.stroke = Some(stroke);
        Refresh::from_indices(stamped)
    }

    /// Continue the in-flight stroke.
    ///
    /// Moves without the primary button held are hovers and paint nothing.
    /// Painting moves are rate-limited to about 120 evaluations per second;
    /// dropped events cost nothing and the next kept event interpolates
    /// across the gap, so throttling never leaves holes.
    pub fn pointer_move(
        &mut self,
        pane: Pane,
        pos: Point,
        buttons: PointerButtons,
        time_ms: u64,
    ) -> Refresh {
        let Some(mut stroke) = self.stroke.take() else {
            return Refresh::None;
        };
        if pane != stroke.pane
            || !buttons.contains(PointerButtons::PRIMARY)
            || !self.throttle.ready(time_ms)
        {
            self.stroke = Some(stroke);
            return Refresh::None;
        }

        let camera = self.rig.camera(stroke.pane);
        let viewport = self.viewport(stroke.pane);
        let brush = self.brush;
        let source = self.paint_source();

        let mut stamped: Vec<usize> = Vec::new();
        let (index, positions, layers) = self.document.parts_mut();
        let mut stamp = |p: Point| {
            let idxs = touched_indices(p, &brush, &camera, viewport, index, positions);
            if !idxs.is_empty() {
                layers.apply(&idxs, source);
                stamped.extend_from_slice(&idxs);
            }
        };
        match &mut stroke.walker {
            Walker::Free(walker) => walker.advance(pos, brush.radius_px(), &mut stamp),
            Walker::Line(walker) => walker.advance(pos, brush.radius_px(), &mut stamp),
        }

        stroke.touched.extend(stamped.iter().copied());
        self.stroke = Some(stroke);
        Refresh::from_indices(stamped)
    }

    /// Finish the stroke, committing one history entry for the whole
    /// gesture.
    pub fn pointer_up(&mut self, _pane: Pane, _pos: Point, _time_ms: u64) -> Refresh {
        let Some(stroke) = self.stroke.take() else {
            return Refresh::None;
        };
        self.throttle.reset();
        self.commit_stroke(stroke);
        Refresh::Full
    }

    /// Abandon the stroke without committing (pointer left the viewport).
    ///
    /// Partial edits stay in the edited buffer; no history entry is
    /// recorded. This preserves the observed behavior of the feature rather
    /// than inventing a rollback.
    pub fn abandon_stroke(&mut self) -> Refresh {
        if self.stroke.take().is_none() {
            return Refresh::None;
        }
        self.throttle.reset();
        self.document.layers_mut().cancel_stroke();
        Refresh::None
    }

    /// Zoom at the cursor; in split mode the shared camera updates
    /// atomically so both panes redraw once.
    pub fn wheel(&mut self, pane: Pane, pos: Point, delta: f64) -> Refresh {
        let viewport = self.viewport(pane);
        if let Some(shared) = self.rig.shared_mut() {
            shared.update_atomic(|hub| {
                hub.update(|cam| zoom_at_cursor(cam, pos, viewport, delta));
            });
        } else {
            self.rig
                .update(pane, |cam| zoom_at_cursor(cam, pos, viewport, delta));
        }
        Refresh::Camera
    }

    /// Undo the latest stroke. No-op on an empty stack.
    pub fn undo(&mut self) -> Refresh {
        match self.document.layers_mut().undo() {
            Some(indices) => Refresh::from_indices(indices),
            None => Refresh::None,
        }
    }

    /// Redo the latest undone stroke. No-op on an empty stack.
    pub fn redo(&mut self) -> Refresh {
        match self.document.layers_mut().redo() {
            Some(indices) => Refresh::from_indices(indices),
            None => Refresh::None,
        }
    }

    /// Switch tool mode.
    ///
    /// An in-flight stroke is committed first, atomically, so the buffers
    /// are never left half-written under a different mode. Entering a split
    /// mode links the cameras and schedules a shared fit; leaving unlinks
    /// them.
    pub fn set_mode(&mut self, mode: Mode, now_ms: u64) -> Refresh {
        if mode == self.mode {
            return Refresh::None;
        }
        if let Some(stroke) = self.stroke.take() {
            self.throttle.reset();
            self.commit_stroke(stroke);
        }

        let was_split = self.mode.wants_split();
        let wants_split = mode.wants_split();
        self.mode = mode;

        if mode == Mode::Clone {
            // The clone tool is meaningless with annotations hidden.
            self.document.layers_mut().set_annotations_visible(true);
        }

        if wants_split && !was_split {
            self.rig.link();
            self.fits.request(now_ms);
        } else if !wants_split && was_split {
            self.rig.unlink();
            self.fits.request(now_ms);
        }
        Refresh::Full
    }

    /// Set the paint color.
    ///
    /// Ignored in Clone mode (the clone source is the original buffer);
    /// picking a color while erasing returns to Normal painting.
    pub fn set_paint_color(&mut self, color: Rgb8) -> Refresh {
        if self.mode == Mode::Clone {
            return Refresh::None;
        }
        self.paint_color = color;
        if self.mode == Mode::Eraser {
            self.mode = Mode::Normal;
        }
        Refresh::None
    }

    /// Set the brush radius in pixels (clamped).
    pub fn set_brush_radius(&mut self, radius_px: f64) {
        self.brush.set_radius_px(radius_px);
    }

    /// Set the rendered point-sprite radius in pixels (clamped).
    pub fn set_sprite_radius(&mut self, sprite_radius_px: f64) {
        self.brush.set_sprite_radius_px(sprite_radius_px);
    }

    /// Set the annotation blend alpha.
    pub fn set_alpha(&mut self, alpha: f64) -> Refresh {
        self.document.layers_mut().set_alpha(alpha);
        Refresh::Full
    }

    /// Show or hide annotations.
    pub fn set_annotations_visible(&mut self, visible: bool) -> Refresh {
        self.document.layers_mut().set_annotations_visible(visible);
        Refresh::Full
    }

    /// Recompute the enhancement with a gamma curve.
    pub fn set_gamma(&mut self, gamma: f64) -> Refresh {
        self.document.layers_mut().set_enhancement_gamma(gamma);
        Refresh::Full
    }

    /// Recompute the enhancement with percentile auto-contrast.
    pub fn apply_auto_contrast(&mut self) -> Refresh {
        self.document.layers_mut().set_enhancement_auto_contrast();
        Refresh::Full
    }

    /// Reset the enhancement to the plain originals.
    pub fn reset_contrast(&mut self) -> Refresh {
        self.document.layers_mut().reset_enhancement();
        Refresh::Full
    }

    /// Apply a view preset to the rig (both panes, or the shared camera
    /// once) and schedule a debounced refit.
    pub fn set_view_preset(&mut self, preset: ViewPreset, now_ms: u64) -> Refresh {
        self.preset = preset;
        self.rig.update_each(|cam| preset.apply(cam));
        self.fits.request(now_ms);
        Refresh::Camera
    }

    /// Record a viewport resize and schedule a debounced refit.
    pub fn resize(&mut self, pane: Pane, size: Size, now_ms: u64) -> Refresh {
        match pane {
            Pane::Working => self.working_viewport = size,
            Pane::Reference => self.reference_viewport = size,
        }
        self.fits.request(now_ms);
        Refresh::None
    }

    /// Run due deferred work (the debounced fit). Call once per frame or
    /// timer tick.
    pub fn poll(&mut self, now_ms: u64) -> Refresh {
        if self.fits.poll(now_ms) {
            self.fit_now();
            Refresh::Camera
        } else {
            Refresh::None
        }
    }

    /// Fit immediately, bypassing the debounce.
    pub fn fit_now(&mut self) {
        self.fits.cancel();
        let Some(bounds) = self.document.bounds().copied() else {
            return;
        };
        let working = self.working_viewport;
        let reference = self.reference_viewport;
        if let Some(shared) = self.rig.shared_mut() {
            shared.update_atomic(|hub| {
                hub.update(|cam| fit_shared_once(cam, &bounds, working, reference, FIT_PADDING));
            });
        } else {
            self.rig.update(Pane::Working, |cam| {
                fit_to_bounds(cam, &bounds, working, FIT_PADDING);
            });
            self.rig.update(Pane::Reference, |cam| {
                fit_to_bounds(cam, &bounds, reference, FIT_PADDING);
            });
        }
    }

    fn viewport(&self, pane: Pane) -> Size {
        match pane {
            Pane::Working => self.working_viewport,
            Pane::Reference => self.reference_viewport,
        }
    }

    fn paint_source(&self) -> PaintSource {
        if self.mode.paints_original() {
            PaintSource::Original
        } else {
            PaintSource::Color(self.paint_color)
        }
    }

    /// Stamp the brush at each position, applying color; returns every
    /// touched index (possibly with repeats).
    fn stamp_at(&mut self, pane: Pane, stamps: &[Point]) -> Vec<usize> {
        let camera = self.rig.camera(pane);
        let viewport = self.viewport(pane);
        let brush = self.brush;
        let source = self.paint_source();
        let (index, positions, layers) = self.document.parts_mut();
        let mut out = Vec::new();
        for &p in stamps {
            let idxs = touched_indices(p, &brush, &camera, viewport, index, positions);
            if !idxs.is_empty() {
                layers.apply(&idxs, source);
                out.extend_from_slice(&idxs);
            }
        }
        out
    }

    fn commit_stroke(&mut self, stroke: Stroke) {
        let mut indices: Vec<usize> = stroke.touched.into_iter().collect();
        indices.sort_unstable();
        self.document.layers_mut().commit_stroke(&indices);
    }
}
