// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke path interpolation and paint-rate throttling.
//!
//! Pointer-move events arrive far sparser than a brush footprint at speed:
//! stamping only the event positions leaves gaps. The walkers here turn an
//! event stream into a dense series of stamp positions spaced at a fraction
//! of the brush radius.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use kurbo::Point;

/// Stamp spacing as a fraction of the brush radius.
///
/// Denser than the visual brush size so fast strokes do not leave gaps
/// while staying cheap.
pub const STEP_FRACTION: f64 = 0.33;

/// Minimum interval between brush evaluations, ~120 Hz.
///
/// Brush computation is expensive relative to the input event rate; this is
/// a responsiveness/cost tradeoff, not a correctness requirement.
pub const MIN_PAINT_INTERVAL_MS: u64 = 8;

/// Freehand stroke interpolator.
///
/// Walks the segment between consecutive pointer positions and stamps every
/// `STEP_FRACTION × radius` pixels, ending exactly on the newest position.
#[derive(Clone, Debug)]
pub struct StrokeWalker {
    step_fraction: f64,
    last: Option<Point>,
}

impl StrokeWalker {
    /// Create a walker with the default step fraction.
    pub fn new() -> Self {
        Self {
            step_fraction: STEP_FRACTION,
            last: None,
        }
    }

    /// Create a walker with a custom step fraction.
    pub fn with_step_fraction(step_fraction: f64) -> Self {
        Self {
            step_fraction: step_fraction.clamp(0.05, 1.0),
            last: None,
        }
    }

    /// Begin the stroke at the pointer-down position.
    pub fn start(&mut self, at: Point) {
        self.last = Some(at);
    }

    /// Walk from the previous position to `to`, invoking `stamp` at each
    /// interpolated step.
    ///
    /// The first call after construction (without [`start`][Self::start])
    /// stamps `to` alone and records it.
    pub fn advance(&mut self, to: Point, brush_radius_px: f64, mut stamp: impl FnMut(Point)) {
        let Some(last) = self.last else {
            self.last = Some(to);
            stamp(to);
            return;
        };
        let dx = to.x - last.x;
        let dy = to.y - last.y;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist < 1e-6 {
            return;
        }
        let step = (self.step_fraction * brush_radius_px).max(1.0);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "dist/step is small and non-negative by construction."
        )]
        let steps = ((dist / step) as usize).max(1);
        for i in 1..=steps {
            let t = (i as f64) / (steps as f64);
            stamp(Point::new(last.x + dx * t, last.y + dy * t));
        }
        self.last = Some(to);
    }
}

impl Default for StrokeWalker {
    fn default() -> Self {
        Self::new()
    }
}

/// Straight-line stroke interpolator (modifier-constrained strokes).
///
/// The stroke is pinned to the ray from its anchor through the current
/// pointer position. Painted length accumulates monotonically, so wiggling
/// the pointer back and forth never re-stamps already-covered ground; each
/// call stamps at most one new position further along the line.
#[derive(Clone, Debug)]
pub struct LineWalker {
    step_fraction: f64,
    anchor: Point,
    painted_len: f64,
}

impl LineWalker {
    /// Create a line walker anchored at the stroke's starting position.
    pub fn new(anchor: Point) -> Self {
        Self {
            step_fraction: STEP_FRACTION,
            anchor,
            painted_len: 0.0,
        }
    }

    /// The stroke anchor.
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    /// Advance the painted front towards `current`, stamping at most once.
    pub fn advance(&mut self, current: Point, brush_radius_px: f64, mut stamp: impl FnMut(Point)) {
        let dx = current.x - self.anchor.x;
        let dy = current.y - self.anchor.y;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist <= 1e-6 {
            return;
        }
        let step = (self.step_fraction * brush_radius_px).max(1.0);
        let t0 = self.painted_len / dist;
        let t1 = ((self.painted_len + step) / dist).min(1.0);
        if t1 <= t0 {
            return;
        }
        stamp(Point::new(self.anchor.x + dx * t1, self.anchor.y + dy * t1));
        self.painted_len = t1 * dist;
    }
}

/// Drops paint evaluations that arrive faster than the minimum interval.
///
/// Timestamps are caller-supplied milliseconds; the throttle never reads a
/// clock.
#[derive(Clone, Debug)]
pub struct PaintThrottle {
    min_interval_ms: u64,
    last_ms: Option<u64>,
}

impl PaintThrottle {
    /// Create a throttle at the default ~120 Hz rate.
    pub fn new() -> Self {
        Self::with_interval(MIN_PAINT_INTERVAL_MS)
    }

    /// Create a throttle with a custom minimum interval.
    pub fn with_interval(min_interval_ms: u64) -> Self {
        Self {
            min_interval_ms,
            last_ms: None,
        }
    }

    /// Whether a paint evaluation may run now; records the timestamp when it
    /// may.
    pub fn ready(&mut self, now_ms: u64) -> bool {
        match self.last_ms {
            Some(last) if now_ms.saturating_sub(last) < self.min_interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }

    /// Forget the last evaluation time (e.g. at stroke end).
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

impl Default for PaintThrottle {
    fn default() -> Self {
        Self::new()
    }
}
