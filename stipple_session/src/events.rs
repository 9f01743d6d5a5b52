// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Normalized pointer input.

use kurbo::Point;

use stipple_camera::Pane;

bitflags::bitflags! {
    /// Keyboard modifiers held when a pointer event fired.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Shift; at stroke start this constrains the stroke to a line.
        const SHIFT   = 0b0000_0001;
        /// Control.
        const CONTROL = 0b0000_0010;
        /// Alt/Option.
        const ALT     = 0b0000_0100;
    }
}

bitflags::bitflags! {
    /// Pointer buttons held during a move event.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct PointerButtons: u8 {
        /// The paint button.
        const PRIMARY   = 0b0000_0001;
        /// Secondary button (host-side camera interaction).
        const SECONDARY = 0b0000_0010;
        /// Middle button/wheel press.
        const MIDDLE    = 0b0000_0100;
    }
}

/// One event of the normalized pointer stream.
///
/// Hosts translate their toolkit's events into this shape; `Down`/`Up` are
/// primary-button events by contract (secondary buttons drive host-side
/// camera interaction and never start strokes). Timestamps are monotonic
/// milliseconds supplied by the caller; events must be delivered in arrival
/// order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PointerEvent {
    /// Primary button pressed.
    Down {
        /// Viewport the event fired in.
        pane: Pane,
        /// Viewport-local position, y down.
        pos: Point,
        /// Modifiers held at press time.
        modifiers: Modifiers,
        /// Event timestamp in milliseconds.
        time_ms: u64,
    },
    /// Pointer moved. Only moves with the primary button held paint; the
    /// session ignores all moves while no stroke is active.
    Move {
        /// Viewport the event fired in.
        pane: Pane,
        /// Viewport-local position, y down.
        pos: Point,
        /// Buttons held during the move.
        buttons: PointerButtons,
        /// Event timestamp in milliseconds.
        time_ms: u64,
    },
    /// Primary button released.
    Up {
        /// Viewport the event fired in.
        pane: Pane,
        /// Viewport-local position, y down.
        pos: Point,
        /// Event timestamp in milliseconds.
        time_ms: u64,
    },
    /// Scroll wheel.
    Wheel {
        /// Viewport the event fired in.
        pane: Pane,
        /// Cursor position the zoom anchors to.
        pos: Point,
        /// Wheel delta; 120 units per detent, positive zooms in.
        delta: f64,
        /// Event timestamp in milliseconds.
        time_ms: u64,
    },
}
