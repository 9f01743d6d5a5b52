// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runnable walkthroughs of the Stipple annotation engine.
//!
//! See the `examples/` directory of this crate:
//!
//! - `annotate_quad` — load a four-point cloud, paint it with one stroke,
//!   composite, undo.
//! - `split_view_zoom` — link the cameras for split mode, fit both panes at
//!   once, and zoom anchored at the cursor.
