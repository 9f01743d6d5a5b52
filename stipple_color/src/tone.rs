// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic tone curves deriving the enhancement buffer from the originals.
//!
//! Both curves operate per channel and preserve value ordering, so contrast
//! boosting never reorders intensities — it only spreads them. They read the
//! original buffer and produce a fresh enhancement buffer; nothing here
//! touches edited colors.

use alloc::vec::Vec;

use kurbo::common::FloatFuncs as _;

use crate::Rgb8;

/// Guard against division by zero on flat channels.
const STRETCH_EPS: f64 = 1e-5;

/// Lower percentile for [`auto_contrast`].
const AUTO_P_LOW: f64 = 2.0;
/// Upper percentile for [`auto_contrast`].
const AUTO_P_HIGH: f64 = 98.0;

/// Gamma correction with per-channel min/max stretch.
///
/// Each channel is normalized to `[0, 1]`, stretched to its observed
/// min/max range, then raised to `gamma`. Gamma 1 with a full-range channel
/// is the identity.
pub fn gamma_curve(original: &[Rgb8], gamma: f64) -> Vec<Rgb8> {
    if original.is_empty() {
        return Vec::new();
    }
    let (lo, hi) = channel_min_max(original);
    map_channels(original, |ch, v| {
        let stretched = (v - lo[ch]) / (hi[ch] - lo[ch] + STRETCH_EPS);
        stretched.powf(gamma)
    })
}

/// Percentile-based auto-contrast.
///
/// Stretches each channel between its 2nd and 98th percentile and clamps,
/// so a few outlier-bright or outlier-dark points do not flatten the rest
/// of the cloud.
pub fn auto_contrast(original: &[Rgb8]) -> Vec<Rgb8> {
    if original.is_empty() {
        return Vec::new();
    }
    let lo = channel_percentile(original, AUTO_P_LOW);
    let hi = channel_percentile(original, AUTO_P_HIGH);
    map_channels(original, |ch, v| {
        ((v - lo[ch]) / (hi[ch] - lo[ch] + STRETCH_EPS)).clamp(0.0, 1.0)
    })
}

/// Apply a per-channel curve over normalized values.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Curve outputs are clamped to [0, 1]; the rounded result fits u8."
)]
fn map_channels(original: &[Rgb8], f: impl Fn(usize, f64) -> f64) -> Vec<Rgb8> {
    original
        .iter()
        .map(|c| {
            let arr = c.to_array();
            let mut out = [0_u8; 3];
            for ch in 0..3 {
                let v = f64::from(arr[ch]) / 255.0;
                out[ch] = (f(ch, v).clamp(0.0, 1.0) * 255.0).round() as u8;
            }
            Rgb8::from(out)
        })
        .collect()
}

/// Per-channel min and max, normalized to `[0, 1]`.
fn channel_min_max(original: &[Rgb8]) -> ([f64; 3], [f64; 3]) {
    let mut lo = [u8::MAX; 3];
    let mut hi = [u8::MIN; 3];
    for c in original {
        let arr = c.to_array();
        for ch in 0..3 {
            lo[ch] = lo[ch].min(arr[ch]);
            hi[ch] = hi[ch].max(arr[ch]);
        }
    }
    (
        lo.map(|v| f64::from(v) / 255.0),
        hi.map(|v| f64::from(v) / 255.0),
    )
}

/// Per-channel nearest-rank percentile, normalized to `[0, 1]`.
///
/// Computed from 256-bin histograms; no sorting, no float accumulation.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The rank is bounded by the buffer length."
)]
fn channel_percentile(original: &[Rgb8], p: f64) -> [f64; 3] {
    let mut hist = [[0_usize; 256]; 3];
    for c in original {
        let arr = c.to_array();
        for ch in 0..3 {
            hist[ch][usize::from(arr[ch])] += 1;
        }
    }
    let n = original.len();
    let rank = ((p / 100.0) * ((n - 1) as f64)).round() as usize;
    let mut out = [0.0; 3];
    for ch in 0..3 {
        let mut cum = 0_usize;
        for (value, &count) in hist[ch].iter().enumerate() {
            cum += count;
            if cum > rank {
                out[ch] = (value as f64) / 255.0;
                break;
            }
        }
    }
    out
}
