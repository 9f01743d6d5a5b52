// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debounced camera refits.

/// Default debounce window: about two frames at 60 Hz.
pub const FIT_DEBOUNCE_MS: u64 = 33;

/// Coalesces bursts of fit requests into a single fit.
///
/// Resizes, mode toggles and view-preset changes all want a refit, but
/// re-fitting synchronously on each trigger thrashes the camera during e.g.
/// a window drag-resize. Every [`request`][Self::request] restarts the
/// window; [`poll`][Self::poll] reports `true` once, when the window has
/// lapsed with no further requests.
///
/// The scheduler never reads a clock; callers pass timestamps in
/// milliseconds, the same convention as the paint throttle.
///
/// # Example
///
/// ```rust
/// use stipple_camera::FitScheduler;
///
/// let mut fits = FitScheduler::new();
/// fits.request(1000);
/// fits.request(1010); // still resizing; restarts the window
/// assert!(!fits.poll(1020));
/// assert!(fits.poll(1043)); // 33 ms after the last request
/// assert!(!fits.poll(1044)); // fires at most once
/// ```
#[derive(Clone, Debug)]
pub struct FitScheduler {
    delay_ms: u64,
    deadline: Option<u64>,
}

impl FitScheduler {
    /// Create a scheduler with the default window.
    pub fn new() -> Self {
        Self::with_delay(FIT_DEBOUNCE_MS)
    }

    /// Create a scheduler with a custom window in milliseconds.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            deadline: None,
        }
    }

    /// Ask for a fit; restarts the debounce window.
    pub fn request(&mut self, now_ms: u64) {
        self.deadline = Some(now_ms.saturating_add(self.delay_ms));
    }

    /// Whether a fit is scheduled and not yet fired.
    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop any scheduled fit.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` exactly once per burst, when the window has lapsed.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for FitScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coalesces_rapid_requests() {
        let mut fits = FitScheduler::new();
        for t in (0..100).step_by(10) {
            fits.request(t);
            assert!(!fits.poll(t + 5), "must not fire mid-burst");
        }
        // Last request at t=90; fires once at 123.
        assert!(!fits.poll(122));
        assert!(fits.poll(123));
        assert!(!fits.poll(200));
    }

    #[test]
    fn idle_scheduler_never_fires() {
        let mut fits = FitScheduler::new();
        assert!(!fits.pending());
        assert!(!fits.poll(u64::MAX));
    }

    #[test]
    fn cancel_discards_request() {
        let mut fits = FitScheduler::new();
        fits.request(0);
        assert!(fits.pending());
        fits.cancel();
        assert!(!fits.poll(1000));
    }

    #[test]
    fn custom_delay() {
        let mut fits = FitScheduler::with_delay(5);
        fits.request(10);
        assert!(!fits.poll(14));
        assert!(fits.poll(15));
    }
}
