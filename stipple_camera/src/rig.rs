// Copyright 2026 the Stipple Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared-camera publishing and the two-pane camera rig.
//!
//! In split mode both viewports are driven by one camera. Rather than
//! aliasing one camera object from two owners, the shared camera is an
//! explicit publish hub: viewports subscribe for change notifications, and
//! entering/leaving split mode is an explicit link/unlink operation.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::state::CameraState;

/// Identifies one of the two viewports.
///
/// The working pane shows the annotated cloud and accepts painting in most
/// modes; the reference pane shows the pristine original.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Pane {
    /// The annotated/working viewport.
    Working,
    /// The original/reference viewport.
    Reference,
}

/// Handle returned by [`SharedCamera::subscribe`], used to unsubscribe.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&CameraState)>;

/// A camera published to multiple observers.
///
/// Mutations go through [`update`][Self::update] (notify after the closure)
/// or [`update_atomic`][Self::update_atomic] (coalesce nested updates into
/// one notification, used e.g. by the two-pass anchored zoom so both panes
/// redraw once, without visible shake).
///
/// Notification is re-entrancy guarded: a listener that mutates the camera
/// again does not recurse into another notification round. Listeners added
/// during a notification start receiving events from the next update.
pub struct SharedCamera {
    state: CameraState,
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
    notifying: bool,
    freeze_depth: u32,
    pending: bool,
}

impl fmt::Debug for SharedCamera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCamera")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .field("freeze_depth", &self.freeze_depth)
            .finish_non_exhaustive()
    }
}

impl SharedCamera {
    /// Wrap a camera state for publishing.
    pub fn new(state: CameraState) -> Self {
        Self {
            state,
            listeners: Vec::new(),
            next_id: 1,
            notifying: false,
            freeze_depth: 0,
            pending: false,
        }
    }

    /// The current camera state.
    pub fn state(&self) -> CameraState {
        self.state
    }

    /// Register a change listener; returns a handle for unsubscribing.
    pub fn subscribe(&mut self, listener: impl FnMut(&CameraState) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Mutate the camera and notify listeners once.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut CameraState) -> R) -> R {
        let out = f(&mut self.state);
        self.notify();
        out
    }

    /// Run `f` with notifications frozen; a single notification is emitted
    /// afterwards if any nested update fired.
    pub fn update_atomic<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.freeze_depth += 1;
        let out = f(self);
        self.freeze_depth -= 1;
        if self.freeze_depth == 0 && self.pending {
            self.pending = false;
            self.notify();
        }
        out
    }

    fn notify(&mut self) {
        if self.freeze_depth > 0 {
            self.pending = true;
            return;
        }
        if self.notifying {
            // Re-entrant mutation from a listener; the outer round already
            // publishes the final state.
            return;
        }
        self.notifying = true;
        let mut listeners = core::mem::take(&mut self.listeners);
        for (_, listener) in &mut listeners {
            listener(&self.state);
        }
        // Listeners subscribed during notification landed in the fresh
        // vector; keep them after the original set.
        let added = core::mem::replace(&mut self.listeners, listeners);
        self.listeners.extend(added);
        self.notifying = false;
    }
}

/// The camera arrangement for the two viewports.
///
/// In single mode each pane owns an independent camera. Linking promotes the
/// working camera into a [`SharedCamera`] that drives both panes; unlinking
/// copies the shared state back into two independent cameras (both panes
/// keep the current view).
#[derive(Debug)]
pub struct CameraRig {
    working: CameraState,
    reference: CameraState,
    shared: Option<SharedCamera>,
}

impl CameraRig {
    /// Create an unlinked rig with the same state for both panes.
    pub fn new(camera: CameraState) -> Self {
        Self {
            working: camera,
            reference: camera,
            shared: None,
        }
    }

    /// Whether the panes currently share one camera.
    pub fn is_shared(&self) -> bool {
        self.shared.is_some()
    }

    /// The shared camera hub, when linked.
    pub fn shared(&self) -> Option<&SharedCamera> {
        self.shared.as_ref()
    }

    /// Mutable access to the shared camera hub, when linked.
    pub fn shared_mut(&mut self) -> Option<&mut SharedCamera> {
        self.shared.as_mut()
    }

    /// The camera state governing `pane`.
    pub fn camera(&self, pane: Pane) -> CameraState {
        match (&self.shared, pane) {
            (Some(shared), _) => shared.state(),
            (None, Pane::Working) => self.working,
            (None, Pane::Reference) => self.reference,
        }
    }

    /// Mutate the camera governing `pane`.
    ///
    /// On a linked rig this routes through the shared hub and notifies its
    /// listeners regardless of which pane is named.
    pub fn update<R>(&mut self, pane: Pane, f: impl FnOnce(&mut CameraState) -> R) -> R {
        match (&mut self.shared, pane) {
            (Some(shared), _) => shared.update(f),
            (None, Pane::Working) => f(&mut self.working),
            (None, Pane::Reference) => f(&mut self.reference),
        }
    }

    /// Mutate each independent camera, or the shared one once.
    pub fn update_each(&mut self, mut f: impl FnMut(&mut CameraState)) {
        match &mut self.shared {
            Some(shared) => shared.update(|cam| f(cam)),
            None => {
                f(&mut self.working);
                f(&mut self.reference);
            }
        }
    }

    /// Enter split-shared mode: the working camera becomes the shared one.
    ///
    /// No-op when already linked. Returns the hub so the host can subscribe
    /// its redraw listeners.
    pub fn link(&mut self) -> &mut SharedCamera {
        if self.shared.is_none() {
            self.shared = Some(SharedCamera::new(self.working));
        }
        self.shared
            .as_mut()
            .expect("just ensured the shared camera exists")
    }

    /// Leave split-shared mode; both panes keep the last shared view.
    pub fn unlink(&mut self) {
        if let Some(shared) = self.shared.take() {
            let state = shared.state();
            self.working = state;
            self.reference = state;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::RefCell;
    use glam::DVec3;

    fn moved(cam: &mut CameraState, dx: f64) {
        cam.position += DVec3::new(dx, 0.0, 0.0);
        cam.focal_point += DVec3::new(dx, 0.0, 0.0);
    }

    #[test]
    fn update_notifies_listeners() {
        let mut shared = SharedCamera::new(CameraState::default());
        let seen = Rc::new(RefCell::new(0));
        let seen2 = Rc::clone(&seen);
        shared.subscribe(move |_| *seen2.borrow_mut() += 1);

        shared.update(|cam| moved(cam, 1.0));
        shared.update(|cam| moved(cam, 1.0));
        assert_eq!(*seen.borrow(), 2);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut shared = SharedCamera::new(CameraState::default());
        let seen = Rc::new(RefCell::new(0));
        let seen2 = Rc::clone(&seen);
        let id = shared.subscribe(move |_| *seen2.borrow_mut() += 1);

        shared.update(|cam| moved(cam, 1.0));
        assert!(shared.unsubscribe(id));
        assert!(!shared.unsubscribe(id));
        shared.update(|cam| moved(cam, 1.0));
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn atomic_update_notifies_once() {
        let mut shared = SharedCamera::new(CameraState::default());
        let seen = Rc::new(RefCell::new(0));
        let seen2 = Rc::clone(&seen);
        shared.subscribe(move |_| *seen2.borrow_mut() += 1);

        shared.update_atomic(|s| {
            s.update(|cam| moved(cam, 1.0));
            s.update(|cam| moved(cam, 1.0));
            s.update(|cam| moved(cam, 1.0));
        });
        assert_eq!(*seen.borrow(), 1);
        assert_eq!(shared.state().position.x, 3.0);
    }

    #[test]
    fn atomic_without_nested_updates_stays_silent() {
        let mut shared = SharedCamera::new(CameraState::default());
        let seen = Rc::new(RefCell::new(0));
        let seen2 = Rc::clone(&seen);
        shared.subscribe(move |_| *seen2.borrow_mut() += 1);

        shared.update_atomic(|_| {});
        assert_eq!(*seen.borrow(), 0);
    }

    #[test]
    fn rig_single_mode_cameras_are_independent() {
        let mut rig = CameraRig::new(CameraState::default());
        rig.update(Pane::Working, |cam| moved(cam, 5.0));
        assert_eq!(rig.camera(Pane::Working).position.x, 5.0);
        assert_eq!(rig.camera(Pane::Reference).position.x, 0.0);
    }

    #[test]
    fn link_promotes_working_camera() {
        let mut rig = CameraRig::new(CameraState::default());
        rig.update(Pane::Working, |cam| moved(cam, 2.0));
        rig.link();
        assert!(rig.is_shared());
        // Both panes now see the working view.
        assert_eq!(rig.camera(Pane::Reference).position.x, 2.0);
    }

    #[test]
    fn linked_updates_reach_both_panes_and_listeners() {
        let mut rig = CameraRig::new(CameraState::default());
        let seen = Rc::new(RefCell::new(0));
        let seen2 = Rc::clone(&seen);
        rig.link().subscribe(move |_| *seen2.borrow_mut() += 1);

        rig.update(Pane::Reference, |cam| moved(cam, 3.0));
        assert_eq!(*seen.borrow(), 1);
        assert_eq!(rig.camera(Pane::Working).position.x, 3.0);
        assert_eq!(rig.camera(Pane::Reference).position.x, 3.0);
    }

    #[test]
    fn unlink_keeps_current_view_in_both_panes() {
        let mut rig = CameraRig::new(CameraState::default());
        rig.link();
        rig.update(Pane::Working, |cam| moved(cam, 4.0));
        rig.unlink();
        assert!(!rig.is_shared());
        assert_eq!(rig.camera(Pane::Working).position.x, 4.0);
        assert_eq!(rig.camera(Pane::Reference).position.x, 4.0);
        // Independent again.
        rig.update(Pane::Working, |cam| moved(cam, 1.0));
        assert_eq!(rig.camera(Pane::Reference).position.x, 4.0);
    }

    #[test]
    fn relink_is_noop_and_keeps_listeners() {
        let mut rig = CameraRig::new(CameraState::default());
        let seen = Rc::new(RefCell::new(0));
        let seen2 = Rc::clone(&seen);
        rig.link().subscribe(move |_| *seen2.borrow_mut() += 1);
        rig.link();
        rig.update(Pane::Working, |cam| moved(cam, 1.0));
        assert_eq!(*seen.borrow(), 1);
    }
}
