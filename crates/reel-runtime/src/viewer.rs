#![forbid(unsafe_code)]

//! Viewer: the host-facing loop that wires gestures to playback.
//!
//! [`FeedViewer`] owns a [`GestureInterpreter`] and a
//! [`PlaybackController`]. The host forwards input with
//! [`handle_input`](FeedViewer::handle_input), schedules a wake-up at
//! [`next_deadline`](FeedViewer::next_deadline) and calls
//! [`tick`](FeedViewer::tick) there, and reports play outcomes with
//! [`resolve_play`](FeedViewer::resolve_play).
//!
//! ```ignore
//! let mut viewer = FeedViewer::new(surface, session, GestureConfig::default(), PlaybackSettings::default());
//! viewer.handle_input(InputEvent::Wheel { delta_y: 120.0 }, Instant::now());
//! println!("{}", viewer.overlay().indicator());
//! ```

use reel_core::{CursorMoved, FeedSession, GestureConfig, GestureInterpreter, InputEvent};
use web_time::Instant;

use crate::controller::{Overlay, PlaybackController, PlaybackSettings};
use crate::reactive::Observable;
use crate::surface::{PlayId, PlayOutcome, RenderSurface};

/// Gesture interpretation plus playback for one viewing session.
#[derive(Debug)]
pub struct FeedViewer<S: RenderSurface> {
    gestures: GestureInterpreter,
    controller: PlaybackController<S>,
}

impl<S: RenderSurface> FeedViewer<S> {
    /// Build a viewer; the first clip is bound immediately.
    pub fn new(
        surface: S,
        session: FeedSession,
        gesture: GestureConfig,
        playback: PlaybackSettings,
    ) -> Self {
        Self {
            gestures: GestureInterpreter::new(gesture),
            controller: PlaybackController::new(surface, session, playback),
        }
    }

    /// Feed one raw input event.
    ///
    /// Returns the cursor move it caused, if any.
    pub fn handle_input(&mut self, event: InputEvent, now: Instant) -> Option<CursorMoved> {
        let intent = self.gestures.process(&event, now)?;
        self.controller.navigate(intent)
    }

    /// Timer callback: releases the gesture lock once its cooldown passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.gestures.tick(now)
    }

    /// When the host should call [`tick`](Self::tick) next.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.gestures.deadline()
    }

    /// The unmute affordance was activated.
    ///
    /// The press that hit the affordance must not also count as a swipe, so
    /// any half-finished drag or touch is dropped.
    pub fn request_unmute(&mut self) -> Option<PlayId> {
        self.gestures.cancel_pending();
        self.controller.request_unmute()
    }

    pub fn resolve_play(&mut self, id: PlayId, outcome: PlayOutcome) {
        self.controller.resolve_play(id, outcome);
    }

    #[must_use]
    pub fn overlay(&self) -> Overlay {
        self.controller.overlay()
    }

    #[must_use]
    pub fn observe(&self) -> Observable<Overlay> {
        self.controller.observe()
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.controller.is_muted()
    }

    #[must_use]
    pub fn controller(&self) -> &PlaybackController<S> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PlaybackController<S> {
        &mut self.controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::RecordingSurface;
    use crate::surface::PlayError;
    use reel_core::{ClipPool, ClipRef, ClipSampler, FeedPolicy};
    use std::time::Duration;

    struct Fixed;

    impl ClipSampler for Fixed {
        fn pick(&mut self, _pool: &ClipPool) -> ClipRef {
            ClipRef::new("Z")
        }
    }

    fn viewer() -> FeedViewer<RecordingSurface> {
        let pool = ClipPool::new(["A", "B", "C"]).unwrap();
        let session = FeedSession::with_parts(pool, 3, FeedPolicy::default(), Box::new(Fixed));
        FeedViewer::new(
            RecordingSurface::default(),
            session,
            GestureConfig::default(),
            PlaybackSettings::default(),
        )
    }

    fn swipe_up(v: &mut FeedViewer<RecordingSurface>, dy: f32, now: Instant) -> Option<CursorMoved> {
        v.handle_input(InputEvent::TouchStart { y: 800.0 }, now);
        v.handle_input(InputEvent::TouchEnd { y: 800.0 - dy }, now)
    }

    #[test]
    fn swipe_of_59_does_nothing() {
        let mut v = viewer();
        assert_eq!(swipe_up(&mut v, 59.0, Instant::now()), None);
        assert_eq!(v.controller().session().cursor(), 0);
    }

    #[test]
    fn swipe_of_60_advances_once() {
        let mut v = viewer();
        let moved = swipe_up(&mut v, 60.0, Instant::now()).unwrap();
        assert_eq!(moved.to, 1);
        assert_eq!(v.overlay().indicator(), "2 / 13");
    }

    #[test]
    fn drag_down_goes_back() {
        let mut v = viewer();
        let t = Instant::now();
        v.handle_input(InputEvent::Wheel { delta_y: 100.0 }, t);
        let later = t + Duration::from_millis(300);
        v.handle_input(InputEvent::DragStart { y: 100.0 }, later);
        let moved = v
            .handle_input(InputEvent::DragEnd { y: 400.0 }, later)
            .unwrap();
        assert_eq!(moved.to, 0);
    }

    #[test]
    fn lock_allows_one_change_per_cooldown() {
        let mut v = viewer();
        let t = Instant::now();
        assert!(v.handle_input(InputEvent::Wheel { delta_y: 100.0 }, t).is_some());
        assert!(
            v.handle_input(InputEvent::Wheel { delta_y: 100.0 }, t + Duration::from_millis(120))
                .is_none()
        );
        assert_eq!(v.controller().session().cursor(), 1);

        let deadline = v.next_deadline().unwrap();
        assert!(v.tick(deadline));
        assert_eq!(v.next_deadline(), None);
        assert!(
            v.handle_input(InputEvent::Wheel { delta_y: 100.0 }, t + Duration::from_millis(260))
                .is_some()
        );
        assert_eq!(v.controller().session().cursor(), 2);
    }

    #[test]
    fn unmute_press_does_not_become_a_swipe() {
        let mut v = viewer();
        let t = Instant::now();
        v.handle_input(InputEvent::TouchStart { y: 900.0 }, t);
        let id = v.request_unmute().unwrap();
        assert_eq!(v.handle_input(InputEvent::TouchEnd { y: 100.0 }, t), None);
        v.resolve_play(id, Ok(()));
        assert!(!v.is_muted());
        assert_eq!(v.controller().session().cursor(), 0);
    }

    #[test]
    fn failed_unmute_keeps_affordance() {
        let mut v = viewer();
        let id = v.request_unmute().unwrap();
        v.resolve_play(id, Err(PlayError::NotAllowed));
        assert!(v.is_muted());
        assert!(v.overlay().show_unmute());
    }
}
