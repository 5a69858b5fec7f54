#![forbid(unsafe_code)]

//! Playback controller: binds the clip under the cursor to the surface and
//! owns the mute state.
//!
//! The controller is the single owner of session state: the
//! [`FeedSession`] (feed + cursor) and the mute flag live here, not in
//! globals. Changes reach it as discrete [`PlaybackEvent`]s:
//!
//! | Event | Surface effect |
//! |---|---|
//! | `CursorChanged` | bind clip, loop, apply mute + volume, play |
//! | `MuteChanged` | apply mute + volume, play |
//!
//! # Play outcomes
//!
//! Every play request gets a [`PlayId`]. Outcomes come back through
//! [`resolve_play`](PlaybackController::resolve_play). Only the request
//! issued by [`request_unmute`](PlaybackController::request_unmute) is
//! inspected: success flips the mute state, failure leaves it muted and is
//! logged at `warn`. Every other outcome is discarded.
//!
//! # Invariants
//!
//! 1. The controller starts muted and only an unmute request whose play
//!    succeeded clears the flag; nothing sets it back.
//! 2. Every cursor change rebinds, even when the same clip id repeats.
//! 3. The published [`Overlay`] always matches the session and mute flag.

use reel_core::{ClipRef, CursorMoved, FeedSession, NavIntent};

use crate::reactive::Observable;
use crate::surface::{PlayId, PlayOutcome, RenderSurface};

/// Volume applied when the user explicitly asks for sound.
pub const UNMUTE_VOLUME: f32 = 1.0;

/// Discrete state changes the controller reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The cursor moved (after feed growth/trim settled).
    CursorChanged(CursorMoved),
    /// The mute flag changed.
    MuteChanged {
        muted: bool,
    },
}

/// Output settings applied on every bind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSettings {
    /// Output volume used for playback and unmute (default: 1.0).
    pub volume: f32,
    /// Loop the bound clip instead of stopping at its end (default: true).
    pub looping: bool,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            looping: true,
        }
    }
}

/// What the host UI draws on top of the clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    /// 1-based position of the visible clip.
    pub position: usize,
    /// Current feed length.
    pub total: usize,
    /// Whether output is muted.
    pub muted: bool,
    /// An unmute request is waiting for its play outcome.
    pub unmute_pending: bool,
    /// Clip under the cursor.
    pub clip: ClipRef,
}

impl Overlay {
    /// The "N / total" indicator text.
    #[must_use]
    pub fn indicator(&self) -> String {
        format!("{} / {}", self.position, self.total)
    }

    /// Show the "enable sound" affordance only while muted.
    #[inline]
    #[must_use]
    pub fn show_unmute(&self) -> bool {
        self.muted
    }
}

/// Drives a [`RenderSurface`] from session state.
pub struct PlaybackController<S: RenderSurface> {
    surface: S,
    session: FeedSession,
    settings: PlaybackSettings,
    muted: bool,
    next_play: PlayId,
    pending_unmute: Option<PlayId>,
    overlay: Observable<Overlay>,
}

impl<S: RenderSurface> std::fmt::Debug for PlaybackController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackController")
            .field("session", &self.session)
            .field("muted", &self.muted)
            .field("pending_unmute", &self.pending_unmute)
            .finish_non_exhaustive()
    }
}

impl<S: RenderSurface> PlaybackController<S> {
    /// Take ownership of the surface and session and bind the first clip.
    pub fn new(surface: S, session: FeedSession, settings: PlaybackSettings) -> Self {
        let overlay = Observable::new(Overlay {
            position: session.position(),
            total: session.len(),
            muted: true,
            unmute_pending: false,
            clip: session.current().clone(),
        });
        let mut controller = Self {
            surface,
            session,
            settings,
            muted: true,
            next_play: PlayId::new(1),
            pending_unmute: None,
            overlay,
        };
        controller.bind_current();
        controller
    }

    /// Apply a navigation intent to the cursor.
    ///
    /// Returns the move, or `None` when the cursor was already saturated.
    pub fn navigate(&mut self, intent: NavIntent) -> Option<CursorMoved> {
        let _span = tracing::debug_span!("reel.navigate", ?intent).entered();
        let moved = match intent {
            NavIntent::Forward => self.session.advance(),
            NavIntent::Backward => self.session.retreat(),
        }?;
        tracing::debug!(
            target: "reel.playback",
            from = moved.from,
            to = moved.to,
            len = moved.len,
            clip = %moved.clip,
            "cursor changed"
        );
        self.dispatch(PlaybackEvent::CursorChanged(moved.clone()));
        Some(moved)
    }

    /// React to a state change.
    pub fn dispatch(&mut self, event: PlaybackEvent) {
        match event {
            PlaybackEvent::CursorChanged(_) => self.bind_current(),
            PlaybackEvent::MuteChanged { .. } => {
                self.apply_output();
                self.issue_play();
            }
        }
        self.publish();
    }

    /// Explicit user request for sound.
    ///
    /// Unmutes the surface at full volume and issues a play request whose
    /// outcome decides the mute state. Full volume stays the output level
    /// from then on.
    /// Returns the request id, or `None` when already unmuted.
    pub fn request_unmute(&mut self) -> Option<PlayId> {
        if !self.muted {
            return None;
        }
        self.settings.volume = UNMUTE_VOLUME;
        self.surface.set_volume(UNMUTE_VOLUME);
        self.surface.set_muted(false);
        let id = self.issue_play();
        self.pending_unmute = Some(id);
        tracing::debug!(target: "reel.playback", %id, "unmute requested");
        self.publish();
        Some(id)
    }

    /// Report the outcome of a play request.
    ///
    /// Unknown and superseded ids are discarded.
    pub fn resolve_play(&mut self, id: PlayId, outcome: PlayOutcome) {
        if self.pending_unmute == Some(id) {
            self.pending_unmute = None;
            match outcome {
                Ok(()) => {
                    tracing::info!(target: "reel.playback", %id, "sound enabled");
                    self.muted = false;
                    self.dispatch(PlaybackEvent::MuteChanged { muted: false });
                }
                Err(error) => {
                    tracing::warn!(
                        target: "reel.playback",
                        %id,
                        %error,
                        "unmute failed; staying muted"
                    );
                    self.surface.set_muted(self.muted);
                    self.publish();
                }
            }
            return;
        }
        if let Err(error) = outcome {
            tracing::trace!(target: "reel.playback", %id, %error, "play failed; discarded");
        }
    }

    fn bind_current(&mut self) {
        let clip = self.session.current().clone();
        self.surface.bind(&clip);
        self.surface.set_looping(self.settings.looping);
        self.apply_output();
        self.issue_play();
    }

    fn apply_output(&mut self) {
        self.surface.set_muted(self.muted);
        self.surface.set_volume(self.settings.volume);
    }

    fn issue_play(&mut self) -> PlayId {
        let id = self.next_play;
        self.next_play = id.next();
        self.surface.play(id);
        id
    }

    fn publish(&self) {
        self.overlay.set(self.snapshot());
    }

    fn snapshot(&self) -> Overlay {
        Overlay {
            position: self.session.position(),
            total: self.session.len(),
            muted: self.muted,
            unmute_pending: self.pending_unmute.is_some(),
            clip: self.session.current().clone(),
        }
    }

    /// Current mute state.
    #[inline]
    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Current overlay snapshot.
    #[must_use]
    pub fn overlay(&self) -> Overlay {
        self.overlay.get()
    }

    /// Handle for subscribing to overlay changes.
    #[must_use]
    pub fn observe(&self) -> Observable<Overlay> {
        self.overlay.clone()
    }

    #[must_use]
    pub fn session(&self) -> &FeedSession {
        &self.session
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn settings(&self) -> &PlaybackSettings {
        &self.settings
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::surface::PlayError;
    use pretty_assertions::assert_eq;
    use reel_core::{ClipPool, ClipSampler, FeedPolicy};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every call in order.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSurface {
        pub calls: Vec<Call>,
        pub muted: Option<bool>,
        pub bound: Option<ClipRef>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) enum Call {
        Bind(String),
        Muted(bool),
        Volume(f32),
        Looping(bool),
        Play(PlayId),
    }

    impl RecordingSurface {
        pub(crate) fn plays(&self) -> Vec<PlayId> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Play(id) => Some(*id),
                    _ => None,
                })
                .collect()
        }

        pub(crate) fn binds(&self) -> Vec<String> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Bind(clip) => Some(clip.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    impl RenderSurface for RecordingSurface {
        fn bind(&mut self, clip: &ClipRef) {
            self.bound = Some(clip.clone());
            self.calls.push(Call::Bind(clip.to_string()));
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = Some(muted);
            self.calls.push(Call::Muted(muted));
        }

        fn set_volume(&mut self, level: f32) {
            self.calls.push(Call::Volume(level));
        }

        fn set_looping(&mut self, looping: bool) {
            self.calls.push(Call::Looping(looping));
        }

        fn play(&mut self, id: PlayId) {
            self.calls.push(Call::Play(id));
        }
    }

    struct Fixed;

    impl ClipSampler for Fixed {
        fn pick(&mut self, pool: &ClipPool) -> ClipRef {
            pool.get(0).cloned().unwrap()
        }
    }

    fn controller_with(settings: PlaybackSettings) -> PlaybackController<RecordingSurface> {
        let pool = ClipPool::new(["A", "B", "C"]).unwrap();
        let session = FeedSession::with_parts(pool, 3, FeedPolicy::default(), Box::new(Fixed));
        PlaybackController::new(RecordingSurface::default(), session, settings)
    }

    fn controller() -> PlaybackController<RecordingSurface> {
        controller_with(PlaybackSettings::default())
    }

    #[test]
    fn new_binds_first_clip_muted_and_plays() {
        let c = controller();
        assert_eq!(
            c.surface().calls,
            vec![
                Call::Bind("A".into()),
                Call::Looping(true),
                Call::Muted(true),
                Call::Volume(1.0),
                Call::Play(PlayId::new(1)),
            ]
        );
        assert!(c.is_muted());
        assert!(c.overlay().show_unmute());
        assert_eq!(c.overlay().indicator(), "1 / 3");
    }

    #[test]
    fn navigate_forward_rebinds_and_updates_overlay() {
        let mut c = controller();
        let moved = c.navigate(NavIntent::Forward).unwrap();
        assert_eq!(moved.to, 1);
        assert_eq!(c.surface().binds(), ["A", "B"]);
        assert_eq!(c.surface().plays().len(), 2);
        assert_eq!(c.overlay().indicator(), "2 / 13");
        assert_eq!(c.overlay().clip.as_str(), "B");
    }

    #[test]
    fn saturated_navigation_touches_nothing() {
        let mut c = controller();
        let before = c.surface().calls.len();
        assert_eq!(c.navigate(NavIntent::Backward), None);
        assert_eq!(c.surface().calls.len(), before);
    }

    #[test]
    fn repeated_clip_id_still_rebinds() {
        let mut c = controller();
        // Fixed sampler appends "A" repeatedly past the opening slice.
        for _ in 0..4 {
            c.navigate(NavIntent::Forward);
        }
        assert_eq!(c.surface().binds(), ["A", "B", "C", "A", "A"]);
    }

    #[test]
    fn unmute_success_clears_mute_and_replays() {
        let mut c = controller();
        let id = c.request_unmute().unwrap();
        assert!(c.is_muted());
        assert!(c.overlay().unmute_pending);
        assert_eq!(c.surface().muted, Some(false));

        c.resolve_play(id, Ok(()));
        assert!(!c.is_muted());
        assert!(!c.overlay().show_unmute());
        assert!(!c.overlay().unmute_pending);
        assert_eq!(c.surface().muted, Some(false));
        // Initial play, unmute play, replay after MuteChanged.
        assert_eq!(c.surface().plays().len(), 3);
    }

    #[test]
    fn unmute_raises_quiet_output_to_full_volume() {
        let mut c = controller_with(PlaybackSettings {
            volume: 0.0,
            looping: true,
        });
        c.surface_mut().calls.clear();

        let id = c.request_unmute().unwrap();
        assert_eq!(
            c.surface().calls,
            vec![Call::Volume(1.0), Call::Muted(false), Call::Play(id)]
        );

        c.resolve_play(id, Ok(()));
        assert!(!c.is_muted());
        assert_eq!(c.settings().volume, 1.0);
        assert_eq!(c.surface().calls.last(), Some(&Call::Play(id.next())));
        assert!(!c.surface().calls.contains(&Call::Volume(0.0)));
    }

    #[test]
    fn looping_setting_reaches_surface() {
        let mut c = controller_with(PlaybackSettings {
            volume: 1.0,
            looping: false,
        });
        assert!(c.surface().calls.contains(&Call::Looping(false)));
        c.navigate(NavIntent::Forward);
        let loops: Vec<_> = c
            .surface()
            .calls
            .iter()
            .filter(|call| matches!(call, Call::Looping(_)))
            .collect();
        assert_eq!(loops, [&Call::Looping(false), &Call::Looping(false)]);
    }

    #[test]
    fn unmute_failure_keeps_mute_and_affordance() {
        let mut c = controller();
        let id = c.request_unmute().unwrap();
        c.resolve_play(id, Err(PlayError::NotAllowed));
        assert!(c.is_muted());
        assert!(c.overlay().show_unmute());
        assert!(!c.overlay().unmute_pending);
        assert_eq!(c.surface().muted, Some(true));
    }

    #[test]
    fn unmute_can_be_retried_after_failure() {
        let mut c = controller();
        let first = c.request_unmute().unwrap();
        c.resolve_play(first, Err(PlayError::NotAllowed));
        let second = c.request_unmute().unwrap();
        assert_ne!(first, second);
        c.resolve_play(second, Ok(()));
        assert!(!c.is_muted());
    }

    #[test]
    fn unmute_when_unmuted_is_noop() {
        let mut c = controller();
        let id = c.request_unmute().unwrap();
        c.resolve_play(id, Ok(()));
        assert_eq!(c.request_unmute(), None);
    }

    #[test]
    fn ambient_failure_is_discarded() {
        let mut c = controller();
        c.resolve_play(PlayId::new(1), Err(PlayError::NotAllowed));
        assert!(c.is_muted());
        c.resolve_play(PlayId::new(999), Ok(()));
        assert!(c.is_muted());
    }

    #[test]
    fn mute_never_returns_after_navigation() {
        let mut c = controller();
        let id = c.request_unmute().unwrap();
        c.resolve_play(id, Ok(()));
        c.navigate(NavIntent::Forward);
        c.navigate(NavIntent::Backward);
        assert!(!c.is_muted());
        assert_eq!(c.surface().muted, Some(false));
    }

    #[test]
    fn stale_unmute_outcome_after_success_is_ignored() {
        let mut c = controller();
        let id = c.request_unmute().unwrap();
        c.resolve_play(id, Ok(()));
        c.resolve_play(id, Err(PlayError::Aborted));
        assert!(!c.is_muted());
    }

    #[test]
    fn observers_see_overlay_changes() {
        let mut c = controller();
        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = c
            .observe()
            .subscribe(move |o: &Overlay| sink.borrow_mut().push(o.indicator()));
        c.navigate(NavIntent::Forward);
        c.navigate(NavIntent::Forward);
        c.navigate(NavIntent::Backward);
        assert_eq!(*seen.borrow(), ["2 / 13", "3 / 13", "2 / 13"]);
    }
}
