#![forbid(unsafe_code)]

//! A render surface that stands in for a media element.
//!
//! Nothing is decoded; the surface remembers what it was told and queues
//! every play request. The host drains the queue after each step and hands
//! the outcomes back to the viewer, which mirrors how a real element
//! settles its play promise on a later turn.
//!
//! Outcomes follow the usual autoplay rule: muted playback always starts,
//! playback with sound starts only after the user has interacted with the
//! page. `deny_sound` makes every audible play fail regardless, so the
//! "sound refused" path can be exercised by hand.

use std::collections::VecDeque;

use reel_core::ClipRef;
use reel_runtime::{PlayError, PlayId, PlayOutcome, RenderSurface};

/// What the terminal shows for the bound clip.
#[derive(Debug, Clone, PartialEq)]
pub struct NowPlaying {
    pub clip: ClipRef,
    pub muted: bool,
    pub volume: f32,
    pub looping: bool,
    pub playing: bool,
}

#[derive(Debug)]
pub struct TerminalSurface {
    now: Option<NowPlaying>,
    muted: bool,
    volume: f32,
    looping: bool,
    user_activated: bool,
    deny_sound: bool,
    queued: VecDeque<(PlayId, bool)>,
}

impl TerminalSurface {
    #[must_use]
    pub fn new(deny_sound: bool) -> Self {
        Self {
            now: None,
            muted: true,
            volume: 1.0,
            looping: true,
            user_activated: false,
            deny_sound,
            queued: VecDeque::new(),
        }
    }

    /// Record a user gesture; audible playback is allowed from now on.
    pub fn activate(&mut self) {
        if !self.user_activated {
            tracing::debug!(target: "reel.demo", "user activation recorded");
        }
        self.user_activated = true;
    }

    /// Settle every queued play request in issue order.
    pub fn drain_outcomes(&mut self) -> Vec<(PlayId, PlayOutcome)> {
        let mut out = Vec::with_capacity(self.queued.len());
        while let Some((id, muted)) = self.queued.pop_front() {
            let outcome = if muted || (self.user_activated && !self.deny_sound) {
                Ok(())
            } else {
                Err(PlayError::NotAllowed)
            };
            if let Some(now) = self.now.as_mut() {
                now.playing |= outcome.is_ok();
            }
            out.push((id, outcome));
        }
        out
    }

    #[must_use]
    pub fn now_playing(&self) -> Option<&NowPlaying> {
        self.now.as_ref()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.queued.len()
    }
}

impl RenderSurface for TerminalSurface {
    fn bind(&mut self, clip: &ClipRef) {
        self.now = Some(NowPlaying {
            clip: clip.clone(),
            muted: self.muted,
            volume: self.volume,
            looping: self.looping,
            playing: false,
        });
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some(now) = self.now.as_mut() {
            now.muted = muted;
        }
    }

    fn set_volume(&mut self, level: f32) {
        self.volume = level.clamp(0.0, 1.0);
        if let Some(now) = self.now.as_mut() {
            now.volume = self.volume;
        }
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
        if let Some(now) = self.now.as_mut() {
            now.looping = looping;
        }
    }

    fn play(&mut self, id: PlayId) {
        self.queued.push_back((id, self.muted));
    }
}
