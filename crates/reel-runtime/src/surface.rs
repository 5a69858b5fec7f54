#![forbid(unsafe_code)]

//! The render/decoder surface seam.
//!
//! The runtime never decodes or draws anything. It talks to the host's media
//! element through [`RenderSurface`]: bind a clip, set mute and volume, ask
//! it to play. Playing is asynchronous: the surface receives a [`PlayId`],
//! and the host later reports the outcome with
//! `PlaybackController::resolve_play`.

use std::fmt;

use reel_core::ClipRef;

/// Identifier of one play request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayId(u64);

impl PlayId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id after this one.
    #[must_use]
    pub(crate) const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for PlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "play#{}", self.0)
    }
}

/// Why a play request failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayError {
    /// The platform refused to start playback (autoplay-with-sound policy).
    NotAllowed,
    /// A later bind or pause interrupted the request.
    Aborted,
    /// The clip format or source cannot be played.
    Unsupported,
    /// Any other host-reported failure.
    Other(String),
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAllowed => f.write_str("playback not allowed without user interaction"),
            Self::Aborted => f.write_str("play request aborted"),
            Self::Unsupported => f.write_str("clip source not supported"),
            Self::Other(msg) => write!(f, "play failed: {msg}"),
        }
    }
}

impl std::error::Error for PlayError {}

/// Outcome reported for a [`PlayId`].
pub type PlayOutcome = Result<(), PlayError>;

/// The host's media element.
pub trait RenderSurface {
    /// Attach `clip` as the current source.
    fn bind(&mut self, clip: &ClipRef);

    /// Mute or unmute the output.
    fn set_muted(&mut self, muted: bool);

    /// Set the output volume in `0.0..=1.0`.
    fn set_volume(&mut self, level: f32);

    /// Loop the bound clip at its natural end.
    fn set_looping(&mut self, _looping: bool) {}

    /// Start playback. The outcome arrives later for `id`.
    fn play(&mut self, id: PlayId);
}

impl<T: RenderSurface + ?Sized> RenderSurface for Box<T> {
    fn bind(&mut self, clip: &ClipRef) {
        (**self).bind(clip);
    }

    fn set_muted(&mut self, muted: bool) {
        (**self).set_muted(muted);
    }

    fn set_volume(&mut self, level: f32) {
        (**self).set_volume(level);
    }

    fn set_looping(&mut self, looping: bool) {
        (**self).set_looping(looping);
    }

    fn play(&mut self, id: PlayId) {
        (**self).play(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_ids_increment() {
        let id = PlayId::new(7);
        assert_eq!(id.next().get(), 8);
        assert_eq!(id.to_string(), "play#7");
    }

    #[test]
    fn play_error_messages() {
        assert!(PlayError::NotAllowed.to_string().contains("not allowed"));
        assert_eq!(
            PlayError::Other("decoder gone".into()).to_string(),
            "play failed: decoder gone"
        );
    }
}
