#![forbid(unsafe_code)]

//! reelfeed Runtime
//!
//! This crate ties the `reel-core` state layer to a host that can actually
//! show video: a render surface, a playback controller, and a viewer loop.
//!
//! # Key Components
//!
//! - [`RenderSurface`] - Trait the host implements to bind and play clips
//! - [`PlaybackController`] - Binds the clip under the cursor, owns mute state
//! - [`FeedViewer`] - Gesture interpretation plus playback for one session
//! - [`Observable`] - Change-notified [`Overlay`] for the host UI
//! - [`ViewerConfig`] - Every tunable as data, optionally loaded from disk
//!
//! # Role in reelfeed
//! `reel-runtime` is the orchestrator. It consumes host input events, runs
//! them through the gesture interpreter from `reel-core`, applies intents to
//! the feed session and drives the render surface with the result.
//!
//! # How it fits in the system
//! A host (the `reelfeed` terminal demo, or any embedding with a real media
//! element) implements [`RenderSurface`], builds a [`FeedViewer`] and
//! forwards input, timer wake-ups and play outcomes into it.

pub mod config;
pub mod controller;
pub mod reactive;
pub mod surface;
pub mod viewer;

pub use config::{
    ConfigError, FeedPolicyConfig, GesturePolicyConfig, PlaybackPolicyConfig, ViewerConfig,
};
pub use controller::{Overlay, PlaybackController, PlaybackEvent, PlaybackSettings};
pub use reactive::{Observable, Subscription};
pub use surface::{PlayError, PlayId, PlayOutcome, RenderSurface};
pub use viewer::FeedViewer;
