#![forbid(unsafe_code)]

//! Core: clip pool, feed windowing, cursor, and gesture interpretation.
//!
//! # Role in reelfeed
//! `reel-core` is the state layer. It owns the growing feed of clips, the
//! cursor that walks it, and the filter that turns raw drags, touches and
//! wheel ticks into navigation intents. Nothing here touches a clock, a
//! renderer or a media decoder: time is passed in, and clip identifiers are
//! opaque.
//!
//! # Primary responsibilities
//! - **ClipPool / ClipSampler**: the fixed clip set and uniform sampling.
//! - **FeedBuffer / FeedPolicy**: append-at-tail, trim-at-head storage and
//!   the thresholds that decide when.
//! - **FeedSession**: the cursor, clamped navigation, and policy settling.
//! - **GestureInterpreter**: noise thresholds plus the cooldown lock.
//!
//! # How it fits in the system
//! `reel-runtime` feeds host input into [`gesture::GestureInterpreter`],
//! applies the resulting [`event::NavIntent`] to a [`session::FeedSession`]
//! and hands every [`session::CursorMoved`] to its playback controller.

pub mod clip;
pub mod event;
pub mod feed;
pub mod gesture;
pub mod session;

pub use clip::{ClipPool, ClipRef, ClipSampler, PoolError, RandomSampler};
pub use event::{InputEvent, NavIntent};
pub use feed::{FeedBuffer, FeedPolicy, PolicyDecision};
pub use gesture::{GestureConfig, GestureInterpreter, GestureLock};
pub use session::{CursorMoved, DEFAULT_INITIAL_LEN, FeedSession};
