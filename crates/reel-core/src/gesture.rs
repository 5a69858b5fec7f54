#![forbid(unsafe_code)]

//! Gesture interpretation: turns raw drags, touches and wheel ticks into
//! discrete navigation intents.
//!
//! [`GestureInterpreter`] is a small stateful filter. Call
//! [`process`](GestureInterpreter::process) for every [`InputEvent`] and act
//! on the returned [`NavIntent`], if any. Call
//! [`tick`](GestureInterpreter::tick) when [`deadline`](GestureInterpreter::deadline)
//! passes to release the lock; an expired lock is also treated as released
//! by `process`, so a late tick never swallows a gesture.
//!
//! # State Machine
//!
//! - **Drag tracker** and **touch tracker**: remember where a press started;
//!   the matching release computes `dy = end - start`.
//! - **Gesture lock**: engaged when an intent is dispatched, held for
//!   `cooldown`. While held, intents are dropped, not queued.
//!
//! # Invariants
//!
//! 1. At most one intent is dispatched per `cooldown` window.
//! 2. A release consumes its start; a second release without a new start
//!    produces nothing.
//! 3. Noise (below threshold, or non-finite) never engages the lock.
//! 4. After `reset()`, trackers are empty and the lock is released.

use std::time::Duration;

use web_time::Instant;

use crate::event::{InputEvent, NavIntent};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds and cooldown for gesture interpretation.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureConfig {
    /// Minimum |dy| for a drag or touch to count as a swipe (default: 60.0).
    pub swipe_threshold: f32,
    /// Minimum |delta_y| for a wheel event to count (default: 20.0).
    pub wheel_threshold: f32,
    /// How long the lock is held after a dispatch (default: 250ms).
    pub cooldown: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: 60.0,
            wheel_threshold: 20.0,
            cooldown: Duration::from_millis(250),
        }
    }
}

impl GestureConfig {
    /// Validate thresholds; empty means usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !(self.swipe_threshold.is_finite() && self.swipe_threshold >= 0.0) {
            errors.push(format!(
                "gesture.swipe_threshold must be finite and >= 0, got {}",
                self.swipe_threshold
            ));
        }
        if !(self.wheel_threshold.is_finite() && self.wheel_threshold >= 0.0) {
            errors.push(format!(
                "gesture.wheel_threshold must be finite and >= 0, got {}",
                self.wheel_threshold
            ));
        }
        errors
    }
}

// ---------------------------------------------------------------------------
// GestureLock
// ---------------------------------------------------------------------------

/// Re-entrancy guard with a fixed release deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureLock {
    until: Option<Instant>,
}

impl GestureLock {
    /// Whether the lock is still held at `now`.
    #[inline]
    #[must_use]
    pub fn is_held(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    /// Take the lock for `cooldown` if it is free. Returns `false` if held.
    pub fn try_acquire(&mut self, now: Instant, cooldown: Duration) -> bool {
        if self.is_held(now) {
            return false;
        }
        self.until = Some(now + cooldown);
        true
    }

    /// Release if the deadline has passed. Returns `true` if this call
    /// released it.
    pub fn release_expired(&mut self, now: Instant) -> bool {
        match self.until {
            Some(until) if now >= until => {
                self.until = None;
                true
            }
            _ => false,
        }
    }

    /// Release unconditionally.
    pub fn release(&mut self) {
        self.until = None;
    }

    /// When the lock frees itself, if held.
    #[inline]
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.until
    }
}

// ---------------------------------------------------------------------------
// GestureInterpreter
// ---------------------------------------------------------------------------

/// Stateful filter from raw input to navigation intents.
#[derive(Debug, Clone)]
pub struct GestureInterpreter {
    config: GestureConfig,
    lock: GestureLock,
    drag_start: Option<f32>,
    touch_start: Option<f32>,
}

impl Default for GestureInterpreter {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureInterpreter {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            lock: GestureLock::default(),
            drag_start: None,
            touch_start: None,
        }
    }

    /// Process a raw event, returning the intent to dispatch, if any.
    pub fn process(&mut self, event: &InputEvent, now: Instant) -> Option<NavIntent> {
        let intent = self.classify(event)?;
        if !self.lock.try_acquire(now, self.config.cooldown) {
            tracing::trace!(
                target: "reel.gesture",
                kind = event.kind(),
                ?intent,
                "intent dropped while locked"
            );
            return None;
        }
        tracing::debug!(
            target: "reel.gesture",
            kind = event.kind(),
            ?intent,
            cooldown_ms = self.config.cooldown.as_millis() as u64,
            "intent dispatched, lock engaged"
        );
        Some(intent)
    }

    /// Map an event to an intent, ignoring the lock.
    fn classify(&mut self, event: &InputEvent) -> Option<NavIntent> {
        match *event {
            InputEvent::DragStart { y } => {
                self.drag_start = Some(y);
                None
            }
            InputEvent::TouchStart { y } => {
                self.touch_start = Some(y);
                None
            }
            InputEvent::DragEnd { y } => {
                let start = self.drag_start.take()?;
                self.swipe(y - start)
            }
            InputEvent::TouchEnd { y } => {
                let start = self.touch_start.take()?;
                self.swipe(y - start)
            }
            InputEvent::Wheel { delta_y } => {
                if !delta_y.is_finite() || delta_y.abs() < self.config.wheel_threshold {
                    tracing::trace!(target: "reel.gesture", delta_y, "wheel below threshold");
                    return None;
                }
                if delta_y > 0.0 {
                    Some(NavIntent::Forward)
                } else {
                    Some(NavIntent::Backward)
                }
            }
        }
    }

    fn swipe(&self, dy: f32) -> Option<NavIntent> {
        if !dy.is_finite() || dy.abs() < self.config.swipe_threshold {
            tracing::trace!(target: "reel.gesture", dy, "swipe below threshold");
            return None;
        }
        // Finger moved up: content scrolls to the next clip.
        if dy < 0.0 {
            Some(NavIntent::Forward)
        } else {
            Some(NavIntent::Backward)
        }
    }

    /// Release the lock if its cooldown has elapsed. Returns `true` when
    /// this call released it.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.lock.release_expired(now)
    }

    /// When the host should call [`tick`](Self::tick) next.
    #[inline]
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.lock.deadline()
    }

    #[inline]
    #[must_use]
    pub fn is_locked(&self, now: Instant) -> bool {
        self.lock.is_held(now)
    }

    /// Forget any half-finished drag or touch (the press was consumed
    /// elsewhere). The lock is left alone.
    pub fn cancel_pending(&mut self) {
        self.drag_start = None;
        self.touch_start = None;
    }

    /// Reset trackers and release the lock.
    pub fn reset(&mut self) {
        self.cancel_pending();
        self.lock.release();
    }
}
