#![forbid(unsafe_code)]

//! Feed session: the feed buffer plus the playback cursor that walks it.
//!
//! [`FeedSession`] is the single owner of scroll state. Navigation goes
//! through [`advance`](FeedSession::advance) and
//! [`retreat`](FeedSession::retreat); both clamp, and both run the
//! [`FeedPolicy`] synchronously before reporting the move.
//!
//! # Invariants
//!
//! 1. `0 <= cursor < len` after every public call.
//! 2. A trim shifts the cursor by exactly the number of removed entries, so
//!    `current()` is the same clip before and after.
//! 3. Trim compensation counts as a cursor mutation: the policy is evaluated
//!    again until it requests nothing that moves the cursor.
//! 4. Saturated moves (advance at the tail, retreat at the head) change
//!    nothing and run no policy.

use std::fmt;

use crate::clip::{ClipPool, ClipRef, ClipSampler, RandomSampler};
use crate::feed::{FeedBuffer, FeedPolicy};

/// Default number of clips in the opening feed.
pub const DEFAULT_INITIAL_LEN: usize = 3;

/// Report of a cursor mutation after the feed policy settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorMoved {
    /// Cursor before the move.
    pub from: usize,
    /// Cursor after the move and any trim compensation.
    pub to: usize,
    /// Clip now under the cursor.
    pub clip: ClipRef,
    /// Clips appended while settling.
    pub grew: usize,
    /// Clips trimmed from the head while settling.
    pub trimmed: usize,
    /// Feed length after settling.
    pub len: usize,
}

/// Feed buffer, cursor, and the policy that keeps them bounded.
pub struct FeedSession {
    pool: ClipPool,
    sampler: Box<dyn ClipSampler>,
    buffer: FeedBuffer,
    cursor: usize,
    policy: FeedPolicy,
}

impl fmt::Debug for FeedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedSession")
            .field("cursor", &self.cursor)
            .field("len", &self.buffer.len())
            .field("pool_len", &self.pool.len())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl FeedSession {
    /// Start a session with the default policy, an OS-seeded sampler, and
    /// the first three pool entries as the opening feed.
    #[must_use]
    pub fn new(pool: ClipPool) -> Self {
        Self::with_parts(
            pool,
            DEFAULT_INITIAL_LEN,
            FeedPolicy::default(),
            Box::new(RandomSampler::from_os_rng()),
        )
    }

    /// Start a session from explicit parts.
    ///
    /// `initial_len` is raised to 1 if zero so the cursor always has a clip.
    #[must_use]
    pub fn with_parts(
        pool: ClipPool,
        initial_len: usize,
        policy: FeedPolicy,
        sampler: Box<dyn ClipSampler>,
    ) -> Self {
        let buffer = FeedBuffer::from_clips(pool.initial_slice(initial_len.max(1)));
        Self {
            pool,
            sampler,
            buffer,
            cursor: 0,
            policy,
        }
    }

    /// Start a session over an explicit opening feed.
    ///
    /// An empty `clips` list falls back to the pool's first clip.
    #[must_use]
    pub fn from_feed(
        pool: ClipPool,
        clips: Vec<ClipRef>,
        policy: FeedPolicy,
        sampler: Box<dyn ClipSampler>,
    ) -> Self {
        let clips = if clips.is_empty() {
            pool.initial_slice(1)
        } else {
            clips
        };
        Self {
            pool,
            sampler,
            buffer: FeedBuffer::from_clips(clips),
            cursor: 0,
            policy,
        }
    }

    /// Move one clip forward, saturating at the tail.
    pub fn advance(&mut self) -> Option<CursorMoved> {
        let target = (self.cursor + 1).min(self.last_index());
        self.move_to(target)
    }

    /// Move one clip back, saturating at the head.
    pub fn retreat(&mut self) -> Option<CursorMoved> {
        let target = self.cursor.saturating_sub(1);
        self.move_to(target)
    }

    fn move_to(&mut self, target: usize) -> Option<CursorMoved> {
        if target == self.cursor {
            return None;
        }
        let from = self.cursor;
        self.cursor = target;
        let (grew, trimmed) = self.settle();
        Some(CursorMoved {
            from,
            to: self.cursor,
            clip: self.current().clone(),
            grew,
            trimmed,
            len: self.buffer.len(),
        })
    }

    /// Apply the feed policy until it stops moving the cursor.
    fn settle(&mut self) -> (usize, usize) {
        let mut grew = 0;
        let mut trimmed = 0;
        loop {
            let decision = self.policy.evaluate(self.buffer.len(), self.cursor);
            if decision.grow > 0 {
                self.buffer
                    .append(decision.grow, &self.pool, self.sampler.as_mut());
                grew += decision.grow;
                tracing::debug!(
                    target: "reel.feed",
                    added = decision.grow,
                    len = self.buffer.len(),
                    cursor = self.cursor,
                    "feed grew"
                );
            }
            // Never trim the clip under the cursor.
            let removed = self.buffer.trim_prefix(decision.trim.min(self.cursor));
            if removed == 0 {
                break;
            }
            self.cursor -= removed;
            trimmed += removed;
            tracing::debug!(
                target: "reel.feed",
                removed,
                len = self.buffer.len(),
                cursor = self.cursor,
                "feed trimmed"
            );
        }
        (grew, trimmed)
    }

    #[inline]
    fn last_index(&self) -> usize {
        self.buffer.len().saturating_sub(1)
    }

    /// Current cursor (0-based).
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current cursor as shown to the user (1-based).
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor + 1
    }

    /// Feed length.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always `false`: a session always holds at least one clip.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clip under the cursor.
    #[must_use]
    pub fn current(&self) -> &ClipRef {
        &self.buffer.as_slice()[self.cursor]
    }

    #[must_use]
    pub fn clip_at(&self, index: usize) -> Option<&ClipRef> {
        self.buffer.get(index)
    }

    #[must_use]
    pub fn buffer(&self) -> &FeedBuffer {
        &self.buffer
    }

    #[must_use]
    pub fn pool(&self) -> &ClipPool {
        &self.pool
    }

    #[must_use]
    pub fn policy(&self) -> &FeedPolicy {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Fixed(&'static str);

    impl ClipSampler for Fixed {
        fn pick(&mut self, _pool: &ClipPool) -> ClipRef {
            ClipRef::new(self.0)
        }
    }

    /// Hands out "n0", "n1", ... so every appended clip is distinct.
    struct Numbered(usize);

    impl ClipSampler for Numbered {
        fn pick(&mut self, _pool: &ClipPool) -> ClipRef {
            let clip = ClipRef::new(format!("n{}", self.0));
            self.0 += 1;
            clip
        }
    }

    fn abc_session() -> FeedSession {
        let pool = ClipPool::new(["A", "B", "C"]).unwrap();
        FeedSession::with_parts(pool, 3, FeedPolicy::default(), Box::new(Fixed("Z")))
    }

    fn numbered_session() -> FeedSession {
        let pool = ClipPool::new(["A", "B", "C"]).unwrap();
        FeedSession::with_parts(pool, 3, FeedPolicy::default(), Box::new(Numbered(0)))
    }

    #[test]
    fn starts_at_head_of_initial_slice() {
        let s = abc_session();
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.len(), 3);
        assert_eq!(s.current().as_str(), "A");
        assert_eq!(s.position(), 1);
    }

    #[test]
    fn first_advance_grows_feed_by_one_batch() {
        let mut s = abc_session();
        let moved = s.advance().unwrap();
        assert_eq!(moved.from, 0);
        assert_eq!(moved.to, 1);
        assert_eq!(moved.grew, 10);
        assert_eq!(moved.trimmed, 0);
        assert_eq!(moved.len, 13);
        assert_eq!(moved.clip.as_str(), "B");
        assert_eq!(s.len(), 13);
    }

    #[test]
    fn retreat_at_head_is_noop() {
        let mut s = abc_session();
        assert_eq!(s.retreat(), None);
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn advance_saturates_at_tail_when_growth_never_fires() {
        let pool = ClipPool::new(["A", "B"]).unwrap();
        // lookahead 0: `cursor >= len` never holds, so the feed never grows.
        let policy = FeedPolicy {
            lookahead: 0,
            ..FeedPolicy::default()
        };
        let clips = vec![ClipRef::new("A"), ClipRef::new("B"), ClipRef::new("C")];
        let mut s = FeedSession::from_feed(pool, clips, policy, Box::new(Fixed("Z")));
        assert_eq!(s.advance().unwrap().to, 1);
        assert_eq!(s.advance().unwrap().to, 2);
        assert_eq!(s.advance(), None);
        assert_eq!(s.cursor(), 2);
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn advance_then_retreat_round_trips_cursor() {
        let mut s = abc_session();
        s.advance();
        s.advance();
        let back = s.retreat().unwrap();
        assert_eq!(back.from, 2);
        assert_eq!(back.to, 1);
        assert_eq!(back.grew, 0);
        assert_eq!(s.current().as_str(), "B");
    }

    #[test]
    fn long_scroll_trims_and_preserves_visible_clip() {
        let mut s = numbered_session();
        let mut trims = Vec::new();
        for _ in 0..200 {
            let before_len = s.len();
            let before_cursor = s.cursor();
            let moved = s.advance().unwrap();
            if moved.trimmed > 0 {
                trims.push((before_len + moved.grew, before_cursor + 1, moved.clone()));
            }
            assert!(s.cursor() < s.len());
        }
        assert!(!trims.is_empty());
        for (_, advanced_to, moved) in &trims {
            assert_eq!(moved.trimmed, 30);
            assert_eq!(moved.to, advanced_to - 30);
            assert!(moved.to >= 10, "history behind cursor: {}", moved.to);
        }
        assert!(s.len() <= 90);
    }

    #[test]
    fn trim_keeps_same_clip_under_cursor() {
        let mut s = numbered_session();
        loop {
            let next = s.clip_at(s.cursor() + 1).cloned();
            let moved = s.advance().unwrap();
            if moved.trimmed > 0 {
                assert_eq!(Some(moved.clip.clone()), next);
                assert_eq!(s.current(), &moved.clip);
                break;
            }
        }
    }

    #[test]
    fn first_trim_happens_at_expected_point() {
        // Growth: 3 -> 13 (c=1) -> 23 (c=10) -> ... -> 83 (c=70).
        // Next advance to 71 with len 83 trims 30.
        let mut s = numbered_session();
        for _ in 0..70 {
            let moved = s.advance().unwrap();
            assert_eq!(moved.trimmed, 0);
        }
        assert_eq!(s.len(), 83);
        let moved = s.advance().unwrap();
        assert_eq!(moved.trimmed, 30);
        assert_eq!(moved.to, 41);
        assert_eq!(moved.len, 53);
    }

    #[test]
    fn oversized_trim_policy_never_drops_visible_clip() {
        let pool = ClipPool::new(["A"]).unwrap();
        let policy = FeedPolicy {
            trim_len_threshold: 2,
            trim_cursor_threshold: 0,
            trim_count: 100,
            ..FeedPolicy::default()
        };
        let mut s = FeedSession::with_parts(pool, 5, policy, Box::new(Numbered(0)));
        let moved = s.advance().unwrap();
        assert_eq!(moved.to, 0);
        assert_eq!(moved.trimmed, 1);
        assert_eq!(s.current().as_str(), "A");
    }

    #[test]
    fn zero_initial_len_still_has_a_clip() {
        let pool = ClipPool::new(["A", "B"]).unwrap();
        let s = FeedSession::with_parts(pool, 0, FeedPolicy::default(), Box::new(Fixed("Z")));
        assert_eq!(s.len(), 1);
        assert_eq!(s.current().as_str(), "A");
    }
}
