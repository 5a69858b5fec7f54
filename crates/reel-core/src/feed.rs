#![forbid(unsafe_code)]

//! The growing, trimmable list of clips the user scrolls through.
//!
//! [`FeedBuffer`] is plain storage: append sampled clips at the tail, drop a
//! prefix at the head. [`FeedPolicy`] decides *when* either happens, given
//! the current length and cursor. The session (`crate::session`) applies the
//! policy after every cursor mutation.
//!
//! # Invariants
//!
//! 1. Length only decreases through [`FeedBuffer::trim_prefix`].
//! 2. A trim removes a contiguous prefix; relative order of the survivors is
//!    unchanged.
//! 3. With a validated policy, a trim never removes the clip under the
//!    cursor and leaves at least `trim_cursor_threshold - trim_count + 1`
//!    entries behind it.

use crate::clip::{ClipPool, ClipRef, ClipSampler};

/// Ordered sequence of clips: scroll history plus lookahead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedBuffer {
    clips: Vec<ClipRef>,
}

impl FeedBuffer {
    /// Start a buffer from an explicit list of clips.
    #[must_use]
    pub fn from_clips(clips: Vec<ClipRef>) -> Self {
        Self { clips }
    }

    /// Sample `n` clips uniformly (with replacement) and append them in
    /// sampled order.
    pub fn append<S: ClipSampler + ?Sized>(&mut self, n: usize, pool: &ClipPool, sampler: &mut S) {
        self.clips.reserve(n);
        for _ in 0..n {
            self.clips.push(sampler.pick(pool));
        }
    }

    /// Drop the first `k` entries (clamped to the current length).
    ///
    /// Returns how many entries were actually removed. The caller shifts any
    /// index it holds by the same amount.
    pub fn trim_prefix(&mut self, k: usize) -> usize {
        let k = k.min(self.clips.len());
        self.clips.drain(..k);
        k
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ClipRef> {
        self.clips.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClipRef> {
        self.clips.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ClipRef] {
        &self.clips
    }
}

/// Growth and shrink thresholds for the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedPolicy {
    /// Grow when the cursor is within this many positions of the tail (default: 3).
    pub lookahead: usize,
    /// Number of clips appended per growth step (default: 10).
    pub batch_size: usize,
    /// Trim only when the buffer is longer than this (default: 80).
    pub trim_len_threshold: usize,
    /// Trim only when the cursor is past this index (default: 40).
    pub trim_cursor_threshold: usize,
    /// Number of head entries dropped per trim (default: 30).
    pub trim_count: usize,
}

impl Default for FeedPolicy {
    fn default() -> Self {
        Self {
            lookahead: 3,
            batch_size: 10,
            trim_len_threshold: 80,
            trim_cursor_threshold: 40,
            trim_count: 30,
        }
    }
}

/// What one policy evaluation decided for a `(len, cursor)` snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PolicyDecision {
    /// Clips to append at the tail.
    pub grow: usize,
    /// Clips to drop from the head.
    pub trim: usize,
}

impl PolicyDecision {
    /// No growth and no trim.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.grow == 0 && self.trim == 0
    }
}

impl FeedPolicy {
    /// Decide growth and shrink from the same snapshot.
    #[must_use]
    pub fn evaluate(&self, len: usize, cursor: usize) -> PolicyDecision {
        let grow = if cursor >= len.saturating_sub(self.lookahead) {
            self.batch_size
        } else {
            0
        };
        let trim = if len > self.trim_len_threshold && cursor > self.trim_cursor_threshold {
            self.trim_count
        } else {
            0
        };
        PolicyDecision { grow, trim }
    }

    /// Validate thresholds.
    ///
    /// Returns a list of problems; empty means the policy is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.batch_size == 0 {
            errors.push("feed.batch_size must be > 0".into());
        }
        if self.trim_count > self.trim_cursor_threshold {
            errors.push(format!(
                "feed.trim_count ({}) must not exceed feed.trim_cursor_threshold ({})",
                self.trim_count, self.trim_cursor_threshold
            ));
        }
        if self.trim_count > self.trim_len_threshold {
            errors.push(format!(
                "feed.trim_count ({}) must not exceed feed.trim_len_threshold ({})",
                self.trim_count, self.trim_len_threshold
            ));
        }
        errors
    }
}
