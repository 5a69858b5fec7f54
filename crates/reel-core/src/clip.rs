#![forbid(unsafe_code)]

//! Clip identifiers and the fixed pool they are sampled from.
//!
//! A [`ClipRef`] is an opaque, immutable identifier (a path or URI) that the
//! host's media layer knows how to load. The [`ClipPool`] is the small fixed
//! set of identifiers provided at startup; the feed only ever draws from it.
//!
//! # Invariants
//!
//! 1. A constructed `ClipPool` is never empty, so sampling is total.
//! 2. `ClipRef` values are never mutated after creation; clones share storage.

use std::fmt;
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Identifier of a single clip in the pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClipRef(Arc<str>);

impl ClipRef {
    /// Create a clip reference from any string-like identifier.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// The identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClipRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClipRef {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ClipRef {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl AsRef<str> for ClipRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors raised while assembling a [`ClipPool`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The pool was given no clips.
    Empty,
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("clip pool must contain at least one clip"),
        }
    }
}

impl std::error::Error for PoolError {}

/// The fixed, non-empty set of clips available to the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipPool {
    clips: Vec<ClipRef>,
}

impl ClipPool {
    /// Build a pool from the embedding application's clip list.
    pub fn new<I, C>(clips: I) -> Result<Self, PoolError>
    where
        I: IntoIterator<Item = C>,
        C: Into<ClipRef>,
    {
        let clips: Vec<ClipRef> = clips.into_iter().map(Into::into).collect();
        if clips.is_empty() {
            return Err(PoolError::Empty);
        }
        Ok(Self { clips })
    }

    /// Number of distinct entries in the pool.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Clip at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ClipRef> {
        self.clips.get(index)
    }

    /// Iterate the pool in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ClipRef> {
        self.clips.iter()
    }

    /// The opening feed: the first `n` clips in pool order, wrapping around
    /// when the pool is shorter than `n`.
    #[must_use]
    pub fn initial_slice(&self, n: usize) -> Vec<ClipRef> {
        self.clips.iter().cycle().take(n).cloned().collect()
    }
}

/// Source of clip choices for feed growth.
pub trait ClipSampler {
    /// Pick one clip from `pool`. Must be total over any non-empty pool.
    fn pick(&mut self, pool: &ClipPool) -> ClipRef;
}

/// Uniform sampling with replacement.
#[derive(Debug, Clone)]
pub struct RandomSampler {
    rng: SmallRng,
}

impl RandomSampler {
    /// Sampler seeded from the operating system.
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Reproducible sampler.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSampler {
    fn default() -> Self {
        Self::from_os_rng()
    }
}

impl ClipSampler for RandomSampler {
    fn pick(&mut self, pool: &ClipPool) -> ClipRef {
        let idx = self.rng.random_range(0..pool.clips.len());
        pool.clips[idx].clone()
    }
}

impl<T: ClipSampler + ?Sized> ClipSampler for Box<T> {
    fn pick(&mut self, pool: &ClipPool) -> ClipRef {
        (**self).pick(pool)
    }
}
