//! Listener identifier range.
//!
//! Listeners are addressed by integer offsets from a base hash. A run covers
//! the half-open range `[base_hash, base_hash + listeners)`.

use rand::Rng;
use std::fmt;
use std::ops::Range;

/// Half-open range of listener indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerRange {
    base_hash: u64,
    listeners: u64,
}

impl ListenerRange {
    /// Create a range starting at `base_hash` holding `listeners` indices.
    ///
    /// The end is saturated at `u64::MAX`; `LoadOptions::validate` rejects
    /// ranges that would overflow before they reach a runner.
    #[must_use]
    pub const fn new(base_hash: u64, listeners: u64) -> Self {
        Self {
            base_hash,
            listeners,
        }
    }

    /// First index (inclusive).
    #[inline]
    #[must_use]
    pub const fn start(&self) -> u64 {
        self.base_hash
    }

    /// One past the last index.
    #[inline]
    #[must_use]
    pub const fn end(&self) -> u64 {
        self.base_hash.saturating_add(self.listeners)
    }

    /// Number of indices in the range.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.end() - self.base_hash
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    #[must_use]
    pub const fn contains(&self, index: u64) -> bool {
        index >= self.start() && index < self.end()
    }

    /// Ascending iterator over every index.
    #[must_use]
    pub const fn iter(&self) -> Range<u64> {
        self.start()..self.end()
    }

    /// Pick an index uniformly at random.
    ///
    /// Returns `None` for an empty range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<u64> {
        if self.is_empty() {
            None
        } else {
            Some(rng.gen_range(self.iter()))
        }
    }
}

impl IntoIterator for ListenerRange {
    type Item = u64;
    type IntoIter = Range<u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for ListenerRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start(), self.end())
    }
}
