// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

use std::time::{Duration, Instant};

/// A cached value plus the metadata tiers need to age it out.
///
/// An entry records when it was stored and may carry its own TTL. The
/// per-entry TTL is stricter than whatever tier-level TTL applies: an entry
/// whose own deadline has passed reads as absent even if the tier would still
/// keep it.
///
/// Freshly constructed entries are unstamped; the tier that stores them calls
/// [`stamp`](Self::stamp) on the way in. An unstamped entry never expires.
///
/// # Examples
///
/// ```
/// use hamr_tier::CacheEntry;
/// use std::time::Duration;
///
/// let mut entry = CacheEntry::with_ttl("data".to_string(), Duration::from_secs(60));
/// assert!(!entry.is_expired());
///
/// entry.stamp();
/// assert!(entry.age().is_some());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry<V> {
    value: V,
    cached_at: Option<Instant>,
    ttl: Option<Duration>,
}

impl<V> CacheEntry<V> {
    /// Creates an unstamped entry with no TTL of its own.
    pub fn new(value: V) -> Self {
        Self {
            value,
            cached_at: None,
            ttl: None,
        }
    }

    /// Creates an unstamped entry carrying a per-entry TTL.
    pub fn with_ttl(value: V, ttl: Duration) -> Self {
        Self {
            value,
            cached_at: None,
            ttl: Some(ttl),
        }
    }

    /// Records now as the storage time, unless one is already set.
    ///
    /// Tiers call this on insert; an entry promoted between tiers keeps its
    /// original stamp so its age is measured from the first write.
    pub fn stamp(&mut self) {
        if self.cached_at.is_none() {
            self.cached_at = Some(Instant::now());
        }
    }

    /// Overrides the storage time, for entries rebuilt from another store.
    pub fn stamp_at(&mut self, cached_at: Instant) {
        self.cached_at = Some(cached_at);
    }

    /// Returns when this entry was stored, or `None` if it is unstamped.
    #[must_use]
    pub fn cached_at(&self) -> Option<Instant> {
        self.cached_at
    }

    /// Returns how long ago this entry was stored, or `None` if unstamped.
    #[must_use]
    pub fn age(&self) -> Option<Duration> {
        self.cached_at.map(|cached_at| cached_at.elapsed())
    }

    /// Returns `true` if the entry's own TTL has elapsed.
    ///
    /// Entries without a per-entry TTL, and unstamped entries, are never
    /// expired by this check; tier-level TTLs are the tier's business.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        match (self.ttl, self.age()) {
            (Some(ttl), Some(age)) => age >= ttl,
            _ => false,
        }
    }

    /// Returns the per-entry TTL, if one is set.
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Sets the per-entry TTL, overriding any tier-level TTL for this entry.
    pub fn set_ttl(&mut self, ttl: Duration) {
        self.ttl = Some(ttl);
    }

    /// Returns a reference to the cached value.
    #[must_use]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Consumes the entry and returns the inner value.
    #[must_use]
    pub fn into_value(self) -> V {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_does_not_overwrite_an_existing_stamp() {
        let mut entry = CacheEntry::new(1);
        let original = Instant::now() - Duration::from_secs(10);
        entry.stamp_at(original);
        entry.stamp();
        assert_eq!(entry.cached_at(), Some(original));
    }

    #[test]
    fn expiry_needs_both_a_ttl_and_a_stamp() {
        let no_ttl = CacheEntry::new(1);
        assert!(!no_ttl.is_expired());

        let unstamped = CacheEntry::with_ttl(1, Duration::ZERO);
        assert!(!unstamped.is_expired());

        let mut stale = CacheEntry::with_ttl(1, Duration::from_secs(1));
        stale.stamp_at(Instant::now() - Duration::from_secs(2));
        assert!(stale.is_expired());
    }

    #[test]
    fn age_measures_from_the_stamp() {
        let mut entry = CacheEntry::new("v");
        assert!(entry.age().is_none());
        entry.stamp_at(Instant::now() - Duration::from_secs(5));
        assert!(entry.age().unwrap() >= Duration::from_secs(5));
    }
}
