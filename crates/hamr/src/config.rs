// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! Cache configuration.

use std::time::Duration;

use hamr_shape::FingerprintWidth;

/// TTLs and wire settings for a two-tier cache.
///
/// The defaults encode the intended staleness budget: the local tier holds an
/// entry for at most one minute, the shared tier for five. A short local TTL
/// bounds how long one process can serve a copy the rest of the fleet no
/// longer agrees with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Time-to-live for the local tier. Default: 1 minute.
    pub local_ttl: Duration,
    /// Time-to-live for blobs written to the shared tier. Default: 5 minutes.
    pub shared_ttl: Duration,
    /// Fingerprint prefix width on shared-tier envelopes. Default: 64 bits.
    pub fingerprint_width: FingerprintWidth,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            local_ttl: Duration::from_secs(60),
            shared_ttl: Duration::from_secs(300),
            fingerprint_width: FingerprintWidth::default(),
        }
    }
}

impl CacheConfig {
    /// Returns the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the local-tier TTL.
    #[must_use]
    pub fn local_ttl(mut self, ttl: Duration) -> Self {
        self.local_ttl = ttl;
        self
    }

    /// Sets the shared-tier TTL.
    #[must_use]
    pub fn shared_ttl(mut self, ttl: Duration) -> Self {
        self.shared_ttl = ttl;
        self
    }

    /// Sets the fingerprint prefix width for shared-tier envelopes.
    ///
    /// Every process sharing the store must use the same width; a width
    /// change is itself a schema change and reads across it miss.
    #[must_use]
    pub fn fingerprint_width(mut self, width: FingerprintWidth) -> Self {
        self.fingerprint_width = width;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_staleness_budget() {
        let config = CacheConfig::default();
        assert_eq!(config.local_ttl, Duration::from_secs(60));
        assert_eq!(config.shared_ttl, Duration::from_secs(300));
        assert_eq!(config.fingerprint_width, FingerprintWidth::W64);
    }

    #[test]
    fn setters_compose() {
        let config = CacheConfig::new()
            .local_ttl(Duration::from_secs(5))
            .shared_ttl(Duration::from_secs(50))
            .fingerprint_width(FingerprintWidth::W128);
        assert_eq!(config.local_ttl, Duration::from_secs(5));
        assert_eq!(config.shared_ttl, Duration::from_secs(50));
        assert_eq!(config.fingerprint_width, FingerprintWidth::W128);
    }
}
