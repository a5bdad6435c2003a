//! Cache configuration.

use std::time::Duration;

const DEFAULT_TTL_SECONDS: u64 = 60;

/// Runtime cache settings derived from `[cache]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Lifetime of every list entry.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_TTL_SECONDS),
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            ttl: Duration::from_secs(settings.ttl_seconds.get()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU64;

    use super::*;
    use crate::config::CacheSettings;

    #[test]
    fn default_ttl_is_one_minute() {
        assert_eq!(CacheConfig::default().ttl, Duration::from_secs(60));
    }

    #[test]
    fn settings_ttl_is_carried_over() {
        let settings = CacheSettings {
            ttl_seconds: NonZeroU64::new(5).expect("non-zero"),
        };
        assert_eq!(CacheConfig::from(&settings).ttl, Duration::from_secs(5));
    }
}
