//! Caching layer.
//!
//! Thin typed wrappers over Moka, handed out by a central registry so
//! stores and the permission gate can share one place that knows every
//! cache's name and sizing.

mod registry;
mod typed;

pub use registry::CacheRegistry;
pub use typed::TypedCache;

use std::time::Duration;

/// Configuration for one cache instance.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries.
    pub max_capacity: u64,

    /// Time-to-live; entries older than this are evicted.
    pub ttl: Option<Duration>,

    /// Time-to-idle; entries unread for this long are evicted.
    pub tti: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Some(Duration::from_secs(600)),
            tti: None,
        }
    }
}

impl CacheConfig {
    /// Config with the given capacity and default expiry.
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            max_capacity,
            ..Default::default()
        }
    }

    /// Set time-to-live.
    #[must_use]
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.ttl = Some(duration);
        self
    }

    /// Set time-to-idle.
    #[must_use]
    pub fn tti(mut self, duration: Duration) -> Self {
        self.tti = Some(duration);
        self
    }

    /// Sizing for admin-roster lookups: checked on most group messages,
    /// must go stale quickly when roles change.
    pub fn admin_roster() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Some(Duration::from_secs(300)),
            tti: Some(Duration::from_secs(120)),
        }
    }
}
