//! Cache data structures with TTL support

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cached HTTP response body, stored both in memory and as a JSON file on disk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CachedHttpResponse {
    pub url: String,
    pub data: String,
    /// Unix timestamp (seconds) of when the entry was written
    pub cached_at: i64,
    /// `None` means the entry never expires
    pub ttl_seconds: Option<u64>,
}

impl CachedHttpResponse {
    /// Creates a new cached HTTP response entry
    pub fn new(url: String, data: String, ttl_seconds: Option<u64>) -> Self {
        Self {
            url,
            data,
            cached_at: Utc::now().timestamp(),
            ttl_seconds,
        }
    }

    /// Checks if the cached response is expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    /// Checks expiry against an explicit clock value
    pub fn is_expired_at(&self, now: i64) -> bool {
        let Some(ttl) = self.ttl_seconds else {
            return false;
        };
        let age = now.saturating_sub(self.cached_at).max(0) as u64;
        let is_expired = age > ttl;

        debug!(
            "Cache expiration check: url={}, age={}s, ttl={}s, is_expired={}",
            self.url, age, ttl, is_expired
        );

        is_expired
    }
}

/// How a fetched response may be stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Not stored at all, e.g. data of a session that is still running
    NoStore,
    /// Stored for the given number of seconds
    Expires(u64),
    /// Stored without expiry
    Permanent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_without_ttl_never_expires() {
        let entry = CachedHttpResponse::new("u".to_string(), "[]".to_string(), None);
        assert!(!entry.is_expired_at(entry.cached_at + 10 * 365 * 86_400));
    }

    #[test]
    fn test_entry_with_ttl_expires() {
        let entry = CachedHttpResponse::new("u".to_string(), "[]".to_string(), Some(60));
        assert!(!entry.is_expired_at(entry.cached_at + 60));
        assert!(entry.is_expired_at(entry.cached_at + 61));
    }
}
