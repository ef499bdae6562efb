//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::sync::Arc;
use std::time::{Duration, Instant};

use super::lru::NodeId;
use super::payload::Payload;

/// Fallback horizon for TTLs too large to add to an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

// == Cache Entry ==
/// A cached payload with its absolute expiration time and recency handle.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload
    pub payload: Arc<Payload>,
    /// Instant at which the entry stops being served
    pub expires_at: Instant,
    /// Position in the store's recency list
    pub(crate) node: NodeId,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl` after `now`.
    pub(crate) fn new(payload: Arc<Payload>, ttl: Duration, now: Instant, node: NodeId) -> Self {
        Self {
            payload,
            expires_at: expiry_from(now, ttl),
            node,
        }
    }

    // == Refresh ==
    /// Replaces the payload and restarts the TTL from `now`.
    pub(crate) fn refresh(&mut self, payload: Arc<Payload>, ttl: Duration, now: Instant) {
        self.payload = payload;
        self.expires_at = expiry_from(now, ttl);
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// An entry is expired once `now >= expires_at`, so a TTL that has fully
    /// elapsed is never served.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    #[cfg(test)]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Returns remaining TTL, or zero once expired.
    #[cfg(test)]
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

fn expiry_from(now: Instant, ttl: Duration) -> Instant {
    now.checked_add(ttl)
        .or_else(|| now.checked_add(FAR_FUTURE))
        .unwrap_or(now)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::LruTracker;
    use axum::http::{HeaderMap, StatusCode};
    use std::thread::sleep;

    fn entry(ttl: Duration) -> CacheEntry {
        let mut lru = LruTracker::new();
        let node = lru.push_front("k".to_string());
        let payload = Arc::new(Payload::new(StatusCode::OK, HeaderMap::new(), "v"));
        CacheEntry::new(payload, ttl, Instant::now(), node)
    }

    #[test]
    fn test_entry_not_expired_with_ttl() {
        let entry = entry(Duration::from_secs(60));
        assert!(!entry.is_expired());
        assert_eq!(entry.payload.body().as_ref(), b"v");
    }

    #[test]
    fn test_entry_expiration() {
        let entry = entry(Duration::from_millis(10));

        assert!(!entry.is_expired());
        sleep(Duration::from_millis(20));
        assert!(entry.is_expired());
    }

    #[test]
    fn test_ttl_remaining() {
        let entry = entry(Duration::from_secs(10));

        let remaining = entry.ttl_remaining();
        assert!(remaining <= Duration::from_secs(10));
        assert!(remaining >= Duration::from_secs(9));
    }

    #[test]
    fn test_ttl_remaining_expired() {
        let entry = entry(Duration::from_millis(5));
        sleep(Duration::from_millis(15));
        assert_eq!(entry.ttl_remaining(), Duration::ZERO);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = entry(Duration::from_secs(1));
        assert!(entry.is_expired_at(entry.expires_at), "Entry should be expired at boundary");
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let entry = entry(Duration::MAX);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_refresh_replaces_payload_and_expiry() {
        let mut entry = entry(Duration::from_millis(1));
        let replacement = Arc::new(Payload::new(StatusCode::ACCEPTED, HeaderMap::new(), "new"));

        sleep(Duration::from_millis(5));
        entry.refresh(Arc::clone(&replacement), Duration::from_secs(60), Instant::now());

        assert!(!entry.is_expired());
        assert!(Arc::ptr_eq(&entry.payload, &replacement));
    }
}
