//! Request Orchestration
//!
//! Glue between the store, an upstream fetch and the caller's response.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use tracing::{info, warn};

use crate::cache::{replay, CacheStore, Payload, ReplayTarget, RequestDescriptor};
use crate::error::{ApiError, Result};

/// Raw upstream response, before header filtering.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

// == Response Cache ==
/// Serves requests from a shared [`CacheStore`], fetching upstream on a miss.
///
/// Callers see the same replayed response whether it came from the store or
/// from a fresh fetch; only the logs tell them apart.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    store: Arc<CacheStore>,
}

impl ResponseCache {
    pub fn new(store: Arc<CacheStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    /// Answers `request` onto `target`.
    ///
    /// On a hit the cached payload is replayed and `fetch` is never called.
    /// On a miss `fetch` is awaited; a failure becomes [`ApiError::Internal`]
    /// and leaves both the store and `target` untouched. Otherwise the
    /// filtered payload is stored for `ttl` unless its status is 5xx, then
    /// replayed. A replay failure is logged and does not undo the store.
    pub async fn serve<T, F, Fut, E>(
        &self,
        request: &RequestDescriptor,
        ttl: Duration,
        target: &mut T,
        fetch: F,
    ) -> Result<()>
    where
        T: ReplayTarget + ?Sized,
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<Fetched, E>>,
        E: Display,
    {
        let key = request.cache_key();

        if let Some(payload) = self.store.get(&key) {
            if write_payload(target, &payload, &request.path) {
                info!(
                    "Cache HIT and served {} {} from cache with status {}",
                    request.method,
                    request.path,
                    payload.status()
                );
            }
            return Ok(());
        }
        info!(
            "Cache MISS for {} {} with key {}",
            request.method, request.path, key
        );

        let fetched = fetch()
            .await
            .map_err(|err| ApiError::internal(&request.path, err))?;
        let payload = Arc::new(Payload::from_fetched(fetched));

        if payload.is_cacheable() {
            self.store.set(key, Arc::clone(&payload), ttl);
        } else {
            warn!(
                "Not caching {} {}: upstream answered with status {}",
                request.method,
                request.path,
                payload.status()
            );
        }

        if write_payload(target, &payload, &request.path) {
            info!(
                "Successfully handled {} {} with status {}",
                request.method,
                request.path,
                payload.status()
            );
        }
        Ok(())
    }
}

/// Replays `payload`, logging instead of failing when the caller is gone.
fn write_payload<T>(target: &mut T, payload: &Payload, path: &str) -> bool
where
    T: ReplayTarget + ?Sized,
{
    match replay(target, payload) {
        Ok(()) => true,
        Err(err) => {
            warn!(
                "Unexpected error occurred while streaming response to caller of {}: {}",
                path, err
            );
            false
        }
    }
}
