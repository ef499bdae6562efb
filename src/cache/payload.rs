//! Cached Payload
//!
//! Immutable snapshot of an upstream response chosen for caching.

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};

use super::headers::filter_for_storage;
use super::orchestrator::Fetched;

// == Payload ==
/// Status, headers and body of a response, frozen at construction.
///
/// Payloads are shared as `Arc<Payload>`. Updating a cache entry swaps the
/// `Arc`; the payload itself is never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Payload {
    /// Creates a payload from already-filtered parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Builds a payload from a fetch result, dropping hop-by-hop headers.
    pub fn from_fetched(fetched: Fetched) -> Self {
        Self {
            status: fetched.status,
            headers: filter_for_storage(&fetched.headers),
            body: fetched.body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Returns true unless the status is a 5xx server error.
    pub fn is_cacheable(&self) -> bool {
        self.status.as_u16() < StatusCode::INTERNAL_SERVER_ERROR.as_u16()
    }
}
