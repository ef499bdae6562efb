//! Header filtering and response replay.
//!
//! Connection-scoped ("hop-by-hop") headers describe one TCP connection and
//! must never be stored or replayed onto another response.

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, HeaderName, Response, StatusCode};
use thiserror::Error;

use super::payload::Payload;

/// Lowercase names of headers dropped before storage.
pub const HOP_BY_HOP_HEADERS: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
    "transfer-encoding",
    "upgrade",
];

/// `HeaderName` is always lowercase, so a direct comparison is case-insensitive.
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.as_str())
}

/// Copies `headers` without hop-by-hop entries, keeping value order per name.
pub fn filter_for_storage(headers: &HeaderMap) -> HeaderMap {
    let mut filtered = HeaderMap::with_capacity(headers.keys_len());
    for name in headers.keys().filter(|name| !is_hop_by_hop(name)) {
        for value in headers.get_all(name) {
            filtered.append(name.clone(), value.clone());
        }
    }
    filtered
}

// == Replay ==
/// Failure while writing a replayed body to a caller.
#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("caller disconnected")]
    Disconnected,

    #[error("body write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Something a cached response can be written onto.
pub trait ReplayTarget {
    fn headers_mut(&mut self) -> &mut HeaderMap;

    fn set_status(&mut self, status: StatusCode);

    /// Hands `body` to the caller; fails when the caller can no longer receive it.
    fn write_body(&mut self, body: Bytes) -> Result<(), ReplayError>;
}

impl ReplayTarget for Response<Body> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        Response::headers_mut(self)
    }

    fn set_status(&mut self, status: StatusCode) {
        *self.status_mut() = status;
    }

    /// Never fails: the body is only attached here. A client that goes away
    /// while hyper streams it after the handler returns is hyper's concern.
    fn write_body(&mut self, body: Bytes) -> Result<(), ReplayError> {
        *self.body_mut() = Body::from(body);
        Ok(())
    }
}

/// Replaces every header named in `cached` on `target`.
///
/// Existing values for a cached name are dropped before the cached values are
/// appended, so replaying twice never duplicates anything. Names absent from
/// `cached` are left alone.
pub fn replay_headers(target: &mut HeaderMap, cached: &HeaderMap) {
    for name in cached.keys() {
        target.remove(name);
        for value in cached.get_all(name) {
            target.append(name.clone(), value.clone());
        }
    }
}

/// Writes headers, status and body of `payload` to `target`.
pub fn replay<T>(target: &mut T, payload: &Payload) -> Result<(), ReplayError>
where
    T: ReplayTarget + ?Sized,
{
    replay_headers(target.headers_mut(), payload.headers());
    target.set_status(payload.status());
    target.write_body(payload.body().clone())
}
