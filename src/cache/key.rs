//! Cache key derivation.

use axum::http::{Method, Uri};

/// Builds the cache key for a request.
///
/// The key is `METHOD:path`, followed by `?` and the non-empty query segments
/// sorted byte-wise when any remain. Segments are compared as raw,
/// still-encoded text, so `b=2&a=1` and `a=1&b=2` share a key while a change
/// in value, case or encoding does not.
pub fn canonical_key(method: &str, path: &str, raw_query: &str) -> String {
    let mut key = String::with_capacity(method.len() + path.len() + raw_query.len() + 2);
    key.push_str(method);
    key.push(':');
    key.push_str(path);

    if raw_query.is_empty() {
        return key;
    }

    let mut segments: Vec<&str> = raw_query.split('&').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return key;
    }
    segments.sort_unstable();

    key.push('?');
    key.push_str(&segments.join("&"));
    key
}

/// The parts of an inbound request the cache cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: String,
    pub path: String,
    pub raw_query: String,
}

impl RequestDescriptor {
    pub fn new(
        method: impl Into<String>,
        path: impl Into<String>,
        raw_query: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            raw_query: raw_query.into(),
        }
    }

    pub fn from_parts(method: &Method, uri: &Uri) -> Self {
        Self::new(method.as_str(), uri.path(), uri.query().unwrap_or_default())
    }

    pub fn cache_key(&self) -> String {
        canonical_key(&self.method, &self.path, &self.raw_query)
    }
}
