//! Cache Module
//!
//! In-memory response caching with TTL expiration and LRU eviction.
//!
//! # Components
//! - [`CacheStore`] - bounded, thread-safe LRU + TTL store
//! - [`canonical_key`] - order-invariant cache keys from method, path and query
//! - [`filter_for_storage`] / [`replay`] - hop-by-hop stripping and response replay
//! - [`ResponseCache`] - per-request glue between the store and an upstream fetch

mod entry;
mod headers;
mod key;
mod lru;
mod orchestrator;
mod payload;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use headers::{
    filter_for_storage, is_hop_by_hop, replay, replay_headers, ReplayError, ReplayTarget,
    HOP_BY_HOP_HEADERS,
};
pub use key::{canonical_key, RequestDescriptor};
pub use lru::{LruTracker, NodeId};
pub use orchestrator::{Fetched, ResponseCache};
pub use payload::Payload;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default number of cached responses
pub const DEFAULT_CAPACITY: usize = 124;

/// Default per-entry body budget in bytes
pub const DEFAULT_MAX_ENTRY_BYTES: usize = 8 * 1024 * 1024; // 8 MiB
