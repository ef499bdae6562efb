//! Jupiterp API - course data served through an in-memory response cache
//!
//! Upstream responses are cached under canonical request keys with LRU
//! eviction and per-resource TTL expiration.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;
pub mod upstream;

pub use api::{create_router, AppState};
pub use cache::{CacheStore, ResponseCache};
pub use config::{Config, TtlPolicy};
pub use error::ApiError;
pub use tasks::spawn_cleanup_task;
