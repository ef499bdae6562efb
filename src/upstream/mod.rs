//! Upstream Module
//!
//! Access to the PostgREST backend that holds course, section, instructor
//! and department tables.

mod client;
pub mod query;

use async_trait::async_trait;
use thiserror::Error;

use crate::cache::Fetched;

pub use client::RestClient;

/// Query string pairs sent to a table endpoint.
pub type Params = Vec<(&'static str, String)>;

// == Upstream Error ==
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Transport failure or body read failure
    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),
}

// == Upstream Trait ==
/// A source of table rows, queried with PostgREST parameters.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Fetches `table` filtered by `params`, returning the raw response.
    async fn query(&self, table: &str, params: &[(&'static str, String)])
        -> Result<Fetched, UpstreamError>;
}
