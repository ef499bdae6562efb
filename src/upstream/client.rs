//! PostgREST client backed by reqwest.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use super::{Upstream, UpstreamError};
use crate::cache::Fetched;

/// Client for a Supabase-style `/rest/v1/<table>` endpoint.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RestClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }
}

#[async_trait]
impl Upstream for RestClient {
    async fn query(
        &self,
        table: &str,
        params: &[(&'static str, String)],
    ) -> Result<Fetched, UpstreamError> {
        debug!("Querying upstream table {} with {} parameters", table, params.len());

        let response = self
            .http
            .get(self.table_url(table))
            .query(params)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(Fetched {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_url_trims_trailing_slash() {
        let client = RestClient::new("https://db.example.com/", "key");
        assert_eq!(
            client.table_url("Courses"),
            "https://db.example.com/rest/v1/Courses"
        );
    }

    #[test]
    fn test_table_url_without_slash() {
        let client = RestClient::new("https://db.example.com", "key");
        assert_eq!(
            client.table_url("Sections"),
            "https://db.example.com/rest/v1/Sections"
        );
    }
}
