//! reqwest-backed explorer client.

use crate::client::{Explorer, RangeStart};
use crate::error::ExplorerError;
use crate::wire;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use witwhalert_core::{BlockDetail, BlockSummary};

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Explorer REST API client.
#[derive(Debug, Clone)]
pub struct HttpExplorer {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpExplorer {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ExplorerError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("witwhalert/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String, ExplorerError> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self.http_client.get(&url).query(query).send().await?;

        if !response.status().is_success() {
            return Err(ExplorerError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(ExplorerError::Malformed("empty body".to_string()));
        }
        Ok(body)
    }
}

fn range_query(start: RangeStart) -> [(&'static str, String); 2] {
    match start {
        RangeStart::Head => [("action", "init".to_string()), ("block", "-1".to_string())],
        RangeStart::From(epoch) => [("action", "append".to_string()), ("block", epoch.to_string())],
    }
}

#[async_trait]
impl Explorer for HttpExplorer {
    async fn fetch_range(&self, start: RangeStart) -> Result<Vec<BlockSummary>, ExplorerError> {
        let body = self.get("blockchain", &range_query(start)).await.map_err(|e| {
            debug!(start = ?start, error = %e, "Range query failed");
            e
        })?;

        let blocks = wire::parse_range(&body)?;
        debug!(start = ?start, count = blocks.len(), "Range query returned blocks");
        Ok(blocks)
    }

    async fn fetch_detail(&self, block_hash: &str) -> Result<BlockDetail, ExplorerError> {
        let body = self
            .get("hash", &[("value", block_hash.to_string())])
            .await
            .map_err(|e| {
                debug!(hash = block_hash, error = %e, "Detail query failed");
                e
            })?;

        wire::parse_detail(&body)
    }
}
