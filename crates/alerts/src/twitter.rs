//! Twitter (X) channel over the v2 tweets endpoint.

use crate::channel::{Channel, ChannelError};
use crate::format::MessageFormat;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Default endpoint for creating posts.
pub const TWEETS_ENDPOINT: &str = "https://api.twitter.com/2/tweets";

#[derive(Serialize)]
struct CreateTweet<'a> {
    text: &'a str,
}

/// Posts plain-text alerts as tweets using an OAuth 2.0 user access token.
pub struct TwitterChannel {
    endpoint: String,
    access_token: String,
    http_client: reqwest::Client,
}

impl TwitterChannel {
    pub fn new(access_token: impl Into<String>) -> Result<Self, ChannelError> {
        Self::with_endpoint(TWEETS_ENDPOINT, access_token)
    }

    /// Point the channel at a different endpoint.
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, ChannelError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            endpoint: endpoint.into(),
            access_token: access_token.into(),
            http_client,
        })
    }
}

impl std::fmt::Debug for TwitterChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterChannel")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Channel for TwitterChannel {
    fn name(&self) -> &str {
        "twitter"
    }

    fn format(&self) -> MessageFormat {
        MessageFormat::Plain
    }

    async fn post(&self, message: &str) -> Result<(), ChannelError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&CreateTweet { text: message })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ChannelError::Auth(status.as_u16()));
        }

        let body = response.text().await.unwrap_or_default();
        Err(ChannelError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
