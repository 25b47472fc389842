//! Video metadata lookup through oEmbed.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::MetadataConfig;
use crate::repository::VideoMetadata;

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("oEmbed request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("oEmbed provider returned {status} for {video_url}")]
    Status { status: u16, video_url: String },

    #[error("invalid oEmbed endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Resolves a video URL to its title, thumbnail and creator.
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    async fn fetch(&self, video_url: &str) -> Result<VideoMetadata, MetadataError>;
}

/// Subset of an oEmbed response this service stores.
#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    #[serde(default)]
    title: String,
    #[serde(default)]
    thumbnail_url: String,
    #[serde(default)]
    author_name: String,
    #[serde(default)]
    author_url: String,
}

impl From<OEmbedResponse> for VideoMetadata {
    fn from(r: OEmbedResponse) -> Self {
        Self {
            video_title: r.title,
            thumbnail_url: r.thumbnail_url,
            creator_name: r.author_name,
            creator_url: r.author_url,
        }
    }
}

/// oEmbed client for a single provider endpoint.
#[derive(Debug, Clone)]
pub struct OEmbedClient {
    http: reqwest::Client,
    endpoint: url::Url,
}

impl OEmbedClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, MetadataError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: url::Url::parse(endpoint)?,
        })
    }

    pub fn from_config(config: &MetadataConfig) -> Result<Self, MetadataError> {
        Self::new(&config.oembed_endpoint, config.timeout)
    }
}

#[async_trait]
impl MetadataFetcher for OEmbedClient {
    async fn fetch(&self, video_url: &str) -> Result<VideoMetadata, MetadataError> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[("url", video_url), ("format", "json")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, video_url, "oEmbed lookup rejected");
            return Err(MetadataError::Status {
                status: status.as_u16(),
                video_url: video_url.to_string(),
            });
        }

        let body: OEmbedResponse = response.json().await?;
        tracing::debug!(video_url, title = %body.title, "oEmbed lookup succeeded");
        Ok(body.into())
    }
}
