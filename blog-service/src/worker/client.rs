//! HTTP client for the posts API.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

use crate::store::Post;

/// Errors from a single API call.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid API base URL {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("API base URL must be http or https, got {0:?}")]
    UnsupportedScheme(String),

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("unexpected status: {0}")]
    Status(StatusCode),

    #[error("failed to decode response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Client for the endpoints the worker uses.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// A base path such as `http://host/api` is treated as a directory, so
    /// endpoints resolve beneath it with or without a trailing slash.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }

        let base = Url::parse(&normalized).map_err(|source| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;

        if !matches!(base.scheme(), "http" | "https") {
            return Err(ClientError::UnsupportedScheme(base.scheme().to_string()));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Transport)?;

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `GET {base}/posts?unprocessed=true`
    pub fn unprocessed_url(&self) -> Url {
        let mut url = self.endpoint("posts");
        url.query_pairs_mut().append_pair("unprocessed", "true");
        url
    }

    /// `PATCH {base}/posts/{id}`
    pub fn post_url(&self, id: u64) -> Url {
        self.endpoint(&format!("posts/{id}"))
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        // http(s) URLs always have a path; the base ends in '/', so its last
        // segment is empty and gets replaced.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            segments.extend(path.split('/'));
        }
        url
    }

    /// Fetch the posts that are not yet processed.
    pub async fn fetch_unprocessed(&self) -> Result<Vec<Post>, ClientError> {
        let response = self
            .http
            .get(self.unprocessed_url())
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if !response.status().is_success() {
            return Err(ClientError::Status(response.status()));
        }

        response.json::<Vec<Post>>().await.map_err(ClientError::Decode)
    }

    /// Mark the post with `id` processed, returning the API's view of it.
    pub async fn mark_processed(&self, id: u64) -> Result<Post, ClientError> {
        let response = self
            .http
            .patch(self.post_url(id))
            .send()
            .await
            .map_err(ClientError::Transport)?;

        if response.status() != StatusCode::OK {
            return Err(ClientError::Status(response.status()));
        }

        response.json::<Post>().await.map_err(ClientError::Decode)
    }
}
