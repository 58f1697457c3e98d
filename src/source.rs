//! HTTP adapter for poll topics.

use async_trait::async_trait;

use crate::topic::poll::{FetchError, PollSource};

/// Fetches a poll endpoint with a shared HTTP client.
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        HttpSource { client, url }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PollSource for HttpSource {
    /// One GET against the endpoint. Transport failures map to
    /// [`FetchError::Connection`], non-2xx answers to
    /// [`FetchError::Status`] with whatever body the source sent.
    async fn fetch(&self) -> Result<String, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                code: status.as_u16(),
                body,
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Connection(e.to_string()))
    }
}
