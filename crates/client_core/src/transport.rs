//! Fetch-by-URL capability used by the index and detail layers.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::TransportError;

#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` and parse the body as JSON.
    async fn fetch_json(&self, url: &str) -> Result<Value, TransportError>;
}

pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch_json(&self, url: &str) -> Result<Value, TransportError> {
        debug!(url, "GET");
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Unreachable {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = res.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        res.json::<Value>()
            .await
            .map_err(|e| TransportError::InvalidJson {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}
