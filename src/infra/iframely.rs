use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::config::AppConfig;

/// Converts a URL into renderable markup via a third-party metadata service.
/// A seam rather than a concrete client so the resolver can be exercised with
/// stubs: any failure mode (network, non-2xx, empty payload) is an `Err` and
/// triggers the caller's fallback chain.
#[async_trait]
pub trait RemoteResolver: Send + Sync {
    async fn resolve(&self, url: &str) -> Result<String>;
}

pub struct IframelyClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Deserialize)]
struct IframelyPayload {
    html: Option<String>,
}

impl IframelyClient {
    /// Returns `None` when no API key is configured; remote resolution is
    /// disabled entirely in that case.
    pub fn from_config(config: &AppConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.iframely_api_key.clone() else {
            return Ok(None);
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.resolve_timeout_seconds))
            .build()?;

        Ok(Some(Self {
            http,
            endpoint: config.iframely_endpoint.clone(),
            api_key,
        }))
    }
}

#[async_trait]
impl RemoteResolver for IframelyClient {
    async fn resolve(&self, url: &str) -> Result<String> {
        // omit_script keeps the service from shipping its loader tag with
        // every response; the client page carries it once.
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("url", url),
                ("key", self.api_key.as_str()),
                ("omit_script", "1"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("resolution service returned {}", status));
        }

        let payload: IframelyPayload = response.json().await?;
        match payload.html {
            Some(html) if !html.trim().is_empty() => Ok(html),
            _ => Err(anyhow!("resolution service returned no html")),
        }
    }
}
