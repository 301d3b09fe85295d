//! Rate-limited HTTP client for the ESPN JSON APIs.

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::{anyhow, Context};
use governor::{Quota, RateLimiter};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Config;
use crate::error::{IngestError, Result};

type DirectLimiter =
    RateLimiter<governor::state::NotKeyed, governor::state::InMemoryState, governor::clock::DefaultClock>;

pub struct EspnClient {
    http_client: reqwest::Client,
    rate_limiter: DirectLimiter,
}

impl EspnClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let per_minute = NonZeroU32::new(config.requests_per_minute)
            .ok_or_else(|| anyhow!("requests_per_minute must be at least 1"))?;
        let rate_limiter = RateLimiter::direct(Quota::per_minute(per_minute));

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(config.fetch_concurrency)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            rate_limiter,
        })
    }

    /// GET `url` and decode the body as `T`.
    ///
    /// Waits on the shared rate limiter first. Non-2xx answers become
    /// [`IngestError::Status`] without attempting to decode the body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|source| IngestError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| IngestError::Network {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            debug!("{} answered {}: {}", url, status, body);
            return Err(IngestError::Status {
                url: url.to_string(),
                status,
            });
        }

        serde_json::from_str(&body).map_err(|source| IngestError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
