//! Storefront target - reachability checking for the deployment under test
//!
//! Nothing is spawned here: the storefront is an external deployment and the
//! harness only verifies it answers before any browser test runs.

use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{E2eError, E2eResult};

/// A reachable storefront deployment
#[derive(Debug)]
pub struct StoreTarget {
    base_url: String,
}

impl StoreTarget {
    /// Probe the configured storefront until it answers with a 2xx, or the
    /// probe deadline passes.
    pub async fn probe(config: StoreConfig) -> E2eResult<Self> {
        let base_url = normalize_base_url(&config.base_url);
        let probe_url = format!("{}/", base_url);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?;

        let start = std::time::Instant::now();
        let mut attempts = 0;

        while start.elapsed() < config.probe_timeout {
            attempts += 1;

            match client.get(&probe_url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    info!("Storefront is reachable at {}", base_url);
                    return Ok(Self { base_url });
                }
                Ok(resp) => {
                    warn!("Storefront probe returned {}", resp.status());
                }
                Err(e) => {
                    if attempts == 1 {
                        info!("Waiting for storefront at {}...", base_url);
                    }
                    // Connection refused is expected for a theme dev server
                    // that is still starting
                    if !e.is_connect() {
                        warn!("Storefront probe error: {}", e);
                    }
                }
            }

            sleep(config.probe_interval).await;
        }

        Err(E2eError::StoreUnreachable {
            url: base_url,
            attempts,
        })
    }

    /// Base URL of the storefront, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a relative storefront path
    pub fn page_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Configuration for the storefront under test
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the deployment (local theme dev server by default)
    pub base_url: String,

    /// How long to keep probing before giving up
    pub probe_timeout: Duration,

    /// Delay between probe attempts
    pub probe_interval: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9292".to_string(),
            probe_timeout: Duration::from_secs(30),
            probe_interval: Duration::from_millis(500),
        }
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
