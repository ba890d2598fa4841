//! RubyGems.org API implementation

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{DEFAULT_REGISTRY_URL, FETCH_TIMEOUT_MS};
use crate::version::error::RegistryError;
use crate::version::registry::Registry;

/// Version reported by rubygems.org for gems it does not know
const UNKNOWN_VERSION: &str = "unknown";

/// Response from `/api/v1/versions/{name}/latest.json`
#[derive(Debug, Deserialize)]
struct LatestVersionResponse {
    version: String,
}

/// Registry implementation for the RubyGems API
pub struct RubyGemsRegistry {
    client: Client,
    base_url: String,
}

impl RubyGemsRegistry {
    /// Creates a new RubyGemsRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(FETCH_TIMEOUT_MS))
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to configure HTTP client, using defaults: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for RubyGemsRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_URL)
    }
}

#[async_trait::async_trait]
impl Registry for RubyGemsRegistry {
    async fn fetch_latest_version(&self, package_name: &str) -> Result<String, RegistryError> {
        let url = format!(
            "{}/api/v1/versions/{}/latest.json",
            self.base_url, package_name
        );
        debug!("Fetching latest gem version: {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound(package_name.to_string()));
        }

        if !status.is_success() {
            warn!("rubygems returned status {}: {}", status, url);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let latest: LatestVersionResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse rubygems response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        match latest.version.trim() {
            "" | UNKNOWN_VERSION => Err(RegistryError::NotFound(package_name.to_string())),
            version => Ok(version.to_string()),
        }
    }
}
