//! HTTP client for the Consul health API

use discovery_core::{DiscoveryError, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Connection settings for a Consul agent.
#[derive(Clone, Debug)]
pub struct ConsulConfig {
    /// Base address of the agent's HTTP API.
    pub address: String,
    /// Timeout for a single API call.
    pub timeout: Duration,
}

impl Default for ConsulConfig {
    fn default() -> Self {
        Self {
            address: "http://127.0.0.1:8500".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// One entry from a health-service query.
#[derive(Clone, Debug, Deserialize)]
pub struct ServiceEntry {
    #[serde(rename = "Node")]
    pub node: NodeInfo,
    #[serde(rename = "Service")]
    pub service: AgentService,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NodeInfo {
    #[serde(rename = "Address")]
    pub address: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AgentService {
    #[serde(rename = "Address", default)]
    pub address: String,
    #[serde(rename = "Port")]
    pub port: u16,
}

/// Thin client for the Consul agent's `/v1/health/service` endpoint.
pub struct ConsulClient {
    http: reqwest::Client,
    address: String,
}

impl ConsulClient {
    pub fn new(config: ConsulConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| DiscoveryError::InvalidConfiguration(err.to_string()))?;
        Ok(Self {
            http,
            address: config.address.trim_end_matches('/').to_string(),
        })
    }

    /// Query health-check results for `service`, optionally filtered by
    /// backend-side tags and restricted to passing instances.
    ///
    /// Multiple tags are joined into one comma-separated `tag` parameter.
    pub async fn health_service(
        &self,
        service: &str,
        tags: &[String],
        passing_only: bool,
    ) -> Result<Vec<ServiceEntry>> {
        let url = format!("{}/v1/health/service/{}", self.address, service);
        let mut request = self.http.get(&url);
        if let Some(tag) = tag_filter(tags) {
            request = request.query(&[("tag", tag)]);
        }
        if passing_only {
            request = request.query(&[("passing", "true")]);
        }

        let response = request
            .send()
            .await
            .map_err(|err| DiscoveryError::backend(service, err))?
            .error_for_status()
            .map_err(|err| DiscoveryError::backend(service, err))?;
        let entries: Vec<ServiceEntry> = response
            .json()
            .await
            .map_err(|err| DiscoveryError::backend(service, err))?;

        debug!("Consul returned {} entries for {}", entries.len(), service);
        Ok(entries)
    }
}

fn tag_filter(tags: &[String]) -> Option<String> {
    if tags.is_empty() {
        None
    } else {
        Some(tags.join(","))
    }
}
