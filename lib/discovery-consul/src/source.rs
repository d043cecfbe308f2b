//! Consul-backed endpoint source

use crate::client::{ConsulClient, ServiceEntry};
use async_trait::async_trait;
use discovery_core::{Endpoint, EndpointSource, Result};
use std::sync::Arc;

/// Resolves a service's endpoints through Consul health checks.
pub struct ConsulSource {
    client: Arc<ConsulClient>,
    service_name: String,
    tags: Vec<String>,
    passing_only: bool,
}

impl ConsulSource {
    pub fn new(
        client: Arc<ConsulClient>,
        service_name: impl Into<String>,
        tags: Vec<String>,
        passing_only: bool,
    ) -> Self {
        Self {
            client,
            service_name: service_name.into(),
            tags,
            passing_only,
        }
    }
}

#[async_trait]
impl EndpointSource for ConsulSource {
    fn service_name(&self) -> &str {
        &self.service_name
    }

    async fn fetch(&self) -> Result<Vec<Endpoint>> {
        let entries = self
            .client
            .health_service(&self.service_name, &self.tags, self.passing_only)
            .await?;
        Ok(entries.iter().map(entry_endpoint).collect())
    }
}

/// Map one health entry to an endpoint. The service address wins when set;
/// agents that register without one fall back to the node address.
fn entry_endpoint(entry: &ServiceEntry) -> Endpoint {
    let host = if entry.service.address.is_empty() {
        entry.node.address.clone()
    } else {
        entry.service.address.clone()
    };
    Endpoint::new(host, entry.service.port)
}
