//! Factory wiring for Consul-backed subscribers

use crate::{ConsulClient, ConsulSource};
use discovery_cache::SourceFactory;
use discovery_core::EndpointSource;
use std::sync::Arc;

/// Builds [`ConsulSource`]s for a shared client, for use with
/// `SubscriberFactory`.
pub struct ConsulSourceFactory {
    client: Arc<ConsulClient>,
    tags: Vec<String>,
    passing_only: bool,
}

impl ConsulSourceFactory {
    pub fn new(client: Arc<ConsulClient>) -> Self {
        Self {
            client,
            tags: Vec::new(),
            passing_only: true,
        }
    }

    /// Filter services by backend-side tags.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Include instances with failing health checks.
    pub fn include_failing(mut self) -> Self {
        self.passing_only = false;
        self
    }
}

impl SourceFactory for ConsulSourceFactory {
    fn source(&self, service_name: &str) -> Arc<dyn EndpointSource> {
        Arc::new(ConsulSource::new(
            Arc::clone(&self.client),
            service_name,
            self.tags.clone(),
            self.passing_only,
        ))
    }
}
