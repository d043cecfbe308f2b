//! Fallback aggregation of prioritized endpoint sources

use async_trait::async_trait;
use discovery_core::{Endpoint, EndpointSource, Result};
use std::sync::Arc;
use tracing::debug;

/// Queries member sources in priority order and surfaces the first
/// non-empty endpoint list.
///
/// This is fallback, not a merge: exactly one member's data is returned per
/// call. A member's failure propagates; wrap members in a caching
/// subscriber when failure tolerance is wanted. Members often are caching
/// subscribers, since those implement [`EndpointSource`] themselves.
pub struct FallbackAggregator {
    sources: Vec<Arc<dyn EndpointSource>>,
}

impl FallbackAggregator {
    pub fn new(sources: Vec<Arc<dyn EndpointSource>>) -> Self {
        Self { sources }
    }

    /// Return the first member's non-empty endpoint list, or an empty list
    /// when every member comes back empty.
    pub async fn endpoints(&self) -> Result<Vec<Endpoint>> {
        for source in &self.sources {
            let endpoints = source.fetch().await?;
            if !endpoints.is_empty() {
                return Ok(endpoints);
            }
            debug!(
                "Source for {} returned no endpoints, trying next",
                source.service_name()
            );
        }
        Ok(Vec::new())
    }
}

#[async_trait]
impl EndpointSource for FallbackAggregator {
    fn service_name(&self) -> &str {
        self.sources
            .first()
            .map(|source| source.service_name())
            .unwrap_or_default()
    }

    async fn fetch(&self) -> Result<Vec<Endpoint>> {
        self.endpoints().await
    }
}
