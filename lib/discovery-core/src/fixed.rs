//! Static endpoint source

use crate::{Endpoint, EndpointSource, Result};
use async_trait::async_trait;

/// Endpoint source backed by a fixed list.
///
/// Useful as the lowest-priority member of a fallback chain and in tests.
pub struct FixedSource {
    service_name: String,
    endpoints: Vec<Endpoint>,
}

impl FixedSource {
    pub fn new(service_name: impl Into<String>, endpoints: Vec<Endpoint>) -> Self {
        Self {
            service_name: service_name.into(),
            endpoints,
        }
    }
}

#[async_trait]
impl EndpointSource for FixedSource {
    fn service_name(&self) -> &str {
        &self.service_name
    }

    async fn fetch(&self) -> Result<Vec<Endpoint>> {
        Ok(self.endpoints.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_the_configured_list() {
        let endpoints = vec![Endpoint::new("10.0.0.1", 8080), Endpoint::new("10.0.0.2", 8080)];
        let source = FixedSource::new("billing", endpoints.clone());

        assert_eq!(source.service_name(), "billing");
        assert_eq!(source.fetch().await.unwrap(), endpoints);
    }
}
