//! Contract implemented by every endpoint discovery backend

use crate::{Endpoint, Result};
use async_trait::async_trait;

/// A source of endpoints for one named service.
///
/// Implementations query a backend registry (or another source) and return
/// the current endpoint list. Caching subscribers and fallback aggregators
/// implement this trait themselves, so sources compose.
#[async_trait]
pub trait EndpointSource: Send + Sync {
    /// Name of the service this source resolves.
    fn service_name(&self) -> &str;

    /// Fetch the current endpoint list for the service.
    async fn fetch(&self) -> Result<Vec<Endpoint>>;
}
