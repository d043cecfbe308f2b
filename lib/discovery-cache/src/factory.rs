//! Construction wiring for caching subscribers

use crate::CachingSubscriber;
use discovery_core::{EndpointSource, EndpointStore, IntervalThrottle};
use std::sync::Arc;
use std::time::Duration;

/// Builds the backend source for a named service.
///
/// Backends (Consul, fixed lists, ...) implement this so the factory stays
/// backend agnostic.
pub trait SourceFactory: Send + Sync {
    fn source(&self, service_name: &str) -> Arc<dyn EndpointSource>;
}

/// Produces configured [`CachingSubscriber`]s sharing one endpoint store.
///
/// Each subscriber gets its own [`IntervalThrottle`] pacing its refresh
/// loop by `refresh_interval`.
pub struct SubscriberFactory {
    sources: Arc<dyn SourceFactory>,
    store: Arc<dyn EndpointStore>,
    refresh_interval: Duration,
}

impl SubscriberFactory {
    pub fn new(
        sources: Arc<dyn SourceFactory>,
        store: Arc<dyn EndpointStore>,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            sources,
            store,
            refresh_interval,
        }
    }

    /// Create a subscriber for `service_name`. The subscription itself
    /// starts lazily on first use.
    pub fn subscriber(&self, service_name: &str) -> CachingSubscriber {
        let source = self.sources.source(service_name);
        let throttle = Arc::new(IntervalThrottle::new(self.refresh_interval));
        CachingSubscriber::new(source, Arc::clone(&self.store), throttle)
    }
}
