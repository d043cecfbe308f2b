//! Rate limiting for repeated backend fetches

use crate::{DiscoveryError, Endpoint, Result};
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

/// A queued backend fetch, boxed so throttle implementations stay object safe.
pub type EndpointFetch = BoxFuture<'static, Result<Vec<Endpoint>>>;

/// Paces repeated calls to an endpoint backend.
///
/// A tight refresh loop must not hammer the backend; the throttle decides
/// when each queued fetch is allowed to run.
#[async_trait]
pub trait Throttle: Send + Sync {
    /// Run `fetch` once the throttle's policy allows it.
    ///
    /// Fails with [`DiscoveryError::Cancelled`] when `cancel` fires before
    /// the fetch completes, or when the throttle has been closed. The fetch
    /// is never started after cancellation has been observed.
    async fn queue(&self, fetch: EndpointFetch, cancel: CancellationToken) -> Result<Vec<Endpoint>>;

    /// Release the throttle's resources. Subsequent `queue` calls fail with
    /// [`DiscoveryError::Cancelled`].
    fn close(&self);
}

/// Throttle enforcing a minimum interval between consecutive backend calls.
///
/// Queued calls are serialized; the first call runs unpaced, each later call
/// waits until at least `interval` has passed since the previous call began.
pub struct IntervalThrottle {
    interval: Duration,
    last_call: Mutex<Option<Instant>>,
    closed: CancellationToken,
}

impl IntervalThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_call: Mutex::new(None),
            closed: CancellationToken::new(),
        }
    }
}

#[async_trait]
impl Throttle for IntervalThrottle {
    async fn queue(&self, fetch: EndpointFetch, cancel: CancellationToken) -> Result<Vec<Endpoint>> {
        if self.closed.is_cancelled() || cancel.is_cancelled() {
            return Err(DiscoveryError::Cancelled);
        }

        // Holding the lock across the wait serializes queued calls.
        let mut last_call = self.last_call.lock().await;
        if let Some(last) = *last_call {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(DiscoveryError::Cancelled),
                _ = self.closed.cancelled() => return Err(DiscoveryError::Cancelled),
                _ = sleep_until(last + self.interval) => {}
            }
        }
        *last_call = Some(Instant::now());

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(DiscoveryError::Cancelled),
            result = fetch => result,
        }
    }

    fn close(&self) {
        self.closed.cancel();
    }
}
