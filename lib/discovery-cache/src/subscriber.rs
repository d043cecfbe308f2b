//! Caching subscriber with a throttled background refresh loop

use async_trait::async_trait;
use discovery_core::{DiscoveryError, Endpoint, EndpointSource, EndpointStore, Result, Throttle};
use futures::FutureExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};
use uuid::Uuid;

type ChangeObserver = Box<dyn Fn() + Send + Sync>;

/// Subscription lifecycle. Transitions are monotonic: `NotStarted` moves to
/// `Running` on the first successful initial fetch, `Disposed` is terminal.
enum SubscriptionState {
    NotStarted,
    Running(#[allow(dead_code)] JoinHandle<()>),
    Disposed,
}

/// Maintains a locally cached, continuously refreshed endpoint list for one
/// service.
///
/// The first call to [`endpoints`](CachingSubscriber::endpoints) performs a
/// synchronous initial fetch and launches a background loop that refreshes
/// the cache through the throttle. Later calls return straight from the
/// cache. Backend failures after a successful start are absorbed by the
/// loop: a stale list is preferred over a dead subscription.
pub struct CachingSubscriber {
    service_name: String,
    /// Opaque store key owned by this instance, never reused across
    /// instances.
    cache_key: String,
    source: Arc<dyn EndpointSource>,
    store: Arc<dyn EndpointStore>,
    throttle: Arc<dyn Throttle>,
    state: Mutex<SubscriptionState>,
    /// Lock-free fast paths; the state mutex stays authoritative.
    started: AtomicBool,
    disposed: AtomicBool,
    cancel: CancellationToken,
    observers: Arc<StdMutex<Vec<ChangeObserver>>>,
}

impl CachingSubscriber {
    pub fn new(
        source: Arc<dyn EndpointSource>,
        store: Arc<dyn EndpointStore>,
        throttle: Arc<dyn Throttle>,
    ) -> Self {
        Self {
            service_name: source.service_name().to_string(),
            cache_key: Uuid::new_v4().to_string(),
            source,
            store,
            throttle,
            state: Mutex::new(SubscriptionState::NotStarted),
            started: AtomicBool::new(false),
            disposed: AtomicBool::new(false),
            cancel: CancellationToken::new(),
            observers: Arc::new(StdMutex::new(Vec::new())),
        }
    }

    /// Name of the subscribed service.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Register a callback invoked once per detected endpoint-set change.
    ///
    /// The callback carries no payload; call `endpoints` to read the new
    /// list.
    pub fn on_change<F>(&self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(callback));
    }

    /// Return the cached endpoint list, starting the subscription on first
    /// use.
    ///
    /// Fails with [`DiscoveryError::Disposed`] after [`shutdown`], and with
    /// the initial fetch or cache-write error if the subscription could not
    /// start.
    pub async fn endpoints(&self) -> Result<Vec<Endpoint>> {
        self.start_subscription().await?;
        Ok(self.store.get(&self.cache_key).unwrap_or_default())
    }

    /// Start the subscription: one initial fetch, one cache write, then the
    /// background refresh loop.
    ///
    /// Idempotent and safe under concurrent invocation; exactly one initial
    /// fetch happens across any number of concurrent callers. A failed
    /// attempt leaves the subscription unstarted, so a later call retries.
    pub async fn start_subscription(&self) -> Result<()> {
        if self.disposed.load(Ordering::Acquire) {
            return Err(DiscoveryError::Disposed(self.service_name.clone()));
        }
        if self.started.load(Ordering::Acquire) {
            return Ok(());
        }

        // The lock is held across the initial fetch: concurrent starters
        // wait here and then observe Running without fetching again.
        let mut state = self.state.lock().await;
        match *state {
            SubscriptionState::Disposed => {
                Err(DiscoveryError::Disposed(self.service_name.clone()))
            }
            SubscriptionState::Running(_) => Ok(()),
            SubscriptionState::NotStarted => {
                let initial = self.source.fetch().await.inspect_err(|err| {
                    error!(
                        "Error fetching endpoints for {}: {}",
                        self.service_name, err
                    );
                })?;
                self.store.set(&self.cache_key, initial.clone())?;
                let handle = self.spawn_refresh_loop(initial);
                *state = SubscriptionState::Running(handle);
                self.started.store(true, Ordering::Release);
                debug!("Subscription started for {}", self.service_name);
                Ok(())
            }
        }
    }

    /// Stop the background loop, release the throttle and remove this
    /// instance's cache entry.
    ///
    /// Idempotent and safe to call concurrently with any other operation;
    /// the cache entry is removed exactly once.
    pub async fn shutdown(&self) {
        // Cancel before taking the lock so an in-flight throttled fetch
        // unblocks promptly.
        self.cancel.cancel();
        self.disposed.store(true, Ordering::Release);

        let mut state = self.state.lock().await;
        if matches!(*state, SubscriptionState::Disposed) {
            return;
        }
        self.throttle.close();
        self.store.remove(&self.cache_key);
        *state = SubscriptionState::Disposed;
        debug!("Subscription disposed for {}", self.service_name);
    }

    fn spawn_refresh_loop(&self, previous: Vec<Endpoint>) -> JoinHandle<()> {
        let service_name = self.service_name.clone();
        let cache_key = self.cache_key.clone();
        let source = Arc::clone(&self.source);
        let store = Arc::clone(&self.store);
        let throttle = Arc::clone(&self.throttle);
        let observers = Arc::clone(&self.observers);
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            let mut previous = previous;
            while !cancel.is_cancelled() {
                let fetch = {
                    let source = Arc::clone(&source);
                    async move { source.fetch().await }.boxed()
                };
                match throttle.queue(fetch, cancel.clone()).await {
                    Ok(current) => {
                        if endpoint_lists_match(&previous, &current) {
                            continue;
                        }
                        debug!("Received updated endpoints for {}", service_name);
                        if let Err(err) = store.set(&cache_key, current.clone()) {
                            // Previous snapshot stays put, so the write is
                            // retried on the next differing fetch.
                            error!(
                                "Error caching endpoints for {}: {}",
                                service_name, err
                            );
                            continue;
                        }
                        let observers =
                            observers.lock().unwrap_or_else(PoisonError::into_inner);
                        for observer in observers.iter() {
                            observer();
                        }
                        previous = current;
                    }
                    Err(DiscoveryError::Cancelled) => break,
                    Err(err) => {
                        error!(
                            "Error fetching endpoints for {}: {}",
                            service_name, err
                        );
                    }
                }
            }
            debug!("Subscription loop stopped for {}", service_name);
        })
    }
}

#[async_trait]
impl EndpointSource for CachingSubscriber {
    fn service_name(&self) -> &str {
        &self.service_name
    }

    async fn fetch(&self) -> Result<Vec<Endpoint>> {
        self.endpoints().await
    }
}

impl Drop for CachingSubscriber {
    fn drop(&mut self) {
        // Last-resort cleanup for subscribers dropped without shutdown().
        self.cancel.cancel();
        let state = self.state.get_mut();
        if !matches!(*state, SubscriptionState::Disposed) {
            self.throttle.close();
            self.store.remove(&self.cache_key);
            *state = SubscriptionState::Disposed;
        }
    }
}

/// Change-detection rule: equal count and every element of `previous`
/// present by value in `current`. Count-based containment, not multiset
/// equality, so duplicate-heavy lists can compare equal asymmetrically.
fn endpoint_lists_match(previous: &[Endpoint], current: &[Endpoint]) -> bool {
    previous.len() == current.len()
        && previous.iter().filter(|e| current.contains(e)).count() == previous.len()
}
