//! Caching endpoint subscription
//!
//! This library provides:
//! - `CachingSubscriber`: one service's cached, continuously refreshed
//!   endpoint list with a throttled background refresh loop
//! - `SubscriberFactory`: wiring that turns a service name into a
//!   configured subscriber

pub mod factory;
pub mod subscriber;

pub use factory::{SourceFactory, SubscriberFactory};
pub use subscriber::CachingSubscriber;
