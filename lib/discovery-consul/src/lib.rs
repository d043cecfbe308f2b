//! Consul-backed endpoint discovery
//!
//! This library provides:
//! - `ConsulClient`: thin HTTP client for the Consul health API
//! - `ConsulSource`: an `EndpointSource` resolving a service through
//!   health-check results
//! - `ConsulSourceFactory`: wiring for `SubscriberFactory`

pub mod client;
pub mod factory;
pub mod source;

pub use client::{ConsulClient, ConsulConfig, ServiceEntry};
pub use factory::ConsulSourceFactory;
pub use source::ConsulSource;
