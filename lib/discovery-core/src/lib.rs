//! Core types and contracts for endpoint discovery
//!
//! This library provides:
//! - The `Endpoint` value type shared by every discovery source
//! - The `EndpointSource`, `EndpointStore` and `Throttle` contracts
//! - In-memory store and interval throttle implementations

pub mod endpoint;
pub mod error;
pub mod fixed;
pub mod source;
pub mod store;
pub mod throttle;

pub use endpoint::Endpoint;
pub use error::{DiscoveryError, Result};
pub use fixed::FixedSource;
pub use source::EndpointSource;
pub use store::{EndpointStore, MemoryStore};
pub use throttle::{EndpointFetch, IntervalThrottle, Throttle};
