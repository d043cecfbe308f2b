//! Priority-based fallback across endpoint sources

pub mod fallback;

pub use fallback::FallbackAggregator;
