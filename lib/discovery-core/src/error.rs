use thiserror::Error;

pub type Result<T> = std::result::Result<T, DiscoveryError>;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("backend fetch failed for service {service}: {message}")]
    Backend { service: String, message: String },

    #[error("cache write failed for key {0}")]
    CacheWrite(String),

    #[error("subscriber for service {0} is disposed")]
    Disposed(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl DiscoveryError {
    pub fn backend(service: impl Into<String>, message: impl ToString) -> Self {
        DiscoveryError::Backend {
            service: service.into(),
            message: message.to_string(),
        }
    }
}
