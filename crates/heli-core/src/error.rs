//! Error types for the HeLI service

/// Result type alias using the service's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for language identification operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The classifier process is missing, dead, or stopped answering
    #[error("classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    /// The classifier answered with something outside the line protocol
    #[error("classifier protocol error: {0}")]
    Protocol(String),

    /// A request parameter has the wrong type or an unusable value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The request itself is not something this service handles
    #[error("unsupported request: {0}")]
    UnsupportedRequest(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Process/pipe IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Timeout errors
    #[error("operation timed out after {0} ms")]
    Timeout(u64),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new classifier-unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::ClassifierUnavailable(msg.into())
    }

    /// Create a new protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a new invalid-parameter error
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create a new unsupported-request error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedRequest(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error means the classifier channel can no longer be trusted.
    ///
    /// IO failures count: they only come out of the process pipes.
    pub fn is_classifier_failure(&self) -> bool {
        matches!(
            self,
            Self::ClassifierUnavailable(_) | Self::Protocol(_) | Self::Timeout(_) | Self::Io(_)
        )
    }
}
