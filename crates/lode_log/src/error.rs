//! Error types for log configuration.

use thiserror::Error;

/// Result type for log configuration operations.
pub type LogResult<T> = Result<T, LogError>;

/// Errors that can occur while configuring or resolving the log backend.
///
/// All of these are configuration or programming errors. None are
/// transient and none are retried internally.
#[derive(Debug, Error)]
pub enum LogError {
    /// The backend pair was requested but no location is configured.
    #[error("location for log reader and writer is not specified")]
    MissingLocation,

    /// The configured backend name is not in the provider registry.
    #[error("unknown reader/writer provider: {name}")]
    UnknownProvider {
        /// The name that failed lookup.
        name: String,
    },

    /// Neither a backend name nor an explicit reader/writer pair was given.
    #[error("no reader/writer provider configured and no explicit reader/writer set")]
    NoBackend,

    /// The operation is never supported by this implementation.
    #[error("unsupported operation: {operation}")]
    UnsupportedOperation {
        /// The rejected operation.
        operation: &'static str,
    },

    /// A handle generator ran out of identifiers.
    #[error("blob handle space exhausted")]
    HandlesExhausted,

    /// The provider failed to open the backend.
    #[error("backend error: {0}")]
    Backend(#[from] lode_io::IoError),

    /// A setting is inconsistent or cannot be parsed.
    #[error("invalid setting: {message}")]
    InvalidSetting {
        /// Description of the problem.
        message: String,
    },
}

impl LogError {
    /// Creates an unknown provider error.
    pub fn unknown_provider(name: impl Into<String>) -> Self {
        Self::UnknownProvider { name: name.into() }
    }

    /// Creates an unsupported operation error.
    pub fn unsupported(operation: &'static str) -> Self {
        Self::UnsupportedOperation { operation }
    }

    /// Creates an invalid setting error.
    pub fn invalid_setting(message: impl Into<String>) -> Self {
        Self::InvalidSetting {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = LogError::unknown_provider("s3");
        assert_eq!(err.to_string(), "unknown reader/writer provider: s3");

        let err = LogError::invalid_setting("cipher key without provider");
        assert!(err.to_string().contains("cipher key without provider"));
    }

    #[test]
    fn io_errors_convert() {
        let err: LogError = lode_io::IoError::Closed.into();
        assert!(matches!(err, LogError::Backend(lode_io::IoError::Closed)));
    }
}
