//! Unified error type for Warden
//!
//! Gate failures (`ServiceUnavailable`, `Unauthorized`, `Forbidden`) are terminal
//! signals for a single request. `Invalid` and `Internal` cover configuration,
//! manifest and wiring problems that never depend on the caller's credentials.

use serde::{Deserialize, Serialize};

/// Unified error type for all Warden operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum WardenError {
    /// The service is flagged as down for maintenance
    #[error("Service unavailable: {message}")]
    ServiceUnavailable {
        /// Message shown to the caller
        message: String,
    },

    /// Credential missing, empty or not verifiable
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Error message describing why the caller could not be identified
        message: String,
    },

    /// Verified subject lacks the required permission
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Error message naming the missing permission
        message: String,
    },

    /// Invalid input, configuration or manifest
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl WardenError {
    /// Create a service unavailable error
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Stable numeric code for the error translator.
    pub fn code(&self) -> u16 {
        match self {
            Self::ServiceUnavailable { .. } => 503,
            Self::Unauthorized { .. } => 401,
            Self::Forbidden { .. } => 403,
            Self::Invalid { .. } => 400,
            Self::Internal { .. } => 500,
        }
    }

    /// Returns `true` for the three per-request gate signals.
    pub fn is_gate_failure(&self) -> bool {
        matches!(
            self,
            Self::ServiceUnavailable { .. } | Self::Unauthorized { .. } | Self::Forbidden { .. }
        )
    }

    /// The message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::ServiceUnavailable { message }
            | Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::Invalid { message }
            | Self::Internal { message } => message,
        }
    }
}

/// Standard Result type for Warden operations
pub type Result<T> = std::result::Result<T, WardenError>;

impl From<std::io::Error> for WardenError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::InvalidData => {
                Self::invalid(err.to_string())
            }
            _ => Self::internal(err.to_string()),
        }
    }
}

impl From<toml::de::Error> for WardenError {
    fn from(err: toml::de::Error) -> Self {
        Self::invalid(err.to_string())
    }
}
