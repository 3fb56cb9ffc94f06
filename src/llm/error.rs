//! Completion provider errors
//!
//! Backends classify failures themselves (from HTTP status codes and transport
//! error kinds) so callers can match on the variant instead of the message.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors that can occur while talking to a completion provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderError {
    /// The provider did not answer within the transport deadline
    Timeout { seconds: u64 },

    /// Credentials were rejected (HTTP 401/403) or are unusable
    AuthFailure { message: String },

    /// Provider quota or rate limit hit (HTTP 429)
    RateLimited { retry_after: Option<u64> },

    /// Any other transport or API failure
    Unknown {
        message: String,
        status_code: Option<u16>,
    },
}

impl ProviderError {
    pub fn unknown(message: impl Into<String>) -> Self {
        ProviderError::Unknown {
            message: message.into(),
            status_code: None,
        }
    }

    /// Builds an error from a non-success HTTP status.
    pub fn from_status(status: u16, body: impl Into<String>, retry_after: Option<u64>) -> Self {
        let body = body.into();
        match status {
            401 | 403 => ProviderError::AuthFailure {
                message: format!("HTTP {}: {}", status, body),
            },
            429 => ProviderError::RateLimited { retry_after },
            _ => ProviderError::Unknown {
                message: format!("HTTP {}: {}", status, body),
                status_code: Some(status),
            },
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Timeout { .. })
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Timeout { seconds } => {
                write!(f, "Provider request timed out after {} seconds", seconds)
            }
            ProviderError::AuthFailure { message } => {
                write!(f, "Authentication failed: {}", message)
            }
            ProviderError::RateLimited { retry_after } => {
                if let Some(seconds) = retry_after {
                    write!(f, "Rate limit exceeded, retry after {} seconds", seconds)
                } else {
                    write!(f, "Rate limit exceeded")
                }
            }
            ProviderError::Unknown {
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "Provider error ({}): {}", code, message)
                } else {
                    write!(f, "Provider error: {}", message)
                }
            }
        }
    }
}

impl std::error::Error for ProviderError {}
