//! Proxybench Error Types
//!
//! Error handling shared by every proxybench crate.

use crate::endpoint::EndpointError;
use thiserror::Error;

/// Main error type for proxybench operations
#[derive(Error, Debug)]
pub enum ProxyBenchError {
    /// Invalid load generator configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Invalid proxy base URL
    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] EndpointError),

    /// Request body could not be serialized
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// A sweep mode was selected without a device key
    #[error("{mode} mode requires a device key argument")]
    MissingDeviceKey { mode: &'static str },

    /// Request never produced a response (refused, reset, DNS, timeout)
    #[error("{method} /{index} failed: {reason}")]
    Transport {
        method: String,
        index: u64,
        reason: String,
    },

    /// A sweep stopped at `index` because of a transport failure
    #[error("{mode} sweep aborted at /{index}: {source}")]
    Aborted {
        mode: &'static str,
        index: u64,
        #[source]
        source: Box<ProxyBenchError>,
    },
}

/// Result type alias for proxybench operations
pub type Result<T> = std::result::Result<T, ProxyBenchError>;

impl ProxyBenchError {
    /// Create a configuration error with a message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a transport error for a request
    pub fn transport(method: impl Into<String>, index: u64, reason: impl ToString) -> Self {
        Self::Transport {
            method: method.into(),
            index,
            reason: reason.to_string(),
        }
    }

    /// Check if this error came from the network rather than from the caller
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Aborted { .. })
    }

    /// Check if this error is a caller mistake (bad flags, bad URL, no key)
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::Endpoint(_) | Self::MissingDeviceKey { .. }
        )
    }

    /// Index of the request that failed, if the error is tied to one
    #[must_use]
    pub const fn index(&self) -> Option<u64> {
        match self {
            Self::Transport { index, .. } | Self::Aborted { index, .. } => Some(*index),
            _ => None,
        }
    }
}
