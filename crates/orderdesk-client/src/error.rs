//! # Client Error Types
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Ordering            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Http           │  │  Core (CoreError)       │ │
//! │  │  InvalidUrl     │  │  Rejected       │  │  InvalidDraft           │ │
//! │  │  Io / Toml      │  │  InvalidResponse│  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  At the core seams (CatalogSource, OrderSubmitter) transport variants   │
//! │  collapse into orderdesk_core::TransportError.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use orderdesk_core::{CoreError, TransportError};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Base URL is not an http(s) URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// Failed to save the config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Failed to write config: {0}")]
    TomlSer(#[from] toml::ser::Error),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Request could not be sent or the connection dropped.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("Backend rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Backend answered with something that is not the expected JSON.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    // =========================================================================
    // Ordering Errors
    // =========================================================================
    /// The order draft could not be read or applied.
    #[error("Invalid order draft: {0}")]
    InvalidDraft(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::InvalidDraft(err.to_string())
    }
}

impl From<ClientError> for TransportError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Rejected { status, body } => TransportError::Rejected { status, body },
            ClientError::InvalidResponse(reason) => TransportError::InvalidResponse(reason),
            ClientError::Http(e) if e.is_decode() => TransportError::InvalidResponse(e.to_string()),
            ClientError::Http(e) => TransportError::Unreachable(e.to_string()),
            other => TransportError::Unreachable(other.to_string()),
        }
    }
}
