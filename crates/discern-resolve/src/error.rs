//! Error types for catalog and classification-endpoint access.

use thiserror::Error;

/// Errors that can occur while talking to external collaborators.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// An HTTP request to an external source failed.
    #[error("HTTP error from {source_name}: {message}")]
    Http {
        source_name: String,
        message: String,
    },

    /// The external source returned a rate-limit response.
    #[error("rate limited by {source_name}")]
    RateLimited { source_name: String },

    /// A response from an external source could not be parsed.
    #[error("parse error from {source_name}: {message}")]
    Parse {
        source_name: String,
        message: String,
    },

    /// A source needs credentials that were not configured.
    #[error("missing credentials for {source_name}: set {setting}")]
    MissingCredentials {
        source_name: String,
        setting: String,
    },

    /// An error propagated from `reqwest`.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
}

impl ResolveError {
    /// Returns `true` when the error is transient and the operation may
    /// succeed if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { .. } | Self::RateLimited { .. } => true,
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            Self::Parse { .. } | Self::MissingCredentials { .. } => false,
        }
    }
}

/// Convenience alias for resolver results.
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;
