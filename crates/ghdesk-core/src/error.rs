// SPDX-License-Identifier: Apache-2.0

//! Error types for ghdesk operations.
//!
//! Uses `thiserror` for deriving `std::error::Error` implementations.
//! Binaries should use `anyhow::Result` for top-level error handling.

use thiserror::Error;

/// Errors that can occur during ghdesk operations.
#[derive(Error, Debug)]
pub enum GhDeskError {
    /// No GitHub token is available; raised before any request is sent.
    #[error(
        "Authentication required - set the GITHUB_TOKEN environment variable to a GitHub personal access token"
    )]
    NotAuthenticated,

    /// Configuration file, environment, or client construction error.
    #[error("Configuration error: {message}")]
    Config {
        /// Error message.
        message: String,
    },

    /// Caller input rejected before any request is built.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input.
        message: String,
    },

    /// Non-success HTTP status returned by the GitHub API.
    #[error("GitHub API error ({status}): {message}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Upstream `message` field, or the raw response body when absent.
        message: String,
    },

    /// Network-level failure (DNS, timeout, connection reset).
    #[error("Network error: {message}")]
    Transport {
        /// Error message from the HTTP client.
        message: String,
    },

    /// A success response whose body could not be decoded.
    #[error("Invalid response from GitHub: {message}")]
    InvalidResponse {
        /// Description of the decoding failure.
        message: String,
    },
}

impl GhDeskError {
    /// Returns the upstream HTTP status, if this error carries one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            GhDeskError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GhDeskError {
    fn from(err: reqwest::Error) -> Self {
        GhDeskError::Transport {
            message: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for GhDeskError {
    fn from(err: config::ConfigError) -> Self {
        GhDeskError::Config {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for GhDeskError {
    fn from(err: serde_json::Error) -> Self {
        GhDeskError::InvalidResponse {
            message: err.to_string(),
        }
    }
}
