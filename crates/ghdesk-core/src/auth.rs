// SPDX-License-Identifier: Apache-2.0

//! Token provider abstraction for credential resolution.
//!
//! Operations never read credentials from ambient state. Each host (MCP
//! server, tests) implements `TokenProvider` and hands it to
//! [`crate::facade::connect`], which fails with
//! [`GhDeskError::NotAuthenticated`](crate::GhDeskError::NotAuthenticated)
//! before any request when no token is available.

use secrecy::SecretString;

/// Provides the GitHub credential for API calls.
pub trait TokenProvider: Send + Sync {
    /// Retrieves the GitHub API token.
    ///
    /// Returns `None` if no token is available from any source.
    fn github_token(&self) -> Option<SecretString>;
}

/// A provider holding a fixed token, or none at all.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    token: Option<SecretString>,
}

impl StaticTokenProvider {
    /// Creates a provider that always returns `token`.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(SecretString::from(token.into())),
        }
    }

    /// Creates a provider with no token.
    #[must_use]
    pub fn empty() -> Self {
        Self { token: None }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn github_token(&self) -> Option<SecretString> {
        self.token.clone()
    }
}
