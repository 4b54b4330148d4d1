// SPDX-License-Identifier: Apache-2.0

//! Token provider for the MCP server using environment variables.

use ghdesk_core::auth::TokenProvider;
use secrecy::SecretString;

/// Environment variables checked for a GitHub token, in order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GITHUB_PERSONAL_ACCESS_TOKEN"];

/// Resolves the GitHub token from the environment.
///
/// Reads `GITHUB_TOKEN`, then `GITHUB_PERSONAL_ACCESS_TOKEN`. Empty values
/// count as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvTokenProvider;

impl TokenProvider for EnvTokenProvider {
    fn github_token(&self) -> Option<SecretString> {
        TOKEN_ENV_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty())
            .map(SecretString::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;

    #[allow(unsafe_code)]
    fn set_env(token: Option<&str>, pat: Option<&str>) {
        // SAFETY: serialized tests; no other threads access these vars.
        unsafe {
            match token {
                Some(v) => std::env::set_var("GITHUB_TOKEN", v),
                None => std::env::remove_var("GITHUB_TOKEN"),
            }
            match pat {
                Some(v) => std::env::set_var("GITHUB_PERSONAL_ACCESS_TOKEN", v),
                None => std::env::remove_var("GITHUB_PERSONAL_ACCESS_TOKEN"),
            }
        }
    }

    #[test]
    #[serial]
    fn returns_none_when_env_vars_unset() {
        set_env(None, None);
        assert!(EnvTokenProvider.github_token().is_none());
    }

    #[test]
    #[serial]
    fn prefers_github_token() {
        set_env(Some("primary"), Some("fallback"));
        let token = EnvTokenProvider.github_token().unwrap();
        assert_eq!(token.expose_secret(), "primary");
        set_env(None, None);
    }

    #[test]
    #[serial]
    fn falls_back_to_personal_access_token() {
        set_env(Some(""), Some("fallback"));
        let token = EnvTokenProvider.github_token().unwrap();
        assert_eq!(token.expose_secret(), "fallback");
        set_env(None, None);
    }
}
