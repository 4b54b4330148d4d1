// SPDX-License-Identifier: Apache-2.0

//! Platform-agnostic entry point for hosts.
//!
//! A host (the MCP server, a test) implements [`TokenProvider`] and calls
//! [`connect`] to obtain a ready [`HttpFetcher`]. The operations in
//! [`crate::github`] then run against that fetcher.

use tracing::{debug, instrument};

use crate::auth::TokenProvider;
use crate::config::GitHubConfig;
use crate::error::GhDeskError;
use crate::github::fetcher::HttpFetcher;

/// Resolves the token from `provider` and builds an authenticated fetcher.
///
/// No request is sent; a missing token is reported before any network
/// activity.
///
/// # Errors
///
/// Returns [`GhDeskError::NotAuthenticated`] if the provider has no token,
/// or [`GhDeskError::Config`] if the HTTP client cannot be built.
#[instrument(skip(provider, config), fields(base_url = %config.api_base_url))]
pub fn connect(provider: &dyn TokenProvider, config: &GitHubConfig) -> crate::Result<HttpFetcher> {
    let token = provider.github_token().ok_or(GhDeskError::NotAuthenticated)?;
    let fetcher = HttpFetcher::new(config, token)?;
    debug!("GitHub fetcher ready");
    Ok(fetcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenProvider;
    use crate::github::orgs::list_organizations;
    use crate::github::paginate::PageOptions;
    use httpmock::prelude::*;

    #[test]
    fn missing_token_is_not_authenticated() {
        let err = connect(&StaticTokenProvider::empty(), &GitHubConfig::default()).unwrap_err();
        assert!(matches!(err, GhDeskError::NotAuthenticated));
    }

    #[test]
    fn connect_uses_configured_base_url() {
        let config = GitHubConfig {
            api_base_url: "http://127.0.0.1:9".to_string(),
            ..GitHubConfig::default()
        };
        let fetcher = connect(&StaticTokenProvider::new("t"), &config).unwrap();
        assert_eq!(fetcher.base_url(), "http://127.0.0.1:9");
    }

    #[tokio::test]
    async fn connected_fetcher_sends_provider_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/user/orgs")
                .header("authorization", "Bearer from-provider");
            then.status(200).json_body(serde_json::json!([{"login": "octo-org"}]));
        });
        let config = GitHubConfig {
            api_base_url: server.base_url(),
            ..GitHubConfig::default()
        };

        let fetcher = connect(&StaticTokenProvider::new("from-provider"), &config).unwrap();
        let orgs = list_organizations(&fetcher, PageOptions::default())
            .await
            .unwrap();

        mock.assert();
        assert_eq!(orgs.items[0].login, "octo-org");
    }
}
