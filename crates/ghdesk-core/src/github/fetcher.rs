// SPDX-License-Identifier: Apache-2.0

//! Authenticated single-request access to the GitHub REST API.
//!
//! [`Fetcher`] is the one seam between the operations in this crate and the
//! network. [`HttpFetcher`] is the `reqwest` implementation; tests drive the
//! paginator and operations with scripted fakes instead.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, LINK, USER_AGENT};
use reqwest::{Client, Method};
use schemars::JsonSchema;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use super::link::Continuation;
use crate::config::GitHubConfig;
use crate::error::GhDeskError;

/// REST API version pinned on every request.
pub const API_VERSION: &str = "2022-11-28";

/// Media type requested through the `Accept` header.
///
/// Only the issue fetch exposes a choice; everything else uses
/// [`MediaType::Json`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// `application/vnd.github+json`
    #[default]
    Json,
    /// Raw markdown body.
    Raw,
    /// Text-only representation of the body.
    Text,
    /// Rendered HTML body.
    Html,
    /// Raw, text and HTML bodies.
    Full,
}

impl MediaType {
    /// Returns the `Accept` header value for this media type.
    #[must_use]
    pub fn accept(self) -> &'static str {
        match self {
            MediaType::Json => "application/vnd.github+json",
            MediaType::Raw => "application/vnd.github.raw+json",
            MediaType::Text => "application/vnd.github.text+json",
            MediaType::Html => "application/vnd.github.html+json",
            MediaType::Full => "application/vnd.github.full+json",
        }
    }
}

/// A single API request, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute path starting with `/`, already percent-encoded.
    pub path: String,
    /// Query parameters in insertion order.
    pub query: Vec<(String, String)>,
    /// Optional JSON body.
    pub body: Option<Value>,
    /// Requested media type.
    pub media_type: MediaType,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            media_type: MediaType::Json,
        }
    }

    /// A `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// A `POST` request with a JSON body.
    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            body: Some(body),
            ..Self::new(Method::POST, path)
        }
    }

    /// A `PATCH` request with a JSON body.
    #[must_use]
    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self {
            body: Some(body),
            ..Self::new(Method::PATCH, path)
        }
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Appends a query parameter when `value` is present.
    #[must_use]
    pub fn query_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    /// Sets the requested media type.
    #[must_use]
    pub fn media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = media_type;
        self
    }

    /// Returns the value of a query parameter, if set.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A successful API response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code (2xx).
    pub status: u16,
    /// Response headers.
    pub headers: HeaderMap,
    /// Decoded JSON body; `Null` for empty bodies.
    pub body: Value,
}

impl ApiResponse {
    /// Creates a `200 OK` response with no headers.
    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            headers: HeaderMap::new(),
            body,
        }
    }

    /// Pagination links carried by this response.
    #[must_use]
    pub fn continuation(&self) -> Continuation {
        Continuation::from_header(self.headers.get(LINK).and_then(|v| v.to_str().ok()))
    }

    /// Decodes the body into a typed record.
    ///
    /// # Errors
    ///
    /// Returns `GhDeskError::InvalidResponse` if the body does not match `T`.
    pub fn decode<T: DeserializeOwned>(self) -> crate::Result<T> {
        Ok(serde_json::from_value(self.body)?)
    }
}

/// Performs one authenticated request against the GitHub API.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Sends `request` and returns the decoded success response.
    ///
    /// Non-2xx responses become `GhDeskError::Upstream`; network failures
    /// become `GhDeskError::Transport`.
    async fn fetch(&self, request: ApiRequest) -> crate::Result<ApiResponse>;
}

/// `reqwest`-backed [`Fetcher`].
#[derive(Debug)]
pub struct HttpFetcher {
    http: Client,
    base_url: String,
    token: SecretString,
    user_agent: String,
}

impl HttpFetcher {
    /// Creates a fetcher for the configured API host.
    ///
    /// # Errors
    ///
    /// Returns `GhDeskError::Config` if the HTTP client cannot be built.
    pub fn new(config: &GitHubConfig, token: SecretString) -> crate::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_seconds))
            .build()
            .map_err(|e| GhDeskError::Config {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token,
            user_agent: config.user_agent.clone(),
        })
    }

    /// The API base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    async fn fetch(&self, request: ApiRequest) -> crate::Result<ApiResponse> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self
            .http
            .request(request.method, &url)
            .query(&request.query)
            .bearer_auth(self.token.expose_secret())
            .header(USER_AGENT, &self.user_agent)
            .header(ACCEPT, request.media_type.accept())
            .header("X-GitHub-Api-Version", API_VERSION);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;

        if !status.is_success() {
            let message = upstream_message(&text);
            debug!(status = status.as_u16(), message = %message, "GitHub request failed");
            return Err(GhDeskError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        debug!(status = status.as_u16(), "GitHub request succeeded");
        Ok(ApiResponse {
            status: status.as_u16(),
            headers,
            body,
        })
    }
}

/// Extracts the `message` field of a GitHub error body, or returns the raw body.
fn upstream_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::PATCH;
    use httpmock::prelude::*;
    use serde_json::json;

    fn fetcher_for(server: &MockServer) -> HttpFetcher {
        let config = GitHubConfig {
            api_base_url: server.base_url(),
            ..GitHubConfig::default()
        };
        HttpFetcher::new(&config, SecretString::from("test-token".to_string())).unwrap()
    }

    #[test]
    fn media_type_accept_headers() {
        assert_eq!(MediaType::default().accept(), "application/vnd.github+json");
        assert_eq!(MediaType::Raw.accept(), "application/vnd.github.raw+json");
        assert_eq!(MediaType::Full.accept(), "application/vnd.github.full+json");
    }

    #[test]
    fn upstream_message_prefers_message_field() {
        assert_eq!(
            upstream_message(r#"{"message":"Not Found","documentation_url":"x"}"#),
            "Not Found"
        );
        assert_eq!(upstream_message("Bad gateway"), "Bad gateway");
        assert_eq!(upstream_message(r#"{"error":"x"}"#), r#"{"error":"x"}"#);
    }

    #[test]
    fn request_builder_collects_query() {
        let req = ApiRequest::get("/user/orgs")
            .query("page", 2)
            .query_opt("state", Some("open"))
            .query_opt("labels", None::<&str>);
        assert_eq!(req.query_value("page"), Some("2"));
        assert_eq!(req.query_value("state"), Some("open"));
        assert!(req.query_value("labels").is_none());
    }

    #[tokio::test]
    async fn sends_auth_and_identification_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/repos/octocat/hello/issues/1")
                .header("authorization", "Bearer test-token")
                .header("accept", "application/vnd.github.raw+json")
                .header("x-github-api-version", API_VERSION)
                .header_exists("user-agent");
            then.status(200).json_body(json!({"number": 1, "title": "Bug"}));
        });

        let response = fetcher_for(&server)
            .fetch(ApiRequest::get("/repos/octocat/hello/issues/1").media_type(MediaType::Raw))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(response.status, 200);
        assert_eq!(response.body["title"], "Bug");
    }

    #[tokio::test]
    async fn exposes_link_header_as_continuation() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/user/orgs").query_param("page", "1");
            then.status(200)
                .header(
                    "link",
                    r#"<https://api.github.com/user/orgs?page=2>; rel="next", <https://api.github.com/user/orgs?page=3>; rel="last""#,
                )
                .json_body(json!([]));
        });

        let response = fetcher_for(&server)
            .fetch(ApiRequest::get("/user/orgs").query("page", 1))
            .await
            .unwrap();

        let continuation = response.continuation();
        assert!(continuation.has_next);
        assert_eq!(continuation.last_page, Some(3));
    }

    #[tokio::test]
    async fn non_success_status_becomes_upstream_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/repos/octocat/missing/issues");
            then.status(404).json_body(
                json!({"message": "Not Found", "documentation_url": "https://docs.github.com"}),
            );
        });

        let err = fetcher_for(&server)
            .fetch(ApiRequest::get("/repos/octocat/missing/issues"))
            .await
            .unwrap_err();

        match err {
            GhDeskError::Upstream { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not Found");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn upstream_error_falls_back_to_raw_body() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/user/orgs");
            then.status(502).body("upstream exploded");
        });

        let err = fetcher_for(&server)
            .fetch(ApiRequest::get("/user/orgs"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("upstream exploded"));
    }

    #[tokio::test]
    async fn sends_json_body_on_patch() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PATCH)
                .path("/repos/o/r/issues/3")
                .json_body(json!({"milestone": null}));
            then.status(200).json_body(json!({"number": 3, "title": "t"}));
        });

        fetcher_for(&server)
            .fetch(ApiRequest::patch(
                "/repos/o/r/issues/3",
                json!({"milestone": null}),
            ))
            .await
            .unwrap();

        mock.assert();
    }

    #[tokio::test]
    async fn empty_success_body_decodes_as_null() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/empty");
            then.status(204);
        });

        let response = fetcher_for(&server)
            .fetch(ApiRequest::get("/empty"))
            .await
            .unwrap();
        assert!(response.body.is_null());
    }

    #[tokio::test]
    async fn connection_failure_becomes_transport_error() {
        let config = GitHubConfig {
            api_base_url: "http://127.0.0.1:1".to_string(),
            api_timeout_seconds: 2,
            ..GitHubConfig::default()
        };
        let fetcher = HttpFetcher::new(&config, SecretString::from("t".to_string())).unwrap();

        let err = fetcher.fetch(ApiRequest::get("/user/orgs")).await.unwrap_err();
        assert!(matches!(err, GhDeskError::Transport { .. }));
    }
}
