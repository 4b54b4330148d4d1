// SPDX-License-Identifier: Apache-2.0

//! MCP server implementation exposing the ghdesk tools.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ghdesk_core::github::issues::{
    self, IssueFilters, IssueSort, IssueState, IssueStateFilter, IssueUpdate, NewIssue,
    StateReason, UpdateOutcome, deserialize_some,
};
use ghdesk_core::github::repos::{self, RepoFilters, RepoSort, RepoType};
use ghdesk_core::github::{Direction, orgs};
use ghdesk_core::{
    GitHubConfig, HttpFetcher, MediaType, PageOptions, TokenProvider, connect, load_config,
    render_issue_detail, render_listing,
};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    schemars::JsonSchema,
    tool, tool_handler, tool_router,
};
use serde::Deserialize;
use tracing::warn;

use crate::auth::EnvTokenProvider;
use crate::error::{error_result, generic_to_mcp_error};

// ---------------------------------------------------------------------------
// Tool parameter structs
// ---------------------------------------------------------------------------

/// Parameters for creating an issue.
#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(description = "Create a new issue in a GitHub repository")]
pub struct CreateIssueParams {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Issue title.
    pub title: String,
    /// Markdown body.
    #[serde(default)]
    pub body: Option<String>,
    /// Logins to assign.
    #[serde(default)]
    pub assignees: Option<Vec<String>>,
    /// Label names to apply.
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    /// Milestone number.
    #[serde(default)]
    pub milestone: Option<u64>,
}

/// Parameters for listing issues.
#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(description = "List issues in a GitHub repository")]
pub struct ListIssuesParams {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Issue state: open, closed or all. GitHub defaults to open.
    #[serde(default)]
    pub state: Option<IssueStateFilter>,
    /// Assignee login, `none` for unassigned or `*` for any.
    #[serde(default)]
    pub assignee: Option<String>,
    /// Author login.
    #[serde(default)]
    pub creator: Option<String>,
    /// Login mentioned in the issue.
    #[serde(default)]
    pub mentioned: Option<String>,
    /// Label names; issues must carry all of them.
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    /// Sort key: created, updated or comments.
    #[serde(default)]
    pub sort: Option<IssueSort>,
    /// Sort direction: asc or desc.
    #[serde(default)]
    pub direction: Option<Direction>,
    /// Only issues updated at or after this RFC 3339 timestamp.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub since: Option<DateTime<Utc>>,
    /// Page size (1-100).
    #[serde(default)]
    #[schemars(range(min = 1, max = 100))]
    pub per_page: Option<u32>,
    /// Maximum number of issues to return across all pages.
    #[serde(default)]
    #[schemars(range(min = 1))]
    pub max_results: Option<usize>,
}

/// Parameters for fetching one issue.
#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(description = "Get a single GitHub issue")]
pub struct GetIssueParams {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Issue number.
    pub issue_number: u64,
    /// Body representation: json (default), raw, text, html or full.
    #[serde(default)]
    pub media_type: Option<MediaType>,
}

/// Parameters for updating an issue.
///
/// Omitted fields are left unchanged. `milestone: null` removes the
/// milestone.
#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(description = "Update fields of an existing GitHub issue")]
pub struct UpdateIssueParams {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Issue number.
    pub issue_number: u64,
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New markdown body.
    #[serde(default)]
    pub body: Option<String>,
    /// New state: open or closed.
    #[serde(default)]
    pub state: Option<IssueState>,
    /// Reason for the state change: completed, not_planned or reopened.
    #[serde(default)]
    pub state_reason: Option<StateReason>,
    /// Replacement label names.
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    /// Replacement assignee logins.
    #[serde(default)]
    pub assignees: Option<Vec<String>>,
    /// Milestone number, or null to remove the milestone.
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schemars(with = "Option<u64>")]
    pub milestone: Option<Option<u64>>,
}

impl UpdateIssueParams {
    fn to_update(&self) -> IssueUpdate {
        IssueUpdate {
            title: self.title.clone(),
            body: self.body.clone(),
            state: self.state,
            state_reason: self.state_reason,
            labels: self.labels.clone(),
            assignees: self.assignees.clone(),
            milestone: self.milestone,
        }
    }
}

/// Parameters for listing organizations.
#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(description = "List organizations the authenticated user belongs to")]
pub struct ListOrganizationsParams {
    /// Page size (1-100).
    #[serde(default)]
    #[schemars(range(min = 1, max = 100))]
    pub per_page: Option<u32>,
    /// Maximum number of organizations to return across all pages.
    #[serde(default)]
    #[schemars(range(min = 1))]
    pub max_results: Option<usize>,
}

/// Parameters for listing repositories.
#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(description = "List repositories of an organization or the authenticated user")]
pub struct ListRepositoriesParams {
    /// Organization login; omit to list the authenticated user's repositories.
    #[serde(default)]
    pub org: Option<String>,
    /// Type filter: all, owner, public, private, forks, sources or member.
    #[serde(default, rename = "type")]
    pub repo_type: Option<RepoType>,
    /// Sort key: created, updated, pushed or full_name.
    #[serde(default)]
    pub sort: Option<RepoSort>,
    /// Sort direction: asc or desc.
    #[serde(default)]
    pub direction: Option<Direction>,
    /// Page size (1-100).
    #[serde(default)]
    #[schemars(range(min = 1, max = 100))]
    pub per_page: Option<u32>,
    /// Maximum number of repositories to return across all pages.
    #[serde(default)]
    #[schemars(range(min = 1))]
    pub max_results: Option<usize>,
}

/// Credential presence status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub enum CredentialStatus {
    /// Credential is set.
    Present,
    /// Credential is missing or empty.
    Missing,
}

/// Health check response.
#[derive(Debug, serde::Serialize, serde::Deserialize, JsonSchema)]
pub struct HealthCheckResponse {
    /// GitHub token presence.
    pub github_token: CredentialStatus,
    /// API base URL requests are sent to.
    pub api_base_url: String,
    /// Server version.
    pub version: String,
}

/// Parameters for health check (empty for consistency).
#[derive(Debug, Deserialize, JsonSchema)]
#[schemars(description = "Check the health of credentials and configuration")]
pub struct HealthCheckParams {}

// ---------------------------------------------------------------------------
// Server struct
// ---------------------------------------------------------------------------

/// MCP server exposing the ghdesk GitHub tools.
///
/// Holds only immutable configuration and a token provider; every tool call
/// builds its own fetcher.
#[derive(Clone)]
pub struct GhDeskServer {
    config: Arc<GitHubConfig>,
    provider: Arc<dyn TokenProvider>,
    tool_router: ToolRouter<Self>,
}

impl Default for GhDeskServer {
    fn default() -> Self {
        Self::new()
    }
}

fn page_options(
    per_page: Option<u32>,
    max_results: Option<usize>,
    config: &GitHubConfig,
) -> PageOptions {
    PageOptions::builder()
        .per_page(per_page.unwrap_or(config.default_per_page))
        .maybe_max_results(max_results)
        .build()
}

fn text_result(outcome: ghdesk_core::Result<String>) -> CallToolResult {
    match outcome {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => error_result(&e),
    }
}

impl GhDeskServer {
    /// Creates a server with an explicit configuration and token provider.
    #[must_use]
    pub fn with_provider(config: GitHubConfig, provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
            tool_router: Self::tool_router(),
        }
    }

    fn fetcher(&self) -> ghdesk_core::Result<HttpFetcher> {
        connect(self.provider.as_ref(), &self.config)
    }

    async fn run_list_issues(&self, params: ListIssuesParams) -> ghdesk_core::Result<String> {
        let fetcher = self.fetcher()?;
        let filters = IssueFilters::builder()
            .maybe_state(params.state)
            .maybe_assignee(params.assignee)
            .maybe_creator(params.creator)
            .maybe_mentioned(params.mentioned)
            .labels(params.labels.unwrap_or_default())
            .maybe_sort(params.sort)
            .maybe_direction(params.direction)
            .maybe_since(params.since)
            .build();
        let options = page_options(params.per_page, params.max_results, &self.config);

        let page =
            issues::list_issues(&fetcher, &params.owner, &params.repo, &filters, options).await?;
        Ok(render_listing(&page, &format!("in {}/{}", params.owner, params.repo)))
    }

    async fn run_get_issue(&self, params: GetIssueParams) -> ghdesk_core::Result<String> {
        let fetcher = self.fetcher()?;
        let issue = issues::get_issue(
            &fetcher,
            &params.owner,
            &params.repo,
            params.issue_number,
            params.media_type.unwrap_or_default(),
        )
        .await?;
        Ok(render_issue_detail(&issue))
    }

    async fn run_create_issue(&self, params: CreateIssueParams) -> ghdesk_core::Result<String> {
        let fetcher = self.fetcher()?;
        let new_issue = NewIssue::builder()
            .owner(params.owner)
            .repo(params.repo)
            .title(params.title)
            .maybe_body(params.body)
            .maybe_assignees(params.assignees)
            .maybe_labels(params.labels)
            .maybe_milestone(params.milestone)
            .build();

        let issue = issues::create_issue(&fetcher, &new_issue).await?;
        Ok(format!(
            "Created issue #{} in {}/{}.\n\n{}",
            issue.number,
            new_issue.owner,
            new_issue.repo,
            render_issue_detail(&issue)
        ))
    }

    async fn run_update_issue(&self, params: UpdateIssueParams) -> ghdesk_core::Result<String> {
        let update = params.to_update();
        let outcome = if update.is_empty() {
            UpdateOutcome::NoChanges
        } else {
            let fetcher = self.fetcher()?;
            issues::update_issue(
                &fetcher,
                &params.owner,
                &params.repo,
                params.issue_number,
                &update,
            )
            .await?
        };

        Ok(match outcome {
            UpdateOutcome::Updated(issue) => format!(
                "Updated issue #{} in {}/{}.\n\n{}",
                issue.number,
                params.owner,
                params.repo,
                render_issue_detail(&issue)
            ),
            UpdateOutcome::NoChanges => format!(
                "No changes supplied for issue #{} in {}/{}; nothing was sent.",
                params.issue_number, params.owner, params.repo
            ),
        })
    }

    async fn run_list_organizations(
        &self,
        params: ListOrganizationsParams,
    ) -> ghdesk_core::Result<String> {
        let fetcher = self.fetcher()?;
        let options = page_options(params.per_page, params.max_results, &self.config);
        let page = orgs::list_organizations(&fetcher, options).await?;
        Ok(render_listing(&page, "for the authenticated user"))
    }

    async fn run_list_repositories(
        &self,
        params: ListRepositoriesParams,
    ) -> ghdesk_core::Result<String> {
        let fetcher = self.fetcher()?;
        let scope = match &params.org {
            Some(org) => format!("in organization {org}"),
            None => "for the authenticated user".to_string(),
        };
        let filters = RepoFilters::builder()
            .maybe_org(params.org)
            .maybe_repo_type(params.repo_type)
            .maybe_sort(params.sort)
            .maybe_direction(params.direction)
            .build();
        let options = page_options(params.per_page, params.max_results, &self.config);

        let page = repos::list_repositories(&fetcher, &filters, options).await?;
        Ok(render_listing(&page, &scope))
    }
}

// ---------------------------------------------------------------------------
// Tools (generates Self::tool_router())
// ---------------------------------------------------------------------------

#[tool_router]
impl GhDeskServer {
    /// Create a new `GhDeskServer` from the environment.
    ///
    /// Loads configuration from the default file and `GHDESK_*` variables,
    /// falling back to defaults if it is invalid, and reads the token from
    /// `GITHUB_TOKEN`.
    #[must_use]
    pub fn new() -> Self {
        let config = load_config().map(|c| c.github).unwrap_or_else(|e| {
            warn!(error = %e, "Invalid configuration, using defaults");
            GitHubConfig::default()
        });
        Self::with_provider(config, Arc::new(EnvTokenProvider))
    }

    #[tool(
        name = "create_issue",
        description = "Create a new issue in a GitHub repository",
        annotations(destructive_hint = false, open_world_hint = true)
    )]
    async fn create_issue(
        &self,
        Parameters(params): Parameters<CreateIssueParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.run_create_issue(params).await))
    }

    #[tool(
        name = "list_issues",
        description = "List issues in a GitHub repository with filters; follows pagination up to max_results",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    async fn list_issues(
        &self,
        Parameters(params): Parameters<ListIssuesParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.run_list_issues(params).await))
    }

    #[tool(
        name = "get_issue",
        description = "Get a single GitHub issue with its full body and metadata",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    async fn get_issue(
        &self,
        Parameters(params): Parameters<GetIssueParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.run_get_issue(params).await))
    }

    #[tool(
        name = "update_issue",
        description = "Update an existing GitHub issue; only supplied fields change, milestone null removes the milestone",
        annotations(destructive_hint = true, idempotent_hint = true, open_world_hint = true)
    )]
    async fn update_issue(
        &self,
        Parameters(params): Parameters<UpdateIssueParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.run_update_issue(params).await))
    }

    #[tool(
        name = "list_organizations",
        description = "List organizations the authenticated user belongs to",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    async fn list_organizations(
        &self,
        Parameters(params): Parameters<ListOrganizationsParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.run_list_organizations(params).await))
    }

    #[tool(
        name = "list_repositories",
        description = "List repositories of an organization, or of the authenticated user when no org is given",
        annotations(read_only_hint = true, open_world_hint = true)
    )]
    async fn list_repositories(
        &self,
        Parameters(params): Parameters<ListRepositoriesParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(text_result(self.run_list_repositories(params).await))
    }

    #[tool(
        name = "health",
        description = "Check the health of credentials and configuration",
        annotations(read_only_hint = true, idempotent_hint = true)
    )]
    async fn health(
        &self,
        Parameters(_params): Parameters<HealthCheckParams>,
    ) -> Result<CallToolResult, McpError> {
        let github_token = match self.provider.github_token() {
            None => CredentialStatus::Missing,
            Some(_) => CredentialStatus::Present,
        };

        let response = HealthCheckResponse {
            github_token,
            api_base_url: self.config.api_base_url.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        };

        let json = serde_json::to_string_pretty(&response).map_err(generic_to_mcp_error)?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

// ---------------------------------------------------------------------------
// ServerHandler
// ---------------------------------------------------------------------------

#[tool_handler]
impl ServerHandler for GhDeskServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "ghdesk MCP server for GitHub issues, repositories and organizations. \
                 Tools: create_issue, list_issues, get_issue, update_issue, \
                 list_organizations, list_repositories, health. \
                 Listings follow pagination up to max_results and report whether more are available."
                    .to_string(),
            )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
