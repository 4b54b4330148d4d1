// SPDX-License-Identifier: Apache-2.0

//! GitHub issue operations: list, get, create and update.
//!
//! Create and update payloads are built field by field so that only the
//! fields a caller supplied reach GitHub. On update, `milestone` is
//! tri-state: a value sets it, an explicit `null` clears it, and absence
//! leaves it untouched.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use super::fetcher::{ApiRequest, Fetcher, MediaType};
use super::models::Issue;
use super::paginate::{PageOptions, Paginated, paginate};
use super::{Direction, repo_path};

/// State filter for issue listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum IssueStateFilter {
    /// Open issues only.
    Open,
    /// Closed issues only.
    Closed,
    /// Both.
    All,
}

impl IssueStateFilter {
    /// Query parameter value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            IssueStateFilter::Open => "open",
            IssueStateFilter::Closed => "closed",
            IssueStateFilter::All => "all",
        }
    }
}

/// Sort key for issue listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum IssueSort {
    /// Creation time.
    Created,
    /// Last update time.
    Updated,
    /// Comment count.
    Comments,
}

impl IssueSort {
    /// Query parameter value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            IssueSort::Created => "created",
            IssueSort::Updated => "updated",
            IssueSort::Comments => "comments",
        }
    }
}

/// Target state on update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    /// Reopen.
    Open,
    /// Close.
    Closed,
}

impl IssueState {
    /// Payload value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        }
    }
}

/// Reason recorded alongside a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StateReason {
    /// Closed as done.
    Completed,
    /// Closed as won't do.
    NotPlanned,
    /// Reopened.
    Reopened,
}

impl StateReason {
    /// Payload value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StateReason::Completed => "completed",
            StateReason::NotPlanned => "not_planned",
            StateReason::Reopened => "reopened",
        }
    }
}

/// Filters for `GET /repos/{owner}/{repo}/issues`.
#[derive(Debug, Clone, Default, PartialEq, Eq, bon::Builder)]
pub struct IssueFilters {
    /// Issue state.
    pub state: Option<IssueStateFilter>,
    /// Assignee login, `none` or `*`.
    #[builder(into)]
    pub assignee: Option<String>,
    /// Author login.
    #[builder(into)]
    pub creator: Option<String>,
    /// Login mentioned in the issue.
    #[builder(into)]
    pub mentioned: Option<String>,
    /// Label names; an issue must carry all of them.
    #[builder(default)]
    pub labels: Vec<String>,
    /// Sort key.
    pub sort: Option<IssueSort>,
    /// Sort direction.
    pub direction: Option<Direction>,
    /// Only issues updated at or after this time.
    pub since: Option<DateTime<Utc>>,
}

impl IssueFilters {
    fn apply(&self, request: ApiRequest) -> ApiRequest {
        let labels = (!self.labels.is_empty()).then(|| self.labels.join(","));
        request
            .query_opt("state", self.state.map(IssueStateFilter::as_str))
            .query_opt("assignee", self.assignee.as_deref())
            .query_opt("creator", self.creator.as_deref())
            .query_opt("mentioned", self.mentioned.as_deref())
            .query_opt("labels", labels)
            .query_opt("sort", self.sort.map(IssueSort::as_str))
            .query_opt("direction", self.direction.map(Direction::as_str))
            .query_opt("since", self.since.map(|t| t.to_rfc3339()))
    }
}

/// A new issue. Optional fields are sent only when set.
#[derive(Debug, Clone, Default, PartialEq, Eq, bon::Builder)]
pub struct NewIssue {
    /// Repository owner.
    #[builder(into)]
    pub owner: String,
    /// Repository name.
    #[builder(into)]
    pub repo: String,
    /// Issue title.
    #[builder(into)]
    pub title: String,
    /// Markdown body.
    #[builder(into)]
    pub body: Option<String>,
    /// Logins to assign.
    pub assignees: Option<Vec<String>>,
    /// Label names to apply.
    pub labels: Option<Vec<String>>,
    /// Milestone number.
    pub milestone: Option<u64>,
}

impl NewIssue {
    /// Builds the JSON payload for `POST /repos/{owner}/{repo}/issues`.
    #[must_use]
    pub fn to_payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("title".into(), Value::from(self.title.as_str()));
        if let Some(body) = &self.body {
            payload.insert("body".into(), Value::from(body.as_str()));
        }
        if let Some(assignees) = &self.assignees {
            payload.insert("assignees".into(), string_array(assignees));
        }
        if let Some(labels) = &self.labels {
            payload.insert("labels".into(), string_array(labels));
        }
        if let Some(milestone) = self.milestone {
            payload.insert("milestone".into(), Value::from(milestone));
        }
        payload
    }
}

/// A partial issue update.
///
/// `milestone` is `None` when untouched, `Some(None)` to clear and
/// `Some(Some(n))` to set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IssueUpdate {
    /// New title.
    #[serde(default)]
    pub title: Option<String>,
    /// New body.
    #[serde(default)]
    pub body: Option<String>,
    /// New state.
    #[serde(default)]
    pub state: Option<IssueState>,
    /// Reason for the state change.
    #[serde(default)]
    pub state_reason: Option<StateReason>,
    /// Replacement label set.
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    /// Replacement assignee set.
    #[serde(default)]
    pub assignees: Option<Vec<String>>,
    /// Milestone change.
    #[serde(default, deserialize_with = "deserialize_some")]
    pub milestone: Option<Option<u64>>,
}

impl IssueUpdate {
    /// Builds the JSON payload for `PATCH /repos/{owner}/{repo}/issues/{number}`.
    #[must_use]
    pub fn to_payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        if let Some(title) = &self.title {
            payload.insert("title".into(), Value::from(title.as_str()));
        }
        if let Some(body) = &self.body {
            payload.insert("body".into(), Value::from(body.as_str()));
        }
        if let Some(state) = self.state {
            payload.insert("state".into(), Value::from(state.as_str()));
        }
        if let Some(reason) = self.state_reason {
            payload.insert("state_reason".into(), Value::from(reason.as_str()));
        }
        if let Some(labels) = &self.labels {
            payload.insert("labels".into(), string_array(labels));
        }
        if let Some(assignees) = &self.assignees {
            payload.insert("assignees".into(), string_array(assignees));
        }
        match self.milestone {
            Some(Some(number)) => {
                payload.insert("milestone".into(), Value::from(number));
            }
            Some(None) => {
                payload.insert("milestone".into(), Value::Null);
            }
            None => {}
        }
        payload
    }

    /// Returns true if no field would be sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_payload().is_empty()
    }
}

/// Result of [`update_issue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// GitHub applied the update and returned the new issue.
    Updated(Box<Issue>),
    /// The update carried no fields; nothing was sent.
    NoChanges,
}

/// Distinguishes an explicit `null` from a missing key.
///
/// Use with `#[serde(default, deserialize_with = "deserialize_some")]` on an
/// `Option<Option<T>>` field: missing stays `None`, `null` becomes `Some(None)`.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn string_array(values: &[String]) -> Value {
    Value::Array(values.iter().map(|v| Value::from(v.as_str())).collect())
}

/// Lists issues in a repository, following pagination.
///
/// # Errors
///
/// Returns the first failed page fetch; no partial results.
#[instrument(skip(fetcher, filters))]
pub async fn list_issues(
    fetcher: &dyn Fetcher,
    owner: &str,
    repo: &str,
    filters: &IssueFilters,
    options: PageOptions,
) -> crate::Result<Paginated<Issue>> {
    let request = filters.apply(ApiRequest::get(format!("{}/issues", repo_path(owner, repo)?)));
    let result = paginate(fetcher, &request, options).await?;
    debug!(
        count = result.items.len(),
        has_more = result.has_more,
        "Listed issues"
    );
    Ok(result)
}

/// Fetches a single issue with the requested body media type.
///
/// # Errors
///
/// Returns an error if the request fails or the issue cannot be decoded.
#[instrument(skip(fetcher))]
pub async fn get_issue(
    fetcher: &dyn Fetcher,
    owner: &str,
    repo: &str,
    number: u64,
    media_type: MediaType,
) -> crate::Result<Issue> {
    let path = format!("{}/issues/{number}", repo_path(owner, repo)?);
    fetcher
        .fetch(ApiRequest::get(path).media_type(media_type))
        .await?
        .decode()
}

/// Creates an issue.
///
/// # Errors
///
/// Returns an error if GitHub rejects the issue or the response cannot be decoded.
#[instrument(skip(fetcher, issue), fields(owner = %issue.owner, repo = %issue.repo))]
pub async fn create_issue(fetcher: &dyn Fetcher, issue: &NewIssue) -> crate::Result<Issue> {
    let path = format!("{}/issues", repo_path(&issue.owner, &issue.repo)?);
    let created: Issue = fetcher
        .fetch(ApiRequest::post(path, Value::Object(issue.to_payload())))
        .await?
        .decode()?;
    debug!(number = created.number, "Created issue");
    Ok(created)
}

/// Applies a partial update to an issue.
///
/// An empty update returns [`UpdateOutcome::NoChanges`] without a request.
///
/// # Errors
///
/// Returns an error if GitHub rejects the update or the response cannot be decoded.
#[instrument(skip(fetcher, update))]
pub async fn update_issue(
    fetcher: &dyn Fetcher,
    owner: &str,
    repo: &str,
    number: u64,
    update: &IssueUpdate,
) -> crate::Result<UpdateOutcome> {
    let payload = update.to_payload();
    if payload.is_empty() {
        debug!("Update carries no fields; skipping request");
        return Ok(UpdateOutcome::NoChanges);
    }

    let path = format!("{}/issues/{number}", repo_path(owner, repo)?);
    let updated: Issue = fetcher
        .fetch(ApiRequest::patch(path, Value::Object(payload)))
        .await?
        .decode()?;
    Ok(UpdateOutcome::Updated(Box::new(updated)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GhDeskError;
    use crate::github::fetcher::ApiResponse;
    use crate::testing::{PagedCollection, ScriptedFetcher};
    use reqwest::Method;
    use serde_json::json;

    #[test]
    fn update_with_only_null_milestone() {
        let update: IssueUpdate = serde_json::from_value(json!({"milestone": null})).unwrap();
        assert_eq!(update.milestone, Some(None));
        assert_eq!(Value::Object(update.to_payload()), json!({"milestone": null}));
    }

    #[test]
    fn update_without_milestone_omits_key() {
        let update: IssueUpdate =
            serde_json::from_value(json!({"title": "New title", "state": "closed"})).unwrap();
        let payload = update.to_payload();
        assert!(!payload.contains_key("milestone"));
        assert_eq!(
            Value::Object(payload),
            json!({"title": "New title", "state": "closed"})
        );
    }

    #[test]
    fn update_with_milestone_value() {
        let update: IssueUpdate = serde_json::from_value(json!({"milestone": 4})).unwrap();
        assert_eq!(Value::Object(update.to_payload()), json!({"milestone": 4}));
    }

    #[test]
    fn update_null_on_non_clearable_field_is_omitted() {
        let update: IssueUpdate =
            serde_json::from_value(json!({"title": null, "labels": null})).unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn empty_update_is_empty() {
        assert!(IssueUpdate::default().is_empty());
        let update: IssueUpdate = serde_json::from_value(json!({})).unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn update_includes_state_reason_and_sets() {
        let update = IssueUpdate {
            state: Some(IssueState::Closed),
            state_reason: Some(StateReason::NotPlanned),
            labels: Some(vec![]),
            assignees: Some(vec!["octocat".into()]),
            ..IssueUpdate::default()
        };
        assert_eq!(
            Value::Object(update.to_payload()),
            json!({
                "state": "closed",
                "state_reason": "not_planned",
                "labels": [],
                "assignees": ["octocat"]
            })
        );
    }

    #[test]
    fn new_issue_payload_includes_only_supplied_fields() {
        let issue = NewIssue::builder().owner("o").repo("r").title("Crash").build();
        assert_eq!(Value::Object(issue.to_payload()), json!({"title": "Crash"}));

        let issue = NewIssue::builder()
            .owner("o")
            .repo("r")
            .title("Crash")
            .body("Steps")
            .labels(vec!["bug".into()])
            .milestone(2)
            .build();
        assert_eq!(
            Value::Object(issue.to_payload()),
            json!({"title": "Crash", "body": "Steps", "labels": ["bug"], "milestone": 2})
        );
    }

    #[test]
    fn filters_map_to_query_parameters() {
        let filters = IssueFilters::builder()
            .state(IssueStateFilter::All)
            .assignee("octocat")
            .labels(vec!["bug".into(), "ui".into()])
            .sort(IssueSort::Updated)
            .direction(Direction::Asc)
            .build();
        let request = filters.apply(ApiRequest::get("/x"));

        assert_eq!(request.query_value("state"), Some("all"));
        assert_eq!(request.query_value("assignee"), Some("octocat"));
        assert_eq!(request.query_value("labels"), Some("bug,ui"));
        assert_eq!(request.query_value("sort"), Some("updated"));
        assert_eq!(request.query_value("direction"), Some("asc"));
        assert!(request.query_value("creator").is_none());
    }

    #[test]
    fn empty_filters_add_no_parameters() {
        let request = IssueFilters::default().apply(ApiRequest::get("/x"));
        assert!(request.query.is_empty());
    }

    #[tokio::test]
    async fn list_issues_targets_repository_issues() {
        let server = PagedCollection::issues(45);
        let filters = IssueFilters::builder().state(IssueStateFilter::Open).build();
        let options = PageOptions::builder().per_page(20).max_results(25).build();

        let result = list_issues(&server, "octocat", "hello", &filters, options)
            .await
            .unwrap();

        assert_eq!(result.items.len(), 25);
        assert!(result.has_more);
        let requests = server.requests();
        assert!(requests.iter().all(|r| r.path == "/repos/octocat/hello/issues"));
        assert!(requests.iter().all(|r| r.query_value("state") == Some("open")));
    }

    #[tokio::test]
    async fn get_issue_uses_media_type() {
        let fetcher = ScriptedFetcher::new()
            .respond(ApiResponse::ok(json!({"number": 9, "title": "Bug", "body_text": "plain"})));

        let issue = get_issue(&fetcher, "o", "r", 9, MediaType::Text).await.unwrap();

        assert_eq!(issue.number, 9);
        let request = &fetcher.requests()[0];
        assert_eq!(request.path, "/repos/o/r/issues/9");
        assert_eq!(request.media_type, MediaType::Text);
    }

    #[tokio::test]
    async fn get_issue_surfaces_not_found() {
        let fetcher = ScriptedFetcher::new().fail(GhDeskError::Upstream {
            status: 404,
            message: "Not Found".into(),
        });

        let err = get_issue(&fetcher, "o", "r", 1, MediaType::Json).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn create_issue_posts_payload() {
        let fetcher = ScriptedFetcher::new()
            .respond(ApiResponse::ok(json!({"number": 12, "title": "Crash", "state": "open"})));
        let issue = NewIssue::builder().owner("o").repo("r").title("Crash").build();

        let created = create_issue(&fetcher, &issue).await.unwrap();

        assert_eq!(created.number, 12);
        let request = &fetcher.requests()[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.path, "/repos/o/r/issues");
        assert_eq!(request.body, Some(json!({"title": "Crash"})));
    }

    #[tokio::test]
    async fn dot_segments_never_reach_the_fetcher() {
        let fetcher = ScriptedFetcher::new();
        let update = IssueUpdate {
            title: Some("t".into()),
            ..IssueUpdate::default()
        };

        let listed = list_issues(
            &fetcher,
            "..",
            "user",
            &IssueFilters::default(),
            PageOptions::default(),
        )
        .await;
        let fetched = get_issue(&fetcher, "o", ".", 1, MediaType::Json).await;
        let updated = update_issue(&fetcher, "..", "..", 1, &update).await;

        assert!(matches!(listed, Err(GhDeskError::InvalidInput { .. })));
        assert!(matches!(fetched, Err(GhDeskError::InvalidInput { .. })));
        assert!(matches!(updated, Err(GhDeskError::InvalidInput { .. })));
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn empty_update_sends_no_request() {
        let fetcher = ScriptedFetcher::new();

        let outcome = update_issue(&fetcher, "o", "r", 3, &IssueUpdate::default())
            .await
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::NoChanges);
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn update_patches_with_null_milestone() {
        let fetcher = ScriptedFetcher::new()
            .respond(ApiResponse::ok(json!({"number": 3, "title": "t", "milestone": null})));
        let update = IssueUpdate {
            milestone: Some(None),
            ..IssueUpdate::default()
        };

        let outcome = update_issue(&fetcher, "o", "r", 3, &update).await.unwrap();

        assert!(matches!(outcome, UpdateOutcome::Updated(issue) if issue.milestone.is_none()));
        let request = &fetcher.requests()[0];
        assert_eq!(request.method, Method::PATCH);
        assert_eq!(request.path, "/repos/o/r/issues/3");
        assert_eq!(request.body, Some(json!({"milestone": null})));
    }
}
