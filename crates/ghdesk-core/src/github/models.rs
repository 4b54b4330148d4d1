// SPDX-License-Identifier: Apache-2.0

//! Decoded GitHub records.
//!
//! Only the fields the formatter reads are modelled. Everything GitHub may
//! omit or send as `null` is an `Option` (or defaults to empty/zero), so a
//! sparse record never fails to decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A GitHub account reference (issue author, assignee).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Account login.
    #[serde(default)]
    pub login: String,
}

/// An issue label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label name.
    #[serde(default)]
    pub name: String,
    /// Hex color without leading `#`.
    #[serde(default)]
    pub color: Option<String>,
}

/// An issue milestone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// Milestone number within the repository.
    #[serde(default)]
    pub number: u64,
    /// Milestone title.
    #[serde(default)]
    pub title: String,
    /// `open` or `closed`.
    #[serde(default)]
    pub state: Option<String>,
}

/// Marker present on issues that are actually pull requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    /// API URL of the pull request.
    #[serde(default)]
    pub url: Option<String>,
}

/// A GitHub issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number within the repository.
    #[serde(default)]
    pub number: u64,
    /// Issue title.
    #[serde(default)]
    pub title: String,
    /// `open` or `closed`.
    #[serde(default)]
    pub state: Option<String>,
    /// Reason for the current state (`completed`, `not_planned`, `reopened`).
    #[serde(default)]
    pub state_reason: Option<String>,
    /// Markdown body.
    #[serde(default)]
    pub body: Option<String>,
    /// Plain-text body (text/full media types).
    #[serde(default)]
    pub body_text: Option<String>,
    /// Rendered HTML body (html/full media types).
    #[serde(default)]
    pub body_html: Option<String>,
    /// Author.
    #[serde(default)]
    pub user: Option<User>,
    /// Applied labels.
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Assigned users.
    #[serde(default)]
    pub assignees: Vec<User>,
    /// Milestone, if any.
    #[serde(default)]
    pub milestone: Option<Milestone>,
    /// Number of comments.
    #[serde(default)]
    pub comments: u64,
    /// Web URL.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Creation time.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Close time.
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    /// Present when this issue is a pull request.
    #[serde(default)]
    pub pull_request: Option<PullRequestRef>,
}

impl Issue {
    /// Returns true if the issues endpoint returned a pull request.
    #[must_use]
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// Returns the best available body: markdown, then text, then HTML.
    #[must_use]
    pub fn best_body(&self) -> Option<&str> {
        self.body
            .as_deref()
            .or(self.body_text.as_deref())
            .or(self.body_html.as_deref())
    }
}

/// A GitHub repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Short name.
    #[serde(default)]
    pub name: String,
    /// `owner/name`.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Repository description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the repository is private.
    #[serde(default)]
    pub private: bool,
    /// `public`, `private` or `internal`; preferred over `private` when present.
    #[serde(default)]
    pub visibility: Option<String>,
    /// Primary language.
    #[serde(default)]
    pub language: Option<String>,
    /// Whether the repository is archived.
    #[serde(default)]
    pub archived: bool,
    /// Whether the repository is a fork.
    #[serde(default)]
    pub fork: bool,
    /// Star count.
    #[serde(default)]
    pub stargazers_count: u64,
    /// Fork count.
    #[serde(default)]
    pub forks_count: u64,
    /// Open issue count (includes pull requests).
    #[serde(default)]
    pub open_issues_count: u64,
    /// Web URL.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Last push time.
    #[serde(default)]
    pub pushed_at: Option<DateTime<Utc>>,
}

/// A GitHub organization as returned by `/user/orgs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization login.
    #[serde(default)]
    pub login: String,
    /// Numeric id.
    #[serde(default)]
    pub id: u64,
    /// Organization description.
    #[serde(default)]
    pub description: Option<String>,
}
