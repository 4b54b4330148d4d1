// SPDX-License-Identifier: Apache-2.0

//! Text projections of decoded GitHub records.
//!
//! Each record kind has a fixed summary view and a short paragraph
//! rendering. All functions are pure: the same record always renders to the
//! same text, and absent optional fields fall back to empty values.

use std::fmt::Write;

use serde::Serialize;

use crate::github::models::{Issue, Organization, Repository};
use crate::github::paginate::Paginated;
use crate::utils::{flatten_newlines, truncate_after};

/// Maximum characters of an issue body kept in a summary.
pub const BODY_SUMMARY_CHARS: usize = 200;

/// Marker appended to a truncated body.
pub const ELLIPSIS: &str = "...";

/// A record kind that can be projected into a summary view.
pub trait Summarize {
    /// The summary projection.
    type Summary: Serialize;

    /// Singular and plural nouns used in count lines.
    const NOUNS: (&'static str, &'static str);

    /// Projects the record into its summary view.
    fn summarize(&self) -> Self::Summary;

    /// Appends a short paragraph for this record.
    fn render(&self, out: &mut String);
}

/// Summary view of an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueSummary {
    /// Issue number.
    pub number: u64,
    /// Title.
    pub title: String,
    /// State (`open`/`closed`), empty when unknown.
    pub state: String,
    /// Author login, empty when unknown.
    pub author: String,
    /// Label names.
    pub labels: Vec<String>,
    /// Body flattened to one line and cut at 200 characters.
    pub body: String,
    /// Whether the record is a pull request.
    pub is_pull_request: bool,
    /// Web URL, empty when unknown.
    pub url: String,
}

/// Summary view of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositorySummary {
    /// `owner/name`, or the bare name when the full name is absent.
    pub full_name: String,
    /// `public`, `private` or `internal`.
    pub visibility: String,
    /// Primary language, empty when unknown.
    pub language: String,
    /// Whether the repository is archived.
    pub archived: bool,
    /// Star count.
    pub stars: u64,
    /// Fork count.
    pub forks: u64,
    /// Open issue count.
    pub open_issues: u64,
    /// Description, empty when absent.
    pub description: String,
}

/// Summary view of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizationSummary {
    /// Login.
    pub login: String,
    /// Description, empty when absent.
    pub description: String,
}

/// Flattens line breaks and truncates an issue body for summaries.
#[must_use]
pub fn summarize_body(body: Option<&str>) -> String {
    let flat = flatten_newlines(body.unwrap_or_default());
    truncate_after(flat.trim(), BODY_SUMMARY_CHARS, ELLIPSIS)
}

impl Summarize for Issue {
    type Summary = IssueSummary;
    const NOUNS: (&'static str, &'static str) = ("issue", "issues");

    fn summarize(&self) -> IssueSummary {
        IssueSummary {
            number: self.number,
            title: self.title.clone(),
            state: self.state.clone().unwrap_or_default(),
            author: self
                .user
                .as_ref()
                .map(|u| u.login.clone())
                .unwrap_or_default(),
            labels: self.labels.iter().map(|l| l.name.clone()).collect(),
            body: summarize_body(self.best_body()),
            is_pull_request: self.is_pull_request(),
            url: self.html_url.clone().unwrap_or_default(),
        }
    }

    fn render(&self, out: &mut String) {
        let s = self.summarize();
        let kind = if s.is_pull_request { " (pull request)" } else { "" };
        let state = if s.state.is_empty() { "unknown" } else { s.state.as_str() };
        let _ = write!(out, "#{} [{state}] {}{kind}", s.number, s.title);
        if !s.author.is_empty() {
            let _ = write!(out, " by @{}", s.author);
        }
        if !s.labels.is_empty() {
            let _ = write!(out, " [{}]", s.labels.join(", "));
        }
        out.push('\n');
        if !s.body.is_empty() {
            let _ = writeln!(out, "    {}", s.body);
        }
        if !s.url.is_empty() {
            let _ = writeln!(out, "    {}", s.url);
        }
    }
}

impl Summarize for Repository {
    type Summary = RepositorySummary;
    const NOUNS: (&'static str, &'static str) = ("repository", "repositories");

    fn summarize(&self) -> RepositorySummary {
        let visibility = self.visibility.clone().unwrap_or_else(|| {
            if self.private { "private" } else { "public" }.to_string()
        });
        RepositorySummary {
            full_name: self.full_name.clone().unwrap_or_else(|| self.name.clone()),
            visibility,
            language: self.language.clone().unwrap_or_default(),
            archived: self.archived,
            stars: self.stargazers_count,
            forks: self.forks_count,
            open_issues: self.open_issues_count,
            description: self.description.clone().unwrap_or_default(),
        }
    }

    fn render(&self, out: &mut String) {
        let s = self.summarize();
        let _ = write!(out, "{} ({}", s.full_name, s.visibility);
        if !s.language.is_empty() {
            let _ = write!(out, ", {}", s.language);
        }
        if s.archived {
            out.push_str(", archived");
        }
        let _ = writeln!(
            out,
            ") stars: {}, forks: {}, open issues: {}",
            s.stars, s.forks, s.open_issues
        );
        if !s.description.is_empty() {
            let _ = writeln!(out, "    {}", flatten_newlines(&s.description));
        }
    }
}

impl Summarize for Organization {
    type Summary = OrganizationSummary;
    const NOUNS: (&'static str, &'static str) = ("organization", "organizations");

    fn summarize(&self) -> OrganizationSummary {
        OrganizationSummary {
            login: self.login.clone(),
            description: self.description.clone().unwrap_or_default(),
        }
    }

    fn render(&self, out: &mut String) {
        let s = self.summarize();
        if s.description.is_empty() {
            let _ = writeln!(out, "{}", s.login);
        } else {
            let _ = writeln!(out, "{}: {}", s.login, flatten_newlines(&s.description));
        }
    }
}

/// One-line count summary for a listing.
///
/// `scope` names where the items came from (e.g. `"in octocat/hello"`); pass
/// an empty string for none.
#[must_use]
pub fn count_summary<T: Summarize>(page: &Paginated<T>, scope: &str) -> String {
    let (singular, plural) = T::NOUNS;
    let count = page.items.len();
    let noun = if count == 1 { singular } else { plural };
    let scope = if scope.is_empty() {
        String::new()
    } else {
        format!(" {scope}")
    };

    if count == 0 && !page.has_more {
        return format!("No {plural} found{scope}.");
    }

    let mut line = format!("Found {count} {noun}{scope}");
    if page.has_more {
        match page.estimated_total {
            Some(total) => {
                let _ = write!(line, " (more available, about {total} in total)");
            }
            None => line.push_str(" (more available)"),
        }
    }
    line.push('.');
    line
}

/// Renders a listing: the count summary followed by one paragraph per item.
#[must_use]
pub fn render_listing<T: Summarize>(page: &Paginated<T>, scope: &str) -> String {
    let mut out = count_summary(page, scope);
    out.push('\n');
    for item in &page.items {
        out.push('\n');
        item.render(&mut out);
    }
    out
}

/// Renders the full view of a single issue, including the complete body.
#[must_use]
pub fn render_issue_detail(issue: &Issue) -> String {
    let mut out = String::new();
    let kind = if issue.is_pull_request() { "Pull request" } else { "Issue" };
    let _ = writeln!(out, "{kind} #{}: {}", issue.number, issue.title);

    let state = issue.state.as_deref().unwrap_or("unknown");
    match issue.state_reason.as_deref() {
        Some(reason) => {
            let _ = writeln!(out, "State: {state} ({reason})");
        }
        None => {
            let _ = writeln!(out, "State: {state}");
        }
    }
    if let Some(user) = &issue.user {
        let _ = writeln!(out, "Author: @{}", user.login);
    }
    if !issue.assignees.is_empty() {
        let logins: Vec<String> = issue.assignees.iter().map(|u| format!("@{}", u.login)).collect();
        let _ = writeln!(out, "Assignees: {}", logins.join(", "));
    }
    if !issue.labels.is_empty() {
        let names: Vec<&str> = issue.labels.iter().map(|l| l.name.as_str()).collect();
        let _ = writeln!(out, "Labels: {}", names.join(", "));
    }
    if let Some(milestone) = &issue.milestone {
        let _ = writeln!(out, "Milestone: {} (#{})", milestone.title, milestone.number);
    }
    let _ = writeln!(out, "Comments: {}", issue.comments);
    if let Some(created) = issue.created_at {
        let _ = writeln!(out, "Created: {}", created.to_rfc3339());
    }
    if let Some(updated) = issue.updated_at {
        let _ = writeln!(out, "Updated: {}", updated.to_rfc3339());
    }
    if let Some(closed) = issue.closed_at {
        let _ = writeln!(out, "Closed: {}", closed.to_rfc3339());
    }
    if let Some(url) = &issue.html_url {
        let _ = writeln!(out, "URL: {url}");
    }

    if let Some(body) = issue.best_body().filter(|b| !b.trim().is_empty()) {
        let _ = write!(out, "\n{}\n", body.trim_end());
    }
    out
}
