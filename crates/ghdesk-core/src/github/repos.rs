// SPDX-License-Identifier: Apache-2.0

//! Repository listings for an organization or the authenticated user.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::fetcher::{ApiRequest, Fetcher};
use super::models::Repository;
use super::paginate::{PageOptions, Paginated, paginate};
use super::{Direction, encode_segment};

/// Repository type filter.
///
/// Organization listings accept `all`, `public`, `private`, `forks`,
/// `sources` and `member`; user listings accept `all`, `owner`, `public`,
/// `private` and `member`. GitHub rejects the others with a 422.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RepoType {
    /// Every repository.
    All,
    /// Owned by the user.
    Owner,
    /// Public only.
    Public,
    /// Private only.
    Private,
    /// Forks only.
    Forks,
    /// Non-forks only.
    Sources,
    /// Repositories the user is a member of.
    Member,
}

impl RepoType {
    /// Query parameter value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RepoType::All => "all",
            RepoType::Owner => "owner",
            RepoType::Public => "public",
            RepoType::Private => "private",
            RepoType::Forks => "forks",
            RepoType::Sources => "sources",
            RepoType::Member => "member",
        }
    }
}

/// Sort key for repository listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RepoSort {
    /// Creation time.
    Created,
    /// Last update time.
    Updated,
    /// Last push time.
    Pushed,
    /// `owner/name`.
    FullName,
}

impl RepoSort {
    /// Query parameter value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RepoSort::Created => "created",
            RepoSort::Updated => "updated",
            RepoSort::Pushed => "pushed",
            RepoSort::FullName => "full_name",
        }
    }
}

/// Which repositories to list.
#[derive(Debug, Clone, Default, PartialEq, Eq, bon::Builder)]
pub struct RepoFilters {
    /// Organization login; `None` lists the authenticated user's repositories.
    #[builder(into)]
    pub org: Option<String>,
    /// Type filter.
    pub repo_type: Option<RepoType>,
    /// Sort key.
    pub sort: Option<RepoSort>,
    /// Sort direction.
    pub direction: Option<Direction>,
}

impl RepoFilters {
    fn request(&self) -> crate::Result<ApiRequest> {
        let path = match &self.org {
            Some(org) => format!("/orgs/{}/repos", encode_segment(org)?),
            None => "/user/repos".to_string(),
        };
        Ok(ApiRequest::get(path)
            .query_opt("type", self.repo_type.map(RepoType::as_str))
            .query_opt("sort", self.sort.map(RepoSort::as_str))
            .query_opt("direction", self.direction.map(Direction::as_str)))
    }
}

/// Lists repositories, following pagination.
///
/// # Errors
///
/// Returns the first failed page fetch; no partial results.
#[instrument(skip(fetcher))]
pub async fn list_repositories(
    fetcher: &dyn Fetcher,
    filters: &RepoFilters,
    options: PageOptions,
) -> crate::Result<Paginated<Repository>> {
    let result = paginate(fetcher, &filters.request()?, options).await?;
    debug!(
        count = result.items.len(),
        has_more = result.has_more,
        "Listed repositories"
    );
    Ok(result)
}
