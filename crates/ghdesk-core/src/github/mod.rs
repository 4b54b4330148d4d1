// SPDX-License-Identifier: Apache-2.0

//! GitHub integration module.
//!
//! Provides the authenticated fetcher, pagination, decoded records and the
//! issue, repository and organization operations built on them.

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::GhDeskError;

pub mod fetcher;
pub mod issues;
pub mod link;
pub mod models;
pub mod orgs;
pub mod paginate;
pub mod repos;

/// Characters escaped inside a single URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encodes one path segment (owner, repository or organization name).
///
/// # Errors
///
/// Returns [`GhDeskError::InvalidInput`] for an empty segment or a dot
/// segment (`.` or `..`), which URL resolution would collapse into a
/// different path.
pub fn encode_segment(segment: &str) -> crate::Result<String> {
    if matches!(segment, "" | "." | "..") {
        return Err(GhDeskError::InvalidInput {
            message: format!(
                "'{segment}' is not a valid owner, repository or organization name"
            ),
        });
    }
    Ok(utf8_percent_encode(segment, PATH_SEGMENT).to_string())
}

/// Builds `/repos/{owner}/{repo}` with both segments encoded.
///
/// # Errors
///
/// Returns [`GhDeskError::InvalidInput`] if either segment is rejected by
/// [`encode_segment`].
pub fn repo_path(owner: &str, repo: &str) -> crate::Result<String> {
    Ok(format!("/repos/{}/{}", encode_segment(owner)?, encode_segment(repo)?))
}

/// Sort direction for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl Direction {
    /// Query parameter value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_segments_are_unchanged() {
        assert_eq!(encode_segment("octocat").unwrap(), "octocat");
        assert_eq!(encode_segment("Hello-World.rs_1").unwrap(), "Hello-World.rs_1");
        assert_eq!(encode_segment("...").unwrap(), "...");
    }

    #[test]
    fn reserved_characters_are_escaped() {
        assert_eq!(encode_segment("a/b").unwrap(), "a%2Fb");
        assert_eq!(encode_segment("a b").unwrap(), "a%20b");
        assert_eq!(encode_segment("x?y#z").unwrap(), "x%3Fy%23z");
    }

    #[test]
    fn dot_segments_are_rejected() {
        for segment in ["", ".", ".."] {
            let err = encode_segment(segment).unwrap_err();
            assert!(matches!(err, GhDeskError::InvalidInput { .. }), "{segment:?}");
        }
        assert!(repo_path("..", "user").is_err());
        assert!(repo_path("octocat", ".").is_err());
    }

    #[test]
    fn repo_path_joins_encoded_segments() {
        assert_eq!(
            repo_path("octocat", "hello world").unwrap(),
            "/repos/octocat/hello%20world"
        );
    }

    #[test]
    fn direction_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Direction::Desc).unwrap(), "\"desc\"");
        assert_eq!(Direction::Asc.as_str(), "asc");
    }
}
