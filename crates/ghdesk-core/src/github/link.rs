// SPDX-License-Identifier: Apache-2.0

//! `Link` header parsing for paginated GitHub responses.
//!
//! GitHub signals pagination with a header of the form
//! `<https://api.github.com/...&page=2>; rel="next", <...&page=5>; rel="last"`.
//! The rest of the crate only sees the structured [`Continuation`].

use std::sync::LazyLock;

use regex::Regex;

/// One `<url>; rel="..."` entry. Parameters other than `rel` are ignored.
static LINK_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([^>]*)>\s*;(?:[^,<]*?;)*\s*rel\s*=\s*"?([^";,]+)"?"#)
        .expect("link entry regex is valid")
});

/// The `page` query parameter of a link target.
static PAGE_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]page=(\d+)").expect("page param regex is valid"));

/// Pagination state carried by a single response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Continuation {
    /// A `rel="next"` link is present.
    pub has_next: bool,
    /// Page number of the `rel="last"` link, when present and numeric.
    pub last_page: Option<u32>,
}

impl Continuation {
    /// Parses a raw `Link` header value.
    ///
    /// Unknown relations and malformed entries are skipped; an empty or
    /// missing header yields the default (no next page, no last page).
    #[must_use]
    pub fn parse(header: &str) -> Self {
        let mut continuation = Self::default();

        for caps in LINK_ENTRY.captures_iter(header) {
            let url = &caps[1];
            for rel in caps[2].split_whitespace() {
                match rel {
                    "next" => continuation.has_next = true,
                    "last" if continuation.last_page.is_none() => {
                        continuation.last_page = page_number(url);
                    }
                    _ => {}
                }
            }
        }

        continuation
    }

    /// Parses an optional header value; `None` means no pagination links.
    #[must_use]
    pub fn from_header(header: Option<&str>) -> Self {
        header.map(Self::parse).unwrap_or_default()
    }
}

fn page_number(url: &str) -> Option<u32> {
    PAGE_PARAM
        .captures(url)
        .and_then(|caps| caps[1].parse().ok())
}
