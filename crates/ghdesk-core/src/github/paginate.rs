// SPDX-License-Identifier: Apache-2.0

//! Paginated aggregation shared by every listing operation.
//!
//! Pages are fetched strictly one after another. A cap of zero returns an
//! empty result flagged `has_more` without fetching. Each iteration moves
//! `FETCHING -> MORE | DONE | ERROR`:
//!
//! - ERROR: the fetch failed. Already aggregated pages are discarded.
//! - DONE: the cap was reached, there is no `next` link, or the page was short.
//! - MORE: otherwise; the page counter advances by one.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::fetcher::{ApiRequest, Fetcher};
use crate::error::GhDeskError;

/// GitHub's maximum `per_page`.
pub const MAX_PER_PAGE: u32 = 100;

/// Page size used when the caller does not request one.
pub const DEFAULT_PER_PAGE: u32 = 30;

/// Page size and overall cap for a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, bon::Builder)]
pub struct PageOptions {
    /// Requested page size; clamped to `1..=100`.
    pub per_page: Option<u32>,
    /// Maximum number of items across all pages.
    pub max_results: Option<usize>,
}

impl PageOptions {
    /// The page size actually sent to GitHub.
    #[must_use]
    pub fn effective_per_page(&self) -> u32 {
        self.per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE)
    }
}

/// Aggregated result of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items in the order GitHub returned them.
    pub items: Vec<T>,
    /// More items exist beyond `items` (server said so, or the cap cut them off).
    pub has_more: bool,
    /// `last page × page size`, from the first response that carried a `last` link.
    pub estimated_total: Option<u64>,
    /// Number of pages fetched.
    pub pages_fetched: u32,
}

/// Fetches `request` page by page until a termination condition holds.
///
/// `page` and `per_page` are appended to the query of each page request.
///
/// # Errors
///
/// Returns the first fetch or decode failure. No partial aggregation is
/// returned alongside it.
pub async fn paginate<T: DeserializeOwned>(
    fetcher: &dyn Fetcher,
    request: &ApiRequest,
    options: PageOptions,
) -> crate::Result<Paginated<T>> {
    if options.max_results == Some(0) {
        return Ok(Paginated {
            items: Vec::new(),
            has_more: true,
            estimated_total: None,
            pages_fetched: 0,
        });
    }

    let per_page = options.effective_per_page();
    let mut items: Vec<T> = Vec::new();
    let mut estimated_total: Option<u64> = None;
    let mut page: u32 = 1;

    let has_more = loop {
        let page_request = request
            .clone()
            .query("per_page", per_page)
            .query("page", page);

        let response = fetcher.fetch(page_request).await?;
        let continuation = response.continuation();
        let batch: Vec<T> = decode_page(response.body)?;
        let received = batch.len();
        items.extend(batch);

        if estimated_total.is_none()
            && let Some(last) = continuation.last_page
        {
            estimated_total = Some(u64::from(last) * u64::from(per_page));
        }

        debug!(
            path = %request.path,
            page,
            received,
            total = items.len(),
            has_next = continuation.has_next,
            "Fetched page"
        );

        if let Some(cap) = options.max_results
            && items.len() >= cap
        {
            items.truncate(cap);
            break true;
        }

        if !continuation.has_next || received < per_page as usize {
            break continuation.has_next;
        }

        page += 1;
    };

    Ok(Paginated {
        items,
        has_more,
        estimated_total,
        pages_fetched: page,
    })
}

fn decode_page<T: DeserializeOwned>(body: Value) -> crate::Result<Vec<T>> {
    if !body.is_array() {
        return Err(GhDeskError::InvalidResponse {
            message: format!("expected a JSON array page, got {}", json_kind(&body)),
        });
    }
    Ok(serde_json::from_value(body)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
