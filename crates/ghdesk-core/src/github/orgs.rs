// SPDX-License-Identifier: Apache-2.0

//! Organizations the authenticated user belongs to.

use tracing::{debug, instrument};

use super::fetcher::{ApiRequest, Fetcher};
use super::models::Organization;
use super::paginate::{PageOptions, Paginated, paginate};

/// Lists the authenticated user's organizations via `GET /user/orgs`.
///
/// # Errors
///
/// Returns the first failed page fetch; no partial results.
#[instrument(skip(fetcher))]
pub async fn list_organizations(
    fetcher: &dyn Fetcher,
    options: PageOptions,
) -> crate::Result<Paginated<Organization>> {
    let result = paginate(fetcher, &ApiRequest::get("/user/orgs"), options).await?;
    debug!(count = result.items.len(), "Listed organizations");
    Ok(result)
}
