// SPDX-License-Identifier: Apache-2.0

//! Conversion from ghdesk-core errors to MCP tool results.
//!
//! Operation failures are reported to the agent as error results with a
//! readable message, not as protocol errors.

use ghdesk_core::GhDeskError;
use rmcp::ErrorData;
use rmcp::model::{CallToolResult, Content};

/// Convert `GhDeskError` into an error tool result.
///
/// Upstream failures keep GitHub's status and message; authentication and
/// transport failures carry a hint at the likely cause.
pub fn error_result(err: &GhDeskError) -> CallToolResult {
    let text = match err {
        GhDeskError::Upstream { status: 401, .. } => {
            format!("{err}. Check that the GitHub token is valid and not expired.")
        }
        GhDeskError::Upstream { status: 403 | 404, .. } => format!(
            "{err}. The resource may not exist or the token may lack access to it."
        ),
        _ => err.to_string(),
    };
    CallToolResult::error(vec![Content::text(text)])
}

/// Convert any error implementing Display into an MCP internal error.
pub fn generic_to_mcp_error<E: std::fmt::Display>(err: E) -> ErrorData {
    ErrorData::internal_error(err.to_string(), None)
}
