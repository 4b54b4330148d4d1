// SPDX-License-Identifier: Apache-2.0

//! Logging initialization for the ghdesk MCP server.
//!
//! Uses `tracing` with `tracing-subscriber` for structured logging. Output
//! always goes to stderr because stdout carries the stdio transport.
//!
//! # Examples
//!
//! ```bash
//! # Default: info level for ghdesk, warn for dependencies
//! ghdesk-mcp
//!
//! # Per-page pagination traces
//! RUST_LOG=ghdesk_core=debug ghdesk-mcp
//! ```

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "ghdesk=info,rmcp=warn,reqwest=warn";

/// Initialize the logging subsystem.
///
/// `RUST_LOG` overrides [`DEFAULT_FILTER`].
pub fn init_logging() {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr);

    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
