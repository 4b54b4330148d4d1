// SPDX-License-Identifier: Apache-2.0

#![warn(missing_docs)]

//! # ghdesk Core
//!
//! Core library for ghdesk - GitHub issue, repository and organization
//! operations for agent tooling.
//!
//! This crate provides reusable components for:
//! - An authenticated GitHub REST fetcher behind the [`Fetcher`] trait
//! - Link-header driven pagination with result caps
//! - Issue create/list/get/update, repository and organization listings
//! - Compact text projections of the returned records
//! - Configuration management
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ghdesk_core::{connect, load_config, StaticTokenProvider};
//! use ghdesk_core::github::issues::{IssueFilters, list_issues};
//! use ghdesk_core::github::paginate::PageOptions;
//! use ghdesk_core::format::render_listing;
//! use anyhow::Result;
//!
//! # async fn example() -> Result<()> {
//! let config = load_config()?;
//! let fetcher = connect(&StaticTokenProvider::new("ghp_example"), &config.github)?;
//!
//! let issues = list_issues(
//!     &fetcher,
//!     "octocat",
//!     "hello-world",
//!     &IssueFilters::default(),
//!     PageOptions::builder().max_results(50).build(),
//! )
//! .await?;
//! println!("{}", render_listing(&issues, "in octocat/hello-world"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`auth`] - Token provider abstraction
//! - [`config`] - Configuration loading and paths
//! - [`error`] - Error types
//! - [`format`] - Summary projections and text rendering
//! - [`github`] - Fetcher, pagination and GitHub operations

// ============================================================================
// Authentication
// ============================================================================

pub use auth::{StaticTokenProvider, TokenProvider};

// ============================================================================
// Error Handling
// ============================================================================

pub use error::GhDeskError;

/// Convenience Result type for ghdesk operations.
///
/// This is equivalent to `std::result::Result<T, GhDeskError>`.
pub type Result<T> = std::result::Result<T, GhDeskError>;

// ============================================================================
// Configuration
// ============================================================================

pub use config::{AppConfig, GitHubConfig, config_dir, config_file_path, load_config};

// ============================================================================
// GitHub Integration
// ============================================================================

pub use github::fetcher::{ApiRequest, ApiResponse, Fetcher, HttpFetcher, MediaType};
pub use github::models::{Issue, Organization, Repository};
pub use github::paginate::{PageOptions, Paginated};

// ============================================================================
// Formatting
// ============================================================================

pub use format::{Summarize, render_issue_detail, render_listing};

// ============================================================================
// Platform-Agnostic Facade
// ============================================================================

pub use facade::connect;

// ============================================================================
// Modules
// ============================================================================

pub mod auth;
pub mod config;
pub mod error;
pub mod facade;
pub mod format;
pub mod github;
pub mod utils;

#[cfg(test)]
mod testing;
