// SPDX-License-Identifier: Apache-2.0

//! Text utility functions for ghdesk.
//!
//! Provides reusable text formatting utilities for truncation and whitespace
//! flattening.

/// Keeps the first `max_chars` characters and appends `suffix` if anything was cut.
///
/// Uses character count (not byte count) to safely handle multi-byte UTF-8.
/// Unlike a width-bounded truncation, the suffix is added after the kept text.
///
/// # Examples
///
/// ```
/// use ghdesk_core::utils::truncate_after;
///
/// assert_eq!(truncate_after("Hello", 10, "..."), "Hello");
/// assert_eq!(truncate_after("Hello, world", 5, "..."), "Hello...");
/// ```
#[must_use]
pub fn truncate_after(text: &str, max_chars: usize, suffix: &str) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{suffix}", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Replaces every line break (`\n`, `\r\n`, `\r`) with a single space.
///
/// # Examples
///
/// ```
/// use ghdesk_core::utils::flatten_newlines;
///
/// assert_eq!(flatten_newlines("a\r\nb\nc"), "a b c");
/// ```
#[must_use]
pub fn flatten_newlines(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}
