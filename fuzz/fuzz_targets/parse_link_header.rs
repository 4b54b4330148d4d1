// SPDX-License-Identifier: Apache-2.0
// SPDX-FileCopyrightText: 2026 ghdesk Contributors

#![no_main]

use ghdesk_core::github::link::Continuation;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let continuation = Continuation::parse(s);
        if let Some(last) = continuation.last_page {
            assert!(s.contains(&last.to_string()));
        }
    }
});
