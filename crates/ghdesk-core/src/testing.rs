// SPDX-License-Identifier: Apache-2.0

//! In-memory fetchers for exercising operations without a network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, LINK};
use serde_json::Value;

use crate::GhDeskError;
use crate::github::fetcher::{ApiRequest, ApiResponse, Fetcher};

/// Serves a fixed collection the way GitHub does: honours `page` and
/// `per_page`, and emits `next`/`last` links.
pub struct PagedCollection {
    items: Vec<Value>,
    /// Pages (1-based) that fail with the given status instead of serving data.
    failures: Vec<(u32, u16)>,
    requests: Mutex<Vec<ApiRequest>>,
    served: Mutex<Vec<usize>>,
}

impl PagedCollection {
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            items,
            failures: Vec::new(),
            requests: Mutex::new(Vec::new()),
            served: Mutex::new(Vec::new()),
        }
    }

    /// A collection of `count` issues numbered from 1.
    pub fn issues(count: u64) -> Self {
        Self::new(
            (1..=count)
                .map(|n| {
                    serde_json::json!({"number": n, "title": format!("Issue {n}"), "state": "open"})
                })
                .collect(),
        )
    }

    pub fn fail_page(mut self, page: u32, status: u16) -> Self {
        self.failures.push((page, status));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of items served per fetch, in fetch order.
    pub fn served_sizes(&self) -> Vec<usize> {
        self.served.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for PagedCollection {
    async fn fetch(&self, request: ApiRequest) -> crate::Result<ApiResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let page: u32 = request
            .query_value("page")
            .and_then(|p| p.parse().ok())
            .unwrap_or(1);
        let per_page: usize = request
            .query_value("per_page")
            .and_then(|p| p.parse().ok())
            .unwrap_or(30);

        if let Some((_, status)) = self.failures.iter().find(|(p, _)| *p == page) {
            return Err(GhDeskError::Upstream {
                status: *status,
                message: "Not Found".to_string(),
            });
        }

        let start = (page as usize - 1) * per_page;
        let batch: Vec<Value> = self.items.iter().skip(start).take(per_page).cloned().collect();
        self.served.lock().unwrap().push(batch.len());

        let last_page = self.items.len().div_ceil(per_page).max(1);
        let mut links = Vec::new();
        if (page as usize) < last_page {
            links.push(format!(
                "<https://api.github.test{}?per_page={per_page}&page={}>; rel=\"next\"",
                request.path,
                page + 1
            ));
            links.push(format!(
                "<https://api.github.test{}?per_page={per_page}&page={last_page}>; rel=\"last\"",
                request.path
            ));
        }

        let mut response = ApiResponse::ok(Value::Array(batch));
        if !links.is_empty() {
            response.headers.insert(
                LINK,
                HeaderValue::from_str(&links.join(", ")).expect("valid link header"),
            );
        }
        Ok(response)
    }
}

/// Replays queued results in order and records every request.
#[derive(Default)]
pub struct ScriptedFetcher {
    responses: Mutex<VecDeque<crate::Result<ApiResponse>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, response: ApiResponse) -> Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    pub fn respond_with_link(self, body: Value, link: &str) -> Self {
        let mut response = ApiResponse::ok(body);
        response
            .headers
            .insert(LINK, HeaderValue::from_str(link).expect("valid link header"));
        self.respond(response)
    }

    pub fn fail(self, err: GhDeskError) -> Self {
        self.responses.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, request: ApiRequest) -> crate::Result<ApiResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedFetcher ran out of responses"))
    }
}
