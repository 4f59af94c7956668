//! In-memory GitHub API used by the unit tests.

use crate::error::UpstreamError;
use crate::github::{GitHubApi, Query};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Clone)]
enum Canned {
    Body(Value),
    Status(u16, String),
}

/// Serves canned responses keyed by route. Unknown routes answer 404, extra pages
/// of a known route answer an empty list.
#[derive(Default)]
pub struct FakeGitHub {
    responses: HashMap<String, Canned>,
    calls: Mutex<Vec<String>>,
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, route: &str, body: Value) -> Self {
        self.responses.insert(route.to_string(), Canned::Body(body));
        self
    }

    pub fn with_page(mut self, route: &str, page: u32, body: Value) -> Self {
        self.responses
            .insert(page_key(route, page), Canned::Body(body));
        self
    }

    pub fn failing(mut self, route: &str, status: u16, message: &str) -> Self {
        self.responses.insert(
            route.to_string(),
            Canned::Status(status, message.to_string()),
        );
        self
    }

    /// Every request seen so far, rendered as `route?k=v&k=v`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests made to exactly `route`, any query.
    pub fn count(&self, route: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.split('?').next() == Some(route))
            .count()
    }
}

fn page_key(route: &str, page: u32) -> String {
    format!("{route}#page={page}")
}

impl GitHubApi for FakeGitHub {
    async fn get_json(&self, route: &str, query: &Query) -> Result<Value, UpstreamError> {
        let rendered = if query.is_empty() {
            route.to_string()
        } else {
            let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
            format!("{route}?{}", pairs.join("&"))
        };
        self.calls.lock().unwrap().push(rendered);

        let page = query
            .iter()
            .find(|(k, _)| *k == "page")
            .and_then(|(_, v)| v.parse::<u32>().ok())
            .unwrap_or(1);

        let canned = if page > 1 {
            self.responses
                .get(&page_key(route, page))
                .cloned()
                .or_else(|| {
                    self.responses
                        .contains_key(route)
                        .then(|| Canned::Body(Value::Array(Vec::new())))
                })
        } else {
            self.responses.get(route).cloned()
        };

        match canned {
            Some(Canned::Body(body)) => Ok(body),
            Some(Canned::Status(status, message)) => Err(UpstreamError::Status { status, message }),
            None => Err(UpstreamError::Status {
                status: 404,
                message: "Not Found".to_string(),
            }),
        }
    }
}
