//! Scripted transport for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::{ApiError, Result};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Replays queued responses in order and records every request it sees.
/// Clones share the same queue and log.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<Result<HttpResponse>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, status: u16, body: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    pub(crate) fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push(status, body.to_string());
    }

    pub(crate) fn push_error(&self, error: ApiError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted response left".to_string())))
    }
}

/// A page envelope of `count` objects numbered from `first`.
pub(crate) fn object_page(first: usize, count: usize, total: usize, limit: usize) -> serde_json::Value {
    let data: Vec<serde_json::Value> = (first..first + count)
        .map(|i| serde_json::json!({"id": format!("o{i}"), "space_id": "s1", "name": format!("Object {i}")}))
        .collect();
    serde_json::json!({
        "data": data,
        "pagination": {
            "offset": first,
            "limit": limit,
            "total": total,
            "has_more": first + count < total
        }
    })
}
