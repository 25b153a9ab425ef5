use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{GhxError, Result};

use super::HubClient;

/// One request observed by [`MockClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Test double that records every request and replays canned responses
/// in FIFO order. A canned `Err` simulates an upstream failure.
#[derive(Debug, Default)]
pub struct MockClient {
    responses: Mutex<VecDeque<Result<Value>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(responses: Vec<Value>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Ok).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_error(status: u16, body: &str) -> Self {
        let err = GhxError::Status {
            status,
            body: body.to_string(),
        };
        Self {
            responses: Mutex::new(VecDeque::from([Err(err)])),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(
        &self,
        method: &'static str,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value> {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.cloned(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Value::Null))
    }
}

#[async_trait]
impl HubClient for MockClient {
    async fn get_json(&self, path: &str) -> Result<Value> {
        self.record("GET", path, &[], None)
    }

    async fn get_json_with_query(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        self.record("GET", path, query, None)
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        self.record("POST", path, &[], Some(body))
    }

    async fn put_json(&self, path: &str, body: &Value) -> Result<Value> {
        self.record("PUT", path, &[], Some(body))
    }

    async fn patch_json(&self, path: &str, body: &Value) -> Result<Value> {
        self.record("PATCH", path, &[], Some(body))
    }
}
