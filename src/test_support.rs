//! Recording transport for unit tests

use crate::error::{Error, Result};
use crate::request::RequestDescriptor;
use crate::transport::{Response, Transport};
use crate::types::JsonValue;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Replays queued responses and records every request it sees
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<Result<Response>>>,
    requests: Mutex<Vec<RequestDescriptor>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON response
    pub fn push_json(&self, value: JsonValue) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(Response::Json(value)));
        self
    }

    /// Queue a failure
    pub fn push_error(&self, error: Error) -> &Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    /// Queue a raw response
    pub fn push_response(&self, response: Response) -> &Self {
        self.responses.lock().unwrap().push_back(Ok(response));
        self
    }

    /// Every request sent so far
    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<Response> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Other(format!("no response queued for {}", request.url))))
    }
}

/// `count` records with consecutive ids starting at `first_id`
pub fn records(first_id: u64, count: u64) -> JsonValue {
    JsonValue::Array(
        (first_id..first_id + count)
            .map(|id| serde_json::json!({ "id": id }))
            .collect(),
    )
}

/// The decoded `query` JSON of a standard dialect read
pub fn standard_query_of(request: &RequestDescriptor) -> JsonValue {
    let encoded = request
        .query()
        .and_then(|q| q.strip_prefix("query="))
        .expect("request has no query parameter");
    let json = urlencoding::decode(encoded).unwrap();
    serde_json::from_str(&json).unwrap()
}
