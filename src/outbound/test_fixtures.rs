//! Recording HTTP client shared by the outbound, v2 and router tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use http::header::{CONTENT_TYPE, HeaderValue};

use super::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Mock HTTP client that records requests and replays queued responses.
///
/// Once the queue is exhausted every request gets `200 {"result":"ok"}`.
#[derive(Debug, Default)]
pub struct MockClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_responses(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn captured_requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Returns `(method, json body)` for every captured request.
    pub fn calls(&self) -> Vec<(String, serde_json::Value)> {
        self.captured_requests()
            .iter()
            .map(|req| {
                let method = req
                    .url
                    .path_segments()
                    .and_then(|mut segments| segments.next_back())
                    .unwrap_or_default()
                    .to_string();
                let body = serde_json::from_slice(req.body.as_deref().unwrap_or(b"null")).unwrap();
                (method, body)
            })
            .collect()
    }
}

impl HttpClient for MockClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(req);
        let next = self.responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Ok(json_response(http::StatusCode::OK, r#"{"result":"ok"}"#)))
    }
}

pub fn json_response(status: http::StatusCode, body: &str) -> HttpResponse {
    response_with_type(status, "application/json", body)
}

pub fn response_with_type(status: http::StatusCode, content_type: &str, body: &str) -> HttpResponse {
    let mut headers = http::HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
    HttpResponse::new(status, headers, body.as_bytes().to_vec())
}
