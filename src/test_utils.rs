// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test utilities for mocking Kubernetes API responses.

use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::Client;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

#[derive(Clone, Debug)]
enum MockResponse {
    Fixed(u16, String),
    /// Reply with the request body, filling in server-side metadata
    Echo(u16),
}

/// A request received by the mock
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// A mock HTTP service that returns predefined responses based on request paths.
///
/// Each method/path holds a queue of responses; the last one repeats once
/// the others are used up. Clones share state, so responses can be added
/// after the client was built.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), VecDeque<MockResponse>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn push(self, method: &str, path: &str, response: MockResponse) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back(response);
        self
    }

    /// Add a response for GET requests matching the path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.push("GET", path, MockResponse::Fixed(status, body.to_string()))
    }

    /// Add a response for POST requests matching the path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.push("POST", path, MockResponse::Fixed(status, body.to_string()))
    }

    /// Answer POST requests with the created object
    pub fn on_post_echo(self, path: &str) -> Self {
        self.push("POST", path, MockResponse::Echo(201))
    }

    /// Answer PUT requests with the replaced object
    pub fn on_put_echo(self, path: &str) -> Self {
        self.push("PUT", path, MockResponse::Echo(200))
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    /// All requests received so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests received for an exact method and path
    pub fn requests_for(&self, method: &str, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    fn next_response(&self, method: &str, path: &str) -> Option<MockResponse> {
        let mut responses = self.responses.lock().unwrap();

        // Exact match first, then the longest registered prefix
        let key = if responses.contains_key(&(method.to_string(), path.to_string())) {
            (method.to_string(), path.to_string())
        } else {
            responses
                .keys()
                .filter(|(m, p)| m == method && path.starts_with(p.as_str()))
                .max_by_key(|(_, p)| p.len())
                .cloned()?
        };

        let queue = responses.get_mut(&key)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();
        let response = self.next_response(&method, &path);
        let requests = self.requests.clone();

        Box::pin(async move {
            let bytes = req
                .into_body()
                .collect()
                .await
                .map_err(Into::<tower::BoxError>::into)?
                .to_bytes();
            let body = String::from_utf8_lossy(&bytes).to_string();

            requests.lock().unwrap().push(RecordedRequest {
                method,
                path: path.clone(),
                body: body.clone(),
            });

            let (status, body) = match response {
                Some(MockResponse::Fixed(status, body)) => (status, body),
                Some(MockResponse::Echo(status)) => (status, echo_object(&path, &body)),
                // Default 404 for unmatched requests
                None => (404, not_found_json("resource", &path)),
            };

            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Fill in what the API server would set on a stored object
fn echo_object(path: &str, body: &str) -> String {
    let mut object: serde_json::Value = serde_json::from_str(body).unwrap();
    let metadata = object["metadata"].as_object_mut().unwrap();

    if !metadata.contains_key("name") {
        let prefix = metadata
            .get("generateName")
            .and_then(|v| v.as_str())
            .unwrap_or("generated-")
            .to_string();
        metadata.insert("name".to_string(), format!("{}x7k2p", prefix).into());
    }

    let mut segments = path.split('/');
    if segments.any(|s| s == "namespaces") {
        if let (Some(namespace), Some(_)) = (segments.next(), segments.next()) {
            metadata.insert("namespace".to_string(), namespace.into());
        }
    }

    metadata.insert("uid".to_string(), "test-uid".into());
    metadata.insert("resourceVersion".to_string(), "1".into());
    object.to_string()
}

fn status_json(code: u16, reason: &str, message: String) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(404, "NotFound", format!("{} \"{}\" not found", resource, name))
}

/// Create a 409 conflict response for a taken name
pub fn already_exists_json(resource: &str, name: &str) -> String {
    status_json(
        409,
        "AlreadyExists",
        format!("{} \"{}\" already exists", resource, name),
    )
}

/// Create a 500 response
pub fn internal_error_json(message: &str) -> String {
    status_json(500, "InternalError", message.to_string())
}
