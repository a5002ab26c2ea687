//! Shared test doubles: an event collector and a scripted HTTP gateway.

use std::collections::VecDeque;
use std::path::PathBuf;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::multipart::Form;

use crate::domain::DomainError;
use crate::ports::{EventSink, HttpGateway, JobEvent, WireResponse};

/// Event sink that records everything it receives.
#[derive(Default)]
pub struct CollectingSink {
    events: Mutex<Vec<JobEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<JobEvent> {
        self.events.lock().clone()
    }

    pub fn done_paths(&self) -> Vec<PathBuf> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                JobEvent::Done(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                JobEvent::Error(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn last_progress(&self) -> Option<u8> {
        self.events()
            .into_iter()
            .rev()
            .find_map(|e| match e {
                JobEvent::Progress(p) => Some(p),
                _ => None,
            })
    }
}

impl EventSink for CollectingSink {
    fn emit(&self, event: JobEvent) {
        self.events.lock().push(event);
    }
}

/// Gateway double with scripted responses.
///
/// JSON responses are consumed front-to-back across `post_json` and
/// `get_json`; requested URLs and posted JSON bodies are recorded so tests
/// can assert on the wire shape.
#[derive(Default)]
pub struct MockGateway {
    pub multipart_response: Mutex<Option<Result<WireResponse, DomainError>>>,
    pub json_responses: Mutex<VecDeque<serde_json::Value>>,
    pub bytes_response: Mutex<Option<Result<WireResponse, DomainError>>>,
    pub urls: Mutex<Vec<String>>,
    pub json_bodies: Mutex<Vec<serde_json::Value>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_multipart(&self, response: Result<WireResponse, DomainError>) {
        *self.multipart_response.lock() = Some(response);
    }

    pub fn script_json(&self, response: serde_json::Value) {
        self.json_responses.lock().push_back(response);
    }

    pub fn script_bytes(&self, response: Result<WireResponse, DomainError>) {
        *self.bytes_response.lock() = Some(response);
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.urls.lock().clone()
    }

    fn next_json(&self) -> Result<serde_json::Value, DomainError> {
        self.json_responses
            .lock()
            .pop_front()
            .ok_or_else(|| DomainError::Transport("no scripted JSON response".to_string()))
    }
}

#[async_trait]
impl HttpGateway for MockGateway {
    async fn post_multipart(
        &self,
        url: &str,
        _form: Form,
        _accept: Option<&str>,
    ) -> Result<WireResponse, DomainError> {
        self.urls.lock().push(url.to_string());
        self.multipart_response
            .lock()
            .take()
            .unwrap_or_else(|| Err(DomainError::Transport("no scripted response".to_string())))
    }

    async fn post_json(
        &self,
        url: &str,
        _bearer: Option<&str>,
        _headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        self.urls.lock().push(url.to_string());
        self.json_bodies.lock().push(body.clone());
        self.next_json()
    }

    async fn get_json(
        &self,
        url: &str,
        _bearer: Option<&str>,
    ) -> Result<serde_json::Value, DomainError> {
        self.urls.lock().push(url.to_string());
        self.next_json()
    }

    async fn fetch_bytes(&self, url: &str) -> Result<WireResponse, DomainError> {
        self.urls.lock().push(url.to_string());
        self.bytes_response
            .lock()
            .take()
            .unwrap_or_else(|| Err(DomainError::Transport("no scripted payload".to_string())))
    }
}
