// HTTP transport used by the connection
use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use crate::error::{Result, TransportError, UpsError};

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn new(status_code: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

// Sends one request body and hands back whatever the server answered.
// Implementations report connection-level failures as errors and return
// every HTTP response, whatever its status, as `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: &str, body: String) -> std::result::Result<HttpResponse, TransportError>;
}

pub struct HttpTransport {
    client: Client,
    timeout_ms: u64,
}

impl HttpTransport {
    pub fn new(timeout_ms: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| UpsError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, timeout_ms })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, url: &str, body: String) -> std::result::Result<HttpResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/xml")
            .body(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status_code = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        debug!(url, status_code, bytes = body.len(), "received response");

        Ok(HttpResponse { status_code, body })
    }
}

impl HttpTransport {
    fn classify(&self, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout(self.timeout_ms)
        } else {
            TransportError::Network(error.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub url: String,
    pub body: String,
}

// Transport double that replays scripted responses in order and records
// every call it receives.
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<std::result::Result<HttpResponse, TransportError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, status_code: u16, body: impl Into<Bytes>) {
        self.responses
            .lock()
            .push_back(Ok(HttpResponse::new(status_code, body)));
    }

    pub fn push_error(&self, error: TransportError) {
        self.responses.lock().push_back(Err(error));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn post(&self, url: &str, body: String) -> std::result::Result<HttpResponse, TransportError> {
        self.calls.lock().push(RecordedCall {
            url: url.to_string(),
            body,
        });
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted response".to_string())))
    }
}
