use async_trait::async_trait;
use reqwest::multipart::Form;

use crate::domain::DomainError;

/// A backend response body with its declared content type.
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl WireResponse {
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
        }
    }
}

/// HTTP gateway port. All network traffic goes through this interface.
///
/// Implementations map connection-level failures to `Transport` and
/// non-success statuses to `Backend { status, body }` with the verbatim
/// response body, which is the only diagnostic a remote service gives us.
#[async_trait]
pub trait HttpGateway: Send + Sync {
    /// POST a multipart form and return the raw body plus content type.
    async fn post_multipart(
        &self,
        url: &str,
        form: Form,
        accept: Option<&str>,
    ) -> Result<WireResponse, DomainError>;

    /// POST a JSON body with optional bearer auth and extra headers.
    async fn post_json(
        &self,
        url: &str,
        bearer: Option<&str>,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError>;

    /// GET a JSON document with optional bearer auth.
    async fn get_json(
        &self,
        url: &str,
        bearer: Option<&str>,
    ) -> Result<serde_json::Value, DomainError>;

    /// GET a binary payload, streaming it into memory.
    async fn fetch_bytes(&self, url: &str) -> Result<WireResponse, DomainError>;
}
