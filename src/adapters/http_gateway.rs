use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use once_cell::sync::OnceCell;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, warn};

use crate::domain::DomainError;
use crate::ports::{HttpGateway, WireResponse};

/// Global shared gateway instance.
static INSTANCE: OnceCell<Arc<ReqwestGateway>> = OnceCell::new();

/// Gateway adapter over a shared reqwest client.
pub struct ReqwestGateway {
    client: Client,
}

impl ReqwestGateway {
    /// Get the global gateway, creating it on first use.
    /// Panics if HTTP client creation fails (should not happen in practice).
    pub fn global() -> Arc<ReqwestGateway> {
        INSTANCE
            .get_or_init(|| {
                Arc::new(
                    Self::try_new().expect("Failed to create HTTP client - this should not happen"),
                )
            })
            .clone()
    }

    /// Create a standalone gateway.
    pub fn try_new() -> Result<Self, DomainError> {
        let client = Client::builder()
            .use_rustls_tls()
            .user_agent(format!("VoxRoute/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    fn bearer(request: RequestBuilder, bearer: Option<&str>) -> RequestBuilder {
        match bearer {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Turn a non-success response into a `Backend` error carrying the
    /// verbatim body text.
    async fn check(response: Response) -> Result<Response, DomainError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "Backend returned a failure status");
        Err(DomainError::Backend {
            status: status.as_u16(),
            body,
        })
    }

    fn content_type(response: &Response) -> String {
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    }
}

#[async_trait]
impl HttpGateway for ReqwestGateway {
    async fn post_multipart(
        &self,
        url: &str,
        form: Form,
        accept: Option<&str>,
    ) -> Result<WireResponse, DomainError> {
        debug!(url = url, "Submitting multipart request");
        let mut request = self.client.post(url).multipart(form);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }
        let response = Self::check(request.send().await?).await?;
        let content_type = Self::content_type(&response);
        let bytes = response.bytes().await?.to_vec();
        Ok(WireResponse::new(bytes, content_type))
    }

    async fn post_json(
        &self,
        url: &str,
        bearer: Option<&str>,
        headers: &[(&str, &str)],
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        debug!(url = url, "Submitting JSON request");
        let mut request = Self::bearer(self.client.post(url), bearer).json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }
        let response = Self::check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn get_json(
        &self,
        url: &str,
        bearer: Option<&str>,
    ) -> Result<serde_json::Value, DomainError> {
        let request = Self::bearer(self.client.get(url), bearer);
        let response = Self::check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<WireResponse, DomainError> {
        debug!(url = url, "Downloading payload");
        let response = Self::check(self.client.get(url).send().await?).await?;
        let content_type = Self::content_type(&response);

        let mut bytes = Vec::with_capacity(response.content_length().unwrap_or(0) as usize);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            bytes.extend_from_slice(&chunk?);
        }
        Ok(WireResponse::new(bytes, content_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_construction_succeeds() {
        assert!(ReqwestGateway::try_new().is_ok());
    }
}
