use async_trait::async_trait;
use redact_core::{RedactedArtifact, RedactionRequest};
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE, HeaderName};
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};
use crate::USER_AGENT;

/// Anything that turns a validated request into a redacted document
#[async_trait]
pub trait RedactionService: Send + Sync {
    async fn redact(&self, request: &RedactionRequest) -> Result<RedactedArtifact>;
}

/// Multipart client for `POST /redact`
#[derive(Debug, Clone)]
pub struct HttpRedactionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRedactionClient {
    /// `timeout` of `None` waits for as long as the service takes
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn form(request: &RedactionRequest) -> Result<Form> {
        let part = Part::bytes(request.bytes.clone())
            .file_name(request.file_name.clone())
            .mime_str(&request.mime_type)
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Form::new()
            .part("file", part)
            .text("categories", request.categories_json()))
    }
}

#[async_trait]
impl RedactionService for HttpRedactionClient {
    async fn redact(&self, request: &RedactionRequest) -> Result<RedactedArtifact> {
        debug!(
            "Submitting {} as {} ({} bytes) to {}",
            request.original_name,
            request.file_name,
            request.bytes.len(),
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(Self::form(request)?)
            .send()
            .await
            .map_err(|e| {
                warn!("Redaction request failed: {}", e);
                ClientError::from_transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Redaction service answered {}", status);
            return Err(ClientError::from_status(status));
        }

        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string())
        };
        let content_type = header(CONTENT_TYPE);
        let disposition = header(CONTENT_DISPOSITION);

        let bytes = response
            .bytes()
            .await
            .map_err(ClientError::from_transport)?;

        Ok(RedactedArtifact::new(
            bytes.to_vec(),
            content_type,
            disposition.as_deref(),
        ))
    }
}
