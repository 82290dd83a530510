use async_trait::async_trait;
use redact_core::{AdminUser, BlockRequest, LogEntry, LoginRequest, LoginResponse, Session};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};
use crate::USER_AGENT;

/// Admin resource operations
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn list_users(&self) -> Result<Vec<AdminUser>>;

    /// Returns the user as stored after the change
    async fn set_blocked(&self, id: u64, block: bool) -> Result<AdminUser>;

    async fn delete_user(&self, id: u64) -> Result<()>;

    async fn list_logs(&self) -> Result<Vec<LogEntry>>;
}

/// JSON client for `/api/admin/*`, authorised with a bearer token
#[derive(Debug, Clone)]
pub struct HttpAdminClient {
    client: reqwest::Client,
    base_url: String,
    session: Option<Session>,
}

impl HttpAdminClient {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session: None,
        })
    }

    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Exchange credentials for a session. Bad credentials give `Unauthorized`.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self
            .client
            .post(self.url("/api/admin/login"))
            .json(&body)
            .send()
            .await
            .map_err(ClientError::from_transport)?;

        let reply: LoginResponse = Self::json(Self::check(response)?).await?;
        debug!("Logged in as {}", reply.username);
        Ok(reply.into_session())
    }

    /// Attach the bearer token; no session means no request is sent
    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        match &self.session {
            Some(session) if session.is_valid() => Ok(request.bearer_auth(&session.token)),
            _ => Err(ClientError::Unauthorized),
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self
            .authorized(request)?
            .send()
            .await
            .map_err(|e| {
                warn!("Admin request failed: {}", e);
                ClientError::from_transport(e)
            })?;
        Self::check(response)
    }

    fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized);
        }
        if !status.is_success() {
            warn!("Admin API answered {} for {}", status, response.url());
            return Err(ClientError::from_status(status));
        }
        Ok(response)
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AdminApi for HttpAdminClient {
    async fn list_users(&self) -> Result<Vec<AdminUser>> {
        let response = self.send(self.client.get(self.url("/api/admin/users"))).await?;
        Self::json(response).await
    }

    async fn set_blocked(&self, id: u64, block: bool) -> Result<AdminUser> {
        let request = self
            .client
            .post(self.url(&format!("/api/admin/users/{}/block", id)))
            .json(&BlockRequest { block });
        let response = self.send(request).await?;
        Self::json(response).await
    }

    async fn delete_user(&self, id: u64) -> Result<()> {
        let request = self
            .client
            .delete(self.url(&format!("/api/admin/users/{}", id)));
        self.send(request).await?;
        Ok(())
    }

    async fn list_logs(&self) -> Result<Vec<LogEntry>> {
        let response = self.send(self.client.get(self.url("/api/admin/logs"))).await?;
        Self::json(response).await
    }
}
