use thiserror::Error;

/// Message shown when the service cannot be reached at all
pub const UNREACHABLE_MESSAGE: &str = "Redaction failed. Is the backend server running?";

#[derive(Error, Debug)]
pub enum ClientError {
    /// Non-2xx answer; rendered the way the upload form shows it
    #[error("API Error: {status} {status_text}")]
    Http { status: u16, status_text: String },

    #[error("Redaction failed. Is the backend server running?")]
    Unreachable { reason: String },

    #[error("Admin session is missing or expired")]
    Unauthorized,

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Failed to build request: {0}")]
    Build(String),
}

impl ClientError {
    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        ClientError::Http {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("").to_string(),
        }
    }

    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ClientError::Build(err.to_string())
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Unreachable {
                reason: err.to_string(),
            }
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
