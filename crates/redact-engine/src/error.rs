use redact_client::ClientError;
use thiserror::Error;

/// Why a submission did not produce a saved file
#[derive(Error, Debug)]
pub enum SubmitError {
    /// Missing file or empty category set; nothing was sent
    #[error(transparent)]
    Validation(redact_core::Error),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Failed to save redacted file: {0}")]
    Delivery(#[from] std::io::Error),
}

impl SubmitError {
    pub fn is_validation(&self) -> bool {
        matches!(self, SubmitError::Validation(_))
    }
}
