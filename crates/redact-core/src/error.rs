use thiserror::Error;

/// Shown when a submission is attempted without a selected document
pub const NO_FILE_MESSAGE: &str = "Please select a file to redact.";

/// Shown when a submission is attempted with every category cleared
pub const NO_CATEGORY_MESSAGE: &str = "Please select at least one category to redact.";

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Unknown redaction category: {0}")]
    UnknownCategory(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn no_file() -> Self {
        Error::Validation(NO_FILE_MESSAGE.to_string())
    }

    pub fn no_category() -> Self {
        Error::Validation(NO_CATEGORY_MESSAGE.to_string())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
