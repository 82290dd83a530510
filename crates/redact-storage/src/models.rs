//! Row types and their conversion to domain models

use anyhow::anyhow;
use redact_core::{RedactionCategory, RedactionJob, Session};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::{Result, StorageError};

#[derive(FromRow)]
pub(crate) struct SessionRecord {
    pub token: String,
    pub username: String,
    pub issued_at: i64,
    pub expires_at: i64,
}

impl SessionRecord {
    pub fn to_domain(self) -> Result<Session> {
        Ok(Session {
            token: self.token,
            username: self.username,
            issued_at: timestamp(self.issued_at)?,
            expires_at: timestamp(self.expires_at)?,
        })
    }
}

#[derive(FromRow)]
pub(crate) struct JobRecord {
    pub id: String,
    pub original_name: String,
    pub transmitted_name: String,
    pub categories: String,
    pub status: String,
    pub output_path: Option<String>,
    pub input_hash: String,
    pub error: Option<String>,
    pub created_at: i64,
}

impl JobRecord {
    pub fn to_domain(self) -> Result<RedactionJob> {
        let categories: Vec<RedactionCategory> = serde_json::from_str(&self.categories)
            .map_err(|e| StorageError::Other(anyhow!("Corrupt categories for job {}: {}", self.id, e)))?;
        let status = self
            .status
            .parse()
            .map_err(|e| StorageError::Other(anyhow!("Corrupt status for job {}: {}", self.id, e)))?;

        Ok(RedactionJob {
            id: self.id,
            original_name: self.original_name,
            transmitted_name: self.transmitted_name,
            categories,
            status,
            output_path: self.output_path,
            input_hash: self.input_hash,
            error: self.error,
            created_at: timestamp(self.created_at)?,
        })
    }
}

fn timestamp(secs: i64) -> Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(secs)
        .map_err(|e| StorageError::Other(anyhow!("Invalid timestamp {}: {}", secs, e)))
}
