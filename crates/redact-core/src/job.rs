//! Local record of a submission

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

use crate::{Error, RedactionCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Succeeded,
    Failed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Succeeded => f.write_str("succeeded"),
            JobStatus::Failed => f.write_str("failed"),
        }
    }
}

impl FromStr for JobStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "succeeded" => Ok(JobStatus::Succeeded),
            "failed" => Ok(JobStatus::Failed),
            other => Err(Error::Validation(format!("Unknown job status: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionJob {
    pub id: String,
    pub original_name: String,
    pub transmitted_name: String,
    pub categories: Vec<RedactionCategory>,
    pub status: JobStatus,
    pub output_path: Option<String>,
    pub input_hash: String,
    pub error: Option<String>,
    #[serde(with = "time::serde::timestamp")]
    pub created_at: OffsetDateTime,
}

impl RedactionJob {
    pub fn new(
        original_name: String,
        transmitted_name: String,
        categories: Vec<RedactionCategory>,
        input_hash: String,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            original_name,
            transmitted_name,
            categories,
            status: JobStatus::Failed,
            output_path: None,
            input_hash,
            error: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn succeeded(mut self, output_path: String) -> Self {
        self.status = JobStatus::Succeeded;
        self.output_path = Some(output_path);
        self.error = None;
        self
    }

    pub fn failed(mut self, error: String) -> Self {
        self.status = JobStatus::Failed;
        self.error = Some(error);
        self
    }
}
