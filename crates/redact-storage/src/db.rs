//! Database operations

use redact_core::{RedactionJob, Session};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::models::{JobRecord, SessionRecord};
use crate::{Result, StorageError};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS sessions (
        id INTEGER PRIMARY KEY CHECK (id = 1),
        token TEXT NOT NULL,
        username TEXT NOT NULL,
        issued_at INTEGER NOT NULL,
        expires_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS jobs (
        id TEXT PRIMARY KEY,
        original_name TEXT NOT NULL,
        transmitted_name TEXT NOT NULL,
        categories TEXT NOT NULL,
        status TEXT NOT NULL,
        output_path TEXT,
        input_hash TEXT NOT NULL,
        error TEXT,
        created_at INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_jobs_created_at ON jobs (created_at)",
];

/// Main storage interface
#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    /// Open (or create) the database; `None` uses the default data path
    pub async fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = db_path.unwrap_or_else(default_db_path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        let storage = Self { pool };
        storage.migrate().await?;
        debug!("Opened storage at {}", path.display());
        Ok(storage)
    }

    async fn migrate(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Replace the stored admin session
    pub async fn save_session(&self, session: &Session) -> Result<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO sessions (id, token, username, issued_at, expires_at) \
             VALUES (1, ?, ?, ?, ?)",
        )
        .bind(&session.token)
        .bind(&session.username)
        .bind(session.issued_at.unix_timestamp())
        .bind(session.expires_at.unix_timestamp())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// The stored session, expired or not
    pub async fn current_session(&self) -> Result<Option<Session>> {
        let record = sqlx::query_as::<_, SessionRecord>(
            "SELECT token, username, issued_at, expires_at FROM sessions WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        record.map(SessionRecord::to_domain).transpose()
    }

    /// Returns whether a session was removed
    pub async fn clear_session(&self) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn record_job(&self, job: &RedactionJob) -> Result<()> {
        let categories = serde_json::to_string(&job.categories)
            .map_err(|e| StorageError::Other(e.into()))?;

        sqlx::query(
            "INSERT OR REPLACE INTO jobs \
             (id, original_name, transmitted_name, categories, status, output_path, input_hash, error, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&job.id)
        .bind(&job.original_name)
        .bind(&job.transmitted_name)
        .bind(categories)
        .bind(job.status.to_string())
        .bind(&job.output_path)
        .bind(&job.input_hash)
        .bind(&job.error)
        .bind(job.created_at.unix_timestamp())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get_job(&self, id: &str) -> Result<RedactionJob> {
        sqlx::query_as::<_, JobRecord>(&format!("{} WHERE id = ?", SELECT_JOB))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?
            .to_domain()
    }

    /// Most recent first
    pub async fn list_jobs(&self, limit: usize) -> Result<Vec<RedactionJob>> {
        let records = sqlx::query_as::<_, JobRecord>(&format!(
            "{} ORDER BY created_at DESC, rowid DESC LIMIT ?",
            SELECT_JOB
        ))
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        records.into_iter().map(JobRecord::to_domain).collect()
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

const SELECT_JOB: &str = "SELECT id, original_name, transmitted_name, categories, status, \
                          output_path, input_hash, error, created_at FROM jobs";

fn default_db_path() -> PathBuf {
    Path::new(".").join("redact.db")
}
