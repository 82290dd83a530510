//! Read-only activity log

use redact_client::{AdminApi, ClientError};
use redact_core::admin::fallback_logs;
use redact_core::{LogEntry, LogLevel};
use tracing::warn;

use crate::users::DataSource;

#[derive(Debug)]
pub struct LogsView {
    entries: Vec<LogEntry>,
    source: DataSource,
    level: Option<LogLevel>,
}

impl LogsView {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            source: DataSource::Remote,
            level: None,
        }
    }

    /// Only show entries at exactly this level
    pub fn with_level(mut self, level: Option<LogLevel>) -> Self {
        self.level = level;
        self
    }

    pub fn level(&self) -> Option<LogLevel> {
        self.level
    }

    pub fn set_level(&mut self, level: Option<LogLevel>) {
        self.level = level;
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    /// Fetch and sort newest first, falling back to sample entries on failure
    pub async fn load(&mut self, api: &dyn AdminApi) -> Option<ClientError> {
        let (mut entries, failure) = match api.list_logs().await {
            Ok(entries) => {
                self.source = DataSource::Remote;
                (entries, None)
            }
            Err(e) => {
                warn!("Falling back to sample logs: {}", e);
                self.source = DataSource::Fallback;
                (fallback_logs(), Some(e))
            }
        };

        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        self.entries = entries;
        failure
    }

    pub fn entries(&self) -> Vec<&LogEntry> {
        self.entries
            .iter()
            .filter(|e| self.level.is_none_or(|level| e.level == level))
            .collect()
    }
}

impl Default for LogsView {
    fn default() -> Self {
        Self::new()
    }
}
