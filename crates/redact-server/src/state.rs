//! In-memory admin data shared by all handlers

use redact_config::ServerConfig;
use redact_core::admin::{fallback_logs, fallback_users};
use redact_core::{AdminUser, LogEntry, LogLevel, Session};
use std::collections::HashMap;
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;

use crate::auth::Credentials;

/// Longest session the server will issue
pub const MAX_SESSION_TTL: Duration = Duration::days(366);

#[derive(Debug, Default)]
pub struct AdminData {
    pub users: Vec<AdminUser>,
    pub logs: Vec<LogEntry>,
    pub sessions: HashMap<String, Session>,
}

impl AdminData {
    /// Seeded with the same users and logs the dashboard falls back to
    pub fn seeded() -> Self {
        Self {
            users: fallback_users(),
            logs: fallback_logs(),
            sessions: HashMap::new(),
        }
    }

    pub fn push_log(&mut self, level: LogLevel, actor: Option<&str>, message: impl Into<String>) {
        let id = self.logs.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        self.logs.push(LogEntry {
            id,
            timestamp: OffsetDateTime::now_utc().unix_timestamp(),
            level,
            actor: actor.map(String::from),
            message: message.into(),
        });
    }

    /// Store a new session, pruning every expired one
    pub fn start_session(&mut self, session: Session, now: OffsetDateTime) {
        self.sessions.retain(|_, s| s.is_valid_at(now));
        self.sessions.insert(session.token.clone(), session);
    }

    /// Username for a live token; expired sessions are dropped
    pub fn authenticate(&mut self, token: &str, now: OffsetDateTime) -> Option<String> {
        let session = self.sessions.get(token)?;
        if session.is_valid_at(now) {
            return Some(session.username.clone());
        }
        self.sessions.remove(token);
        None
    }
}

#[derive(Clone)]
pub struct AppState {
    pub data: Arc<RwLock<AdminData>>,
    pub credentials: Arc<Credentials>,
    pub session_ttl: Duration,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_data(config, AdminData::seeded())
    }

    pub fn with_data(config: &ServerConfig, data: AdminData) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
            credentials: Arc::new(Credentials::from_config(config)),
            session_ttl: i64::try_from(config.session_ttl_secs)
                .map(Duration::seconds)
                .unwrap_or(MAX_SESSION_TTL)
                .min(MAX_SESSION_TTL),
        }
    }
}
