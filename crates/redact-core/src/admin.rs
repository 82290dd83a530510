//! Admin resources shared by the client and the reference service

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

use crate::{Error, Session};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub blocked: bool,
}

impl AdminUser {
    pub fn new(id: u64, name: &str, email: &str, blocked: bool) -> Self {
        Self {
            id,
            name: name.to_string(),
            email: email.to_string(),
            blocked,
        }
    }
}

/// Body of `POST /api/admin/users/{id}/block`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRequest {
    pub block: bool,
}

/// Body of `POST /api/admin/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Reply to a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    #[serde(with = "time::serde::timestamp")]
    pub expires_at: OffsetDateTime,
}

impl LoginResponse {
    /// Local session for this reply, issued now
    pub fn into_session(self) -> Session {
        Session {
            token: self.token,
            username: self.username,
            issued_at: OffsetDateTime::now_utc(),
            expires_at: self.expires_at,
        }
    }
}

impl From<&Session> for LoginResponse {
    fn from(session: &Session) -> Self {
        Self {
            token: session.token.clone(),
            username: session.username.clone(),
            expires_at: session.expires_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(Error::Validation(format!("Unknown log level: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    /// Unix seconds
    pub timestamp: i64,
    pub level: LogLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    pub message: String,
}

/// Users shown when the admin API cannot be reached
pub fn fallback_users() -> Vec<AdminUser> {
    vec![
        AdminUser::new(1, "Hridaya", "hridya@example.com", false),
        AdminUser::new(2, "Anita", "anita@example.com", true),
        AdminUser::new(3, "Ravi", "ravi@example.com", false),
    ]
}

/// Log entries shown when the admin API cannot be reached
pub fn fallback_logs() -> Vec<LogEntry> {
    let entry = |id, timestamp, level, actor: Option<&str>, message: &str| LogEntry {
        id,
        timestamp,
        level,
        actor: actor.map(String::from),
        message: message.to_string(),
    };

    vec![
        entry(1, 1_735_689_600, LogLevel::Info, Some("Hridaya"), "Redacted report.pdf (8 categories)"),
        entry(2, 1_735_693_200, LogLevel::Warn, Some("Anita"), "Login attempt while blocked"),
        entry(3, 1_735_696_800, LogLevel::Info, Some("Ravi"), "Redacted scan.png (3 categories)"),
        entry(4, 1_735_700_400, LogLevel::Error, None, "Redaction engine returned 500 for notes.docx"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_wire_shape() {
        let json = r#"{"id":7,"name":"Lee","email":"lee@example.com","blocked":true}"#;
        let user: AdminUser = serde_json::from_str(json).unwrap();
        assert_eq!(user, AdminUser::new(7, "Lee", "lee@example.com", true));
    }

    #[test]
    fn test_blocked_defaults_to_false() {
        let json = r#"{"id":7,"name":"Lee","email":"lee@example.com"}"#;
        let user: AdminUser = serde_json::from_str(json).unwrap();
        assert!(!user.blocked);
    }

    #[test]
    fn test_login_response_round_trip() {
        let session = Session::issue("admin", time::Duration::hours(1));
        let json = serde_json::to_string(&LoginResponse::from(&session)).unwrap();
        let restored: LoginResponse = serde_json::from_str(&json).unwrap();
        let local = restored.into_session();
        assert_eq!(local.token, session.token);
        assert_eq!(
            local.expires_at.unix_timestamp(),
            session.expires_at.unix_timestamp()
        );
    }

    #[test]
    fn test_fallback_users() {
        let users = fallback_users();
        assert_eq!(users.len(), 3);
        assert!(users[1].blocked);
        assert_eq!(users[0].email, "hridya@example.com");
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("debug".parse::<LogLevel>().is_err());
    }
}
