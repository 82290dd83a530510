//! Admin session
//!
//! Replaces the old persisted `adminAuth` flag: a session is an issued token
//! with an expiry, verified by the service on every admin request. It is passed
//! explicitly to whatever needs it instead of being read from ambient storage.

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
    #[serde(with = "time::serde::timestamp")]
    pub issued_at: OffsetDateTime,
    #[serde(with = "time::serde::timestamp")]
    pub expires_at: OffsetDateTime,
}

impl Session {
    /// Issue a fresh session with a random token
    pub fn issue(username: impl Into<String>, ttl: Duration) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            token: uuid::Uuid::new_v4().simple().to_string(),
            username: username.into(),
            issued_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_valid_at(&self, now: OffsetDateTime) -> bool {
        now < self.expires_at
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(OffsetDateTime::now_utc())
    }

    pub fn remaining(&self, now: OffsetDateTime) -> Duration {
        (self.expires_at - now).max(Duration::ZERO)
    }
}
