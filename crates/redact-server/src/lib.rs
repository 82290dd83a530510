//! Reference redaction service
//!
//! Serves `POST /redact` for plain-text documents plus the admin API
//! (`/api/admin/*`) backed by in-memory users, logs and sessions.

pub mod auth;
pub mod server;
pub mod state;

pub use auth::{Credentials, hash_password};
pub use server::{router, serve, spawn};
pub use state::{AdminData, AppState};
