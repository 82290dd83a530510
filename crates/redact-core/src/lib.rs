//! Core domain models for Just Redact
//!
//! This crate contains:
//! - The redaction category catalog and selection set
//! - Uploaded documents and the request sent to the redaction service
//! - Admin resources (users, logs) and the admin session
//! - The route table used by the session guard

pub mod admin;
pub mod artifact;
pub mod category;
pub mod error;
pub mod job;
pub mod request;
pub mod route;
pub mod selection;
pub mod session;
pub mod upload;

pub use admin::{AdminUser, BlockRequest, LogEntry, LogLevel, LoginRequest, LoginResponse};
pub use artifact::RedactedArtifact;
pub use category::RedactionCategory;
pub use error::{Error, Result};
pub use job::{JobStatus, RedactionJob};
pub use request::{FilenamePolicy, RedactionRequest};
pub use route::{Navigation, Route};
pub use selection::CategorySelection;
pub use session::Session;
pub use upload::{AcceptList, DocumentKind, UploadedFile};
