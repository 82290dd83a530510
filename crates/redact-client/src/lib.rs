//! HTTP clients for the redaction service and its admin API

pub mod admin;
pub mod error;
pub mod redaction;

pub use admin::{AdminApi, HttpAdminClient};
pub use error::{ClientError, Result, UNREACHABLE_MESSAGE};
pub use redaction::{HttpRedactionClient, RedactionService};

pub(crate) const USER_AGENT: &str = concat!("redact/", env!("CARGO_PKG_VERSION"));
