//! Local state for the redact client
//!
//! This crate provides:
//! - The stored admin session (at most one)
//! - The history of redaction jobs
//! - Schema creation on open

pub mod db;
pub mod error;
mod models;

pub use db::Storage;
pub use error::{Result, StorageError};
