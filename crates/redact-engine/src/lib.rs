//! Upload workflow for Just Redact
//!
//! `UploadForm` owns the chosen document and category set. `submit` turns
//! them into a request, sends it through a `RedactionService` and hands the
//! result to a `DownloadSink`.

pub mod delivery;
pub mod error;
pub mod form;
pub mod workflow;

pub use delivery::{DirectorySink, DownloadSink, MemorySink};
pub use error::SubmitError;
pub use form::UploadForm;
pub use workflow::Submission;
