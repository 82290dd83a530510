//! Sensitive-data detection and text redaction
//!
//! Rules run per line. Each pattern may require context words elsewhere on the
//! same line before it fires; addresses and person names come from labelled
//! fields (`Address:`, `Name:`).

pub mod detector;
pub mod geometry;
pub mod redactor;
pub mod rules;

pub use detector::{Detector, Finding};
pub use geometry::{OcrLine, Region, locate};
pub use redactor::{RedactionInfo, TextRedactor, merge_spans};
