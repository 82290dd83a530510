//! Uploaded documents and the accepted-type list

use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Error, Result};

/// Document formats the redaction service understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
    Png,
    Jpeg,
}

impl DocumentKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" => Some(DocumentKind::Txt),
            "png" => Some(DocumentKind::Png),
            "jpg" | "jpeg" => Some(DocumentKind::Jpeg),
            _ => None,
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        extension_of(name).and_then(|ext| Self::from_extension(&ext))
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentKind::Txt => "text/plain",
            DocumentKind::Png => "image/png",
            DocumentKind::Jpeg => "image/jpeg",
        }
    }
}

/// Lowercased text after the last `.` of a file name
pub fn extension_of(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// A document chosen by the user, held until it is submitted or replaced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: String,
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let name = name.into();
        let kind = DocumentKind::from_file_name(&name)
            .ok_or_else(|| Error::UnsupportedFileType(name.clone()))?;

        Ok(Self {
            mime_type: kind.mime_type().to_string(),
            name,
            kind,
            bytes,
        })
    }

    /// Read a document from disk
    pub async fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::UnsupportedFileType(path.display().to_string()))?
            .to_string();

        // Reject by name before reading potentially large files
        if DocumentKind::from_file_name(&name).is_none() {
            return Err(Error::UnsupportedFileType(name));
        }

        let bytes = tokio::fs::read(path).await?;
        Self::new(name, bytes)
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn content_hash(&self) -> String {
        blake3::hash(&self.bytes).to_hex().to_string()
    }
}

/// Case-insensitive glob list deciding which file names may be uploaded
#[derive(Debug, Clone)]
pub struct AcceptList {
    patterns: Vec<Pattern>,
}

impl AcceptList {
    pub fn new(patterns: Vec<String>) -> Self {
        let compiled: Vec<Pattern> = patterns
            .into_iter()
            .filter_map(|p| Pattern::new(&p).ok())
            .collect();

        Self { patterns: compiled }
    }

    /// Accept only what the redaction service can process
    pub fn default_patterns() -> Vec<String> {
        ["*.pdf", "*.docx", "*.txt", "*.png", "*.jpg", "*.jpeg"]
            .iter()
            .map(|p| p.to_string())
            .collect()
    }

    /// Check a bare file name (directories are ignored)
    pub fn is_accepted(&self, name: &str) -> bool {
        let options = MatchOptions {
            case_sensitive: false,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        let file_name = Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(name);

        DocumentKind::from_file_name(file_name).is_some()
            && self
                .patterns
                .iter()
                .any(|pattern| pattern.matches_with(file_name, options))
    }
}

impl Default for AcceptList {
    fn default() -> Self {
        Self::new(Self::default_patterns())
    }
}
