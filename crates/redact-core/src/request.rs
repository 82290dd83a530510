//! Request sent to the redaction service

use serde::{Deserialize, Serialize};

use crate::upload::extension_of;
use crate::{CategorySelection, Error, RedactionCategory, Result, UploadedFile};

/// How the uploaded file is named on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilenamePolicy {
    /// `*.pdf` is sent as `test.pdf` and `*.docx` as `test.docx`; anything
    /// else keeps its name
    #[default]
    Placeholder,
    /// Send the original file name
    Preserve,
}

impl FilenamePolicy {
    pub fn transmitted_name(&self, original: &str) -> String {
        match self {
            FilenamePolicy::Preserve => original.to_string(),
            FilenamePolicy::Placeholder => match extension_of(original).as_deref() {
                Some("pdf") => "test.pdf".to_string(),
                Some("docx") => "test.docx".to_string(),
                _ => original.to_string(),
            },
        }
    }
}

/// A validated submission: one file plus a non-empty category set
#[derive(Debug, Clone)]
pub struct RedactionRequest {
    pub original_name: String,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
    pub categories: Vec<RedactionCategory>,
}

impl RedactionRequest {
    /// Validate the form state; fails before any network traffic
    pub fn build(
        file: Option<&UploadedFile>,
        selection: &CategorySelection,
        policy: FilenamePolicy,
    ) -> Result<Self> {
        let file = file.ok_or_else(Error::no_file)?;
        if selection.is_empty() {
            return Err(Error::no_category());
        }

        Ok(Self {
            original_name: file.name.clone(),
            file_name: policy.transmitted_name(&file.name),
            mime_type: file.mime_type.clone(),
            bytes: file.bytes.clone(),
            categories: selection.iter().collect(),
        })
    }

    /// Value of the `categories` multipart field
    pub fn categories_json(&self) -> String {
        let ids: Vec<&str> = self.categories.iter().map(|c| c.id()).collect();
        serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NO_CATEGORY_MESSAGE, NO_FILE_MESSAGE};

    #[test]
    fn test_placeholder_policy() {
        let policy = FilenamePolicy::Placeholder;
        assert_eq!(policy.transmitted_name("report.pdf"), "test.pdf");
        assert_eq!(policy.transmitted_name("notes.docx"), "test.docx");
        assert_eq!(policy.transmitted_name("Scan.PDF"), "test.pdf");
        assert_eq!(policy.transmitted_name("scan.png"), "scan.png");
        assert_eq!(policy.transmitted_name("memo.txt"), "memo.txt");
    }

    #[test]
    fn test_preserve_policy() {
        assert_eq!(
            FilenamePolicy::Preserve.transmitted_name("report.pdf"),
            "report.pdf"
        );
    }

    #[test]
    fn test_build_requires_file() {
        let err = RedactionRequest::build(
            None,
            &CategorySelection::all(),
            FilenamePolicy::default(),
        )
        .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), NO_FILE_MESSAGE);
    }

    #[test]
    fn test_build_requires_category() {
        let file = UploadedFile::new("report.pdf", vec![0x25]).unwrap();
        let err = RedactionRequest::build(
            Some(&file),
            &CategorySelection::none(),
            FilenamePolicy::default(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), NO_CATEGORY_MESSAGE);
    }

    #[test]
    fn test_build_renames_and_serializes() {
        let file = UploadedFile::new("report.pdf", vec![0x25, 0x50]).unwrap();
        let mut selection = CategorySelection::none();
        selection.toggle(RedactionCategory::Phone);
        selection.toggle(RedactionCategory::NricFin);

        let request =
            RedactionRequest::build(Some(&file), &selection, FilenamePolicy::Placeholder).unwrap();

        assert_eq!(request.original_name, "report.pdf");
        assert_eq!(request.file_name, "test.pdf");
        assert_eq!(request.mime_type, "application/pdf");
        assert_eq!(request.categories_json(), r#"["PHONE","NRIC/FIN"]"#);
    }
}
