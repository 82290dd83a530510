/// File name used when the service does not suggest one
pub const DEFAULT_FILE_NAME: &str = "REDACTED_OUTPUT.pdf";

/// Binary returned by the redaction service. The content is never inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactedArtifact {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub file_name: String,
}

impl RedactedArtifact {
    pub fn new(bytes: Vec<u8>, content_type: Option<String>, disposition: Option<&str>) -> Self {
        let file_name = disposition
            .and_then(filename_from_content_disposition)
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());

        Self {
            bytes,
            content_type,
            file_name,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Extract a safe file name from a `Content-Disposition` header value
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    let raw = header.split(';').map(str::trim).find_map(|part| {
        let (key, value) = part.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("filename")
            .then(|| value.trim().trim_matches('"').to_string())
    })?;

    // Never let the server pick a directory
    let name = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}
