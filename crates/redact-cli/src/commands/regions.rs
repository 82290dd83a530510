use anyhow::{Context, Result};
use redact_core::CategorySelection;
use redact_security::{Detector, OcrLine, Region, locate};
use std::path::Path;

use super::file::selection_from;

/// Print the boxes to black out for OCR lines stored as JSON
pub fn handle(path: &Path, categories: &[String], exclude: &[String]) -> Result<()> {
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let selection = selection_from(categories, exclude)?;

    let regions = regions_for(&input, selection)?;
    println!("{}", serde_json::to_string_pretty(&regions)?);
    Ok(())
}

/// `input` is a JSON array of `{ "corners": [[x, y]; 4], "text": "..." }`
pub fn regions_for(input: &str, selection: CategorySelection) -> Result<Vec<Region>> {
    let lines: Vec<OcrLine> =
        serde_json::from_str(input).context("Expected a JSON array of OCR lines")?;
    Ok(locate(&Detector::new(selection), &lines))
}
