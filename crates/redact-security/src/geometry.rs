//! Approximate boxes for findings inside OCR text lines

use redact_core::RedactionCategory;
use serde::{Deserialize, Serialize};

use crate::detector::Detector;

pub type Point = [f32; 2];

/// One recognised line: four corners clockwise from top-left, plus its text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrLine {
    pub corners: [Point; 4],
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub corners: [Point; 4],
    pub category: RedactionCategory,
}

impl Region {
    pub fn label(&self) -> String {
        self.category.marker()
    }
}

/// Estimate a box for every finding, spreading the line width evenly over its characters
pub fn locate(detector: &Detector, lines: &[OcrLine]) -> Vec<Region> {
    let mut regions = Vec::new();

    for line in lines {
        let char_len = line.text.chars().count();
        if char_len == 0 {
            continue;
        }

        let findings = detector.find_in_line(&line.text);
        if findings.is_empty() {
            continue;
        }

        let [x0, y0] = line.corners[0];
        let [x1, y1] = line.corners[2];
        let per_char = (x1 - x0) / char_len as f32;

        for finding in findings {
            let (start, end) = finding.char_span(&line.text);
            let left = x0 + start as f32 * per_char;
            let right = x0 + end as f32 * per_char;
            regions.push(Region {
                corners: [[left, y0], [right, y0], [right, y1], [left, y1]],
                category: finding.category,
            });
        }
    }

    tracing::debug!("Located {} regions in {} lines", regions.len(), lines.len());
    regions
}
