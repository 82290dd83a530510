//! Text redaction built on the line detector

use redact_core::{CategorySelection, RedactionCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::detector::{Detector, Finding};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionInfo {
    pub artifact_id: String,
    pub redaction_type: String,
    pub count: usize,
}

/// Replaces every detected span with its `<LABEL>` marker
pub struct TextRedactor {
    detector: Detector,
}

impl TextRedactor {
    pub fn new(selection: CategorySelection) -> Self {
        Self {
            detector: Detector::new(selection),
        }
    }

    /// Redact line by line. Line breaks are preserved as-is.
    pub fn redact(&self, artifact_id: &str, content: &str) -> (String, Vec<RedactionInfo>) {
        let mut counts: BTreeMap<RedactionCategory, usize> = BTreeMap::new();
        let mut lines = Vec::new();

        for line in content.split('\n') {
            let spans = merge_spans(self.detector.find_in_line(line));
            for span in &spans {
                *counts.entry(span.category).or_default() += 1;
            }
            lines.push(replace_spans(line, &spans));
        }

        let redactions = counts
            .into_iter()
            .map(|(category, count)| RedactionInfo {
                artifact_id: artifact_id.to_string(),
                redaction_type: category.id().to_string(),
                count,
            })
            .collect();

        (lines.join("\n"), redactions)
    }
}

/// Merge overlapping spans; the earliest start keeps its category
pub fn merge_spans(mut findings: Vec<Finding>) -> Vec<Finding> {
    findings.sort_by_key(|f| f.start);

    let mut merged: Vec<Finding> = Vec::with_capacity(findings.len());
    for finding in findings {
        match merged.last_mut() {
            Some(last) if finding.start < last.end => {
                last.end = last.end.max(finding.end);
            }
            _ => merged.push(finding),
        }
    }
    merged
}

fn replace_spans(line: &str, spans: &[Finding]) -> String {
    let mut out = String::with_capacity(line.len());
    let mut cursor = 0;
    for span in spans {
        out.push_str(&line[cursor..span.start]);
        out.push_str(&span.category.marker());
        cursor = span.end;
    }
    out.push_str(&line[cursor..]);
    out
}
