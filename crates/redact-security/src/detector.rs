//! Per-line detection of sensitive spans

use lazy_static::lazy_static;
use redact_core::{CategorySelection, RedactionCategory};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::rules::{PERSON_BLOCK_LIST, Rule, pattern_rules};

lazy_static! {
    static ref PERSON_LABEL: Regex = Regex::new(
        r"(?i)\b(?:patient(?:'s)? name|patient|doctor(?:'s)? name|doctor|name)\s*:"
    )
    .unwrap();
    static ref NEXT_LABEL: Regex = Regex::new(r"\s+[A-Za-z][A-Za-z.']*\s*:").unwrap();
}

/// A sensitive span inside one line; `start`/`end` are byte offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub category: RedactionCategory,
    pub start: usize,
    pub end: usize,
}

impl Finding {
    /// Span in characters, for geometry on OCR text
    pub fn char_span(&self, line: &str) -> (usize, usize) {
        let start = line[..self.start].chars().count();
        let len = line[self.start..self.end].chars().count();
        (start, start + len)
    }

    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        &line[self.start..self.end]
    }
}

/// Runs the selected rules over single lines of text
pub struct Detector {
    selection: CategorySelection,
    rules: Vec<Rule>,
}

impl Detector {
    pub fn new(selection: CategorySelection) -> Self {
        let rules = pattern_rules()
            .into_iter()
            .filter(|rule| selection.contains(rule.category))
            .collect();
        Self { selection, rules }
    }

    pub fn selection(&self) -> &CategorySelection {
        &self.selection
    }

    /// All findings in a line, in rule order. Spans may overlap.
    pub fn find_in_line(&self, line: &str) -> Vec<Finding> {
        let mut findings = Vec::new();
        // ASCII lowering keeps byte offsets aligned with `line`
        let lower = line.to_ascii_lowercase();

        if self.selection.contains(RedactionCategory::Address) {
            findings.extend(address_span(line, &lower));
        }

        if self.selection.contains(RedactionCategory::Person) && !line.contains('@') {
            findings.extend(person_span(line));
        }

        for rule in &self.rules {
            if !rule.context.is_satisfied(&lower) {
                continue;
            }
            findings.extend(rule.pattern.find_iter(line).map(|m| Finding {
                category: rule.category,
                start: m.start(),
                end: m.end(),
            }));
        }

        findings
    }
}

fn address_span(line: &str, lower: &str) -> Option<Finding> {
    if !lower.contains("address:") {
        return None;
    }
    let colon = lower.find(':')?;
    trimmed_span(line, colon + 1, line.len()).map(|(start, end)| Finding {
        category: RedactionCategory::Address,
        start,
        end,
    })
}

fn person_span(line: &str) -> Option<Finding> {
    let label = PERSON_LABEL.find(line)?;
    let rest = &line[label.end()..];
    let value_end = NEXT_LABEL
        .find(rest)
        .map(|m| label.end() + m.start())
        .unwrap_or(line.len());

    let (start, end) = trimmed_span(line, label.end(), value_end)?;
    let value = line[start..end].to_lowercase();
    if PERSON_BLOCK_LIST.contains(&value.as_str()) {
        return None;
    }

    Some(Finding {
        category: RedactionCategory::Person,
        start,
        end,
    })
}

/// Shrink `line[start..end]` past surrounding whitespace; `None` if nothing is left
fn trimmed_span(line: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    let slice = &line[start..end];
    let leading = slice.len() - slice.trim_start().len();
    let trailing = slice.len() - slice.trim_end().len();
    let (start, end) = (start + leading, end - trailing);
    (start < end).then_some((start, end))
}
