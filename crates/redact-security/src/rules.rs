//! Pattern rules and the context each one needs before it may fire

use lazy_static::lazy_static;
use redact_core::RedactionCategory;
use regex::Regex;

lazy_static! {
    static ref NRIC_FIN: Regex = Regex::new(r"(?i)\b[STFGM]\d{7}[A-Z]\b").unwrap();
    static ref MCR_NO: Regex = Regex::new(r"\b\d{6}\b").unwrap();
    static ref EMAIL: Regex =
        Regex::new(r"(?i)\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b").unwrap();
    static ref PHONE: Regex =
        Regex::new(r"(\b[689]\d{3}[\s-]?\d{4}\b)|(\+[\d\s\-()]{7,17}\d\b)").unwrap();
    static ref DATE: Regex = Regex::new(r"\b\d{1,2}[./-]\d{1,2}[./-]\d{2,4}\b").unwrap();
    static ref ID_NUMBER: Regex = Regex::new(
        r"(?i)\b(?:[A-Z]{2}\d{6}|\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{3,4})\b"
    )
    .unwrap();
    static ref NRIC_CONTEXT: Regex = Regex::new(r"\b(nric|fin|passport)\b").unwrap();
    static ref DATE_CONTEXT: Regex = Regex::new(r"\b(birth|dob)\b").unwrap();
    static ref ID_CONTEXT: Regex = Regex::new(r"\b(med\. number|ihi|id)\b").unwrap();
}

/// Words that never count as a person's name on their own
pub const PERSON_BLOCK_LIST: &[&str] = &[
    "patient", "patient's", "doctor", "doctor's", "medical", "report", "particulars", "name",
    "age", "mcr", "nric", "fin", "passport", "hospital", "clinic", "visit", "date", "birth",
];

/// Context a rule requires in the (ASCII-lowercased) line
#[derive(Debug, Clone, Copy)]
pub enum Context {
    Always,
    Contains(&'static str),
    Matches(&'static Regex),
}

impl Context {
    pub fn is_satisfied(&self, lower_line: &str) -> bool {
        match self {
            Context::Always => true,
            Context::Contains(needle) => lower_line.contains(needle),
            Context::Matches(re) => re.is_match(lower_line),
        }
    }
}

pub struct Rule {
    pub category: RedactionCategory,
    pub pattern: &'static Regex,
    pub context: Context,
}

/// Pattern rules in evaluation order
pub fn pattern_rules() -> Vec<Rule> {
    vec![
        Rule {
            category: RedactionCategory::NricFin,
            pattern: &NRIC_FIN,
            context: Context::Matches(&NRIC_CONTEXT),
        },
        Rule {
            category: RedactionCategory::McrNo,
            pattern: &MCR_NO,
            context: Context::Contains("mcr"),
        },
        Rule {
            category: RedactionCategory::Email,
            pattern: &EMAIL,
            context: Context::Always,
        },
        Rule {
            category: RedactionCategory::Phone,
            pattern: &PHONE,
            context: Context::Always,
        },
        Rule {
            category: RedactionCategory::Date,
            pattern: &DATE,
            context: Context::Matches(&DATE_CONTEXT),
        },
        Rule {
            category: RedactionCategory::IdNumber,
            pattern: &ID_NUMBER,
            context: Context::Matches(&ID_CONTEXT),
        },
    ]
}
