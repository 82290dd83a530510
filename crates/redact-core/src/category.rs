//! Redaction category catalog

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A class of sensitive information the redaction service can obscure.
///
/// The declaration order is the display order of the catalog, and `Ord`
/// follows it so selections always serialize in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RedactionCategory {
    Person,
    Address,
    Date,
    Phone,
    Email,
    NricFin,
    McrNo,
    IdNumber,
}

impl RedactionCategory {
    /// The full catalog, in display order
    pub const ALL: [RedactionCategory; 8] = [
        RedactionCategory::Person,
        RedactionCategory::Address,
        RedactionCategory::Date,
        RedactionCategory::Phone,
        RedactionCategory::Email,
        RedactionCategory::NricFin,
        RedactionCategory::McrNo,
        RedactionCategory::IdNumber,
    ];

    /// Wire identifier understood by the redaction service
    pub fn id(&self) -> &'static str {
        match self {
            RedactionCategory::Person => "PERSON",
            RedactionCategory::Address => "ADDRESS",
            RedactionCategory::Date => "DATE",
            RedactionCategory::Phone => "PHONE",
            RedactionCategory::Email => "EMAIL",
            RedactionCategory::NricFin => "NRIC/FIN",
            RedactionCategory::McrNo => "MCR no.",
            RedactionCategory::IdNumber => "ID_NUMBER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RedactionCategory::Person => "Names",
            RedactionCategory::Address => "Addresses (Org, Location, GPE)",
            RedactionCategory::Date => "Dates of Birth (DOB)",
            RedactionCategory::Phone => "Phone Numbers",
            RedactionCategory::Email => "Email Addresses",
            RedactionCategory::NricFin => "NRIC/FIN Numbers",
            RedactionCategory::McrNo => "MCR Numbers",
            RedactionCategory::IdNumber => "Other IDs (Med. Number, IHI)",
        }
    }

    /// Marker written in place of redacted text, e.g. `<PHONE>`
    pub fn marker(&self) -> String {
        format!("<{}>", self.id())
    }
}

impl fmt::Display for RedactionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for RedactionCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        RedactionCategory::ALL
            .into_iter()
            .find(|c| c.id() == trimmed)
            .ok_or_else(|| Error::UnknownCategory(trimmed.to_string()))
    }
}

impl Serialize for RedactionCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for RedactionCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        id.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip_through_from_str() {
        for category in RedactionCategory::ALL {
            assert_eq!(category.id().parse::<RedactionCategory>().unwrap(), category);
        }
    }

    #[test]
    fn test_unknown_id_rejected() {
        let err = "SSN".parse::<RedactionCategory>().unwrap_err();
        assert!(matches!(err, Error::UnknownCategory(id) if id == "SSN"));
    }

    #[test]
    fn test_ids_with_punctuation() {
        assert_eq!("NRIC/FIN".parse::<RedactionCategory>().unwrap(), RedactionCategory::NricFin);
        assert_eq!("MCR no.".parse::<RedactionCategory>().unwrap(), RedactionCategory::McrNo);
    }

    #[test]
    fn test_serde_uses_wire_id() {
        let json = serde_json::to_string(&RedactionCategory::McrNo).unwrap();
        assert_eq!(json, "\"MCR no.\"");

        let parsed: RedactionCategory = serde_json::from_str("\"ID_NUMBER\"").unwrap();
        assert_eq!(parsed, RedactionCategory::IdNumber);
    }

    #[test]
    fn test_marker() {
        assert_eq!(RedactionCategory::Phone.marker(), "<PHONE>");
    }
}
