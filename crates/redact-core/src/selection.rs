//! Category selection (the checkbox group of the upload form)

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::{RedactionCategory, Result};

/// Set of categories chosen for redaction.
///
/// Starts with every category selected. Iteration and serialization follow
/// catalog order regardless of the order categories were toggled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySelection {
    selected: BTreeSet<RedactionCategory>,
}

impl CategorySelection {
    pub fn all() -> Self {
        Self {
            selected: RedactionCategory::ALL.into_iter().collect(),
        }
    }

    pub fn none() -> Self {
        Self {
            selected: BTreeSet::new(),
        }
    }

    /// Build a selection from wire ids; duplicates collapse
    pub fn from_ids<I, S>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selected = ids
            .into_iter()
            .map(|id| id.as_ref().parse::<RedactionCategory>())
            .collect::<Result<BTreeSet<_>>>()?;
        Ok(Self { selected })
    }

    /// Parse the JSON array sent in the `categories` form field
    pub fn from_json(json: &str) -> Result<Self> {
        let ids: Vec<String> = serde_json::from_str(json)?;
        Self::from_ids(ids)
    }

    pub fn contains(&self, category: RedactionCategory) -> bool {
        self.selected.contains(&category)
    }

    /// Flip membership of one category
    pub fn toggle(&mut self, category: RedactionCategory) {
        if !self.selected.remove(&category) {
            self.selected.insert(category);
        }
    }

    pub fn set(&mut self, category: RedactionCategory, on: bool) {
        if on {
            self.selected.insert(category);
        } else {
            self.selected.remove(&category);
        }
    }

    pub fn is_all_selected(&self) -> bool {
        RedactionCategory::ALL.iter().all(|c| self.selected.contains(c))
    }

    /// Select-all checkbox: clears everything when all are selected,
    /// otherwise selects every category
    pub fn toggle_all(&mut self) {
        let target = !self.is_all_selected();
        for category in RedactionCategory::ALL {
            self.set(category, target);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = RedactionCategory> + '_ {
        self.selected.iter().copied()
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.iter().map(|c| c.id()).collect()
    }

    /// JSON array of ids, as sent in the `categories` form field
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.ids()).unwrap_or_else(|_| "[]".to_string())
    }
}

impl Default for CategorySelection {
    fn default() -> Self {
        Self::all()
    }
}

impl FromIterator<RedactionCategory> for CategorySelection {
    fn from_iter<T: IntoIterator<Item = RedactionCategory>>(iter: T) -> Self {
        Self {
            selected: iter.into_iter().collect(),
        }
    }
}
