//! SERP Record Module
//! Fixed record schema for one classified search result.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// State used when the `state` field is missing.
pub const UNKNOWN_STATE: &str = "Unknown";

/// Positions above this rank carry no visibility weight.
pub const MAX_WEIGHTED_POSITION: i64 = 10;

/// Brand classification of a search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Classification {
    Real,
    Sweeps,
    Both,
    Other,
}

impl Classification {
    /// All classifications in legend order.
    pub const ALL: [Classification; 4] = [
        Classification::Real,
        Classification::Sweeps,
        Classification::Both,
        Classification::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Real => "Real",
            Classification::Sweeps => "Sweeps",
            Classification::Both => "Both",
            Classification::Other => "Other",
        }
    }

    /// Parse a CSV label. Missing or unrecognized labels fall back to `Other`.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            Some("Real") => Classification::Real,
            Some("Sweeps") => Classification::Sweeps,
            Some("Both") => Classification::Both,
            Some("Other") | Some("") | None => Classification::Other,
            Some(other) => {
                tracing::debug!(label = other, "Unrecognized classification, using Other");
                Classification::Other
            }
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visibility weight for a ranking position: 10 for rank 1 down to 1 for rank 10.
pub fn position_weight(position: Option<i64>) -> u32 {
    match position {
        Some(p) if (1..=MAX_WEIGHTED_POSITION).contains(&p) => (MAX_WEIGHTED_POSITION + 1 - p) as u32,
        _ => 0,
    }
}

/// One row of the classification CSV with defaults applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerpRecord {
    pub state: String,
    pub keyword: String,
    pub position: Option<i64>,
    pub classification: Classification,
    pub url: String,
    pub real_brands: String,
    pub sweeps_brands: String,
    pub position_weight: u32,
}

impl SerpRecord {
    /// Build a record, deriving `position_weight` from `position`.
    pub fn new(
        state: impl Into<String>,
        keyword: impl Into<String>,
        position: Option<i64>,
        classification: Classification,
    ) -> Self {
        Self {
            state: state.into(),
            keyword: keyword.into(),
            position,
            classification,
            url: String::new(),
            real_brands: String::new(),
            sweeps_brands: String::new(),
            position_weight: position_weight(position),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_brands(mut self, real: impl Into<String>, sweeps: impl Into<String>) -> Self {
        self.real_brands = real.into();
        self.sweeps_brands = sweeps.into();
        self
    }
}

/// Immutable set of records loaded from one file.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<SerpRecord>,
    source: Option<PathBuf>,
}

impl RecordSet {
    pub fn new(records: Vec<SerpRecord>) -> Self {
        Self {
            records,
            source: None,
        }
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    pub fn records(&self) -> &[SerpRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Sorted distinct states.
    pub fn states(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.state.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_decays_linearly_over_top_ten() {
        for p in 1..=10 {
            assert_eq!(position_weight(Some(p)), (11 - p) as u32);
        }
    }

    #[test]
    fn weight_is_zero_outside_top_ten_or_missing() {
        assert_eq!(position_weight(Some(0)), 0);
        assert_eq!(position_weight(Some(-3)), 0);
        assert_eq!(position_weight(Some(11)), 0);
        assert_eq!(position_weight(Some(42)), 0);
        assert_eq!(position_weight(None), 0);
    }

    #[test]
    fn classification_defaults_to_other() {
        assert_eq!(Classification::from_label(None), Classification::Other);
        assert_eq!(Classification::from_label(Some("")), Classification::Other);
        assert_eq!(Classification::from_label(Some("Casino")), Classification::Other);
        assert_eq!(Classification::from_label(Some("Sweeps")), Classification::Sweeps);
        assert_eq!(Classification::from_label(Some(" Real ")), Classification::Real);
    }

    #[test]
    fn record_set_states_are_sorted_and_distinct() {
        let set = RecordSet::new(vec![
            SerpRecord::new("TX", "a", Some(1), Classification::Real),
            SerpRecord::new("CA", "b", Some(2), Classification::Other),
            SerpRecord::new("TX", "c", Some(3), Classification::Both),
        ]);
        assert_eq!(set.states(), vec!["CA".to_string(), "TX".to_string()]);
    }
}
