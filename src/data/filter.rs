//! Record Filter Module
//! Position range, state set and keyword substring filters.

use crate::data::record::SerpRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Lowest selectable position.
pub const MIN_POSITION: i64 = 1;
/// Highest selectable position.
pub const MAX_POSITION: i64 = 10;
/// Default inclusive position range.
pub const DEFAULT_POSITION_RANGE: (i64, i64) = (1, 4);

/// Filter settings applied to the loaded records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterParams {
    /// Inclusive `[lo, hi]` position range.
    pub position_range: (i64, i64),
    /// Allowed states. `None` keeps every state.
    pub states: Option<BTreeSet<String>>,
    /// Case-insensitive keyword substring.
    pub keyword: Option<String>,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            position_range: DEFAULT_POSITION_RANGE,
            states: None,
            keyword: None,
        }
    }
}

impl FilterParams {
    pub fn with_position_range(mut self, lo: i64, hi: i64) -> Self {
        self.position_range = (lo, hi);
        self
    }

    pub fn with_states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.states = Some(states.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    fn in_position_range(&self, record: &SerpRecord) -> bool {
        let (lo, hi) = self.position_range;
        record.position.is_some_and(|p| lo <= p && p <= hi)
    }

    fn in_states(&self, record: &SerpRecord) -> bool {
        self.states
            .as_ref()
            .map_or(true, |states| states.contains(&record.state))
    }

    /// Normalized keyword needle; blank means no keyword filter.
    fn keyword_needle(&self) -> Option<String> {
        self.keyword
            .as_deref()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
    }

    /// Apply all three filters. The input is never modified.
    pub fn apply<'a, I>(&self, records: I) -> Vec<&'a SerpRecord>
    where
        I: IntoIterator<Item = &'a SerpRecord>,
    {
        let needle = self.keyword_needle();
        let filtered: Vec<&SerpRecord> = records
            .into_iter()
            .filter(|r| self.in_position_range(r))
            .filter(|r| self.in_states(r))
            .filter(|r| match &needle {
                Some(needle) => r.keyword.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .collect();

        tracing::debug!(kept = filtered.len(), "Filter applied");
        filtered
    }

    /// States offered for selection: distinct states of records inside the position range.
    pub fn available_states<'a, I>(&self, records: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a SerpRecord>,
    {
        records
            .into_iter()
            .filter(|r| self.in_position_range(r))
            .map(|r| r.state.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Clamp a range into the selectable positions and put the bounds in order.
pub fn normalize_range(lo: i64, hi: i64) -> (i64, i64) {
    let lo = lo.clamp(MIN_POSITION, MAX_POSITION);
    let hi = hi.clamp(MIN_POSITION, MAX_POSITION);
    if lo <= hi {
        (lo, hi)
    } else {
        (hi, lo)
    }
}
