//! Aggregator Module
//! The four dashboard views: state share, brand leaderboards, keyword share and the raw table.

use crate::data::{Classification, SerpRecord};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Number of brands kept per leaderboard.
pub const TOP_BRANDS: usize = 25;

/// Keyword share sums above this value raise the rounding warning.
pub const ROUNDING_WARNING_THRESHOLD: f64 = 100.1;

/// Separator between brand names in the brand columns.
pub const BRAND_SEPARATOR: &str = ", ";

/// Value aggregated by the overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Metric {
    #[default]
    RawCount,
    PositionWeighted,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::RawCount, Metric::PositionWeighted];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::RawCount => "Raw Count",
            Metric::PositionWeighted => "Position-Weighted Share",
        }
    }
}

/// Dashboard view selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    Overview,
    BrandBreakdown,
    KeywordDetail,
    SerpTable,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [
        ViewMode::Overview,
        ViewMode::BrandBreakdown,
        ViewMode::KeywordDetail,
        ViewMode::SerpTable,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Overview => "Overview",
            ViewMode::BrandBreakdown => "Brand Breakdown",
            ViewMode::KeywordDetail => "Keyword Detail",
            ViewMode::SerpTable => "SERP Table",
        }
    }
}

/// Round a percentage to one decimal, ties to even.
pub fn round_share(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// `part / total * 100` rounded; zero when the total is zero.
pub fn share_of(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        round_share(part as f64 / total as f64 * 100.0)
    }
}

fn by_share_desc(
    a_share: f64,
    a_class: Classification,
    b_share: f64,
    b_class: Classification,
) -> Ordering {
    b_share
        .partial_cmp(&a_share)
        .unwrap_or(Ordering::Equal)
        .then(a_class.cmp(&b_class))
}

// ===== Overview =====

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateShareRow {
    pub state: String,
    pub classification: Classification,
    /// Record count or summed position weight, depending on the metric.
    pub value: u64,
    pub total: u64,
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateShare {
    pub metric: Metric,
    pub rows: Vec<StateShareRow>,
}

impl StateShare {
    /// States in chart order.
    pub fn states(&self) -> Vec<String> {
        let mut states: Vec<String> = self.rows.iter().map(|r| r.state.clone()).collect();
        states.dedup();
        states
    }

    pub fn share(&self, state: &str, classification: Classification) -> Option<f64> {
        self.rows
            .iter()
            .find(|r| r.state == state && r.classification == classification)
            .map(|r| r.share)
    }
}

/// Share of each classification within each state.
pub fn state_share(records: &[&SerpRecord], metric: Metric) -> StateShare {
    let mut groups: BTreeMap<(String, Classification), u64> = BTreeMap::new();
    for record in records {
        let value = match metric {
            Metric::RawCount => 1,
            Metric::PositionWeighted => u64::from(record.position_weight),
        };
        *groups
            .entry((record.state.clone(), record.classification))
            .or_default() += value;
    }

    let mut totals: HashMap<&str, u64> = HashMap::new();
    for ((state, _), value) in &groups {
        *totals.entry(state.as_str()).or_default() += value;
    }

    let mut rows: Vec<StateShareRow> = groups
        .iter()
        .map(|((state, classification), &value)| {
            let total = totals.get(state.as_str()).copied().unwrap_or(0);
            StateShareRow {
                state: state.clone(),
                classification: *classification,
                value,
                total,
                share: share_of(value, total),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        a.state
            .cmp(&b.state)
            .then_with(|| by_share_desc(a.share, a.classification, b.share, b.classification))
    });

    StateShare { metric, rows }
}

// ===== Brand Breakdown =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BrandSource {
    Real,
    Sweeps,
}

impl BrandSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrandSource::Real => "Real",
            BrandSource::Sweeps => "Sweeps",
        }
    }
}

impl fmt::Display for BrandSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandCount {
    pub brand: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub brand: String,
    pub count: u64,
    pub source: BrandSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandBreakdown {
    pub real: Vec<BrandCount>,
    pub sweeps: Vec<BrandCount>,
    pub combined: Vec<LeaderboardEntry>,
}

/// Split a brand column value into non-empty brand names.
pub fn split_brands(value: &str) -> impl Iterator<Item = &str> {
    value.split(BRAND_SEPARATOR).filter(|b| !b.is_empty())
}

/// Count brand mentions and keep the top `limit`, ties ordered by name.
pub fn count_brands<'a, I>(values: I, limit: usize) -> Vec<BrandCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for value in values {
        for brand in split_brands(value) {
            *counts.entry(brand).or_default() += 1;
        }
    }

    let mut ranked: Vec<BrandCount> = counts
        .into_iter()
        .map(|(brand, count)| BrandCount {
            brand: brand.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.brand.cmp(&b.brand)));
    ranked.truncate(limit);
    ranked
}

/// Top brands for both brand columns plus the combined leaderboard.
pub fn brand_breakdown(records: &[&SerpRecord]) -> BrandBreakdown {
    let (real, sweeps) = rayon::join(
        || count_brands(records.iter().map(|r| r.real_brands.as_str()), TOP_BRANDS),
        || count_brands(records.iter().map(|r| r.sweeps_brands.as_str()), TOP_BRANDS),
    );

    let mut combined: Vec<LeaderboardEntry> = real
        .iter()
        .map(|b| (b, BrandSource::Real))
        .chain(sweeps.iter().map(|b| (b, BrandSource::Sweeps)))
        .map(|(b, source)| LeaderboardEntry {
            brand: b.brand.clone(),
            count: b.count,
            source,
        })
        .collect();
    // Stable: equal counts keep Real before Sweeps.
    combined.sort_by(|a, b| b.count.cmp(&a.count));

    BrandBreakdown {
        real,
        sweeps,
        combined,
    }
}

// ===== Keyword Detail =====

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordShareRow {
    pub keyword: String,
    pub classification: Classification,
    pub weight: u64,
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordCheck {
    pub keyword: String,
    pub sum_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordDetail {
    pub rows: Vec<KeywordShareRow>,
    /// Per-keyword share sums, largest first.
    pub checks: Vec<KeywordCheck>,
    /// Set when a keyword's shares add up to more than 100.1.
    pub rounding_warning: bool,
}

impl KeywordDetail {
    pub fn keywords(&self) -> Vec<String> {
        let mut keywords: Vec<String> = self.rows.iter().map(|r| r.keyword.clone()).collect();
        keywords.dedup();
        keywords
    }
}

/// Weighted classification share within each keyword.
pub fn keyword_detail(records: &[&SerpRecord]) -> KeywordDetail {
    let mut groups: BTreeMap<(&str, Classification), u64> = BTreeMap::new();
    for record in records.iter().filter(|r| !r.keyword.is_empty()) {
        *groups
            .entry((record.keyword.as_str(), record.classification))
            .or_default() += u64::from(record.position_weight);
    }

    let mut totals: HashMap<&str, u64> = HashMap::new();
    for ((keyword, _), weight) in &groups {
        *totals.entry(*keyword).or_default() += weight;
    }

    let mut rows: Vec<KeywordShareRow> = groups
        .iter()
        .map(|(&(keyword, classification), &weight)| {
            let total = totals.get(keyword).copied().unwrap_or(0);
            KeywordShareRow {
                keyword: keyword.to_string(),
                classification,
                weight,
                share: share_of(weight, total),
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        a.keyword
            .cmp(&b.keyword)
            .then_with(|| by_share_desc(a.share, a.classification, b.share, b.classification))
    });

    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for row in &rows {
        *sums.entry(row.keyword.as_str()).or_default() += row.share;
    }
    let mut checks: Vec<KeywordCheck> = sums
        .into_iter()
        .map(|(keyword, sum)| KeywordCheck {
            keyword: keyword.to_string(),
            sum_share: round_share(sum),
        })
        .collect();
    checks.sort_by(|a, b| b.sum_share.partial_cmp(&a.sum_share).unwrap_or(Ordering::Equal));

    let rounding_warning = checks
        .iter()
        .any(|c| c.sum_share > ROUNDING_WARNING_THRESHOLD);
    if rounding_warning {
        tracing::warn!("Some keywords exceed 100% total share due to rounding");
    }

    KeywordDetail {
        rows,
        checks,
        rounding_warning,
    }
}

// ===== SERP Table =====

/// Filtered records sorted by state, keyword and position. Missing positions sort last.
pub fn serp_table(records: &[&SerpRecord]) -> Vec<SerpRecord> {
    let mut rows: Vec<SerpRecord> = records.iter().map(|&r| r.clone()).collect();
    rows.sort_by(|a, b| {
        a.state
            .cmp(&b.state)
            .then_with(|| a.keyword.cmp(&b.keyword))
            .then_with(|| match (a.position, b.position) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    });
    rows
}

// ===== Dispatch =====

/// Result of one view computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ViewResult {
    Overview(StateShare),
    BrandBreakdown(BrandBreakdown),
    KeywordDetail(KeywordDetail),
    SerpTable(Vec<SerpRecord>),
}

impl ViewResult {
    pub fn view(&self) -> ViewMode {
        match self {
            ViewResult::Overview(_) => ViewMode::Overview,
            ViewResult::BrandBreakdown(_) => ViewMode::BrandBreakdown,
            ViewResult::KeywordDetail(_) => ViewMode::KeywordDetail,
            ViewResult::SerpTable(_) => ViewMode::SerpTable,
        }
    }

    /// Flatten the result into a string table for display and export.
    pub fn to_table(&self) -> TableData {
        match self {
            ViewResult::Overview(summary) => TableData {
                headers: vec!["state".into(), "classification".into(), "share".into()],
                rows: summary
                    .rows
                    .iter()
                    .map(|r| {
                        vec![
                            r.state.clone(),
                            r.classification.to_string(),
                            format!("{:.1}", r.share),
                        ]
                    })
                    .collect(),
            },
            ViewResult::BrandBreakdown(breakdown) => TableData {
                headers: vec!["brand".into(), "count".into(), "type".into()],
                rows: breakdown
                    .combined
                    .iter()
                    .map(|e| vec![e.brand.clone(), e.count.to_string(), e.source.to_string()])
                    .collect(),
            },
            ViewResult::KeywordDetail(detail) => TableData {
                headers: vec![
                    "keyword".into(),
                    "classification".into(),
                    "weight".into(),
                    "share".into(),
                ],
                rows: detail
                    .rows
                    .iter()
                    .map(|r| {
                        vec![
                            r.keyword.clone(),
                            r.classification.to_string(),
                            r.weight.to_string(),
                            format!("{:.1}", r.share),
                        ]
                    })
                    .collect(),
            },
            ViewResult::SerpTable(records) => TableData {
                headers: [
                    "state",
                    "keyword",
                    "position",
                    "position_weight",
                    "url",
                    "classification",
                    "real_brands",
                    "sweeps_brands",
                ]
                .iter()
                .map(|h| h.to_string())
                .collect(),
                rows: records
                    .iter()
                    .map(|r| {
                        vec![
                            r.state.clone(),
                            r.keyword.clone(),
                            r.position.map(|p| p.to_string()).unwrap_or_default(),
                            r.position_weight.to_string(),
                            r.url.clone(),
                            r.classification.to_string(),
                            r.real_brands.clone(),
                            r.sweeps_brands.clone(),
                        ]
                    })
                    .collect(),
            },
        }
    }
}

/// Column headers plus string rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Compute the selected view over already filtered records.
pub fn aggregate(records: &[&SerpRecord], view: ViewMode, metric: Metric) -> ViewResult {
    match view {
        ViewMode::Overview => ViewResult::Overview(state_share(records, metric)),
        ViewMode::BrandBreakdown => ViewResult::BrandBreakdown(brand_breakdown(records)),
        ViewMode::KeywordDetail => ViewResult::KeywordDetail(keyword_detail(records)),
        ViewMode::SerpTable => ViewResult::SerpTable(serp_table(records)),
    }
}
