//! Stats module - View aggregations

mod aggregator;

pub use aggregator::{
    aggregate, brand_breakdown, count_brands, keyword_detail, round_share, serp_table,
    share_of, split_brands, state_share, BrandBreakdown, BrandCount, BrandSource, KeywordCheck,
    KeywordDetail, KeywordShareRow, LeaderboardEntry, Metric, StateShare, StateShareRow,
    TableData, ViewMode, ViewResult, BRAND_SEPARATOR, ROUNDING_WARNING_THRESHOLD, TOP_BRANDS,
};
