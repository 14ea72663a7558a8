//! Data module - CSV loading, caching, filtering and export

mod cache;
mod export;
mod filter;
mod loader;
mod record;

pub use cache::DatasetCache;
pub use export::{export_table_csv, table_to_dataframe, ExportError};
pub use filter::{
    normalize_range, FilterParams, DEFAULT_POSITION_RANGE, MAX_POSITION, MIN_POSITION,
};
pub use loader::{LoaderError, SerpLoader};
pub use record::{
    position_weight, Classification, RecordSet, SerpRecord, MAX_WEIGHTED_POSITION, UNKNOWN_STATE,
};
