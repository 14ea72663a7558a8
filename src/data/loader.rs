//! CSV Data Loader Module
//! Reads the classification CSV with Polars and converts it into typed records.

use crate::data::record::{Classification, RecordSet, SerpRecord, UNKNOWN_STATE};
use polars::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data file not found: {0}")]
    NotFound(String),
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
}

/// Handles CSV file loading with Polars.
pub struct SerpLoader;

impl SerpLoader {
    /// Load a CSV file and apply the record defaults.
    pub fn load_csv(path: &Path) -> Result<RecordSet, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.display().to_string()));
        }

        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        debug!(rows = df.height(), columns = df.width(), "CSV read");

        let records = RecordSet::from_dataframe(&df)?.with_source(path);
        info!(
            path = %path.display(),
            records = records.len(),
            "Loaded SERP classifications"
        );
        Ok(records)
    }
}

impl RecordSet {
    /// Convert a raw DataFrame into records. Absent columns use the record defaults.
    pub fn from_dataframe(df: &DataFrame) -> Result<RecordSet, LoaderError> {
        let height = df.height();

        let state = string_column(df, "state", height)?;
        let keyword = string_column(df, "keyword", height)?;
        let classification = string_column(df, "classification", height)?;
        let url = string_column(df, "url", height)?;
        let real_brands = string_column(df, "real_brands", height)?;
        let sweeps_brands = string_column(df, "sweeps_brands", height)?;
        let position = position_column(df, height)?;

        let records = (0..height)
            .map(|i| {
                let state = state[i]
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_STATE.to_string());
                let classification = Classification::from_label(classification[i].as_deref());
                SerpRecord::new(state, keyword[i].clone().unwrap_or_default(), position[i], classification)
                    .with_url(url[i].clone().unwrap_or_default())
                    .with_brands(
                        real_brands[i].clone().unwrap_or_default(),
                        sweeps_brands[i].clone().unwrap_or_default(),
                    )
            })
            .collect();

        Ok(RecordSet::new(records))
    }
}

/// Read a column as optional strings; a missing column yields all `None`.
fn string_column(
    df: &DataFrame,
    name: &str,
    height: usize,
) -> Result<Vec<Option<String>>, LoaderError> {
    let Ok(column) = df.column(name) else {
        debug!(column = name, "Column absent, using defaults");
        return Ok(vec![None; height]);
    };

    let as_str = column.cast(&DataType::String)?;
    let ca = as_str.str()?;
    Ok(ca.into_iter().map(|v| v.map(str::to_string)).collect())
}

/// Read `position` as optional integers. Float ranks like `3.0` are accepted.
fn position_column(df: &DataFrame, height: usize) -> Result<Vec<Option<i64>>, LoaderError> {
    let Ok(column) = df.column("position") else {
        debug!("Column position absent, all weights are zero");
        return Ok(vec![None; height]);
    };

    let as_f64 = column.cast(&DataType::Float64)?;
    let ca = as_f64.f64()?;
    Ok(ca
        .into_iter()
        .map(|v| v.filter(|p| p.is_finite()).map(|p| p as i64))
        .collect())
}
