//! Table Export Module
//! Writes the active view's table to CSV.

use crate::stats::TableData;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing to export")]
    Empty,
    #[error("Failed to create file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] PolarsError),
}

/// Build a string-typed DataFrame from a table.
pub fn table_to_dataframe(table: &TableData) -> Result<DataFrame, ExportError> {
    let columns: Vec<Column> = table
        .headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let values: Vec<String> = table
                .rows
                .iter()
                .map(|row| row.get(i).cloned().unwrap_or_default())
                .collect();
            Column::new(header.as_str().into(), values)
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// Write `table` to `path` as CSV with a header row.
pub fn export_table_csv(table: &TableData, path: &Path) -> Result<(), ExportError> {
    if table.headers.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut df = table_to_dataframe(table)?;
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;

    tracing::info!(path = %path.display(), rows = df.height(), "Table exported");
    Ok(())
}
