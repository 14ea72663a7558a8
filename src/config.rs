//! Dashboard configuration: JSON file defaults plus environment overrides.

use crate::data::{normalize_range, DEFAULT_POSITION_RANGE};
use crate::stats::{Metric, ViewMode};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "serp_landscape.json";

pub const DEFAULT_DATA_PATH: &str = "output/brand_classifications_enriched.csv";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("{key} must look like \"lo-hi\", got {value:?}")]
    InvalidRange { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub position_range: (i64, i64),
    pub metric: Metric,
    pub view: ViewMode,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            position_range: DEFAULT_POSITION_RANGE,
            metric: Metric::default(),
            view: ViewMode::default(),
        }
    }
}

impl DashboardConfig {
    /// Load `serp_landscape.json` if present, then apply `SERP_DATA_PATH` and
    /// `SERP_POSITION_RANGE`.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file(Path::new(CONFIG_FILE))?.unwrap_or_default();
        config.apply_overrides(
            env::var("SERP_DATA_PATH").ok(),
            env::var("SERP_POSITION_RANGE").ok(),
        )?;
        config.position_range = normalize_range(config.position_range.0, config.position_range.1);
        config.log();
        Ok(config)
    }

    /// Read a config file. A missing file is `Ok(None)`.
    pub fn from_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Some(config))
    }

    pub fn apply_overrides(
        &mut self,
        data_path: Option<String>,
        position_range: Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(path) = data_path.filter(|p| !p.trim().is_empty()) {
            self.data_path = PathBuf::from(path);
        }
        if let Some(range) = position_range {
            self.position_range = parse_range("SERP_POSITION_RANGE", &range)?;
        }
        Ok(())
    }

    pub fn log(&self) {
        info!(
            data_path = %self.data_path.display(),
            position_lo = self.position_range.0,
            position_hi = self.position_range.1,
            metric = self.metric.label(),
            view = self.view.label(),
            "Dashboard config"
        );
    }
}

fn parse_range(key: &'static str, value: &str) -> Result<(i64, i64), ConfigError> {
    let invalid = || ConfigError::InvalidRange {
        key,
        value: value.to_string(),
    };
    let (lo, hi) = value.split_once('-').ok_or_else(invalid)?;
    let lo = lo.trim().parse().map_err(|_| invalid())?;
    let hi = hi.trim().parse().map_err(|_| invalid())?;
    Ok((lo, hi))
}
