//! Dashboard configuration: view sizes and chart dimensions.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub top_sectors: usize,
    pub top_cities: usize,
    pub top_investors: usize,
    /// Slices in the city distribution views.
    pub city_slices: usize,
    /// Rows in an investor's top-startups table.
    pub top_startups: usize,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top_sectors: 10,
            top_cities: 10,
            top_investors: 15,
            city_slices: 10,
            top_startups: 10,
            chart_width: 1000,
            chart_height: 600,
        }
    }
}

impl DashboardConfig {
    /// Load from a JSON file; absent keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }
}
