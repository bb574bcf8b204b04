//! CSV Data Loader Module
//! Loads a funding export with Polars, normalizes it, and memoizes the result
//! per source file.

use super::columns::{AMOUNT_CR, DATE, STARTUP_NAME, TEXT_COLUMNS};
use super::normalizer::{NormalizeError, Normalizer};
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Columns without which no view can be built.
pub const REQUIRED_COLUMNS: [&str; 1] = [STARTUP_NAME];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to normalize data: {0}")]
    Normalize(#[from] NormalizeError),
    #[error("Missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("No data loaded")]
    NoData,
}

/// Identity of a source file: where it is, how big it is, when it changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFingerprint {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl SourceFingerprint {
    pub fn of(path: &Path) -> Result<Self, LoaderError> {
        let io_err = |source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        };
        let canonical = fs::canonicalize(path).map_err(io_err)?;
        let meta = fs::metadata(&canonical).map_err(io_err)?;
        Ok(Self {
            path: canonical,
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

struct CachedTable {
    fingerprint: SourceFingerprint,
    table: DataFrame,
}

/// Memoizes the normalized funding table for one source file.
///
/// The table is rebuilt only when the file fingerprint changes or on an
/// explicit [`FundingStore::reload`]; otherwise callers share the cached copy.
pub struct FundingStore {
    cached: Option<CachedTable>,
    builds: usize,
}

impl Default for FundingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FundingStore {
    pub fn new() -> Self {
        Self {
            cached: None,
            builds: 0,
        }
    }

    /// Return the normalized table for `path`, rebuilding it only if the
    /// file changed since the last build.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&DataFrame, LoaderError> {
        let path = path.as_ref();
        let fingerprint = SourceFingerprint::of(path)?;

        let fresh = matches!(&self.cached, Some(c) if c.fingerprint == fingerprint);
        if fresh {
            debug!(path = %path.display(), "serving cached funding table");
        } else {
            self.rebuild(path, fingerprint)?;
        }

        self.get_dataframe().ok_or(LoaderError::NoData)
    }

    /// Rebuild the table for `path` unconditionally.
    pub fn reload(&mut self, path: impl AsRef<Path>) -> Result<&DataFrame, LoaderError> {
        let path = path.as_ref();
        let fingerprint = SourceFingerprint::of(path)?;
        self.rebuild(path, fingerprint)?;
        self.get_dataframe().ok_or(LoaderError::NoData)
    }

    /// Drop the cached table.
    pub fn invalidate(&mut self) {
        if self.cached.take().is_some() {
            info!("funding table cache invalidated");
        }
    }

    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.cached.as_ref().map(|c| &c.table)
    }

    pub fn get_file_path(&self) -> Option<&Path> {
        self.cached.as_ref().map(|c| c.fingerprint.path.as_path())
    }

    pub fn get_row_count(&self) -> usize {
        self.get_dataframe().map(|df| df.height()).unwrap_or(0)
    }

    /// Number of times the pipeline has run for this store.
    pub fn build_count(&self) -> usize {
        self.builds
    }

    fn rebuild(&mut self, path: &Path, fingerprint: SourceFingerprint) -> Result<(), LoaderError> {
        let table = Self::load_and_prepare(path)?;
        info!(
            path = %path.display(),
            rows = table.height(),
            columns = table.width(),
            "funding table built"
        );
        self.builds += 1;
        self.cached = Some(CachedTable { fingerprint, table });
        Ok(())
    }

    /// Read the CSV at `path` with every column as text.
    pub fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;
        Ok(df)
    }

    /// Read, normalize and validate a funding export.
    pub fn load_and_prepare(path: &Path) -> Result<DataFrame, LoaderError> {
        let raw = Self::read_csv(path)?;
        let table = Normalizer::normalize(&raw)?;
        Self::validate(&table)?;
        Ok(table)
    }

    /// Fail on missing required columns; warn about missing optional ones.
    pub fn validate(df: &DataFrame) -> Result<(), LoaderError> {
        let has = |name: &str| df.get_column_index(name).is_some();

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| !has(name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(LoaderError::MissingColumns(missing));
        }

        for name in TEXT_COLUMNS.iter().chain([AMOUNT_CR, DATE].iter()) {
            if !has(name) {
                warn!(column = *name, "optional column missing, dependent views disabled");
            }
        }
        Ok(())
    }
}
