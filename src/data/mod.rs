//! Data module - CSV loading, field parsing and normalization

pub mod columns;
pub mod fields;
mod loader;
mod normalizer;

pub use fields::{clean_entity_name, parse_amount, parse_date, split_investors, standardize_city};
pub use loader::{FundingStore, LoaderError, SourceFingerprint, REQUIRED_COLUMNS};
pub use normalizer::{NormalizeError, Normalizer};
