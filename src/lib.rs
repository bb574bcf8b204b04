//! Startup funding explorer.
//!
//! Loads a startup-funding CSV export, normalizes it into a typed Polars table
//! and derives the small aggregation tables behind the company, investor and
//! overview dashboards.

pub mod charts;
pub mod config;
pub mod data;
pub mod report;
pub mod stats;

pub use config::{ConfigError, DashboardConfig};
pub use data::{FundingStore, LoaderError, Normalizer};
pub use report::ReportBuilder;
pub use stats::{Aggregator, EntitySummary, Selection, SummaryCalculator};
