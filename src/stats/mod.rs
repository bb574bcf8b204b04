//! Stats module - aggregation views, selection and entity summaries

mod aggregator;
mod selection;
mod summary;

pub use aggregator::Aggregator;
pub use selection::Selection;
pub use summary::{EntitySummary, SummaryCalculator};
