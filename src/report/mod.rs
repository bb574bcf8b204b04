//! Report module - dashboard views and their terminal rendering

mod terminal;
mod views;

pub use terminal::TerminalRenderer;
pub use views::{
    CompanyReport, DetailRow, InvestorReport, LabeledValue, OverviewReport, ReportBuilder,
    YearAmount,
};
