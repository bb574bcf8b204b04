//! Terminal rendering of the dashboard views.

use super::views::{CompanyReport, DetailRow, InvestorReport, LabeledValue, OverviewReport, YearAmount};
use crate::stats::EntitySummary;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use std::fmt::Write;

const BLANK: &str = "-";

pub struct TerminalRenderer;

impl TerminalRenderer {
    pub fn company(report: &CompanyReport) -> String {
        let mut out = String::new();
        Self::section(&mut out, &report.name, &Self::summary_table(&report.summary, false));
        Self::section(&mut out, "Startup Details", &Self::detail_table(&report.details));
        Self::section(&mut out, "Funding Trend", &Self::year_table(&report.funding_by_year));
        out
    }

    pub fn investor(report: &InvestorReport) -> String {
        let mut out = String::new();
        Self::section(&mut out, &report.key, &Self::summary_table(&report.summary, true));
        Self::section(
            &mut out,
            "Top Startups Funded",
            &Self::ranking_table("Startup", "Amount (Cr)", &report.top_startups, 2),
        );
        Self::section(&mut out, "Funding Trend", &Self::year_table(&report.funding_by_year));
        Self::section(
            &mut out,
            "Sector Distribution",
            &Self::ranking_table("Sector", "Investments", &report.sector_distribution, 0),
        );
        out
    }

    pub fn overview(report: &OverviewReport) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} funding rounds\n", report.rows);
        Self::section(&mut out, "Total Funding by Year (Cr)", &Self::year_table(&report.funding_by_year));
        Self::section(
            &mut out,
            "Top Sectors by Funding (Cr)",
            &Self::ranking_table("Sector", "Amount (Cr)", &report.top_sectors, 2),
        );
        Self::section(
            &mut out,
            "Top Cities by Funding (Cr)",
            &Self::ranking_table("City", "Amount (Cr)", &report.top_cities, 2),
        );
        Self::section(
            &mut out,
            "Top Investors by Funding (Cr, full round credited to each co-investor)",
            &Self::ranking_table("Investor", "Amount (Cr)", &report.top_investors, 2),
        );
        Self::section(
            &mut out,
            "Top Cities by Funding Rounds",
            &Self::ranking_table("City", "Rounds", &report.city_rounds, 0),
        );
        Self::section(
            &mut out,
            "Top Cities by Funding Amount",
            &Self::ranking_table("City", "Amount (Cr)", &report.city_amounts, 2),
        );
        out
    }

    /// Plain listing of entity keys, one per line.
    pub fn keys(keys: &[String]) -> String {
        keys.iter().fold(String::new(), |mut out, key| {
            let _ = writeln!(out, "{key}");
            out
        })
    }

    pub fn summary_table(summary: &EntitySummary, investor: bool) -> Table {
        let mut table = Self::table(vec!["Metric", "Value"]);
        let mut metric = |name: &str, value: String| {
            table.add_row(vec![
                Cell::new(name),
                Cell::new(value).set_alignment(CellAlignment::Right),
            ]);
        };

        metric("Total Funding (Cr)", format!("{:.2}", summary.total_amount));
        metric("Funding Rounds", summary.rounds.to_string());
        if investor {
            metric("Startups Funded", summary.distinct_startups.to_string());
            metric("Avg per Round", format!("{:.2}", summary.average_amount));
        }
        metric("Disclosed Rounds", summary.disclosed_rounds.to_string());
        metric("Median Round (Cr)", Self::optional_amount(summary.median_amount));
        metric("Largest Round (Cr)", Self::optional_amount(summary.largest_amount));
        metric(
            "Last Investment",
            summary
                .last_event
                .map(|d| d.format("%d %b %Y").to_string())
                .unwrap_or_else(|| BLANK.to_string()),
        );
        table
    }

    pub fn ranking_table(label: &str, value: &str, rows: &[LabeledValue], precision: usize) -> Table {
        let mut table = Self::table(vec![label, value]);
        for row in rows {
            table.add_row(vec![
                Cell::new(&row.label),
                Cell::new(format!("{:.*}", precision, row.value)).set_alignment(CellAlignment::Right),
            ]);
        }
        table
    }

    pub fn year_table(rows: &[YearAmount]) -> Table {
        let mut table = Self::table(vec!["Year", "Amount (Cr)"]);
        for row in rows {
            let year = row
                .year
                .map(|y| y.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            table.add_row(vec![
                Cell::new(year),
                Cell::new(format!("{:.2}", row.amount_cr)).set_alignment(CellAlignment::Right),
            ]);
        }
        table
    }

    pub fn detail_table(rows: &[DetailRow]) -> Table {
        let mut table = Self::table(vec![
            "Startup", "City", "Sector", "Sub-vertical", "Investors", "Date",
        ]);
        for row in rows {
            let text = |v: &Option<String>| v.clone().unwrap_or_else(|| BLANK.to_string());
            table.add_row(vec![
                text(&row.startup_name),
                text(&row.city_location),
                text(&row.industry_vertical),
                text(&row.sub_vertical),
                text(&row.investors_name),
                row.date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| BLANK.to_string()),
            ]);
        }
        table
    }

    fn table(header: Vec<&str>) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(header);
        table
    }

    fn section(out: &mut String, title: &str, table: &Table) {
        let _ = writeln!(out, "{title}\n{table}\n");
    }

    fn optional_amount(value: Option<f64>) -> String {
        value
            .map(|v| format!("{v:.2}"))
            .unwrap_or_else(|| BLANK.to_string())
    }
}
