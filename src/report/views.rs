//! Dashboard views assembled from the aggregation tables.

use crate::config::DashboardConfig;
use crate::data::columns::{
    AMOUNT_CR, CITY_LOCATION, COUNT, DATE, INDUSTRY_VERTICAL, INVESTOR, INVESTORS_NAME, MONTH,
    STARTUP_NAME, SUB_VERTICAL, YEAR,
};
use crate::data::clean_entity_name;
use crate::stats::{Aggregator, EntitySummary, Selection, SummaryCalculator};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;

/// One row of a ranking or distribution table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledValue {
    pub label: String,
    pub value: f64,
}

/// One point of a funding-by-year series. `year` is `None` for undated rounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearAmount {
    pub year: Option<i32>,
    pub amount_cr: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub startup_name: Option<String>,
    pub city_location: Option<String>,
    pub industry_vertical: Option<String>,
    pub sub_vertical: Option<String>,
    pub investors_name: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyReport {
    pub key: String,
    pub name: String,
    pub summary: EntitySummary,
    pub details: Vec<DetailRow>,
    pub funding_by_year: Vec<YearAmount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvestorReport {
    pub key: String,
    /// Whether rows were matched on any listed co-investor rather than the whole field.
    pub co_invested: bool,
    pub summary: EntitySummary,
    pub top_startups: Vec<LabeledValue>,
    pub funding_by_year: Vec<YearAmount>,
    pub sector_distribution: Vec<LabeledValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverviewReport {
    pub rows: usize,
    pub funding_by_year: Vec<YearAmount>,
    pub funding_by_month: Vec<LabeledValue>,
    pub top_sectors: Vec<LabeledValue>,
    pub top_cities: Vec<LabeledValue>,
    /// Each co-investor is credited the full round amount.
    pub top_investors: Vec<LabeledValue>,
    pub city_rounds: Vec<LabeledValue>,
    pub city_amounts: Vec<LabeledValue>,
}

/// Builds the three dashboard views.
pub struct ReportBuilder;

impl ReportBuilder {
    /// Company page for `name`, or `None` when no rows match.
    pub fn company(df: &DataFrame, name: &str) -> PolarsResult<Option<CompanyReport>> {
        let Some(key) = clean_entity_name(Some(name)) else {
            return Ok(None);
        };
        let rows = Selection::filter_by_startup(df, &key)?;
        if rows.height() == 0 {
            return Ok(None);
        }

        Ok(Some(CompanyReport {
            name: Selection::display_name(&rows).unwrap_or_else(|| key.clone()),
            key,
            summary: SummaryCalculator::summarize(&rows)?,
            details: Self::detail_rows(&Selection::entity_details(&rows)?)?,
            funding_by_year: Self::year_amounts(&Aggregator::funding_by_year(&rows)?)?,
        }))
    }

    /// Investor page for `name`, or `None` when no rows match.
    pub fn investor(
        df: &DataFrame,
        name: &str,
        co_invested: bool,
        config: &DashboardConfig,
    ) -> PolarsResult<Option<InvestorReport>> {
        let Some(key) = clean_entity_name(Some(name)) else {
            return Ok(None);
        };
        let rows = if co_invested {
            Selection::filter_by_co_investor(df, &key)?
        } else {
            Selection::filter_by_investor(df, &key)?
        };
        if rows.height() == 0 {
            return Ok(None);
        }

        Ok(Some(InvestorReport {
            key,
            co_invested,
            summary: SummaryCalculator::summarize(&rows)?,
            top_startups: Self::labeled_values(
                &Aggregator::top_startups(&rows, config.top_startups)?,
                STARTUP_NAME,
                AMOUNT_CR,
            )?,
            funding_by_year: Self::year_amounts(&Aggregator::funding_by_year(&rows)?)?,
            sector_distribution: Self::labeled_values(
                &Aggregator::sector_distribution(&rows)?,
                INDUSTRY_VERTICAL,
                COUNT,
            )?,
        }))
    }

    /// General analysis page over the whole table.
    pub fn overview(df: &DataFrame, config: &DashboardConfig) -> PolarsResult<OverviewReport> {
        Ok(OverviewReport {
            rows: df.height(),
            funding_by_year: Self::year_amounts(&Aggregator::funding_by_year(df)?)?,
            funding_by_month: Self::labeled_values(
                &Aggregator::funding_by_month(df)?,
                MONTH,
                AMOUNT_CR,
            )?,
            top_sectors: Self::labeled_values(
                &Aggregator::top_sectors(df, config.top_sectors)?,
                INDUSTRY_VERTICAL,
                AMOUNT_CR,
            )?,
            top_cities: Self::labeled_values(
                &Aggregator::top_cities(df, config.top_cities)?,
                CITY_LOCATION,
                AMOUNT_CR,
            )?,
            top_investors: Self::labeled_values(
                &Aggregator::top_investors(df, config.top_investors)?,
                INVESTOR,
                AMOUNT_CR,
            )?,
            city_rounds: Self::labeled_values(
                &Aggregator::city_round_counts(df, config.city_slices)?,
                CITY_LOCATION,
                COUNT,
            )?,
            city_amounts: Self::labeled_values(
                &Aggregator::city_amounts(df, config.city_slices)?,
                CITY_LOCATION,
                AMOUNT_CR,
            )?,
        })
    }

    /// Read a (key, value) aggregation table into labeled rows; null keys are skipped.
    pub fn labeled_values(df: &DataFrame, key: &str, value: &str) -> PolarsResult<Vec<LabeledValue>> {
        let keys = df.column(key)?.cast(&DataType::String)?;
        let values = df.column(value)?.cast(&DataType::Float64)?;

        let rows = keys
            .str()?
            .into_iter()
            .zip(values.f64()?.into_iter())
            .filter_map(|(label, value)| {
                Some(LabeledValue {
                    label: label?.to_string(),
                    value: value.unwrap_or(0.0),
                })
            })
            .collect();
        Ok(rows)
    }

    pub fn year_amounts(df: &DataFrame) -> PolarsResult<Vec<YearAmount>> {
        let years = df.column(YEAR)?.cast(&DataType::Int32)?;
        let amounts = df.column(AMOUNT_CR)?.cast(&DataType::Float64)?;

        let rows = years
            .i32()?
            .into_iter()
            .zip(amounts.f64()?.into_iter())
            .map(|(year, amount)| YearAmount {
                year,
                amount_cr: amount.unwrap_or(0.0),
            })
            .collect();
        Ok(rows)
    }

    fn detail_rows(df: &DataFrame) -> PolarsResult<Vec<DetailRow>> {
        let height = df.height();
        let mut startup_name = Self::text_values(df, STARTUP_NAME)?.into_iter();
        let mut city_location = Self::text_values(df, CITY_LOCATION)?.into_iter();
        let mut industry_vertical = Self::text_values(df, INDUSTRY_VERTICAL)?.into_iter();
        let mut sub_vertical = Self::text_values(df, SUB_VERTICAL)?.into_iter();
        let mut investors_name = Self::text_values(df, INVESTORS_NAME)?.into_iter();
        let dates: Vec<Option<NaiveDate>> = match df.column(DATE) {
            Ok(column) => column.date()?.as_date_iter().collect(),
            Err(_) => vec![None; height],
        };

        let rows = dates
            .into_iter()
            .map(|date| DetailRow {
                startup_name: startup_name.next().flatten(),
                city_location: city_location.next().flatten(),
                industry_vertical: industry_vertical.next().flatten(),
                sub_vertical: sub_vertical.next().flatten(),
                investors_name: investors_name.next().flatten(),
                date,
            })
            .collect();
        Ok(rows)
    }

    fn text_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
        match df.column(name) {
            Ok(column) => Ok(column
                .str()?
                .into_iter()
                .map(|v| v.map(str::to_string))
                .collect()),
            Err(_) => Ok(vec![None; df.height()]),
        }
    }
}
