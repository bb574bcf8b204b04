//! Normalizer Module
//! Turns a raw funding export into the normalized funding table.
//!
//! Every step is a pure column rebuild: rows are never dropped or reordered,
//! and cells that fail to parse become null instead of raising.

use super::columns::{
    AMOUNT_CR, CITY_LOCATION, DATE, HEADER_ALIASES, INVESTORS_NAME, INVESTOR_KEY, MONTH,
    STARTUP_KEY, STARTUP_NAME, TEXT_COLUMNS, YEAR,
};
use super::fields::{
    clean_entity_name, clean_text, month_bucket, parse_amount, parse_date, standardize_city,
};
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Handles column renaming, field parsing and canonicalization.
pub struct Normalizer;

impl Normalizer {
    /// Normalize a raw funding table.
    ///
    /// Running this on an already-normalized table returns an equal table.
    pub fn normalize(df: &DataFrame) -> Result<DataFrame, NormalizeError> {
        let mut out = df.clone();
        Self::rename_columns(&mut out)?;

        for name in TEXT_COLUMNS {
            if let Some(column) = Self::optional_column(&out, name) {
                let cleaned = Self::map_text(column, clean_text)?;
                out.with_column(cleaned)?;
            }
        }

        if let Some(column) = Self::optional_column(&out, AMOUNT_CR) {
            let amounts = Self::parse_amount_column(column)?;
            out.with_column(amounts)?;
        }

        if let Some(column) = Self::optional_column(&out, CITY_LOCATION) {
            let cities = Self::map_text(column, standardize_city)?;
            out.with_column(cities)?;
        }

        if let Some(column) = Self::optional_column(&out, DATE) {
            let dates = Self::parse_date_column(column)?;
            let (years, months) = Self::derive_periods(&dates)?;
            out.with_column(dates)?;
            out.with_column(years)?;
            out.with_column(months)?;
        }

        if let Some(column) = Self::optional_column(&out, STARTUP_NAME) {
            let keys = Self::map_text_into(column, STARTUP_KEY, clean_entity_name)?;
            out.with_column(keys)?;
        }

        if let Some(column) = Self::optional_column(&out, INVESTORS_NAME) {
            let keys = Self::map_text_into(column, INVESTOR_KEY, clean_entity_name)?;
            out.with_column(keys)?;
        }

        Ok(out)
    }

    /// Lowercase, trim and snake_case every header, then resolve known aliases.
    pub fn rename_columns(df: &mut DataFrame) -> Result<(), NormalizeError> {
        let mut names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| Self::snake_case(name.as_str()))
            .collect();

        for (alias, canonical) in HEADER_ALIASES {
            if names.iter().any(|n| n == canonical) {
                continue;
            }
            if let Some(pos) = names.iter().position(|n| n == alias) {
                names[pos] = canonical.to_string();
            }
        }

        df.set_column_names(names.iter().map(String::as_str))?;
        Ok(())
    }

    /// `" Startup Name "` becomes `"startup_name"`.
    pub fn snake_case(header: &str) -> String {
        header.trim().to_lowercase().replace(' ', "_")
    }

    fn optional_column<'a>(df: &'a DataFrame, name: &str) -> Option<&'a Column> {
        let column = df.column(name).ok();
        if column.is_none() {
            debug!(column = name, "column absent, skipping");
        }
        column
    }

    /// Rebuild a column in place by applying `f` to each cell's string form.
    fn map_text<F>(column: &Column, f: F) -> PolarsResult<Column>
    where
        F: Fn(Option<&str>) -> Option<String>,
    {
        Self::map_text_into(column, column.name().as_str(), f)
    }

    fn map_text_into<F>(column: &Column, target: &str, f: F) -> PolarsResult<Column>
    where
        F: Fn(Option<&str>) -> Option<String>,
    {
        let as_str = column.cast(&DataType::String)?;
        let values: Vec<Option<String>> = as_str.str()?.into_iter().map(f).collect();
        Ok(Column::new(target.into(), values))
    }

    fn parse_amount_column(column: &Column) -> PolarsResult<Column> {
        match column.dtype() {
            DataType::Float64 => Ok(column.clone()),
            DataType::Float32
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => column.cast(&DataType::Float64),
            _ => {
                let as_str = column.cast(&DataType::String)?;
                let values: Vec<Option<f64>> =
                    as_str.str()?.into_iter().map(parse_amount).collect();
                Ok(Column::new(column.name().clone(), values))
            }
        }
    }

    fn parse_date_column(column: &Column) -> PolarsResult<Column> {
        match column.dtype() {
            DataType::Date => Ok(column.clone()),
            DataType::Datetime(_, _) => column.cast(&DataType::Date),
            _ => {
                let as_str = column.cast(&DataType::String)?;
                let values: Vec<Option<NaiveDate>> =
                    as_str.str()?.into_iter().map(parse_date).collect();
                Ok(Column::new(column.name().clone(), values))
            }
        }
    }

    /// Derive the `year` and `month` columns from a parsed date column.
    fn derive_periods(dates: &Column) -> PolarsResult<(Column, Column)> {
        let parsed: Vec<Option<NaiveDate>> = dates.date()?.as_date_iter().collect();

        let years: Vec<Option<i32>> = parsed.iter().map(|d| d.map(|d| d.year())).collect();
        let months: Vec<Option<String>> = parsed.iter().map(|d| d.map(month_bucket)).collect();

        Ok((
            Column::new(YEAR.into(), years),
            Column::new(MONTH.into(), months),
        ))
    }
}
