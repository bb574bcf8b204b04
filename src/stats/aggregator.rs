//! Aggregator Module
//! Stateless summary tables over the normalized funding table.
//!
//! Every function takes a (possibly pre-filtered) normalized table and returns
//! a small, sorted table. Missing columns and empty inputs produce an empty
//! table with the expected schema instead of an error.
//!
//! Null handling is deliberately asymmetric:
//! - category and time aggregations drop rows whose `amount_cr` is null;
//! - [`Aggregator::top_investors`] counts a null amount as `0.0`, and credits
//!   the *full* round amount to every co-investor listed on the row. Investor
//!   totals therefore add up to more than the money actually raised.
//!
//! Rankings sort by value descending, then by key ascending.

use crate::data::columns::{
    AMOUNT_CR, CITY_LOCATION, COUNT, INDUSTRY_VERTICAL, INVESTOR, INVESTORS_NAME, MONTH,
    STARTUP_NAME, YEAR,
};
use crate::data::split_investors;
use polars::prelude::*;
use tracing::debug;

pub struct Aggregator;

impl Aggregator {
    /// Total disclosed funding per year, ascending by year.
    ///
    /// Rows with a known amount but an unknown date land in a trailing
    /// null-year bucket, so the column total always equals the disclosed total.
    pub fn funding_by_year(df: &DataFrame) -> PolarsResult<DataFrame> {
        Self::sum_over_period(df, YEAR, DataType::Int32)
    }

    /// Total disclosed funding per `YYYY-MM` month, ascending.
    pub fn funding_by_month(df: &DataFrame) -> PolarsResult<DataFrame> {
        Self::sum_over_period(df, MONTH, DataType::String)
    }

    /// Top `n` sectors by disclosed funding.
    pub fn top_sectors(df: &DataFrame, n: usize) -> PolarsResult<DataFrame> {
        Self::top_by_category(df, INDUSTRY_VERTICAL, n)
    }

    /// Top `n` cities by disclosed funding.
    pub fn top_cities(df: &DataFrame, n: usize) -> PolarsResult<DataFrame> {
        Self::top_by_category(df, CITY_LOCATION, n)
    }

    /// Top `n` startups by disclosed funding within the given rows.
    pub fn top_startups(df: &DataFrame, n: usize) -> PolarsResult<DataFrame> {
        Self::top_by_category(df, STARTUP_NAME, n)
    }

    /// Drop null amounts and null categories, sum per category, keep the top `n`.
    pub fn top_by_category(df: &DataFrame, category: &str, n: usize) -> PolarsResult<DataFrame> {
        if !Self::has_columns(df, &[category, AMOUNT_CR]) {
            return Self::empty_table(category, DataType::String, AMOUNT_CR, DataType::Float64);
        }

        df.clone()
            .lazy()
            .filter(col(AMOUNT_CR).is_not_null().and(col(category).is_not_null()))
            .group_by([col(category)])
            .agg([col(AMOUNT_CR).sum()])
            .sort(
                [AMOUNT_CR, category],
                SortMultipleOptions::default().with_order_descending_multi([true, false]),
            )
            .limit(Self::row_limit(n))
            .collect()
    }

    /// One `(investor, amount_cr)` row per investor named on each funding row.
    ///
    /// The row's whole amount is repeated for every co-investor; a null
    /// amount becomes `0.0`. Rows without investors emit nothing.
    pub fn explode_investors(df: &DataFrame) -> PolarsResult<DataFrame> {
        if !Self::has_columns(df, &[INVESTORS_NAME]) {
            return Self::empty_table(INVESTOR, DataType::String, AMOUNT_CR, DataType::Float64);
        }

        let names = df.column(INVESTORS_NAME)?.cast(&DataType::String)?;
        let amounts: Vec<Option<f64>> = if Self::has_columns(df, &[AMOUNT_CR]) {
            df.column(AMOUNT_CR)?.f64()?.into_iter().collect()
        } else {
            vec![None; df.height()]
        };

        let mut investors: Vec<String> = Vec::new();
        let mut values: Vec<f64> = Vec::new();

        for (name, amount) in names.str()?.into_iter().zip(amounts) {
            let Some(name) = name else {
                continue;
            };
            let amount = amount.unwrap_or(0.0);
            for investor in split_investors(name) {
                investors.push(investor.to_string());
                values.push(amount);
            }
        }

        DataFrame::new(vec![
            Column::new(INVESTOR.into(), investors),
            Column::new(AMOUNT_CR.into(), values),
        ])
    }

    /// Top `n` individual investors by attributed funding.
    pub fn top_investors(df: &DataFrame, n: usize) -> PolarsResult<DataFrame> {
        let exploded = Self::explode_investors(df)?;
        if exploded.height() == 0 {
            debug!("no investor tokens, top investors empty");
            return Ok(exploded);
        }
        Self::top_by_category(&exploded, INVESTOR, n)
    }

    /// Number of funding rounds per city, top `n`.
    pub fn city_round_counts(df: &DataFrame, n: usize) -> PolarsResult<DataFrame> {
        Self::frequency(df, CITY_LOCATION, Some(n))
    }

    /// Funding per city, top `n`. Null amounts are skipped by the sum, so a
    /// city whose rounds are all undisclosed still appears with `0.0`.
    pub fn city_amounts(df: &DataFrame, n: usize) -> PolarsResult<DataFrame> {
        if !Self::has_columns(df, &[CITY_LOCATION, AMOUNT_CR]) {
            return Self::empty_table(CITY_LOCATION, DataType::String, AMOUNT_CR, DataType::Float64);
        }

        df.clone()
            .lazy()
            .filter(col(CITY_LOCATION).is_not_null())
            .group_by([col(CITY_LOCATION)])
            .agg([col(AMOUNT_CR).sum()])
            .sort(
                [AMOUNT_CR, CITY_LOCATION],
                SortMultipleOptions::default().with_order_descending_multi([true, false]),
            )
            .limit(Self::row_limit(n))
            .collect()
    }

    /// Number of rows per sector, most frequent first.
    pub fn sector_distribution(df: &DataFrame) -> PolarsResult<DataFrame> {
        Self::frequency(df, INDUSTRY_VERTICAL, None)
    }

    /// Row count per non-null value of `key`, descending.
    pub fn frequency(df: &DataFrame, key: &str, limit: Option<usize>) -> PolarsResult<DataFrame> {
        if !Self::has_columns(df, &[key]) {
            return Self::empty_table(key, DataType::String, COUNT, DataType::UInt32);
        }

        let counted = df
            .clone()
            .lazy()
            .filter(col(key).is_not_null())
            .group_by([col(key)])
            .agg([len().cast(DataType::UInt32).alias(COUNT)])
            .sort(
                [COUNT, key],
                SortMultipleOptions::default().with_order_descending_multi([true, false]),
            );

        match limit {
            Some(n) => counted.limit(Self::row_limit(n)).collect(),
            None => counted.collect(),
        }
    }

    fn sum_over_period(df: &DataFrame, period: &str, dtype: DataType) -> PolarsResult<DataFrame> {
        if !Self::has_columns(df, &[period, AMOUNT_CR]) {
            return Self::empty_table(period, dtype, AMOUNT_CR, DataType::Float64);
        }

        df.clone()
            .lazy()
            .filter(col(AMOUNT_CR).is_not_null())
            .group_by([col(period)])
            .agg([col(AMOUNT_CR).sum()])
            .sort(
                [period],
                SortMultipleOptions::default().with_nulls_last(true),
            )
            .collect()
    }

    /// `n` as a polars row count; anything past `IdxSize::MAX` means "all rows".
    fn row_limit(n: usize) -> IdxSize {
        IdxSize::try_from(n).unwrap_or(IdxSize::MAX)
    }

    fn has_columns(df: &DataFrame, names: &[&str]) -> bool {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|name| df.get_column_index(name).is_none())
            .collect();
        if !missing.is_empty() {
            debug!(?missing, "aggregation skipped, column(s) absent");
        }
        missing.is_empty()
    }

    fn empty_table(
        key: &str,
        key_dtype: DataType,
        value: &str,
        value_dtype: DataType,
    ) -> PolarsResult<DataFrame> {
        DataFrame::new(vec![
            Series::new_empty(key.into(), &key_dtype).into(),
            Series::new_empty(value.into(), &value_dtype).into(),
        ])
    }
}
