//! Per-entity summary metrics for a selected company or investor.

use crate::data::columns::{AMOUNT_CR, DATE, STARTUP_NAME};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;
use statrs::statistics::{Data, Max, Median};
use std::collections::HashSet;

/// Headline metrics for one entity's funding rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySummary {
    /// Sum of disclosed amounts (crore).
    pub total_amount: f64,
    /// Every row counts as a round, disclosed or not.
    pub rounds: usize,
    /// `total_amount / rounds`, or `0.0` with no rounds.
    pub average_amount: f64,
    pub last_event: Option<NaiveDate>,
    pub distinct_startups: usize,
    pub disclosed_rounds: usize,
    pub median_amount: Option<f64>,
    pub largest_amount: Option<f64>,
}

impl Default for EntitySummary {
    fn default() -> Self {
        Self {
            total_amount: 0.0,
            rounds: 0,
            average_amount: 0.0,
            last_event: None,
            distinct_startups: 0,
            disclosed_rounds: 0,
            median_amount: None,
            largest_amount: None,
        }
    }
}

pub struct SummaryCalculator;

impl SummaryCalculator {
    /// Summarize a filtered slice of the normalized table.
    pub fn summarize(df: &DataFrame) -> PolarsResult<EntitySummary> {
        let rounds = df.height();
        if rounds == 0 {
            return Ok(EntitySummary::default());
        }

        let amounts: Vec<f64> = match df.column(AMOUNT_CR) {
            Ok(column) => column.f64()?.into_iter().flatten().collect(),
            Err(_) => Vec::new(),
        };
        let total_amount: f64 = amounts.iter().sum();

        let last_event = match df.column(DATE) {
            Ok(column) => column.date()?.as_date_iter().flatten().max(),
            Err(_) => None,
        };

        let distinct_startups = match df.column(STARTUP_NAME) {
            Ok(column) => column.str()?.into_iter().flatten().collect::<HashSet<_>>().len(),
            Err(_) => 0,
        };

        let disclosed_rounds = amounts.len();
        let (median_amount, largest_amount) = if amounts.is_empty() {
            (None, None)
        } else {
            let data = Data::new(amounts);
            (Some(data.median()), Some(data.max()))
        };

        Ok(EntitySummary {
            total_amount,
            rounds,
            average_amount: Self::average(total_amount, rounds),
            last_event,
            distinct_startups,
            disclosed_rounds,
            median_amount,
            largest_amount,
        })
    }

    /// Average per round; zero rounds averages to zero.
    pub fn average(total: f64, rounds: usize) -> f64 {
        if rounds == 0 {
            0.0
        } else {
            total / rounds as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rounds_average_to_zero() {
        assert_eq!(SummaryCalculator::average(0.0, 0), 0.0);
        assert_eq!(SummaryCalculator::average(120.0, 0), 0.0);
        assert_eq!(SummaryCalculator::average(120.0, 4), 30.0);
    }
}
