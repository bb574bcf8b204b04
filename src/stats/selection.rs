//! Selection helpers: pick one entity's rows and list the selectable entities.

use crate::data::columns::{DETAIL_COLUMNS, INVESTORS_NAME, INVESTOR_KEY, STARTUP_KEY, STARTUP_NAME};
use crate::data::{clean_entity_name, split_investors};
use polars::prelude::*;
use std::collections::BTreeSet;

pub struct Selection;

impl Selection {
    /// Rows whose startup key equals the cleaned form of `name`.
    pub fn filter_by_startup(df: &DataFrame, name: &str) -> PolarsResult<DataFrame> {
        Self::filter_by_key(df, STARTUP_KEY, name)
    }

    /// Rows whose whole investors field cleans to the same key as `name`.
    ///
    /// A row listing several investors only matches the full list; use
    /// [`Selection::filter_by_co_investor`] to match any participant.
    pub fn filter_by_investor(df: &DataFrame, name: &str) -> PolarsResult<DataFrame> {
        Self::filter_by_key(df, INVESTOR_KEY, name)
    }

    /// Rows where any investor listed on the row cleans to the key of `name`.
    pub fn filter_by_co_investor(df: &DataFrame, name: &str) -> PolarsResult<DataFrame> {
        let (Some(key), Ok(names)) = (clean_entity_name(Some(name)), df.column(INVESTORS_NAME))
        else {
            return Ok(df.slice(0, 0));
        };

        let mask: BooleanChunked = names
            .str()?
            .into_iter()
            .map(|cell| {
                cell.is_some_and(|cell| {
                    split_investors(cell)
                        .into_iter()
                        .any(|token| clean_entity_name(Some(token)).as_deref() == Some(key.as_str()))
                })
            })
            .collect();
        df.filter(&mask)
    }

    /// Sorted distinct startup keys.
    pub fn startup_keys(df: &DataFrame) -> PolarsResult<Vec<String>> {
        Self::distinct_sorted(df, STARTUP_KEY)
    }

    /// Sorted distinct investor keys.
    pub fn investor_keys(df: &DataFrame) -> PolarsResult<Vec<String>> {
        Self::distinct_sorted(df, INVESTOR_KEY)
    }

    /// First display-form startup name among the rows.
    pub fn display_name(df: &DataFrame) -> Option<String> {
        df.column(STARTUP_NAME)
            .ok()?
            .str()
            .ok()?
            .into_iter()
            .flatten()
            .next()
            .map(str::to_string)
    }

    /// Listing columns present in the table, in display order.
    pub fn entity_details(df: &DataFrame) -> PolarsResult<DataFrame> {
        let present: Vec<&str> = DETAIL_COLUMNS
            .iter()
            .copied()
            .filter(|name| df.get_column_index(name).is_some())
            .collect();
        df.select(present)
    }

    fn filter_by_key(df: &DataFrame, key_column: &str, name: &str) -> PolarsResult<DataFrame> {
        match (clean_entity_name(Some(name)), df.get_column_index(key_column)) {
            (Some(key), Some(_)) => df
                .clone()
                .lazy()
                .filter(col(key_column).eq(lit(key)))
                .collect(),
            _ => Ok(df.slice(0, 0)),
        }
    }

    fn distinct_sorted(df: &DataFrame, key_column: &str) -> PolarsResult<Vec<String>> {
        let Ok(column) = df.column(key_column) else {
            return Ok(Vec::new());
        };
        let keys: BTreeSet<String> = column
            .str()?
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect();
        Ok(keys.into_iter().collect())
    }
}
