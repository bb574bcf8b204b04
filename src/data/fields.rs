//! Field Parsers Module
//! Pure, row-independent parsing and canonicalization of single cell values.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Text markers meaning "amount intentionally absent".
const AMOUNT_SENTINELS: [&str; 7] = ["undisclosed", "\u{2014}", "-", "na", "n/a", "nan", ""];

/// Fixed city alias table, keyed by the title-cased spelling.
const CITY_ALIASES: [(&str, &str); 4] = [
    ("Bangalore", "Bengaluru"),
    ("Bombay", "Mumbai"),
    ("New Delhi", "Delhi"),
    ("Ncr", "Delhi"),
];

/// Day-first date shapes. Two-digit years come first so that `%Y` never
/// swallows a short year.
const DATE_FORMATS: [&str; 10] = [
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d-%m-%y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d %b %Y",
    "%d %B %Y",
    "%d-%b-%Y",
];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

static AMOUNT_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\d\.\-eE]").unwrap());
static QUOTES: Lazy<Regex> = Lazy::new(|| Regex::new(r#"['"]+"#).unwrap());
static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static INVESTOR_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",|;| and | & |/|\|").unwrap());

/// Convert funding amounts like `152.38 Cr`, `1,234.5 Cr` or `Undisclosed`
/// to a number of crore. Returns `None` for sentinels and anything that does
/// not parse after stripping non-numeric characters.
pub fn parse_amount(raw: Option<&str>) -> Option<f64> {
    let trimmed = raw?.trim();
    let lowered = trimmed.to_lowercase();
    if AMOUNT_SENTINELS.contains(&lowered.as_str()) {
        return None;
    }

    let numeric = AMOUNT_NOISE.replace_all(trimmed, "");
    numeric.parse::<f64>().ok()
}

/// Standardize common city names. `None` passes through unchanged.
pub fn standardize_city(raw: Option<&str>) -> Option<String> {
    let titled = title_case(raw?.trim());
    let canonical = CITY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == titled)
        .map(|(_, city)| city.to_string())
        .unwrap_or(titled);
    Some(canonical)
}

/// Upper-case every letter that follows a non-letter, lower-case the rest.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut after_letter = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if after_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(ch);
            after_letter = false;
        }
    }
    out
}

/// Trim a free-text cell; blank cells and the stringified null `nan` become `None`.
pub fn clean_text(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() || trimmed == "nan" {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Canonical grouping key for a startup or investor name.
///
/// Lower-cases, drops quotes and every non-word/non-space character, then
/// collapses whitespace runs. Names that clean to nothing have no key.
pub fn clean_entity_name(raw: Option<&str>) -> Option<String> {
    let lowered = raw?.to_lowercase();
    let unquoted = QUOTES.replace_all(&lowered, "");
    let bare = PUNCTUATION.replace_all(&unquoted, "");
    let collapsed = WHITESPACE.replace_all(bare.trim(), " ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed.into_owned())
    }
}

/// Parse a calendar date using the day-first convention.
pub fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// `YYYY-MM` bucket for a date.
pub fn month_bucket(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Split a packed `investors_name` cell into trimmed, non-empty investor names.
pub fn split_investors(raw: &str) -> Vec<&str> {
    INVESTOR_SEPARATORS
        .split(raw)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}
