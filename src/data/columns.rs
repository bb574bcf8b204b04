//! Canonical column names of the normalized funding table.

pub const STARTUP_NAME: &str = "startup_name";
pub const INDUSTRY_VERTICAL: &str = "industry_vertical";
pub const SUB_VERTICAL: &str = "sub_vertical";
pub const CITY_LOCATION: &str = "city_location";
pub const INVESTORS_NAME: &str = "investors_name";
pub const INVESTMENT_TYPE: &str = "investment_type";
pub const DATE: &str = "date";
pub const AMOUNT_CR: &str = "amount_cr";

// Derived
pub const YEAR: &str = "year";
pub const MONTH: &str = "month";
pub const STARTUP_KEY: &str = "startup_key";
pub const INVESTOR_KEY: &str = "investor_key";

// Aggregate outputs
pub const INVESTOR: &str = "investor";
pub const COUNT: &str = "count";

/// Free-text columns that are trimmed and null-normalized.
pub const TEXT_COLUMNS: [&str; 6] = [
    STARTUP_NAME,
    INDUSTRY_VERTICAL,
    SUB_VERTICAL,
    CITY_LOCATION,
    INVESTORS_NAME,
    INVESTMENT_TYPE,
];

/// Columns shown in an entity's detail listing, in display order.
pub const DETAIL_COLUMNS: [&str; 6] = [
    STARTUP_NAME,
    CITY_LOCATION,
    INDUSTRY_VERTICAL,
    SUB_VERTICAL,
    INVESTORS_NAME,
    DATE,
];

/// Header spellings seen in funding exports, mapped to canonical names.
/// Applied after the snake_case rename and only when the target is absent.
pub const HEADER_ALIASES: [(&str, &str); 7] = [
    ("date_dd/mm/yyyy", DATE),
    ("subvertical", SUB_VERTICAL),
    ("sub-vertical", SUB_VERTICAL),
    ("city__location", CITY_LOCATION),
    ("investmentntype", INVESTMENT_TYPE),
    ("investment_type_", INVESTMENT_TYPE),
    ("amount", AMOUNT_CR),
];
