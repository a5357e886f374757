//! The fixed FINRA OTC biweekly source: filename and URL derivation.
//!
//! Published files follow one naming scheme,
//! `https://cdn.finra.org/equity/otcmarket/biweekly/shrt<YYYYMMDD>.csv`,
//! so an item is a total function of its target date.

use chrono::NaiveDate;

/// Base URL every biweekly file is published under.
pub const BASE_URL: &str = "https://cdn.finra.org/equity/otcmarket/biweekly/";

/// Filename prefix of every published file.
pub const PREFIX: &str = "shrt";

/// Filename extension of every published file.
pub const EXT: &str = ".csv";

/// One file to fetch, derived entirely from its target date. Created
/// fresh per run, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchItem {
    pub filename: String,
    pub url: String,
    pub date: NaiveDate,
}

/// Derives the canonical item for a target date.
pub fn build_item(date: NaiveDate) -> FetchItem {
    build_item_with_base(BASE_URL, date)
}

/// Like [`build_item`] against a different base URL (tests, mirrors).
/// `base_url` must end with `/`.
pub fn build_item_with_base(base_url: &str, date: NaiveDate) -> FetchItem {
    let filename = format!("{PREFIX}{}{EXT}", date.format("%Y%m%d"));
    let url = format!("{base_url}{filename}");
    FetchItem {
        filename,
        url,
        date,
    }
}
