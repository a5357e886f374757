//! Sequential run loop: plan the window, fetch each item in order, tally
//! outcomes.

use crate::fetcher::{self, FetchOutcome};
use crate::schedule::{self, MonthWindow};
use crate::source::{self, FetchItem};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Outcome tally for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Files actually transferred this run.
    pub downloaded: u64,
    /// Files skipped because they already existed on disk.
    pub kept: u64,
    /// Target dates with no published file (404).
    pub missing: u64,
    /// Transport or storage failures. Counted on their own, never folded
    /// into `kept` or `missing`.
    pub errors: u64,
    /// Items considered in total.
    pub total: u64,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "downloaded: {}, kept: {}, missing (404): {}, errors: {}, total considered: {}",
            self.downloaded, self.kept, self.missing, self.errors, self.total
        )
    }
}

/// Every item the window calls for, chronological. Pure; this is also
/// what dry-run mode prints.
pub fn plan(window: &MonthWindow) -> Vec<FetchItem> {
    schedule::target_dates(window)
        .into_iter()
        .map(source::build_item)
        .collect()
}

/// Like [`plan`] against a different base URL (tests, mirrors).
pub fn plan_with_base(window: &MonthWindow, base_url: &str) -> Vec<FetchItem> {
    schedule::target_dates(window)
        .into_iter()
        .map(|d| source::build_item_with_base(base_url, d))
        .collect()
}

/// Fetches every item in order, one at a time. A failed item is logged
/// with its URL and counted under `errors`; the run always continues to
/// the next item.
pub fn fetch_window(
    items: &[FetchItem],
    dest_dir: &Path,
    headers: &HashMap<String, String>,
    overwrite: bool,
    timeout: Duration,
) -> RunSummary {
    let mut summary = RunSummary {
        total: items.len() as u64,
        ..RunSummary::default()
    };
    for item in items {
        tracing::info!("fetching {}", item.url);
        match fetcher::fetch_item(item, dest_dir, headers, overwrite, timeout) {
            Ok(FetchOutcome::Downloaded) => summary.downloaded += 1,
            Ok(FetchOutcome::Skipped) => summary.kept += 1,
            Ok(FetchOutcome::Missing) => summary.missing += 1,
            Err(e) => {
                tracing::error!("fetch failed for {}: {}", item.url, e);
                summary.errors += 1;
            }
        }
    }
    summary
}
