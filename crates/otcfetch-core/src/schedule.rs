//! Target-date scheduling: twice-monthly dates with weekend rollback.
//!
//! FINRA publishes a biweekly file for the 15th and the last calendar day
//! of each month; when either falls on a weekend the publication date is
//! the preceding Friday. Everything here is a pure function of the window.

use anyhow::{bail, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Inclusive range of calendar months; both endpoints normalized to day 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl MonthWindow {
    /// Builds a window from any two dates; each collapses to the first of
    /// its month. `end` before `start` is an input error.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let start = first_of_month(start);
        let end = first_of_month(end);
        if end < start {
            bail!(
                "end month {} is before start month {}",
                end.format("%Y-%m"),
                start.format("%Y-%m")
            );
        }
        Ok(MonthWindow { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// All `(year, month)` pairs in the window, oldest first.
    pub fn months(&self) -> Months {
        Months {
            next: Some((self.start.year(), self.start.month())),
            last: (self.end.year(), self.end.month()),
        }
    }
}

/// Iterator over `(year, month)` pairs, stepping one month with year carry.
pub struct Months {
    next: Option<(i32, u32)>,
    last: (i32, u32),
}

impl Iterator for Months {
    type Item = (i32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let cur = self.next?;
        if cur > self.last {
            self.next = None;
            return None;
        }
        let (y, m) = cur;
        self.next = Some(if m == 12 { (y + 1, 1) } else { (y, m + 1) });
        Some(cur)
    }
}

fn first_of_month(d: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(d.year(), d.month(), 1).expect("day 1 exists in every month")
}

fn last_of_month(year: i32, month: u32) -> NaiveDate {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1).expect("day 1 exists in every month") - Duration::days(1)
}

/// Saturday rolls back one day, Sunday two; weekdays pass through.
/// Applied once per candidate; a rolled-back Friday is final.
pub fn roll_back_weekend(d: NaiveDate) -> NaiveDate {
    match d.weekday() {
        Weekday::Sat => d - Duration::days(1),
        Weekday::Sun => d - Duration::days(2),
        _ => d,
    }
}

/// Rolled-back `(mid, eom)` pair for one month. Month length (leap
/// February included) comes from real calendar arithmetic.
pub fn targets_for_month(year: i32, month: u32) -> (NaiveDate, NaiveDate) {
    let mid = NaiveDate::from_ymd_opt(year, month, 15).expect("every month has a 15th");
    (
        roll_back_weekend(mid),
        roll_back_weekend(last_of_month(year, month)),
    )
}

/// Every target date in the window: chronological month order, mid before
/// eom, de-duplicated preserving first-seen order.
pub fn target_dates(window: &MonthWindow) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    for (year, month) in window.months() {
        let (mid, eom) = targets_for_month(year, month);
        for d in [mid, eom] {
            // The sequence is non-decreasing, so checking the tail is a
            // full de-dup.
            if dates.last() != Some(&d) {
                dates.push(d);
            }
        }
    }
    dates
}
