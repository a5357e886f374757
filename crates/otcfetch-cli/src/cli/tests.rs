//! CLI parse and window-resolution tests.

use super::{parse_year_month, Cli};
use chrono::NaiveDate;
use clap::Parser;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn parse_defaults() {
    let cli = parse(&["otcfetch"]);
    assert!(cli.start.is_none());
    assert!(cli.months_back.is_none());
    assert!(cli.out_dir.is_none());
    assert!(cli.headers.is_empty());
    assert!(!cli.overwrite);
    assert!(!cli.dry_run);
    assert!(!cli.verbose);
}

#[test]
fn parse_explicit_window_and_flags() {
    let cli = parse(&[
        "otcfetch",
        "--start",
        "2024-01",
        "--end",
        "2024-06",
        "--out-dir",
        "/tmp/finra",
        "--header",
        "Accept=text/csv",
        "--header",
        "X-Token=abc",
        "--overwrite",
        "--dry-run",
    ]);
    assert_eq!(cli.start.as_deref(), Some("2024-01"));
    assert_eq!(cli.end.as_deref(), Some("2024-06"));
    assert_eq!(cli.headers.len(), 2);
    assert!(cli.overwrite);
    assert!(cli.dry_run);
}

#[test]
fn start_without_end_is_rejected() {
    assert!(Cli::try_parse_from(["otcfetch", "--start", "2024-01"]).is_err());
}

#[test]
fn end_without_start_is_rejected() {
    assert!(Cli::try_parse_from(["otcfetch", "--end", "2024-06"]).is_err());
}

#[test]
fn months_back_conflicts_with_explicit_window() {
    assert!(Cli::try_parse_from([
        "otcfetch",
        "--start",
        "2024-01",
        "--end",
        "2024-06",
        "--months-back",
        "3"
    ])
    .is_err());
}

#[test]
fn parse_year_month_first_of_month() {
    assert_eq!(parse_year_month("2024-02").unwrap(), ymd(2024, 2, 1));
    assert!(parse_year_month("2024").is_err());
    assert!(parse_year_month("2024-13").is_err());
    assert!(parse_year_month("garbage").is_err());
}

#[test]
fn resolve_explicit_window() {
    let cli = parse(&["otcfetch", "--start", "2024-11", "--end", "2025-02"]);
    let w = cli.resolve_window(ymd(2026, 8, 30)).unwrap();
    assert_eq!(w.start(), ymd(2024, 11, 1));
    assert_eq!(w.end(), ymd(2025, 2, 1));
}

#[test]
fn resolve_explicit_window_end_before_start_fails() {
    let cli = parse(&["otcfetch", "--start", "2025-02", "--end", "2024-11"]);
    assert!(cli.resolve_window(ymd(2026, 8, 30)).is_err());
}

#[test]
fn months_back_one_is_just_the_current_month() {
    let cli = parse(&["otcfetch", "--months-back", "1"]);
    let w = cli.resolve_window(ymd(2026, 8, 30)).unwrap();
    assert_eq!(w.start(), ymd(2026, 8, 1));
    assert_eq!(w.end(), ymd(2026, 8, 1));
}

#[test]
fn months_back_borrows_across_the_year_boundary() {
    let cli = parse(&["otcfetch", "--months-back", "12"]);
    let w = cli.resolve_window(ymd(2026, 3, 10)).unwrap();
    assert_eq!(w.start(), ymd(2025, 4, 1));
    assert_eq!(w.end(), ymd(2026, 3, 1));
}

#[test]
fn months_back_defaults_to_twelve() {
    let cli = parse(&["otcfetch"]);
    let w = cli.resolve_window(ymd(2026, 8, 30)).unwrap();
    assert_eq!(w.start(), ymd(2025, 9, 1));
    assert_eq!(w.end(), ymd(2026, 8, 1));
}

#[test]
fn months_back_zero_falls_back_to_default() {
    let cli = parse(&["otcfetch", "--months-back", "0"]);
    let w = cli.resolve_window(ymd(2026, 8, 30)).unwrap();
    assert_eq!(w.start(), ymd(2025, 9, 1));
}

#[test]
fn months_back_exact_multiple_of_twelve() {
    let cli = parse(&["otcfetch", "--months-back", "24"]);
    let w = cli.resolve_window(ymd(2026, 1, 15)).unwrap();
    // 23 months before 2026-01 is 2024-02.
    assert_eq!(w.start(), ymd(2024, 2, 1));
    assert_eq!(w.end(), ymd(2026, 1, 1));
}
