//! CLI for the FINRA OTC biweekly fetcher.
//!
//! Resolves the month window from the arguments (explicit `--start/--end`
//! or `--months-back` from the current month), then drives the core plan
//! and fetch loop.

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::Parser;
use otcfetch_core::config;
use otcfetch_core::run;
use otcfetch_core::schedule::MonthWindow;
use otcfetch_core::source;
use std::fs;
use std::path::PathBuf;

/// Download FINRA OTC biweekly CSVs: one file for the 15th and one for
/// the last day of each month, rolled back to Friday over weekends.
#[derive(Debug, Parser)]
#[command(name = "otcfetch")]
#[command(about = "Download FINRA OTC biweekly CSVs (weekend rollback to Friday)", long_about = None)]
pub struct Cli {
    /// Start month YYYY-MM (inclusive). Requires --end.
    #[arg(long, value_name = "YYYY-MM", requires = "end", conflicts_with = "months_back")]
    pub start: Option<String>,

    /// End month YYYY-MM (inclusive). Requires --start.
    #[arg(long, value_name = "YYYY-MM", requires = "start")]
    pub end: Option<String>,

    /// Pull the past N full months up to the current month (default 12).
    #[arg(long, value_name = "N", conflicts_with = "end")]
    pub months_back: Option<u32>,

    /// Output directory (default from config, normally ./downloads).
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Extra HTTP header KEY=VALUE (repeatable).
    #[arg(long = "header", value_name = "KEY=VALUE")]
    pub headers: Vec<String>,

    /// Overwrite existing files if present.
    #[arg(long)]
    pub overwrite: bool,

    /// Print planned URLs without downloading.
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose logs.
    #[arg(long)]
    pub verbose: bool,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let window = self.resolve_window(Local::now().date_naive())?;

        // Config headers first, CLI flags win on conflict.
        let mut headers = cfg.headers.clone();
        headers.extend(config::parse_header_specs(&self.headers)?);

        let out_dir = self.out_dir.clone().unwrap_or_else(|| cfg.out_dir.clone());

        tracing::info!("=== FINRA biweekly fetch ===");
        tracing::info!("base url : {}", source::BASE_URL);
        tracing::info!(
            "window   : {} .. {}",
            window.start().format("%Y-%m"),
            window.end().format("%Y-%m")
        );
        tracing::info!("out dir  : {}", out_dir.display());
        tracing::info!("overwrite: {}", self.overwrite);
        tracing::info!("dry run  : {}", self.dry_run);
        if !headers.is_empty() {
            tracing::debug!("headers  : {:?}", headers.keys().collect::<Vec<_>>());
        }

        let items = run::plan(&window);

        if self.dry_run {
            for item in &items {
                println!(
                    "[DRY] {} -> {}  (weekday={})",
                    item.url,
                    out_dir.join(&item.filename).display(),
                    item.date.weekday()
                );
            }
            println!("Dry-run complete: {} file(s) planned.", items.len());
            return Ok(());
        }

        fs::create_dir_all(&out_dir)
            .with_context(|| format!("cannot create output directory {}", out_dir.display()))?;

        let summary = run::fetch_window(&items, &out_dir, &headers, self.overwrite, cfg.timeout());
        tracing::info!("done: {}", summary);
        println!("Done. {}", summary);
        Ok(())
    }

    /// The inclusive month window for this invocation. `today` is passed
    /// in so the months-back arithmetic is testable.
    fn resolve_window(&self, today: NaiveDate) -> Result<MonthWindow> {
        if let (Some(start), Some(end)) = (&self.start, &self.end) {
            return MonthWindow::new(parse_year_month(start)?, parse_year_month(end)?);
        }

        let months_back = match self.months_back {
            Some(n) if n > 0 => n,
            _ => 12,
        };
        // Window start = (months_back - 1) months before the current
        // month, so a value of 1 means just the current month.
        let shift = months_back - 1;
        let mut year = today.year() - (shift / 12) as i32;
        let mut month = today.month() as i32 - (shift % 12) as i32;
        if month <= 0 {
            year -= 1;
            month += 12;
        }
        let start = NaiveDate::from_ymd_opt(year, month as u32, 1)
            .context("months-back window start out of range")?;
        MonthWindow::new(start, today)
    }
}

/// Parse "YYYY-MM" to the first day of that month.
fn parse_year_month(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
        .with_context(|| format!("invalid month (expected YYYY-MM): {s}"))
}

#[cfg(test)]
mod tests;
