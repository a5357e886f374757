//! Idempotent single-file fetch.
//!
//! Policy, in order: skip when the destination already exists (unless
//! overwriting), streamed GET via curl, 404 as a non-fatal `Missing`
//! outcome, any other non-2xx as an error, atomic `.part`-then-rename
//! materialization on success.

use crate::source::FetchItem;
use crate::storage::PartFile;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::str;
use std::time::Duration;
use thiserror::Error;

/// Terminal state of one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Body streamed to disk and renamed into place.
    Downloaded,
    /// Destination already existed and overwrite was off; no request made.
    Skipped,
    /// Upstream returned 404. Not every target date has a published file,
    /// so this never aborts a run.
    Missing,
}

/// Failure of one fetch. Item-scoped: callers log it and keep going.
#[derive(Debug, Error)]
pub enum FetchError {
    /// curl transport failure (timeout, DNS, connect, recv).
    #[error(transparent)]
    Curl(#[from] curl::Error),
    /// Non-404, non-2xx HTTP status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Temp file create/write or final rename failed.
    #[error("storage: {0}")]
    Storage(#[from] io::Error),
}

/// Fetches one item into `dest_dir`.
///
/// The temp file is created lazily on the first body byte of a 2xx
/// response, so a 404 (or 5xx) body never touches disk. At most one file
/// is created per call; a mid-transfer failure orphans the `.part` file
/// and leaves the final name untouched.
pub fn fetch_item(
    item: &FetchItem,
    dest_dir: &Path,
    headers: &HashMap<String, String>,
    overwrite: bool,
    timeout: Duration,
) -> Result<FetchOutcome, FetchError> {
    let dest = dest_dir.join(&item.filename);
    if dest.exists() && !overwrite {
        tracing::info!("skip (exists): {}", item.filename);
        return Ok(FetchOutcome::Skipped);
    }

    // Shared between the header and write callbacks below; the transfer
    // runs on this thread only.
    let status: Cell<u32> = Cell::new(0);
    let part: RefCell<Option<PartFile>> = RefCell::new(None);
    let write_error: RefCell<Option<io::Error>> = RefCell::new(None);

    let mut easy = curl::easy::Easy::new();
    easy.url(&item.url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(Duration::from_secs(15))?;
    easy.timeout(timeout)?;

    let mut list = curl::easy::List::new();
    for (k, v) in headers {
        list.append(&format!("{}: {}", k.trim(), v.trim()))?;
    }
    if !headers.is_empty() {
        easy.http_headers(list)?;
    }

    let performed = {
        let mut transfer = easy.transfer();
        // Each response's status line passes through here (redirects
        // included); the last one seen wins.
        transfer.header_function(|data| {
            if let Some(code) = parse_status_line(data) {
                status.set(code);
            }
            true
        })?;
        transfer.write_function(|data| {
            // Drain non-2xx bodies without creating the temp file.
            if status.get() / 100 != 2 {
                return Ok(data.len());
            }
            let mut slot = part.borrow_mut();
            let written = match slot.as_mut() {
                Some(file) => file.write(data),
                None => PartFile::create(&dest).and_then(|mut file| {
                    file.write(data)?;
                    *slot = Some(file);
                    Ok(())
                }),
            };
            match written {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    *write_error.borrow_mut() = Some(e);
                    Ok(0) // abort the transfer
                }
            }
        })?;
        transfer.perform()
    };

    // A disk failure aborts the transfer from inside the write callback;
    // surface it instead of the curl abort it causes.
    if let Some(e) = write_error.into_inner() {
        return Err(FetchError::Storage(e));
    }
    performed?;

    let code = easy.response_code()?;
    if code == 404 {
        tracing::warn!("not found (404): {}", item.url);
        return Ok(FetchOutcome::Missing);
    }
    if code / 100 != 2 {
        return Err(FetchError::Http(code));
    }

    match part.into_inner() {
        Some(file) => file.finalize(&dest)?,
        // Zero-length body: the write callback never fired.
        None => PartFile::create(&dest)?.finalize(&dest)?,
    }
    tracing::info!("downloaded: {}", item.filename);
    Ok(FetchOutcome::Downloaded)
}

/// Extracts the numeric code from a status line such as `HTTP/1.1 404
/// Not Found` or `HTTP/2 200`. Other header lines yield `None`.
fn parse_status_line(data: &[u8]) -> Option<u32> {
    let line = str::from_utf8(data).ok()?;
    if !line.starts_with("HTTP/") {
        return None;
    }
    line.split_whitespace().nth(1)?.parse().ok()
}
