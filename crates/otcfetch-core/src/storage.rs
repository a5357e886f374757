//! Disk lifecycle for one download: write to a `.part` temp file, then
//! atomically rename to the final name once the full body is on disk.
//!
//! The final filename never holds a partial body; an interrupted transfer
//! leaves at most an orphaned `.part` file.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const PART_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path
/// (e.g. `shrt20250314.csv` -> `shrt20250314.csv.part`).
pub fn part_path(final_path: &Path) -> PathBuf {
    let mut p = final_path.as_os_str().to_owned();
    p.push(PART_SUFFIX);
    PathBuf::from(p)
}

/// In-progress download file writing sequentially to `<final>.part`.
pub struct PartFile {
    file: File,
    path: PathBuf,
}

impl PartFile {
    /// Creates (or truncates) the temp file for `final_path`.
    pub fn create(final_path: &Path) -> io::Result<Self> {
        let path = part_path(final_path);
        let file = File::create(&path)?;
        Ok(PartFile { file, path })
    }

    /// Appends a chunk of the response body.
    pub fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.file.write_all(data)
    }

    /// Path of the temp file currently being written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flushes, fsyncs, and atomically renames onto `final_path`.
    /// Consumes the writer so nothing can touch the file afterwards.
    pub fn finalize(self, final_path: &Path) -> io::Result<()> {
        let PartFile { mut file, path } = self;
        file.flush()?;
        file.sync_all()?;
        drop(file);
        fs::rename(&path, final_path)
    }
}
