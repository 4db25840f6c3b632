//! Worklog sources.
//!
//! A report only needs "the filtered worklog entries of one author in one
//! interval". [`WorklogSource`] is that capability; the CSV export reader
//! below and the Jira crawler in [`crate::api::jira`] are its two variants.

use crate::libs::error::Result;
use crate::libs::normalizer::FileRow;
use crate::libs::worklog::{WorklogEntry, WorklogFilter};
use crate::msg_debug;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Produces canonical worklog entries that pass a filter.
#[allow(async_fn_in_trait)]
pub trait WorklogSource {
    /// Reads every entry accepted by `filter`.
    ///
    /// # Errors
    ///
    /// Any malformed record or unavailable upstream aborts the whole read.
    async fn read_worklog(&mut self, filter: &WorklogFilter) -> Result<Vec<WorklogEntry>>;
}

/// Reads a Jira worklog CSV export from disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WorklogSource for FileSource {
    async fn read_worklog(&mut self, filter: &WorklogFilter) -> Result<Vec<WorklogEntry>> {
        let file = File::open(&self.path)?;
        read_csv_worklog(file, filter)
    }
}

/// Reads and normalizes every record of a CSV export.
///
/// The first line must be the header row. Rows with a blank started cell are
/// skipped before any parsing takes place.
pub fn read_csv_worklog<R: Read>(reader: R, filter: &WorklogFilter) -> Result<Vec<WorklogEntry>> {
    let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);

    let mut entries = Vec::new();
    let mut skipped = 0usize;
    for record in csv_reader.deserialize::<FileRow>() {
        match record?.normalize(filter)? {
            Some(entry) => entries.push(entry),
            None => skipped += 1,
        }
    }

    msg_debug!(format!("CSV worklog: {} rows accepted, {} skipped", entries.len(), skipped));
    Ok(entries)
}
