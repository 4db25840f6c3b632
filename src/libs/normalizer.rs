//! Row normalization for both worklog sources.
//!
//! The CSV export and the Jira API describe a worklog differently:
//!
//! - **CSV export**: one row per worklog with issue columns already present
//!   and a started value like `04/03/2021 9.30.00`.
//! - **API payload**: a worklog detail with an ISO timestamp
//!   (`2021-03-04T09:30:00.000+0000`) and only the owning issue id; key,
//!   type and summary arrive later from the issue search.
//!
//! Both end up as [`WorklogEntry`] once the author/date filter passes.

use crate::libs::duration::parse_minutes;
use crate::libs::error::{Result, TimesheetError};
use crate::libs::worklog::{WorklogEntry, WorklogFilter};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// Started format used by the Jira CSV export.
pub const FILE_STARTED_FORMAT: &str = "%d/%m/%Y %H.%M.%S";

/// Date portion of an API `started` timestamp.
pub const API_STARTED_FORMAT: &str = "%Y-%m-%d";

/// One record of a Jira worklog CSV export.
///
/// Only the columns below are read; any other column in the export is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct FileRow {
    #[serde(rename = "Issue Type", default)]
    pub issue_type: String,
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Summary", default)]
    pub summary: String,
    #[serde(rename = "Log Work.started", default)]
    pub started: String,
    #[serde(rename = "Log Work.timeSpent", default)]
    pub time_spent: String,
    #[serde(rename = "Log Work.authorDisplayName", default)]
    pub author: String,
}

impl FileRow {
    /// Normalizes the row against `filter`.
    ///
    /// Returns `Ok(None)` for rows with a blank started cell and for rows
    /// rejected by the filter. The time spent is only parsed for accepted
    /// rows, so a malformed duration logged by someone else does not abort
    /// the report.
    pub fn normalize(self, filter: &WorklogFilter) -> Result<Option<WorklogEntry>> {
        if self.started.trim().is_empty() {
            return Ok(None);
        }
        let started_on = parse_file_started(&self.started)?;
        if !filter.accepts(&self.author, started_on) {
            return Ok(None);
        }
        let duration_minutes = parse_minutes(&self.time_spent)?;

        Ok(Some(WorklogEntry {
            issue_key: self.key,
            issue_id: String::new(),
            issue_type: self.issue_type,
            summary: self.summary,
            author: self.author,
            started_on,
            duration_minutes,
        }))
    }
}

/// An API worklog that passed the author/date filter but has not yet been
/// joined with its issue.
///
/// The time spent stays raw until the join: worklogs whose issue is never
/// found are dropped without their duration being looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingWorklog {
    pub issue_id: String,
    pub author: String,
    pub started_on: NaiveDate,
    pub time_spent: String,
}

impl PendingWorklog {
    /// Builds a pending worklog from raw API fields, or `None` when the filter
    /// rejects it.
    pub fn from_api(
        issue_id: &str,
        author: &str,
        started: &str,
        time_spent: &str,
        filter: &WorklogFilter,
    ) -> Result<Option<Self>> {
        let started_on = parse_api_started(started)?;
        if !filter.accepts(author, started_on) {
            return Ok(None);
        }
        Ok(Some(Self {
            issue_id: issue_id.to_string(),
            author: author.to_string(),
            started_on,
            time_spent: time_spent.to_string(),
        }))
    }

    /// Completes the entry with the metadata of its issue.
    pub fn join(self, issue: &IssueMeta) -> Result<WorklogEntry> {
        let duration_minutes = parse_minutes(&self.time_spent)?;
        Ok(WorklogEntry {
            issue_key: issue.key.clone(),
            issue_id: self.issue_id,
            issue_type: issue.issue_type.clone(),
            summary: issue.summary.clone(),
            author: self.author,
            started_on: self.started_on,
            duration_minutes,
        })
    }
}

/// Issue metadata joined onto API worklogs, keyed by issue id by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IssueMeta {
    pub key: String,
    pub summary: String,
    pub issue_type: String,
}

/// Pads a single-digit hour with a leading zero.
///
/// `"04/03/2021 9.30.00"` becomes `"04/03/2021 09.30.00"`; values whose hour
/// already has two digits are returned unchanged.
///
/// # Errors
///
/// Returns [`TimesheetError::MalformedDate`] when there is no time part.
pub fn pad_single_digit_hour(raw: &str) -> Result<String> {
    let mut parts = raw.split(' ');
    let date = parts.next().unwrap_or_default();
    let time = parts
        .next()
        .ok_or_else(|| TimesheetError::MalformedDate(raw.to_string()))?;

    if is_single_digit_hour(time) {
        let rest: Vec<&str> = parts.collect();
        let mut padded = format!("{} 0{}", date, time);
        if !rest.is_empty() {
            padded.push(' ');
            padded.push_str(&rest.join(" "));
        }
        return Ok(padded);
    }
    Ok(raw.to_string())
}

/// Matches "digit, dot, at least one more char".
fn is_single_digit_hour(time: &str) -> bool {
    let bytes = time.as_bytes();
    bytes.len() >= 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.'
}

/// Parses a CSV export started value into its calendar day.
pub fn parse_file_started(raw: &str) -> Result<NaiveDate> {
    let padded = pad_single_digit_hour(raw.trim())?;
    NaiveDateTime::parse_from_str(&padded, FILE_STARTED_FORMAT)
        .map(|started| started.date())
        .map_err(|_| TimesheetError::MalformedDate(raw.to_string()))
}

/// Parses an API started timestamp, keeping only the part before `T`.
pub fn parse_api_started(raw: &str) -> Result<NaiveDate> {
    let date = raw.split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(date, API_STARTED_FORMAT).map_err(|_| TimesheetError::MalformedDate(raw.to_string()))
}
