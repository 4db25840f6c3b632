//! Canonical worklog model and the report filter.
//!
//! Both sources (CSV export and Jira API) produce [`WorklogEntry`] values.
//! An entry is built once per source record, never mutated, and consumed by
//! aggregation.

use crate::libs::error::{Result, TimesheetError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single logged time entry, normalized from either source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorklogEntry {
    /// Issue key such as `PROJ-42`.
    pub issue_key: String,
    /// Jira internal issue id. Empty for rows read from a file.
    pub issue_id: String,
    pub issue_type: String,
    pub summary: String,
    /// Display name of the person who logged the time.
    pub author: String,
    /// Calendar day the work was logged on; any time of day is discarded.
    pub started_on: NaiveDate,
    pub duration_minutes: u32,
}

/// Author and inclusive date interval a report is restricted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorklogFilter {
    author: String,
    from: NaiveDate,
    to: NaiveDate,
}

impl WorklogFilter {
    /// Creates a filter for `author` between `from` and `to`, both inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`TimesheetError::InvalidRange`] when `from` is after `to`.
    /// The bounds are never swapped.
    pub fn new(author: impl Into<String>, from: NaiveDate, to: NaiveDate) -> Result<Self> {
        if from > to {
            return Err(TimesheetError::InvalidRange { from, to });
        }
        Ok(Self {
            author: author.into(),
            from,
            to,
        })
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// Exact, case-sensitive author comparison.
    pub fn matches_author(&self, author: &str) -> bool {
        self.author == author
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// Both predicates a record must pass to enter the report.
    pub fn accepts(&self, author: &str, started_on: NaiveDate) -> bool {
        self.matches_author(author) && self.contains(started_on)
    }
}
