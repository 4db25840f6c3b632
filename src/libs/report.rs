//! Aggregation engine and report matrix.
//!
//! Turns a flat list of [`WorklogEntry`] values into an issue-by-day grid:
//!
//! ```text
//! User:   Jane Doe
//! Total              2h     1h30m   ...   3h30m
//!                    Mon    Tue     ...
//! Issue   Summary    01/03/21 02/03/21 ... Total
//! ABC-1   Login      2h             ...   2h
//! ABC-7   Export            1h30m   ...   1h30m
//! Total              2h     1h30m   ...   3h30m
//! ```
//!
//! Aggregation sums minutes per `(issue key, day)`; the matrix then fixes
//! the ordering (keys ascending, days contiguous) and computes totals.

use crate::libs::duration::format_minutes;
use crate::libs::error::{Result, TimesheetError};
use crate::libs::source::WorklogSource;
use crate::libs::worklog::{WorklogEntry, WorklogFilter};
use crate::msg_debug;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Minutes per day for each issue key, in no particular order.
///
/// Sums are `u64` so that adding `u32` entry durations cannot overflow.
pub type Aggregated = HashMap<String, HashMap<NaiveDate, u64>>;

/// Day-of-week label in the layout (`Mon`, `Tue`, ...).
pub const DAY_OF_WEEK_FORMAT: &str = "%a";
/// Column header date label (`dd/mm/yy`).
pub const HEADER_DATE_FORMAT: &str = "%d/%m/%y";

/// Groups entries by issue key and day, summing minutes.
///
/// Entries sharing a `(key, day)` pair add up; the result does not depend on
/// input order.
pub fn aggregate(entries: &[WorklogEntry]) -> Aggregated {
    let mut aggregated = Aggregated::new();
    for entry in entries {
        *aggregated
            .entry(entry.issue_key.clone())
            .or_default()
            .entry(entry.started_on)
            .or_insert(0) += u64::from(entry.duration_minutes);
    }
    aggregated
}

/// Maps each issue key to its summary.
///
/// When the same key carries different summaries the lexicographically
/// smallest one wins, so the mapping is independent of entry order.
pub fn summaries(entries: &[WorklogEntry]) -> HashMap<String, String> {
    let mut by_key: HashMap<String, String> = HashMap::new();
    for entry in entries {
        by_key
            .entry(entry.issue_key.clone())
            .and_modify(|summary| {
                if entry.summary < *summary {
                    *summary = entry.summary.clone();
                }
            })
            .or_insert_with(|| entry.summary.clone());
    }
    by_key
}

/// Every calendar day from `from` to `to`, inclusive and ascending.
pub fn date_range(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    from.iter_days().take_while(|date| *date <= to).collect()
}

/// One issue line of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub summary: String,
    /// Minutes for every day of the range; days without work hold 0.
    pub minutes: BTreeMap<NaiveDate, u64>,
    pub total: u64,
}

/// The issue-by-day grid with totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportMatrix {
    pub author: String,
    pub date_range: Vec<NaiveDate>,
    /// Rows keyed by issue key; iteration order is the rendering order.
    pub rows: BTreeMap<String, ReportRow>,
    pub column_totals: BTreeMap<NaiveDate, u64>,
    pub grand_total: u64,
}

impl ReportMatrix {
    /// Lays aggregated minutes out over the `from..=to` range.
    ///
    /// # Errors
    ///
    /// Returns [`TimesheetError::InvalidRange`] when `from` is after `to`.
    pub fn build(
        aggregated: &Aggregated,
        summary_by_key: &HashMap<String, String>,
        author: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Self> {
        if from > to {
            return Err(TimesheetError::InvalidRange { from, to });
        }
        let date_range = date_range(from, to);

        let mut rows = BTreeMap::new();
        for (key, by_date) in aggregated {
            let minutes: BTreeMap<NaiveDate, u64> = date_range
                .iter()
                .map(|date| (*date, by_date.get(date).copied().unwrap_or(0)))
                .collect();
            let total = minutes.values().sum();
            let summary = summary_by_key.get(key).cloned().unwrap_or_default();
            rows.insert(key.clone(), ReportRow { summary, minutes, total });
        }

        let column_totals: BTreeMap<NaiveDate, u64> = date_range
            .iter()
            .map(|date| (*date, rows.values().map(|row| row.minutes[date]).sum()))
            .collect();
        let grand_total = column_totals.values().sum();

        Ok(Self {
            author: author.to_string(),
            date_range,
            rows,
            column_totals,
            grand_total,
        })
    }

    /// Aggregates `entries` and builds the matrix for `filter`.
    pub fn from_entries(entries: &[WorklogEntry], filter: &WorklogFilter) -> Result<Self> {
        Self::build(&aggregate(entries), &summaries(entries), filter.author(), filter.from(), filter.to())
    }

    /// Minutes logged on `key` at `date`, 0 when absent.
    pub fn cell(&self, key: &str, date: NaiveDate) -> u64 {
        self.rows
            .get(key)
            .and_then(|row| row.minutes.get(&date).copied())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Produces the fixed row sequence renderers must reproduce.
    ///
    /// Author row, totals row, day-of-week row, column headers, one row per
    /// issue key in ascending order, and a trailing totals row. Durations are
    /// formatted with [`format_minutes`].
    pub fn layout(&self) -> Vec<LayoutRow> {
        let mut layout = Vec::with_capacity(self.rows.len() + 5);

        layout.push(LayoutRow::new(LayoutRowKind::Author, vec!["User:".to_string(), self.author.clone()]));
        layout.push(self.totals_row());

        let mut day_of_week = vec![String::new(), String::new()];
        day_of_week.extend(self.date_range.iter().map(|date| date.format(DAY_OF_WEEK_FORMAT).to_string()));
        layout.push(LayoutRow::new(LayoutRowKind::DayOfWeek, day_of_week));

        let mut header = vec!["Issue".to_string(), "Summary".to_string()];
        header.extend(self.date_range.iter().map(|date| date.format(HEADER_DATE_FORMAT).to_string()));
        header.push("Total".to_string());
        layout.push(LayoutRow::new(LayoutRowKind::Header, header));

        for (key, row) in &self.rows {
            let mut cells = vec![key.clone(), row.summary.clone()];
            cells.extend(row.minutes.values().map(|minutes| format_minutes(*minutes)));
            cells.push(format_minutes(row.total));
            layout.push(LayoutRow::new(LayoutRowKind::Issue, cells));
        }

        layout.push(self.totals_row());
        layout
    }

    fn totals_row(&self) -> LayoutRow {
        let mut cells = vec!["Total".to_string(), String::new()];
        cells.extend(self.column_totals.values().map(|minutes| format_minutes(*minutes)));
        cells.push(format_minutes(self.grand_total));
        LayoutRow::new(LayoutRowKind::Totals, cells)
    }
}

/// Role of a layout row, used by renderers for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LayoutRowKind {
    Author,
    Totals,
    DayOfWeek,
    Header,
    Issue,
}

/// A rendered row of text cells, starting at column 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutRow {
    pub kind: LayoutRowKind,
    pub cells: Vec<String>,
}

impl LayoutRow {
    pub fn new(kind: LayoutRowKind, cells: Vec<String>) -> Self {
        Self { kind, cells }
    }
}

/// Reads the worklog from `source` and builds the report for `filter`.
pub async fn generate_report<S: WorklogSource>(source: &mut S, filter: &WorklogFilter) -> Result<ReportMatrix> {
    let entries = source.read_worklog(filter).await?;
    msg_debug!(format!("Building report from {} worklog entries", entries.len()));
    ReportMatrix::from_entries(&entries, filter)
}
