//! Core library modules for timesheet.
//!
//! ## Modules
//!
//! - **Worklog model**: [`worklog`] entries and the author/date filter
//! - **Parsing**: [`duration`] strings and [`normalizer`] for CSV and API rows
//! - **Sources**: [`source`] capability and the CSV export reader
//! - **Reporting**: [`report`] aggregation and matrix, [`export`] and [`view`] renderers
//! - **Infrastructure**: [`config`], [`data_storage`], [`error`], [`messages`]
//!
//! ## Usage
//!
//! ```rust,no_run
//! use timesheet::libs::{report::generate_report, source::FileSource, worklog::WorklogFilter};
//! use chrono::NaiveDate;
//!
//! # async fn run() -> timesheet::libs::error::Result<()> {
//! let day = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
//! let filter = WorklogFilter::new("Jane Doe", day, day)?;
//! let report = generate_report(&mut FileSource::new("worklog.csv"), &filter).await?;
//! println!("{} minutes", report.grand_total);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data_storage;
pub mod duration;
pub mod error;
pub mod export;
pub mod messages;
pub mod normalizer;
pub mod report;
pub mod source;
pub mod view;
pub mod worklog;
