//! # Timesheet
//!
//! Builds an issue-by-day timesheet for one author from Jira worklogs.
//!
//! ## Features
//!
//! - **Two sources**: a Jira worklog CSV export or the Jira Cloud REST API
//! - **Aggregation**: minutes summed per issue and day, with per-issue and per-day totals
//! - **Export**: Excel, CSV and JSON renderers sharing one row layout
//!
//! ## Usage
//!
//! ```rust,no_run
//! use timesheet::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod libs;
