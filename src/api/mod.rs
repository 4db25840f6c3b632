//! Remote worklog ingestion.
//!
//! Collecting one author's worklogs from Jira Cloud takes four dependent
//! calls, each needing the output of the previous one:
//!
//! 1. **Cloud session**: look up the cloud id the token grants access to
//! 2. **Worklog ids**: list worklogs updated since the start of the interval
//! 3. **Worklog details**: fetch all of them in one batch, then keep only the
//!    author's worklogs inside the interval
//! 4. **Issues**: page through an issue search restricted to the target
//!    projects and the surviving issue ids, then join
//!
//! [`JiraApi`] is the transport for those calls: [`jira::JiraCloud`] talks
//! HTTP, tests substitute an in-memory fake. [`crawler::WorklogCrawler`]
//! drives the sequence and [`crawler::JiraSource`] exposes it as a
//! [`crate::libs::source::WorklogSource`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use timesheet::api::{JiraCloud, JiraConfig, JiraSource};
//! use timesheet::libs::{report::generate_report, worklog::WorklogFilter};
//! use chrono::NaiveDate;
//!
//! # async fn run() -> timesheet::libs::error::Result<()> {
//! let config = JiraConfig { access_token: "token".into(), ..JiraConfig::default() };
//! let mut source = JiraSource::new(JiraCloud::new(&config), vec!["ABC".into()]);
//! let from = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
//! let filter = WorklogFilter::new("Jane Doe", from, from)?;
//! let report = generate_report(&mut source, &filter).await?;
//! # Ok(())
//! # }
//! ```

use crate::libs::error::Result;

pub mod crawler;
pub mod jira;

pub use crawler::{CloudSession, JiraSource, WorklogCrawler, ISSUE_PAGE_SIZE, MAX_ISSUE_PAGES};
pub use jira::{AccessibleResource, ApiWorklog, IssueQuery, JiraCloud, JiraConfig, JiraIssue, SearchPage, UpdatedWorklogs};

/// The remote calls of the worklog crawl.
///
/// `Ok(None)` means the upstream answered without a payload. Whether that is
/// fatal is decided by [`WorklogCrawler`], not by the transport.
#[allow(async_fn_in_trait)]
pub trait JiraApi {
    /// Sites reachable with the current token; the first one is used.
    async fn accessible_resources(&self) -> Result<Option<Vec<AccessibleResource>>>;

    /// Worklogs updated since `since` (epoch milliseconds).
    async fn updated_worklogs(&self, cloud_id: &str, since: i64) -> Result<Option<UpdatedWorklogs>>;

    /// Worklog details for `ids`, one record per id. An absent body is an
    /// empty list.
    async fn worklog_list(&self, cloud_id: &str, ids: &[u64]) -> Result<Vec<ApiWorklog>>;

    /// One page of the issue search, starting at `start_at`.
    async fn search_issues(&self, cloud_id: &str, query: &IssueQuery, start_at: usize, max_results: usize) -> Result<Option<SearchPage>>;
}
