use super::jira::IssueQuery;
use super::JiraApi;
use crate::libs::error::{Result, TimesheetError};
use crate::libs::messages::Message;
use crate::libs::normalizer::{IssueMeta, PendingWorklog};
use crate::libs::source::WorklogSource;
use crate::libs::worklog::{WorklogEntry, WorklogFilter};
use crate::{msg_debug, msg_info, msg_warning};
use chrono::{NaiveDate, NaiveTime};
use std::collections::{BTreeSet, HashMap};

/// Hard cap on issue search pages per request.
///
/// The search normally ends on an empty page; the cap only bounds a
/// pagination cursor that never runs dry.
pub const MAX_ISSUE_PAGES: usize = 100;

/// Issues requested per search page.
pub const ISSUE_PAGE_SIZE: usize = 50;

/// The Jira cloud instance every crawl call addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudSession {
    cloud_id: String,
}

impl CloudSession {
    pub fn new(cloud_id: impl Into<String>) -> Self {
        Self { cloud_id: cloud_id.into() }
    }

    pub fn cloud_id(&self) -> &str {
        &self.cloud_id
    }
}

/// Midnight UTC of `date` in epoch milliseconds.
pub fn to_epoch_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Drives the crawl steps against a [`JiraApi`].
///
/// Every step after [`resolve_session`](Self::resolve_session) takes the
/// session explicitly; the crawler itself holds no mutable state.
#[derive(Debug, Clone)]
pub struct WorklogCrawler<A> {
    api: A,
}

impl<A: JiraApi> WorklogCrawler<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Step 1: looks up the cloud id of the first accessible site.
    pub async fn resolve_session(&self) -> Result<CloudSession> {
        let resource = self
            .api
            .accessible_resources()
            .await?
            .and_then(|resources| resources.into_iter().next())
            .ok_or_else(|| TimesheetError::upstream("could not read accessible resources"))?;

        msg_info!(Message::CloudSessionResolved(resource.id.clone()));
        Ok(CloudSession::new(resource.id))
    }

    /// Step 2: ids of worklogs updated since midnight UTC of `from`.
    ///
    /// Not yet filtered by author or issue.
    pub async fn discover_worklog_ids(&self, session: &CloudSession, from: NaiveDate) -> Result<Vec<u64>> {
        let updated = self
            .api
            .updated_worklogs(session.cloud_id(), to_epoch_millis(from))
            .await?
            .ok_or_else(|| TimesheetError::upstream("cannot read worklogs"))?;

        let ids: Vec<u64> = updated.values.iter().map(|worklog| worklog.worklog_id).collect();
        msg_info!(Message::WorklogIdsDiscovered(ids.len()));
        Ok(ids)
    }

    /// Step 3: fetches details for `ids` and applies the author/date filter.
    ///
    /// Filtering here keeps the issue id set of step 4 small.
    pub async fn fetch_worklogs(&self, session: &CloudSession, ids: &[u64], filter: &WorklogFilter) -> Result<Vec<PendingWorklog>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let worklogs = self.api.worklog_list(session.cloud_id(), ids).await?;

        let mut pending = Vec::new();
        for worklog in &worklogs {
            if let Some(kept) = worklog.normalize(filter)? {
                pending.push(kept);
            }
        }
        msg_info!(Message::WorklogsFiltered(worklogs.len(), pending.len()));
        Ok(pending)
    }

    /// Step 4: pages through the issue search and keeps the issues in `issue_ids`.
    ///
    /// Each page starts at the number of issues read so far. The loop ends on
    /// the first empty page or after [`MAX_ISSUE_PAGES`] pages. Issues outside
    /// `issue_ids` are discarded even when the search returns them.
    pub async fn resolve_issues(
        &self,
        session: &CloudSession,
        projects: &[String],
        issue_ids: &BTreeSet<String>,
    ) -> Result<HashMap<String, IssueMeta>> {
        let mut resolved = HashMap::new();
        if issue_ids.is_empty() {
            return Ok(resolved);
        }

        let query = IssueQuery::new(projects, issue_ids.clone());
        let mut read = 0usize;
        let mut exhausted = false;
        for page in 1..=MAX_ISSUE_PAGES {
            let result = self
                .api
                .search_issues(session.cloud_id(), &query, read, ISSUE_PAGE_SIZE)
                .await?
                .ok_or_else(|| TimesheetError::upstream("cannot read issues"))?;

            msg_debug!(Message::IssuePageFetched(page, result.issues.len()));
            if result.issues.is_empty() {
                exhausted = true;
                break;
            }
            read += result.issues.len();
            for issue in result.issues {
                if issue_ids.contains(&issue.id) {
                    resolved.insert(issue.id.clone(), issue.meta());
                }
            }
        }
        if !exhausted {
            msg_warning!(Message::IssuePageLimitReached(MAX_ISSUE_PAGES));
        }

        msg_info!(Message::IssuesResolved(resolved.len()));
        Ok(resolved)
    }

    /// Steps 2 to 5 for an already resolved session.
    ///
    /// Worklogs whose issue was not returned by the search are dropped
    /// silently.
    pub async fn crawl(&self, session: &CloudSession, projects: &[String], filter: &WorklogFilter) -> Result<Vec<WorklogEntry>> {
        let ids = self.discover_worklog_ids(session, filter.from()).await?;
        let pending = self.fetch_worklogs(session, &ids, filter).await?;

        let issue_ids: BTreeSet<String> = pending.iter().map(|worklog| worklog.issue_id.clone()).collect();
        let issues = self.resolve_issues(session, projects, &issue_ids).await?;

        join(pending, &issues)
    }
}

/// Step 5: completes pending worklogs with their issue metadata.
pub fn join(pending: Vec<PendingWorklog>, issues: &HashMap<String, IssueMeta>) -> Result<Vec<WorklogEntry>> {
    let total = pending.len();
    let mut entries = Vec::with_capacity(total);
    for worklog in pending {
        if let Some(issue) = issues.get(&worklog.issue_id) {
            entries.push(worklog.join(issue)?);
        }
    }
    msg_info!(Message::WorklogsJoined(entries.len(), total - entries.len()));
    Ok(entries)
}

/// Jira Cloud as a [`WorklogSource`] for a fixed set of projects.
///
/// The cloud session is resolved on first use and reused for every later
/// read; it is never refreshed.
#[derive(Debug, Clone)]
pub struct JiraSource<A> {
    crawler: WorklogCrawler<A>,
    projects: Vec<String>,
    session: Option<CloudSession>,
}

impl<A: JiraApi> JiraSource<A> {
    pub fn new(api: A, projects: Vec<String>) -> Self {
        Self {
            crawler: WorklogCrawler::new(api),
            projects,
            session: None,
        }
    }

    /// Uses `session` instead of resolving one.
    pub fn with_session(mut self, session: CloudSession) -> Self {
        self.session = Some(session);
        self
    }

    pub fn session(&self) -> Option<&CloudSession> {
        self.session.as_ref()
    }

    pub fn crawler(&self) -> &WorklogCrawler<A> {
        &self.crawler
    }

    async fn ensure_session(&mut self) -> Result<CloudSession> {
        if let Some(session) = &self.session {
            return Ok(session.clone());
        }
        let session = self.crawler.resolve_session().await?;
        self.session = Some(session.clone());
        Ok(session)
    }
}

impl<A: JiraApi> WorklogSource for JiraSource<A> {
    async fn read_worklog(&mut self, filter: &WorklogFilter) -> Result<Vec<WorklogEntry>> {
        let session = self.ensure_session().await?;
        self.crawler.crawl(&session, &self.projects, filter).await
    }
}
