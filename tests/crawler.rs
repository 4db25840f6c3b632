#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeSet;
    use timesheet::api::jira::{
        AccessibleResource, ApiWorklog, IssueQuery, JiraIssue, JiraIssueFields, JiraIssueType, JiraUser, SearchPage,
        UpdatedWorklog, UpdatedWorklogs,
    };
    use timesheet::api::{CloudSession, JiraApi, JiraSource, WorklogCrawler, ISSUE_PAGE_SIZE, MAX_ISSUE_PAGES};
    use timesheet::libs::error::{Result, TimesheetError};
    use timesheet::libs::source::WorklogSource;
    use timesheet::libs::worklog::WorklogFilter;

    type SearchFn = Box<dyn Fn(usize, usize) -> Option<SearchPage>>;

    /// In-memory Jira that records how it was called.
    struct FakeJira {
        resources: Option<Vec<AccessibleResource>>,
        worklog_ids: Option<Vec<u64>>,
        worklogs: Vec<ApiWorklog>,
        search: SearchFn,
        resource_calls: Cell<usize>,
        list_calls: RefCell<Vec<Vec<u64>>>,
        search_starts: RefCell<Vec<usize>>,
        search_queries: RefCell<Vec<String>>,
        since: RefCell<Vec<i64>>,
    }

    impl FakeJira {
        fn new(search: SearchFn) -> Self {
            Self {
                resources: Some(vec![AccessibleResource {
                    id: "cloud-1".to_string(),
                    name: "acme".to_string(),
                    url: "https://acme.atlassian.net".to_string(),
                }]),
                worklog_ids: Some(Vec::new()),
                worklogs: Vec::new(),
                search,
                resource_calls: Cell::new(0),
                list_calls: RefCell::new(Vec::new()),
                search_starts: RefCell::new(Vec::new()),
                search_queries: RefCell::new(Vec::new()),
                since: RefCell::new(Vec::new()),
            }
        }

        fn with_worklogs(mut self, worklogs: Vec<ApiWorklog>) -> Self {
            self.worklog_ids = Some(worklogs.iter().map(|worklog| worklog.id.parse().unwrap()).collect());
            self.worklogs = worklogs;
            self
        }

        fn search_calls(&self) -> usize {
            self.search_starts.borrow().len()
        }
    }

    impl JiraApi for &FakeJira {
        async fn accessible_resources(&self) -> Result<Option<Vec<AccessibleResource>>> {
            self.resource_calls.set(self.resource_calls.get() + 1);
            Ok(self.resources.clone())
        }

        async fn updated_worklogs(&self, cloud_id: &str, since: i64) -> Result<Option<UpdatedWorklogs>> {
            assert_eq!(cloud_id, "cloud-1");
            self.since.borrow_mut().push(since);
            Ok(self.worklog_ids.as_ref().map(|ids| UpdatedWorklogs {
                values: ids
                    .iter()
                    .map(|id| UpdatedWorklog {
                        worklog_id: *id,
                        updated_time: None,
                    })
                    .collect(),
                last_page: Some(true),
            }))
        }

        async fn worklog_list(&self, _cloud_id: &str, ids: &[u64]) -> Result<Vec<ApiWorklog>> {
            self.list_calls.borrow_mut().push(ids.to_vec());
            Ok(self.worklogs.clone())
        }

        async fn search_issues(&self, _cloud_id: &str, query: &IssueQuery, start_at: usize, max_results: usize) -> Result<Option<SearchPage>> {
            assert_eq!(max_results, ISSUE_PAGE_SIZE);
            self.search_starts.borrow_mut().push(start_at);
            self.search_queries.borrow_mut().push(query.jql());
            let call = self.search_calls();
            Ok((self.search)(call, start_at))
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn filter() -> WorklogFilter {
        WorklogFilter::new("Jane Doe", date(2021, 3, 1), date(2021, 3, 7)).unwrap()
    }

    fn issue(id: &str, key: &str, summary: &str) -> JiraIssue {
        JiraIssue {
            id: id.to_string(),
            key: key.to_string(),
            fields: JiraIssueFields {
                summary: summary.to_string(),
                issuetype: JiraIssueType { name: "Task".to_string() },
            },
        }
    }

    fn page(issues: Vec<JiraIssue>) -> Option<SearchPage> {
        Some(SearchPage {
            start_at: 0,
            total: issues.len(),
            issues,
        })
    }

    fn worklog(id: u64, issue_id: &str, author: &str, started: &str, time_spent: &str) -> ApiWorklog {
        ApiWorklog {
            id: id.to_string(),
            issue_id: issue_id.to_string(),
            started: started.to_string(),
            time_spent: time_spent.to_string(),
            author: JiraUser {
                display_name: author.to_string(),
            },
        }
    }

    fn projects() -> Vec<String> {
        vec!["ABC".to_string()]
    }

    fn ids(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[tokio::test]
    async fn test_resolve_session_takes_first_resource() {
        let mut fake = FakeJira::new(Box::new(|_, _| page(Vec::new())));
        fake.resources = Some(vec![
            AccessibleResource {
                id: "cloud-1".to_string(),
                name: String::new(),
                url: String::new(),
            },
            AccessibleResource {
                id: "cloud-2".to_string(),
                name: String::new(),
                url: String::new(),
            },
        ]);
        let session = WorklogCrawler::new(&fake).resolve_session().await.unwrap();
        assert_eq!(session.cloud_id(), "cloud-1");
    }

    #[tokio::test]
    async fn test_resolve_session_without_resources_fails() {
        let mut fake = FakeJira::new(Box::new(|_, _| page(Vec::new())));
        fake.resources = None;
        let result = WorklogCrawler::new(&fake).resolve_session().await;
        assert!(matches!(result, Err(TimesheetError::UpstreamUnavailable(_))));

        fake.resources = Some(Vec::new());
        let result = WorklogCrawler::new(&fake).resolve_session().await;
        assert!(matches!(result, Err(TimesheetError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn test_missing_worklog_ids_fail() {
        let mut fake = FakeJira::new(Box::new(|_, _| page(Vec::new())));
        fake.worklog_ids = None;
        let result = WorklogCrawler::new(&fake).crawl(&CloudSession::new("cloud-1"), &projects(), &filter()).await;
        assert!(matches!(result, Err(TimesheetError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn test_discovery_starts_at_utc_midnight_of_from() {
        let fake = FakeJira::new(Box::new(|_, _| page(Vec::new())));
        WorklogCrawler::new(&fake)
            .discover_worklog_ids(&CloudSession::new("cloud-1"), date(2021, 3, 1))
            .await
            .unwrap();
        assert_eq!(*fake.since.borrow(), vec![1_614_556_800_000]);
    }

    #[tokio::test]
    async fn test_missing_search_page_fails() {
        let fake = FakeJira::new(Box::new(|_, _| None));
        let result = WorklogCrawler::new(&fake)
            .resolve_issues(&CloudSession::new("cloud-1"), &projects(), &ids(&["10001"]))
            .await;
        assert!(matches!(result, Err(TimesheetError::UpstreamUnavailable(_))));
    }

    #[tokio::test]
    async fn test_search_stops_at_page_cap() {
        // Every page returns an issue, so only the cap ends the loop.
        let fake = FakeJira::new(Box::new(|call, _| page(vec![issue(&format!("9{call}"), "OTHER-1", "noise")])));
        let resolved = WorklogCrawler::new(&fake)
            .resolve_issues(&CloudSession::new("cloud-1"), &projects(), &ids(&["10001"]))
            .await
            .unwrap();
        assert_eq!(fake.search_calls(), MAX_ISSUE_PAGES);
        assert!(resolved.is_empty());
    }

    #[tokio::test]
    async fn test_search_stops_on_empty_page() {
        let fake = FakeJira::new(Box::new(|call, _| {
            if call < 3 {
                page(vec![issue(&format!("1000{call}"), &format!("ABC-{call}"), "work")])
            } else {
                page(Vec::new())
            }
        }));
        let resolved = WorklogCrawler::new(&fake)
            .resolve_issues(&CloudSession::new("cloud-1"), &projects(), &ids(&["10001", "10002"]))
            .await
            .unwrap();
        assert_eq!(fake.search_calls(), 3);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved["10002"].key, "ABC-2");
    }

    #[tokio::test]
    async fn test_search_start_at_counts_issues_read() {
        let fake = FakeJira::new(Box::new(|call, _| {
            if call <= 3 {
                page(vec![issue("1", "ABC-1", "a"), issue("2", "ABC-2", "b")])
            } else {
                page(Vec::new())
            }
        }));
        WorklogCrawler::new(&fake)
            .resolve_issues(&CloudSession::new("cloud-1"), &projects(), &ids(&["1"]))
            .await
            .unwrap();
        assert_eq!(*fake.search_starts.borrow(), vec![0, 2, 4, 6]);
    }

    #[tokio::test]
    async fn test_search_query_restricts_projects_and_ids() {
        let fake = FakeJira::new(Box::new(|_, _| page(Vec::new())));
        WorklogCrawler::new(&fake)
            .resolve_issues(
                &CloudSession::new("cloud-1"),
                &["ABC".to_string(), "XYZ".to_string()],
                &ids(&["10002", "10001"]),
            )
            .await
            .unwrap();
        assert_eq!(*fake.search_queries.borrow(), vec!["project in (ABC,XYZ) and id in (10001,10002)"]);
    }

    #[tokio::test]
    async fn test_crawl_filters_and_joins() {
        let fake = FakeJira::new(Box::new(|call, _| {
            if call == 1 {
                page(vec![issue("10001", "ABC-1", "Login"), issue("99999", "ABC-9", "Unrelated")])
            } else {
                page(Vec::new())
            }
        }))
        .with_worklogs(vec![
            worklog(1, "10001", "Jane Doe", "2021-03-02T09:00:00.000+0000", "1h 30m"),
            worklog(2, "10001", "John Roe", "2021-03-02T09:00:00.000+0000", "garbage"),
            worklog(3, "10002", "Jane Doe", "2021-03-09T09:00:00.000+0000", "garbage"),
            // Issue 10003 is never returned by the search, so this is dropped unparsed.
            worklog(4, "10003", "Jane Doe", "2021-03-03T09:00:00.000+0000", "garbage"),
        ]);

        let entries = WorklogCrawler::new(&fake)
            .crawl(&CloudSession::new("cloud-1"), &projects(), &filter())
            .await
            .unwrap();

        assert_eq!(*fake.list_calls.borrow(), vec![vec![1, 2, 3, 4]]);
        assert_eq!(*fake.search_queries.borrow(), vec!["project in (ABC) and id in (10001,10003)"; 2]);
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.issue_key, "ABC-1");
        assert_eq!(entry.issue_id, "10001");
        assert_eq!(entry.summary, "Login");
        assert_eq!(entry.issue_type, "Task");
        assert_eq!(entry.started_on, date(2021, 3, 2));
        assert_eq!(entry.duration_minutes, 90);
    }

    #[tokio::test]
    async fn test_crawl_joined_bad_duration_fails() {
        let fake = FakeJira::new(Box::new(|call, _| {
            if call == 1 {
                page(vec![issue("10001", "ABC-1", "Login")])
            } else {
                page(Vec::new())
            }
        }))
        .with_worklogs(vec![worklog(1, "10001", "Jane Doe", "2021-03-02T09:00:00.000+0000", "1x")]);

        let result = WorklogCrawler::new(&fake)
            .crawl(&CloudSession::new("cloud-1"), &projects(), &filter())
            .await;
        assert!(matches!(result, Err(TimesheetError::MalformedDuration { .. })));
    }

    #[tokio::test]
    async fn test_crawl_without_ids_skips_later_calls() {
        let fake = FakeJira::new(Box::new(|_, _| page(Vec::new())));
        let entries = WorklogCrawler::new(&fake)
            .crawl(&CloudSession::new("cloud-1"), &projects(), &filter())
            .await
            .unwrap();
        assert!(entries.is_empty());
        assert!(fake.list_calls.borrow().is_empty());
        assert_eq!(fake.search_calls(), 0);
    }

    #[tokio::test]
    async fn test_source_resolves_session_once() {
        let fake = FakeJira::new(Box::new(|_, _| page(Vec::new())));
        let mut source = JiraSource::new(&fake, projects());
        assert!(source.session().is_none());

        source.read_worklog(&filter()).await.unwrap();
        source.read_worklog(&filter()).await.unwrap();

        assert_eq!(fake.resource_calls.get(), 1);
        assert_eq!(source.session().map(CloudSession::cloud_id), Some("cloud-1"));
    }

    #[tokio::test]
    async fn test_source_with_session_skips_lookup() {
        let fake = FakeJira::new(Box::new(|_, _| page(Vec::new())));
        let mut source = JiraSource::new(&fake, projects()).with_session(CloudSession::new("cloud-1"));
        source.read_worklog(&filter()).await.unwrap();
        assert_eq!(fake.resource_calls.get(), 0);
    }
}
