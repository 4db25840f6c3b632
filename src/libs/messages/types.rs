#[derive(Debug, Clone)]
pub enum Message {
    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigNotFound,
    ConfigModuleJira,
    ConfigModuleReport,
    PromptSelectModules,
    PromptJiraApiUrl,
    PromptJiraAccessToken,
    PromptJiraProjects,
    PromptReportAuthor,
    PromptReportFormat,

    // === SOURCE MESSAGES ===
    ReadingWorklogFile(String),       // path
    ReadingWorklogApi(Vec<String>),   // projects
    JiraNotConfigured,
    JiraProjectsMissing,
    AuthorMissing,
    InvalidDate(String), // raw input

    // === CRAWL MESSAGES ===
    CloudSessionResolved(String),   // cloud id
    WorklogIdsDiscovered(usize),    // count
    WorklogsFiltered(usize, usize), // fetched, kept
    IssuePageFetched(usize, usize), // page, issues on page
    IssuePageLimitReached(usize),   // cap
    IssuesResolved(usize),          // matching issues
    WorklogsJoined(usize, usize),   // kept, dropped

    // === REPORT MESSAGES ===
    ReportHeader(String, String, String), // author, from, to
    ReportGenerated(usize, String),       // issue rows, grand total
    ReportEmpty,
    ExportSuccess(String), // path
}
