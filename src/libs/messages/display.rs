//! Text for every [`Message`] variant.
//!
//! All user-facing wording lives here so commands and library code only
//! refer to typed messages.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let s = match self {
            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration deleted".to_string(),
            Message::ConfigNotFound => "No configuration file found".to_string(),
            Message::ConfigModuleJira => "Jira settings".to_string(),
            Message::ConfigModuleReport => "Report settings".to_string(),
            Message::PromptSelectModules => "Select the modules to configure".to_string(),
            Message::PromptJiraApiUrl => "Enter the Atlassian API URL".to_string(),
            Message::PromptJiraAccessToken => "Enter your Jira access token".to_string(),
            Message::PromptJiraProjects => "Enter the project keys (comma separated)".to_string(),
            Message::PromptReportAuthor => "Enter the default author display name".to_string(),
            Message::PromptReportFormat => "Select the default report format".to_string(),

            // === SOURCE MESSAGES ===
            Message::ReadingWorklogFile(path) => format!("Reading worklog export {}", path),
            Message::ReadingWorklogApi(projects) => format!("Reading worklogs from Jira for projects: {}", projects.join(", ")),
            Message::JiraNotConfigured => "Jira is not configured. Run 'timesheet init' or set JIRA_ACCESS_TOKEN".to_string(),
            Message::JiraProjectsMissing => "No projects given. Use --projects or configure them with 'timesheet init'".to_string(),
            Message::AuthorMissing => "No author given. Use --author or configure a default with 'timesheet init'".to_string(),
            Message::InvalidDate(raw) => format!("Invalid date '{}', expected YYYY-MM-DD", raw),

            // === CRAWL MESSAGES ===
            Message::CloudSessionResolved(cloud_id) => format!("Using Jira cloud {}", cloud_id),
            Message::WorklogIdsDiscovered(count) => format!("Found {} updated worklogs", count),
            Message::WorklogsFiltered(fetched, kept) => format!("Kept {} of {} worklogs for author and interval", kept, fetched),
            Message::IssuePageFetched(page, count) => format!("Issue search page {}: {} issues", page, count),
            Message::IssuePageLimitReached(cap) => format!("Issue search stopped after {} pages", cap),
            Message::IssuesResolved(count) => format!("Resolved {} issues", count),
            Message::WorklogsJoined(kept, dropped) => format!("Joined {} worklogs with issues, dropped {}", kept, dropped),

            // === REPORT MESSAGES ===
            Message::ReportHeader(author, from, to) => format!("Timesheet for {} from {} to {}", author, from, to),
            Message::ReportGenerated(rows, total) => format!("Report generated: {} issues, {} total", rows, total),
            Message::ReportEmpty => "No worklogs found for the given author and interval".to_string(),
            Message::ExportSuccess(path) => format!("Report exported successfully to: {}", path),
        };
        write!(f, "{}", s)
    }
}
