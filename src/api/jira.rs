//! Jira Cloud REST transport.
//!
//! [`JiraCloud`] performs the four calls the worklog crawl needs, through the
//! Atlassian API gateway (`https://api.atlassian.com`) with an OAuth bearer
//! token:
//!
//! | Call                 | Endpoint                                             |
//! |----------------------|------------------------------------------------------|
//! | accessible resources | `GET /oauth/token/accessible-resources`              |
//! | updated worklogs     | `GET /ex/jira/{cloudId}/rest/api/3/worklog/updated`  |
//! | worklog details      | `POST /ex/jira/{cloudId}/rest/api/3/worklog/list`    |
//! | issue search         | `GET /ex/jira/{cloudId}/rest/api/3/search`           |
//!
//! An empty body or a JSON `null` is reported as `Ok(None)`; the crawler
//! decides whether that is fatal.

use super::JiraApi;
use crate::libs::config::ConfigModule;
use crate::libs::error::{Result, TimesheetError};
use crate::libs::messages::Message;
use crate::libs::normalizer::{IssueMeta, PendingWorklog};
use crate::libs::worklog::WorklogFilter;
use crate::msg_print;
use dialoguer::{theme::ColorfulTheme, Input};
use reqwest::{header::ACCEPT, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const DEFAULT_API_URL: &str = "https://api.atlassian.com";
const ACCESSIBLE_RESOURCES_URL: &str = "oauth/token/accessible-resources";
const WORKLOG_UPDATED_URL: &str = "rest/api/3/worklog/updated";
const WORKLOG_LIST_URL: &str = "rest/api/3/worklog/list";
const SEARCH_URL: &str = "rest/api/3/search";

/// Fields requested on the updated-worklog listing.
pub const WORKLOG_EXPAND: &str = "issueId,started,timeSpent,author";
/// Fields requested on the issue search.
pub const ISSUE_FIELDS: &str = "summary,issuetype";

/// A Jira site the token grants access to.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AccessibleResource {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedWorklog {
    pub worklog_id: u64,
    #[serde(default)]
    pub updated_time: Option<i64>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedWorklogs {
    #[serde(default)]
    pub values: Vec<UpdatedWorklog>,
    #[serde(default)]
    pub last_page: Option<bool>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
    #[serde(default)]
    pub display_name: String,
}

/// A worklog detail as returned by the bulk worklog endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ApiWorklog {
    #[serde(default)]
    pub id: String,
    pub issue_id: String,
    pub started: String,
    pub time_spent: String,
    #[serde(default)]
    pub author: JiraUser,
}

impl ApiWorklog {
    /// Applies the author/date filter, keeping the time spent unparsed.
    pub fn normalize(&self, filter: &WorklogFilter) -> Result<Option<PendingWorklog>> {
        PendingWorklog::from_api(&self.issue_id, &self.author.display_name, &self.started, &self.time_spent, filter)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct JiraIssueType {
    #[serde(default)]
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct JiraIssueFields {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub issuetype: JiraIssueType,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct JiraIssue {
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub fields: JiraIssueFields,
}

impl JiraIssue {
    pub fn meta(&self) -> IssueMeta {
        IssueMeta {
            key: self.key.clone(),
            summary: self.fields.summary.clone(),
            issue_type: self.fields.issuetype.name.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default)]
    pub start_at: usize,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub issues: Vec<JiraIssue>,
}

/// Restricts the issue search to some projects and issue ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueQuery {
    pub projects: Vec<String>,
    pub issue_ids: BTreeSet<String>,
}

impl IssueQuery {
    pub fn new(projects: &[String], issue_ids: BTreeSet<String>) -> Self {
        Self {
            projects: projects.to_vec(),
            issue_ids,
        }
    }

    pub fn jql(&self) -> String {
        let ids: Vec<&str> = self.issue_ids.iter().map(String::as_str).collect();
        format!("project in ({}) and id in ({})", self.projects.join(","), ids.join(","))
    }
}

#[derive(Serialize)]
struct WorklogIds<'a> {
    ids: &'a [u64],
}

/// `reqwest` implementation of [`JiraApi`].
#[derive(Debug, Clone)]
pub struct JiraCloud {
    client: Client,
    config: JiraConfig,
}

impl JiraCloud {
    pub fn new(config: &JiraConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    fn cloud_url(&self, cloud_id: &str, path: &str) -> String {
        self.url(&format!("ex/jira/{}/{}", cloud_id, path))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.config.access_token).header(ACCEPT, "application/json")
    }

    /// Reads a JSON body, treating an empty body or `null` as absent.
    async fn read_optional<T: DeserializeOwned>(request: RequestBuilder) -> Result<Option<T>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(TimesheetError::Http {
                status,
                message: body_message(status, &body),
            });
        }
        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(trimmed)?))
    }
}

fn body_message(status: StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        body.trim().to_string()
    }
}

impl JiraApi for JiraCloud {
    async fn accessible_resources(&self) -> Result<Option<Vec<AccessibleResource>>> {
        let request = self.client.get(self.url(ACCESSIBLE_RESOURCES_URL));
        Self::read_optional(self.authorized(request)).await
    }

    async fn updated_worklogs(&self, cloud_id: &str, since: i64) -> Result<Option<UpdatedWorklogs>> {
        let since = since.to_string();
        let request = self
            .client
            .get(self.cloud_url(cloud_id, WORKLOG_UPDATED_URL))
            .query(&[("since", since.as_str()), ("expand", WORKLOG_EXPAND)]);
        Self::read_optional(self.authorized(request)).await
    }

    async fn worklog_list(&self, cloud_id: &str, ids: &[u64]) -> Result<Vec<ApiWorklog>> {
        let request = self.client.post(self.cloud_url(cloud_id, WORKLOG_LIST_URL)).json(&WorklogIds { ids });
        Ok(Self::read_optional(self.authorized(request)).await?.unwrap_or_default())
    }

    async fn search_issues(&self, cloud_id: &str, query: &IssueQuery, start_at: usize, max_results: usize) -> Result<Option<SearchPage>> {
        let start_at = start_at.to_string();
        let max_results = max_results.to_string();
        let jql = query.jql();
        let request = self.client.get(self.cloud_url(cloud_id, SEARCH_URL)).query(&[
            ("startAt", start_at.as_str()),
            ("maxResults", max_results.as_str()),
            ("jql", jql.as_str()),
            ("fields", ISSUE_FIELDS),
        ]);
        Self::read_optional(self.authorized(request)).await
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct JiraConfig {
    pub api_url: String,
    pub access_token: String,
    #[serde(default)]
    pub projects: Vec<String>,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            access_token: String::new(),
            projects: Vec::new(),
        }
    }
}

impl JiraConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "jira".to_string(),
            name: "Jira".to_string(),
        }
    }

    pub fn init(config: &Option<Self>) -> anyhow::Result<Self> {
        let config = config.clone().unwrap_or_default();
        msg_print!(Message::ConfigModuleJira);
        let api_url = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptJiraApiUrl.to_string())
            .default(config.api_url)
            .interact_text()?;
        let access_token = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptJiraAccessToken.to_string())
            .default(config.access_token)
            .interact_text()?;
        let projects: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptJiraProjects.to_string())
            .default(config.projects.join(","))
            .allow_empty(true)
            .interact_text()?;
        Ok(Self {
            api_url,
            access_token,
            projects: split_projects(&projects),
        })
    }

    pub fn is_configured(&self) -> bool {
        !self.access_token.trim().is_empty()
    }
}

/// Splits a comma-separated project list, dropping blanks.
pub fn split_projects(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|project| !project.is_empty())
        .map(str::to_string)
        .collect()
}
