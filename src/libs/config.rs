//! Configuration management.
//!
//! Settings are stored as pretty-printed JSON in the application data
//! directory (see [`DataStorage`]). Every module is optional:
//!
//! - **Jira**: API gateway URL, access token and default projects
//! - **Report**: default author and output format
//!
//! The Jira token and URL can also come from the environment (or a `.env`
//! file loaded at startup), which takes precedence over the stored file:
//!
//! ```text
//! JIRA_ACCESS_TOKEN=eyJ...
//! JIRA_API_URL=https://api.atlassian.com
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use timesheet::libs::config::Config;
//!
//! let config = Config::read()?;
//! if let Some(jira) = config.jira_with_env() {
//!     println!("Jira gateway: {}", jira.api_url);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::api::jira::JiraConfig;
use crate::libs::export::ExportFormat;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::{self, File};

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const ACCESS_TOKEN_ENV: &str = "JIRA_ACCESS_TOKEN";
pub const API_URL_ENV: &str = "JIRA_API_URL";

/// A module offered by the setup wizard.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    pub key: String,
    pub name: String,
}

/// Defaults for the `report` command.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ReportConfig {
    /// Display name used when `--author` is omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub format: ExportFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            author: None,
            format: ExportFormat::Excel,
        }
    }
}

impl ReportConfig {
    pub fn module() -> ConfigModule {
        ConfigModule {
            key: "report".to_string(),
            name: "Report".to_string(),
        }
    }

    pub fn init(config: &Option<Self>) -> Result<Self> {
        let config = config.clone().unwrap_or_default();
        msg_print!(Message::ConfigModuleReport);
        let author: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptReportAuthor.to_string())
            .default(config.author.unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;

        let formats = ExportFormat::all();
        let selected = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptReportFormat.to_string())
            .items(&formats.iter().map(|format| format.extension()).collect::<Vec<_>>())
            .default(formats.iter().position(|format| *format == config.format).unwrap_or(0))
            .interact()?;

        Ok(Self {
            author: Some(author.trim().to_string()).filter(|author| !author.is_empty()),
            format: formats[selected],
        })
    }
}

/// Root configuration object.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jira: Option<JiraConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportConfig>,
}

impl Config {
    /// Loads the configuration file, or the default when none exists.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(Config::default());
        }
        let config_str = fs::read_to_string(config_file_path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        let config_file = File::create(config_file_path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the configuration file. Returns whether a file was deleted.
    pub fn delete() -> Result<bool> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if !config_file_path.exists() {
            return Ok(false);
        }
        fs::remove_file(config_file_path)?;
        Ok(true)
    }

    /// Jira settings with environment overrides applied.
    ///
    /// Returns `None` when no access token is available from either place.
    pub fn jira_with_env(&self) -> Option<JiraConfig> {
        let mut jira = self.jira.clone().unwrap_or_default();
        if let Ok(token) = env::var(ACCESS_TOKEN_ENV) {
            jira.access_token = token;
        }
        if let Ok(api_url) = env::var(API_URL_ENV) {
            jira.api_url = api_url;
        }
        Some(jira).filter(JiraConfig::is_configured)
    }

    pub fn default_author(&self) -> Option<String> {
        self.report.as_ref().and_then(|report| report.author.clone())
    }

    pub fn default_format(&self) -> ExportFormat {
        self.report.as_ref().map(|report| report.format).unwrap_or_default()
    }

    /// Interactive setup wizard; existing values are offered as defaults.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = [JiraConfig::module(), ReportConfig::module()];
        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "jira" => config.jira = Some(JiraConfig::init(&config.jira)?),
                "report" => config.report = Some(ReportConfig::init(&config.report)?),
                _ => {}
            }
        }

        Ok(config)
    }
}
