//! Timesheet report command.
//!
//! Reads the worklog of one author over a date interval, either from a Jira
//! CSV export (`--file`) or from Jira Cloud (`--projects`, or the projects
//! stored by `timesheet init`), and writes the issue-by-day report.
//!
//! ## Examples
//!
//! ```text
//! timesheet report --file worklog.csv --author "Jane Doe" --from 2021-03-01 --to 2021-03-07
//! timesheet report --projects ABC,XYZ --author "Jane Doe" --from 2021-03-01 --format csv
//! ```

use crate::{
    api::{
        jira::{split_projects, JiraCloud},
        JiraSource,
    },
    libs::{
        config::Config,
        duration::format_minutes,
        export::{ExportFormat, Exporter},
        messages::Message,
        report::{generate_report, ReportMatrix},
        source::FileSource,
        view::View,
        worklog::WorklogFilter,
    },
    msg_error_anyhow, msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Jira worklog CSV export to read instead of the Jira API
    #[arg(long, conflicts_with = "projects")]
    file: Option<PathBuf>,

    /// Comma-separated Jira project keys (defaults to the configured ones)
    #[arg(short, long)]
    projects: Option<String>,

    /// Author display name, matched exactly
    #[arg(short, long)]
    author: Option<String>,

    /// First day of the report: `today` (default) or `YYYY-MM-DD`
    #[arg(long)]
    from: Option<String>,

    /// Last day of the report: `today` (default) or `YYYY-MM-DD`
    #[arg(long)]
    to: Option<String>,

    /// Output format (defaults to the configured one, or excel)
    #[arg(short, long, value_enum)]
    format: Option<ExportFormat>,

    /// Output file path
    ///
    /// Defaults to `timesheet_<from>_<to>.<ext>` in the current directory.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also print the report as a table
    #[arg(short, long)]
    view: bool,
}

pub async fn cmd(args: ReportArgs) -> Result<()> {
    let config = Config::read()?;

    let author = args
        .author
        .clone()
        .or_else(|| config.default_author())
        .filter(|author| !author.trim().is_empty())
        .ok_or_else(|| msg_error_anyhow!(Message::AuthorMissing))?;
    let from = parse_date(args.from.as_deref())?;
    let to = parse_date(args.to.as_deref())?;
    let filter = WorklogFilter::new(author, from, to)?;

    let report = read_report(&args, &config, &filter).await?;

    msg_print!(
        Message::ReportHeader(filter.author().to_string(), from.format("%Y-%m-%d").to_string(), to.format("%Y-%m-%d").to_string()),
        true
    );
    if report.is_empty() {
        msg_warning!(Message::ReportEmpty);
    }
    if args.view {
        View::report(&report);
    }

    let format = args.format.unwrap_or_else(|| config.default_format());
    let path = Exporter::new(format, args.output.clone(), &report).export(&report)?;
    msg_info!(Message::ReportGenerated(report.rows.len(), format_minutes(report.grand_total)));
    msg_success!(Message::ExportSuccess(path.display().to_string()));

    Ok(())
}

async fn read_report(args: &ReportArgs, config: &Config, filter: &WorklogFilter) -> Result<ReportMatrix> {
    if let Some(path) = &args.file {
        msg_info!(Message::ReadingWorklogFile(path.display().to_string()));
        let mut source = FileSource::new(path);
        return Ok(generate_report(&mut source, filter).await?);
    }

    let jira = config.jira_with_env().ok_or_else(|| msg_error_anyhow!(Message::JiraNotConfigured))?;
    let projects = match &args.projects {
        Some(raw) => split_projects(raw),
        None => jira.projects.clone(),
    };
    if projects.is_empty() {
        return Err(msg_error_anyhow!(Message::JiraProjectsMissing));
    }

    msg_info!(Message::ReadingWorklogApi(projects.clone()));
    let mut source = JiraSource::new(JiraCloud::new(&jira), projects);
    Ok(generate_report(&mut source, filter).await?)
}

/// Parses `today`, a blank value or `YYYY-MM-DD`; missing means today.
fn parse_date(raw: Option<&str>) -> Result<NaiveDate> {
    match raw.map(str::trim) {
        None | Some("") | Some("today") => Ok(Local::now().date_naive()),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| msg_error_anyhow!(Message::InvalidDate(value.to_string()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_defaults_to_today() {
        let today = Local::now().date_naive();
        assert_eq!(parse_date(None).unwrap(), today);
        assert_eq!(parse_date(Some("today")).unwrap(), today);
        assert_eq!(parse_date(Some("  ")).unwrap(), today);
    }

    #[test]
    fn test_parse_date_iso() {
        assert_eq!(parse_date(Some("2021-03-01")).unwrap(), NaiveDate::from_ymd_opt(2021, 3, 1).unwrap());
        assert!(parse_date(Some("01/03/2021")).is_err());
    }
}
