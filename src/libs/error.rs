//! Error model shared by the report engine and the worklog sources.
//!
//! Every variant is terminal for the report being computed: a report is
//! either produced in full or not at all. The command layer wraps these in
//! `anyhow` for display.

use chrono::NaiveDate;
use reqwest::StatusCode;
use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TimesheetError>;

#[derive(Debug, Error)]
pub enum TimesheetError {
    /// A time-spent string contains a fragment that is not `<number><d|h|m>`.
    #[error("worklog {value:?} has invalid format: cannot parse {fragment:?}")]
    MalformedDuration { value: String, fragment: String },

    /// A started timestamp could not be parsed after normalization.
    #[error("cannot parse started date {0:?}")]
    MalformedDate(String),

    /// A remote call returned no payload where one was required.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The requested interval ends before it starts.
    #[error("invalid date interval: from {from} to {to}")]
    InvalidRange { from: NaiveDate, to: NaiveDate },

    #[error("http {status}: {message}")]
    Http { status: StatusCode, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("csv error: {0}")]
    Csv(String),
    #[error("xlsx error: {0}")]
    Xlsx(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl TimesheetError {
    pub fn malformed_duration(value: &str, fragment: &str) -> Self {
        TimesheetError::MalformedDuration {
            value: value.to_string(),
            fragment: fragment.to_string(),
        }
    }

    pub fn upstream(step: impl Into<String>) -> Self {
        TimesheetError::UpstreamUnavailable(step.into())
    }
}

impl From<reqwest::Error> for TimesheetError {
    /// Maps transport failures onto the closest semantic variant.
    fn from(err: reqwest::Error) -> Self {
        if err.is_status() {
            let status = err.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            TimesheetError::Http {
                status,
                message: err.to_string(),
            }
        } else if err.is_decode() {
            TimesheetError::Serialization(err.to_string())
        } else {
            TimesheetError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TimesheetError {
    fn from(err: serde_json::Error) -> Self {
        TimesheetError::Serialization(err.to_string())
    }
}

impl From<csv::Error> for TimesheetError {
    fn from(err: csv::Error) -> Self {
        TimesheetError::Csv(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for TimesheetError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        TimesheetError::Xlsx(err.to_string())
    }
}
