//! Error kinds raised by the trip pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by loading, configuration and the statistics reports.
#[derive(Debug, Error)]
pub enum Error {
    /// The dataset for a city is missing or cannot be parsed. Fatal to the cycle.
    #[error("dataset {path} is unavailable: {reason}")]
    DataUnavailable { path: PathBuf, reason: String },

    /// A report has nothing to compute from: the filtered table is empty or a
    /// category the report depends on is absent.
    #[error("{report}: no data ({reason})")]
    NoData {
        report: &'static str,
        reason: String,
    },

    /// The dataset override file could not be read or parsed.
    #[error("dataset config {path}: {reason}")]
    Config { path: PathBuf, reason: String },
}

impl Error {
    pub(crate) fn data_unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::DataUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn no_data(report: &'static str, reason: impl Into<String>) -> Self {
        Error::NoData {
            report,
            reason: reason.into(),
        }
    }

    /// Returns `true` for [`Error::NoData`].
    pub fn is_no_data(&self) -> bool {
        matches!(self, Error::NoData { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Rejected city, month or weekday text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} '{value}', expected one of: {expected}")]
pub struct ParseFilterError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}
