use crate::api::error::{ApiError, ErrorClass};
use crate::harvest::task::FetchTask;
use crate::types::reading::ReadingRecord;
use std::fmt;

/// Why a task was skipped without aborting the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// No data exists for this combination.
    NotFound,
    /// Network or server failure that outlived the retry budget.
    Transport(String),
    /// The API refused the request.
    Rejected(String),
    /// The response could not be interpreted as readings.
    Malformed(String),
}

/// Why a task aborted its worker and the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FatalReason {
    Unauthorized(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Ok(Vec<ReadingRecord>),
    Invalid(InvalidReason),
    Fatal(FatalReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    pub task: FetchTask,
    pub outcome: FetchOutcome,
}

/// A skipped task, as reported after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTask {
    pub task: FetchTask,
    pub reason: InvalidReason,
}

impl FetchOutcome {
    /// Outcome of a request that failed for good.
    pub(crate) fn from_error(error: &ApiError) -> Self {
        let detail = error.to_string();
        match error.class() {
            ErrorClass::NotFound => FetchOutcome::Invalid(InvalidReason::NotFound),
            ErrorClass::Unauthorized => FetchOutcome::Fatal(FatalReason::Unauthorized(detail)),
            ErrorClass::Transient => FetchOutcome::Invalid(InvalidReason::Transport(detail)),
            ErrorClass::Rejected => FetchOutcome::Invalid(InvalidReason::Rejected(detail)),
            ErrorClass::Malformed => FetchOutcome::Invalid(InvalidReason::Malformed(detail)),
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, FetchOutcome::Fatal(_))
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::NotFound => f.write_str("not found"),
            InvalidReason::Transport(detail) => write!(f, "transport error: {detail}"),
            InvalidReason::Rejected(detail) => write!(f, "rejected: {detail}"),
            InvalidReason::Malformed(detail) => write!(f, "malformed response: {detail}"),
        }
    }
}

impl fmt::Display for FatalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalReason::Unauthorized(detail) => write!(f, "unauthorized: {detail}"),
        }
    }
}
