use crate::auth::error::AuthError;
use crate::harvest::outcome::FatalReason;
use crate::harvest::task::FetchTask;
use crate::stations::error::CatalogError;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Failed to sign API requests")]
    Auth(#[from] AuthError),

    #[error("Sensor catalog of station {station} is unavailable")]
    CatalogUnavailable {
        station: String,
        #[source]
        source: CatalogError,
    },

    #[error("Harvest aborted at task {task}: {reason}")]
    Fatal {
        task: Box<FetchTask>,
        reason: FatalReason,
    },

    #[error("Start {start} is after end {end}")]
    InvalidDateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Failed to start the worker pool")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}
