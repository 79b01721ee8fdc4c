use crate::api::client::ApiClient;
use crate::auth::signer::{AuthProvider, SignedHeaders};
use crate::dataset::Dataset;
use crate::harvest::error::HarvestError;
use crate::harvest::executor::{worker_count, Executor, PoolExecutor, SerialExecutor};
use crate::harvest::merge::merge;
use crate::harvest::outcome::{FetchOutcome, InvalidReason, InvalidTask};
use crate::harvest::readings::parse_readings;
use crate::harvest::retry::RetryPolicy;
use crate::harvest::task::{build_tasks, FetchTask};
use crate::stations::catalog::Catalog;
use crate::types::sensor::Sensor;
use chrono::{DateTime, Utc};
use log::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HarvestOptions {
    /// Dispatch on a worker pool instead of the calling thread.
    pub parallel: bool,
    /// Pool size, bounded by the available cores. Defaults to
    /// [`default_workers`](crate::default_workers).
    pub workers: Option<usize>,
    pub retry: RetryPolicy,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestReport {
    pub dataset: Dataset,
    /// Tasks that were skipped, in task order.
    pub invalid: Vec<InvalidTask>,
    /// Number of tasks built for the run.
    pub dispatched: usize,
}

impl HarvestReport {
    fn empty() -> Self {
        Self {
            dataset: Dataset::empty(),
            invalid: Vec::new(),
            dispatched: 0,
        }
    }
}

/// Harvests every reading of one station over a date window.
pub struct Harvester<'a, C: ApiClient + ?Sized, A: AuthProvider + ?Sized> {
    api: &'a C,
    auth: &'a A,
    options: HarvestOptions,
}

impl<'a, C: ApiClient + ?Sized, A: AuthProvider + ?Sized> Harvester<'a, C, A> {
    pub fn new(api: &'a C, auth: &'a A, options: HarvestOptions) -> Self {
        Self { api, auth, options }
    }

    /// `end` is clamped to the current time. Headers are signed once, before any request.
    pub fn run(
        &self,
        station: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<HarvestReport, HarvestError> {
        let end = validate_window(start, end, Utc::now())?;
        let headers = self.auth.signed_headers()?;
        let sensors = self.resolve_sensors(&headers, station)?;
        self.harvest_sensors(&headers, station, &sensors, start, end)
    }

    pub fn resolve_sensors(
        &self,
        headers: &SignedHeaders,
        station: &str,
    ) -> Result<Vec<Sensor>, HarvestError> {
        Catalog::new(self.api, headers)
            .list_sensors(station)
            .map_err(|source| HarvestError::CatalogUnavailable {
                station: station.to_string(),
                source,
            })
    }

    /// Harvests an already resolved sensor list.
    pub fn harvest_sensors(
        &self,
        headers: &SignedHeaders,
        station: &str,
        sensors: &[Sensor],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<HarvestReport, HarvestError> {
        let tasks = build_tasks(station, sensors, start, end);
        if tasks.is_empty() {
            info!("Nothing to harvest for station {}", station);
            return Ok(HarvestReport::empty());
        }
        info!(
            "Harvesting {} tasks for station {} ({} sensors)",
            tasks.len(),
            station,
            sensors.len()
        );

        let fetch = |task: &FetchTask| self.fetch_task(headers, task);
        let batches = if self.options.parallel {
            let workers = worker_count(self.options.workers, tasks.len());
            PoolExecutor::new(workers)?.execute(&tasks, fetch)
        } else {
            SerialExecutor.execute(&tasks, fetch)
        };

        let (dataset, invalid) = merge(batches)?;
        Ok(HarvestReport {
            dataset,
            invalid,
            dispatched: tasks.len(),
        })
    }

    fn fetch_task(&self, headers: &SignedHeaders, task: &FetchTask) -> FetchOutcome {
        let endpoint = task.endpoint();
        let response = self.options.retry.run(|attempt| {
            if attempt > 1 {
                debug!("Attempt {} for task {}", attempt, task);
            }
            self.api.fetch(&endpoint, headers)
        });

        match response {
            Ok(body) => match parse_readings(task, &body) {
                Ok(records) => FetchOutcome::Ok(records),
                Err(e) => FetchOutcome::Invalid(InvalidReason::Malformed(e.to_string())),
            },
            Err(e) => FetchOutcome::from_error(&e),
        }
    }
}

/// Clamps `end` to `now` and rejects windows that start after they end.
pub(crate) fn validate_window(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, HarvestError> {
    let end = end.min(now);
    if start > end {
        return Err(HarvestError::InvalidDateRange { start, end });
    }
    Ok(end)
}
