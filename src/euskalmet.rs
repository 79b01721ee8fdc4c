//! The main entry point: one client object exposing the catalog, forecast and
//! harvesting operations of the Euskalmet API.

use crate::api::client::{ApiClient, ClientOptions, HttpApiClient};
use crate::api::endpoint::Endpoint;
use crate::auth::credentials::Credentials;
use crate::auth::signer::{AuthProvider, JwtSigner, SignedHeaders};
use crate::dataset::store::ObservationStore;
use crate::dataset::Dataset;
use crate::error::EuskalmetError;
use crate::harvest::engine::{validate_window, HarvestOptions, HarvestReport, Harvester};
use crate::harvest::retry::RetryPolicy;
use crate::stations::catalog::Catalog;
use crate::stations::locate_station::StationLocator;
use crate::types::date_unit::DateUnit;
use crate::types::region::Region;
use crate::types::sensor::{Measure, Sensor};
use crate::types::station::Station;
use bon::bon;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::info;
use serde_json::Value;

/// Harvests start this long before their end when no start is given.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;
/// Hours harvested between two store checkpoints in [`Euskalmet::update_store`].
pub const DEFAULT_BATCH_HOURS: usize = 6;

/// Represents a geographical coordinate using latitude and longitude.
///
/// ```
/// use euskalmet::LatLon;
///
/// let donostia = LatLon(43.3183, -1.9812);
/// assert_eq!(donostia.0, 43.3183); // Latitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// Client for the Euskalmet open-data API.
///
/// Every call signs a fresh set of headers with the configured [`AuthProvider`]
/// and talks to the API through an [`ApiClient`]. Nothing is cached between calls.
///
/// ```no_run
/// # use euskalmet::{Euskalmet, EuskalmetError};
/// # fn run() -> Result<(), EuskalmetError> {
/// // Reads ~/.config/euskalmet/settings.toml and privateKey.pem
/// let client = Euskalmet::new()?;
/// let dataset = client.automatic_download().station("C017").parallel(true).call()?;
/// println!("{} readings", dataset.len());
/// # Ok(())
/// # }
/// ```
pub struct Euskalmet<C: ApiClient = HttpApiClient, A: AuthProvider = JwtSigner> {
    api: C,
    auth: A,
}

impl Euskalmet {
    /// Client using the credentials in the default configuration directory.
    pub fn new() -> Result<Self, EuskalmetError> {
        let credentials = Credentials::from_default_location()?;
        Self::with_credentials(&credentials)
    }

    pub fn with_credentials(credentials: &Credentials) -> Result<Self, EuskalmetError> {
        Self::with_options(credentials, ClientOptions::default())
    }

    pub fn with_options(
        credentials: &Credentials,
        options: ClientOptions,
    ) -> Result<Self, EuskalmetError> {
        Ok(Self::from_parts(
            HttpApiClient::new(options)?,
            JwtSigner::new(credentials)?,
        ))
    }
}

#[bon]
impl<C: ApiClient, A: AuthProvider> Euskalmet<C, A> {
    /// Client over any transport and signer, e.g. test doubles.
    pub fn from_parts(api: C, auth: A) -> Self {
        Self { api, auth }
    }

    fn headers(&self) -> Result<SignedHeaders, EuskalmetError> {
        Ok(self.auth.signed_headers()?)
    }

    fn raw(&self, endpoint: Endpoint) -> Result<Value, EuskalmetError> {
        let headers = self.headers()?;
        Ok(self.api.fetch(&endpoint, &headers)?)
    }

    pub fn stations(&self) -> Result<Vec<Station>, EuskalmetError> {
        let headers = self.headers()?;
        Ok(Catalog::new(&self.api, &headers).list_stations()?)
    }

    /// Current data document of one station, as returned by the API.
    pub fn station_current(&self, station: &str) -> Result<Value, EuskalmetError> {
        self.raw(Endpoint::StationCurrent {
            station: station.to_string(),
        })
    }

    /// Sensors of `station` with their measures. Unknown stations have none.
    pub fn station_sensors(&self, station: &str) -> Result<Vec<Sensor>, EuskalmetError> {
        let headers = self.headers()?;
        Ok(Catalog::new(&self.api, &headers).list_sensors(station)?)
    }

    /// The full sensor catalog, as returned by the API.
    pub fn sensors(&self) -> Result<Value, EuskalmetError> {
        self.raw(Endpoint::Sensors)
    }

    pub fn sensor_measures(&self, sensor: &str) -> Result<Vec<Measure>, EuskalmetError> {
        let headers = self.headers()?;
        Ok(Catalog::new(&self.api, &headers).sensor_measures(sensor)?)
    }

    pub fn regions(&self) -> Result<Vec<Region>, EuskalmetError> {
        let headers = self.headers()?;
        Ok(Catalog::new(&self.api, &headers).list_regions()?)
    }

    /// Forecast for a region issued on `at` (default: today) for the day `target`
    /// (default: the issue day).
    #[builder]
    pub fn region_forecast(
        &self,
        region: &str,
        at: Option<NaiveDate>,
        target: Option<NaiveDate>,
    ) -> Result<Value, EuskalmetError> {
        let at = at.unwrap_or_else(|| Utc::now().date_naive());
        self.raw(Endpoint::RegionForecast {
            region: region.to_string(),
            at,
            target: target.unwrap_or(at),
        })
    }

    /// Forecast for one location of a region zone. Dates default as in
    /// [`Euskalmet::region_forecast`].
    #[builder]
    pub fn location_forecast(
        &self,
        region: &str,
        zone: &str,
        location: &str,
        at: Option<NaiveDate>,
        target: Option<NaiveDate>,
    ) -> Result<Value, EuskalmetError> {
        let at = at.unwrap_or_else(|| Utc::now().date_naive());
        self.raw(Endpoint::LocationForecast {
            region: region.to_string(),
            zone: zone.to_string(),
            location: location.to_string(),
            at,
            target: target.unwrap_or(at),
        })
    }

    /// Last measures report of one location for `date` (default: today).
    #[builder]
    pub fn last_measures_report(
        &self,
        region: &str,
        zone: &str,
        location: &str,
        date: Option<NaiveDate>,
    ) -> Result<Value, EuskalmetError> {
        self.raw(Endpoint::LastMeasuresReport {
            region: region.to_string(),
            zone: zone.to_string(),
            location: location.to_string(),
            date: date.unwrap_or_else(|| Utc::now().date_naive()),
        })
    }

    /// Finds catalog stations near a location, closest first.
    ///
    /// * `.location(LatLon)`: **Required.**
    /// * `.max_distance_km(f64)`: Optional. Defaults to `50.0`.
    /// * `.station_limit(usize)`: Optional. Defaults to `5`.
    ///
    /// Stations without a position in the catalog are never returned.
    #[builder]
    pub fn find_stations(
        &self,
        location: LatLon,
        max_distance_km: Option<f64>,
        station_limit: Option<usize>,
    ) -> Result<Vec<Station>, EuskalmetError> {
        let locator = StationLocator::new(&self.stations()?);
        Ok(locator
            .nearest(
                location.0,
                location.1,
                station_limit.unwrap_or(5),
                max_distance_km.unwrap_or(50.0),
            )
            .into_iter()
            .map(|(station, _distance)| station)
            .collect())
    }

    /// Harvests every reading of `station` between `start` and `end`, both inclusive at
    /// hourly granularity, and reports the tasks that were skipped.
    ///
    /// * `.station(&str)`: **Required.** Station code, e.g. `"C017"`.
    /// * `.start(DateTime<Utc>)`: Optional. Defaults to 30 days before `end`.
    /// * `.end(DateTime<Utc>)`: Optional. Defaults to now; later values are clamped to now.
    /// * `.parallel(bool)`: Optional. Use a worker pool. Defaults to `false`.
    /// * `.workers(usize)`: Optional. Pool size, see [`crate::default_workers`].
    /// * `.retry(RetryPolicy)`: Optional. Defaults to a single attempt per request.
    ///
    /// # Errors
    ///
    /// [`EuskalmetError::Harvest`] when signing fails (no request is made), the sensor
    /// catalog is unavailable, the window is empty, or a request is rejected as
    /// unauthorized. Readings that are missing or fail otherwise are skipped.
    #[builder]
    pub fn harvest(
        &self,
        station: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        parallel: Option<bool>,
        workers: Option<usize>,
        retry: Option<RetryPolicy>,
    ) -> Result<HarvestReport, EuskalmetError> {
        let end = end.unwrap_or_else(Utc::now);
        let start = start.unwrap_or(end - Duration::days(DEFAULT_LOOKBACK_DAYS));
        let options = HarvestOptions {
            parallel: parallel.unwrap_or(false),
            workers,
            retry: retry.unwrap_or_default(),
        };
        Ok(Harvester::new(&self.api, &self.auth, options).run(station, start, end)?)
    }

    /// Like [`Euskalmet::harvest`], returning only the dataset.
    #[builder]
    pub fn automatic_download(
        &self,
        station: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        parallel: Option<bool>,
        workers: Option<usize>,
        retry: Option<RetryPolicy>,
    ) -> Result<Dataset, EuskalmetError> {
        let report = self
            .harvest()
            .station(station)
            .maybe_start(start)
            .maybe_end(end)
            .maybe_parallel(parallel)
            .maybe_workers(workers)
            .maybe_retry(retry)
            .call()?;
        Ok(report.dataset)
    }

    /// Brings an [`ObservationStore`] up to date and returns its merged content.
    ///
    /// Harvesting resumes at the start of the last stored hour unless `start` is given; an empty
    /// store starts 30 days before `end`. The window is harvested in batches of
    /// `batch_hours` hours (default 6) and the store is checkpointed after each batch,
    /// new readings replacing stored ones with the same key.
    ///
    /// * `.station(&str)`: **Required.**
    /// * `.store(ObservationStore)`: Optional. Defaults to
    ///   [`ObservationStore::default_for_station`].
    /// * `.start`, `.end`, `.parallel`, `.workers`, `.retry`: as in [`Euskalmet::harvest`].
    /// * `.batch_hours(usize)`: Optional. Must be at least 1.
    #[builder]
    pub fn update_store(
        &self,
        station: &str,
        store: Option<ObservationStore>,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
        parallel: Option<bool>,
        workers: Option<usize>,
        retry: Option<RetryPolicy>,
        batch_hours: Option<usize>,
    ) -> Result<Dataset, EuskalmetError> {
        let batch_hours = batch_hours.unwrap_or(DEFAULT_BATCH_HOURS);
        if batch_hours == 0 {
            return Err(EuskalmetError::InvalidBatchSize);
        }
        let store = match store {
            Some(store) => store,
            None => ObservationStore::default_for_station(station)
                .ok_or(EuskalmetError::DataDirResolution)?,
        };

        let mut merged = store.load()?.unwrap_or_default();
        let end = end.unwrap_or_else(Utc::now);
        // The last stored hour may be incomplete, so it is fetched again.
        let start = match (start, merged.last_timestamp()) {
            (Some(start), _) => start,
            (None, Some(last)) => DateUnit::floor(last).start().min(end),
            (None, None) => end - Duration::days(DEFAULT_LOOKBACK_DAYS),
        };
        let end = validate_window(start, end, Utc::now())?;

        let options = HarvestOptions {
            parallel: parallel.unwrap_or(false),
            workers,
            retry: retry.unwrap_or_default(),
        };
        let harvester = Harvester::new(&self.api, &self.auth, options);
        let headers = self.headers()?;
        let sensors = harvester.resolve_sensors(&headers, station)?;

        let units: Vec<DateUnit> = DateUnit::range(start, end).collect();
        info!(
            "Updating {} from {} to {} in batches of {} hours",
            store.path().display(),
            DateUnit::floor(start),
            DateUnit::floor(end),
            batch_hours
        );

        for batch in units.chunks(batch_hours) {
            let (Some(first), Some(last)) = (batch.first(), batch.last()) else {
                continue;
            };
            let report =
                harvester.harvest_sensors(&headers, station, &sensors, first.start(), last.start())?;
            if report.dataset.is_empty() {
                continue;
            }
            merged = merged.merge(report.dataset);
            store.save(&merged)?;
            info!(
                "Checkpoint {} - {}: {} observations stored",
                first,
                last,
                merged.len()
            );
        }
        Ok(merged)
    }
}
