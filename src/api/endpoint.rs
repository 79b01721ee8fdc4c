//! REST endpoint templates of the Euskalmet API.
//!
//! See <https://www.opendata.euskadi.eus/api-euskalmet/-/how-to-use-meteo-rest-services/>.

use crate::types::date_unit::DateUnit;
use chrono::{Datelike, NaiveDate};
use std::fmt;

/// One addressable API resource, with its path parameters filled in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Catalog of every station.
    Stations,
    /// Current data of one station, including the keys of its sensors.
    StationCurrent { station: String },
    /// Catalog of every sensor.
    Sensors,
    /// One sensor, including the measures (`meteors`) it reports.
    Sensor { sensor: String },
    /// Readings of one measure of one sensor during one hour.
    Readings {
        station: String,
        sensor: String,
        measure_type: String,
        measure_id: String,
        at: DateUnit,
    },
    /// Forecast regions.
    Regions,
    /// Forecast for a region, issued on `at`, for the day `target`.
    RegionForecast {
        region: String,
        at: NaiveDate,
        target: NaiveDate,
    },
    /// Forecast for one location of a region zone.
    LocationForecast {
        region: String,
        zone: String,
        location: String,
        at: NaiveDate,
        target: NaiveDate,
    },
    /// Last measures report of one location for the day `date`.
    LastMeasuresReport {
        region: String,
        zone: String,
        location: String,
        date: NaiveDate,
    },
}

fn ymd(date: &NaiveDate) -> String {
    format!("{:04}/{:02}/{:02}", date.year(), date.month(), date.day())
}

impl Endpoint {
    /// Path relative to the API base URL, starting with `/`.
    pub fn path(&self) -> String {
        match self {
            Endpoint::Stations => "/euskalmet/stations".to_string(),
            Endpoint::StationCurrent { station } => {
                format!("/euskalmet/stations/{station}/current")
            }
            Endpoint::Sensors => "/euskalmet/sensors".to_string(),
            Endpoint::Sensor { sensor } => format!("/euskalmet/sensors/{sensor}"),
            Endpoint::Readings {
                station,
                sensor,
                measure_type,
                measure_id,
                at,
            } => format!(
                "/euskalmet/readings/forStation/{station}/{sensor}/measures/{measure_type}/{measure_id}/at/{:04}/{:02}/{:02}/{:02}",
                at.year(),
                at.month(),
                at.day(),
                at.hour()
            ),
            Endpoint::Regions => "/euskalmet/geo/regions".to_string(),
            Endpoint::RegionForecast {
                region,
                at,
                target,
            } => format!(
                "/euskalmet/weather/regions/{region}/forecast/at/{}/for/{}",
                ymd(at),
                target.format("%Y%m%d")
            ),
            Endpoint::LocationForecast {
                region,
                zone,
                location,
                at,
                target,
            } => format!(
                "/euskalmet/weather/regions/{region}/zones/{zone}/locations/{location}/forecast/at/{}/for/{}",
                ymd(at),
                target.format("%Y%m%d")
            ),
            Endpoint::LastMeasuresReport {
                region,
                zone,
                location,
                date,
            } => format!(
                "/euskalmet/weather/regions/{region}/zones/{zone}/locations/{location}/reports/for/{}/last",
                ymd(date)
            ),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_readings_path_is_zero_padded() {
        let at = DateUnit::floor(Utc.with_ymd_and_hms(2022, 5, 9, 7, 15, 0).unwrap());
        let endpoint = Endpoint::Readings {
            station: "C017".into(),
            sensor: "S1".into(),
            measure_type: "measuresForAir".into(),
            measure_id: "temperature".into(),
            at,
        };
        assert_eq!(
            endpoint.path(),
            "/euskalmet/readings/forStation/C017/S1/measures/measuresForAir/temperature/at/2022/05/09/07"
        );
    }

    #[test]
    fn test_catalog_paths() {
        assert_eq!(Endpoint::Stations.path(), "/euskalmet/stations");
        assert_eq!(
            Endpoint::StationCurrent {
                station: "C017".into()
            }
            .to_string(),
            "/euskalmet/stations/C017/current"
        );
        assert_eq!(
            Endpoint::Sensor {
                sensor: "S1".into()
            }
            .path(),
            "/euskalmet/sensors/S1"
        );
        assert_eq!(Endpoint::Regions.path(), "/euskalmet/geo/regions");
    }

    #[test]
    fn test_forecast_paths() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let target = NaiveDate::from_ymd_opt(2024, 1, 11).unwrap();
        assert_eq!(
            Endpoint::RegionForecast {
                region: "basque_country".into(),
                at,
                target
            }
            .path(),
            "/euskalmet/weather/regions/basque_country/forecast/at/2024/01/10/for/20240111"
        );
        assert_eq!(
            Endpoint::LocationForecast {
                region: "basque_country".into(),
                zone: "donostialdea".into(),
                location: "donostia".into(),
                at,
                target
            }
            .path(),
            "/euskalmet/weather/regions/basque_country/zones/donostialdea/locations/donostia/forecast/at/2024/01/10/for/20240111"
        );
        assert_eq!(
            Endpoint::LastMeasuresReport {
                region: "basque_country".into(),
                zone: "donostialdea".into(),
                location: "donostia".into(),
                date: at
            }
            .path(),
            "/euskalmet/weather/regions/basque_country/zones/donostialdea/locations/donostia/reports/for/2024/01/10/last"
        );
    }
}
