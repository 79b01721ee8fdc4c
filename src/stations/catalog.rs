//! Enumerators over the station, sensor and region catalogs.
//!
//! Every call performs exactly one request per catalog document; nothing is cached.

use crate::api::client::ApiClient;
use crate::api::endpoint::Endpoint;
use crate::api::error::ErrorClass;
use crate::auth::signer::SignedHeaders;
use crate::stations::error::CatalogError;
use crate::types::region::Region;
use crate::types::sensor::{Measure, Sensor};
use crate::types::station::Station;
use crate::utils::last_path_segment;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SensorKey {
    sensor_key: String,
}

#[derive(Debug, Default, Deserialize)]
struct StationCurrent {
    #[serde(default)]
    sensors: Vec<SensorKey>,
}

#[derive(Debug, Default, Deserialize)]
struct SensorDocument {
    #[serde(default)]
    meteors: Vec<Measure>,
}

/// Reads catalog documents with one set of signed headers.
pub struct Catalog<'a, C: ApiClient + ?Sized> {
    api: &'a C,
    headers: &'a SignedHeaders,
}

impl<'a, C: ApiClient + ?Sized> Catalog<'a, C> {
    pub fn new(api: &'a C, headers: &'a SignedHeaders) -> Self {
        Self { api, headers }
    }

    pub fn list_stations(&self) -> Result<Vec<Station>, CatalogError> {
        let body = self.api.fetch(&Endpoint::Stations, self.headers)?;
        decode_list(&Endpoint::Stations, "stations", body)
    }

    pub fn list_regions(&self) -> Result<Vec<Region>, CatalogError> {
        let body = self.api.fetch(&Endpoint::Regions, self.headers)?;
        decode_list(&Endpoint::Regions, "regions", body)
    }

    /// Sensors installed at `station`, each with its distinct measures.
    ///
    /// An unknown station yields an empty list, whether the API answers with an
    /// empty sensor list or with a 404 on the station's current-data document.
    pub fn list_sensors(&self, station: &str) -> Result<Vec<Sensor>, CatalogError> {
        let endpoint = Endpoint::StationCurrent {
            station: station.to_string(),
        };
        let current: StationCurrent = match self.api.fetch(&endpoint, self.headers) {
            Ok(body) => decode(&endpoint, body)?,
            Err(e) if e.class() == ErrorClass::NotFound => {
                debug!("Station {} has no current data, assuming no sensors", station);
                StationCurrent::default()
            }
            Err(e) => return Err(e.into()),
        };

        let mut seen = HashSet::new();
        let mut sensors = Vec::new();
        for key in &current.sensors {
            let id = last_path_segment(&key.sensor_key);
            if id.is_empty() || !seen.insert(id.to_string()) {
                continue;
            }
            let measures = self.sensor_measures(id)?;
            sensors.push(Sensor::new(id, station, measures));
        }

        info!(
            "Station {} reports {} sensors ({} measures)",
            station,
            sensors.len(),
            sensors.iter().map(|s| s.measures.len()).sum::<usize>()
        );
        Ok(sensors)
    }

    /// Distinct measures reported by `sensor`, in catalog order.
    pub fn sensor_measures(&self, sensor: &str) -> Result<Vec<Measure>, CatalogError> {
        let endpoint = Endpoint::Sensor {
            sensor: sensor.to_string(),
        };
        let body = self.api.fetch(&endpoint, self.headers)?;
        let document: SensorDocument = decode(&endpoint, body)?;

        let mut seen = HashSet::new();
        Ok(document
            .meteors
            .into_iter()
            .filter(|m| seen.insert(m.clone()))
            .collect())
    }
}

fn decode<T: DeserializeOwned>(endpoint: &Endpoint, body: Value) -> Result<T, CatalogError> {
    serde_json::from_value(body).map_err(|e| CatalogError::Malformed {
        document: endpoint.path(),
        source: e,
    })
}

/// Catalog lists come either as a bare array or wrapped in an object under `key`.
fn decode_list<T: DeserializeOwned>(
    endpoint: &Endpoint,
    key: &str,
    body: Value,
) -> Result<Vec<T>, CatalogError> {
    let list = match body {
        Value::Object(mut map) => match map.remove(key) {
            Some(list @ Value::Array(_)) => list,
            _ => Value::Object(map),
        },
        other => other,
    };
    decode(endpoint, list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{status, MockApiClient};
    use serde_json::json;

    #[test]
    fn test_list_sensors_resolves_measures() -> Result<(), CatalogError> {
        let api = MockApiClient::station(
            "C017",
            &[
                ("S1", &[("measuresForAir", "temperature"), ("measuresForAir", "humidity")]),
                ("S2", &[("measuresForWind", "mean_speed")]),
            ],
            |_, _, _, _| Ok(json!({})),
        );
        let headers = SignedHeaders::default();
        let sensors = Catalog::new(&api, &headers).list_sensors("C017")?;

        assert_eq!(sensors.len(), 2);
        assert_eq!(sensors[0].id, "S1");
        assert_eq!(sensors[0].station_id, "C017");
        assert_eq!(
            sensors[0].measures,
            vec![
                Measure::new("measuresForAir", "temperature"),
                Measure::new("measuresForAir", "humidity")
            ]
        );
        assert_eq!(sensors[1].measures.len(), 1);
        assert_eq!(api.calls(), 3, "one current-data call plus one per sensor");
        Ok(())
    }

    #[test]
    fn test_unknown_station_has_no_sensors() -> Result<(), CatalogError> {
        let api = MockApiClient::station("C017", &[("S1", &[("t", "m")])], |_, _, _, _| {
            Ok(json!({}))
        });
        let headers = SignedHeaders::default();
        assert!(Catalog::new(&api, &headers).list_sensors("XXXX")?.is_empty());

        let missing = MockApiClient::new(|e| Err(status(e, 404)));
        assert!(Catalog::new(&missing, &headers)
            .list_sensors("XXXX")?
            .is_empty());
        Ok(())
    }

    #[test]
    fn test_duplicates_are_collapsed() -> Result<(), CatalogError> {
        let api = MockApiClient::new(|endpoint| match endpoint {
            Endpoint::StationCurrent { .. } => Ok(json!({ "sensors": [
                { "sensorKey": "euskalmet/sensors/S1" },
                { "sensorKey": "euskalmet/sensors/S1" }
            ]})),
            Endpoint::Sensor { .. } => Ok(json!({ "meteors": [
                { "measureType": "measuresForAir", "measureId": "temperature" },
                { "measureType": "measuresForAir", "measureId": "temperature" }
            ]})),
            other => Err(status(other, 404)),
        });
        let headers = SignedHeaders::default();
        let sensors = Catalog::new(&api, &headers).list_sensors("C017")?;
        assert_eq!(sensors.len(), 1);
        assert_eq!(sensors[0].measures.len(), 1);
        assert_eq!(api.calls(), 2);
        Ok(())
    }

    #[test]
    fn test_server_errors_propagate() {
        let api = MockApiClient::new(|e| Err(status(e, 500)));
        let headers = SignedHeaders::default();
        let result = Catalog::new(&api, &headers).list_sensors("C017");
        assert!(matches!(result, Err(CatalogError::Api(_))));
    }

    #[test]
    fn test_list_stations_accepts_wrapped_lists() -> Result<(), CatalogError> {
        let api = MockApiClient::new(|endpoint| match endpoint {
            Endpoint::Stations => Ok(json!({ "stations": [
                { "stationId": "C017", "name": "Zarautz" },
                { "stationId": "C040" }
            ]})),
            Endpoint::Regions => Ok(json!([
                { "key": "euskalmet/geo/regions/basque_country", "regionId": "basque_country" }
            ])),
            other => Err(status(other, 404)),
        });
        let headers = SignedHeaders::default();
        let catalog = Catalog::new(&api, &headers);

        let stations = catalog.list_stations()?;
        assert_eq!(stations.len(), 2);
        assert_eq!(stations[1].id, "C040");

        let regions = catalog.list_regions()?;
        assert_eq!(regions[0].region_id, "basque_country");
        Ok(())
    }

    #[test]
    fn test_unexpected_list_documents_are_malformed() {
        let api = MockApiClient::new(|endpoint| match endpoint {
            Endpoint::Stations => Ok(json!({ "error": "quota exceeded", "code": 7 })),
            Endpoint::Regions => Ok(json!({ "items": [], "regions": "none" })),
            other => Err(status(other, 404)),
        });
        let headers = SignedHeaders::default();
        let catalog = Catalog::new(&api, &headers);
        assert!(matches!(
            catalog.list_stations(),
            Err(CatalogError::Malformed { .. })
        ));
        assert!(matches!(
            catalog.list_regions(),
            Err(CatalogError::Malformed { .. })
        ));
    }

    #[test]
    fn test_malformed_sensor_document() {
        let api = MockApiClient::new(|endpoint| match endpoint {
            Endpoint::StationCurrent { .. } => Ok(json!({ "sensors": [{ "sensorKey": "x/S1" }] })),
            Endpoint::Sensor { .. } => Ok(json!({ "meteors": "not a list" })),
            other => Err(status(other, 404)),
        });
        let headers = SignedHeaders::default();
        let result = Catalog::new(&api, &headers).list_sensors("C017");
        assert!(matches!(result, Err(CatalogError::Malformed { .. })));
    }
}
