//! Scripted [`ApiClient`] and [`AuthProvider`] doubles shared by the unit tests.

use crate::api::client::ApiClient;
use crate::api::endpoint::Endpoint;
use crate::api::error::ApiError;
use crate::auth::error::AuthError;
use crate::auth::signer::{AuthProvider, SignedHeaders};
use crate::types::date_unit::DateUnit;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Mutex;

type Handler = dyn Fn(&Endpoint) -> Result<Value, ApiError> + Send + Sync;

pub(crate) struct MockApiClient {
    handler: Box<Handler>,
    requests: Mutex<Vec<Endpoint>>,
}

impl MockApiClient {
    pub fn new(
        handler: impl Fn(&Endpoint) -> Result<Value, ApiError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A catalog with one station whose sensors report the given `(type, id)` measures.
    /// Reading requests are answered by `readings(sensor, measure_type, measure_id, unit)`.
    pub fn station(
        station: &str,
        sensors: &[(&str, &[(&str, &str)])],
        readings: impl Fn(&str, &str, &str, DateUnit) -> Result<Value, ApiError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        let station = station.to_string();
        let sensors: Vec<(String, Vec<(String, String)>)> = sensors
            .iter()
            .map(|(id, measures)| {
                (
                    id.to_string(),
                    measures
                        .iter()
                        .map(|(t, m)| (t.to_string(), m.to_string()))
                        .collect(),
                )
            })
            .collect();

        Self::new(move |endpoint| match endpoint {
            Endpoint::StationCurrent { station: requested } => {
                let keys: Vec<Value> = if *requested == station {
                    sensors
                        .iter()
                        .map(|(id, _)| json!({ "sensorKey": format!("euskalmet/sensors/{id}") }))
                        .collect()
                } else {
                    Vec::new()
                };
                Ok(json!({ "sensors": keys }))
            }
            Endpoint::Sensor { sensor } => {
                let meteors: Vec<Value> = sensors
                    .iter()
                    .filter(|(id, _)| id == sensor)
                    .flat_map(|(_, measures)| measures.iter())
                    .map(|(t, m)| json!({ "measureType": t, "measureId": m }))
                    .collect();
                Ok(json!({ "meteors": meteors }))
            }
            Endpoint::Readings {
                sensor,
                measure_type,
                measure_id,
                at,
                ..
            } => readings(sensor.as_str(), measure_type.as_str(), measure_id.as_str(), *at),
            other => Err(status(other, 404)),
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().expect("mock lock").len()
    }

    pub fn requests(&self) -> Vec<Endpoint> {
        self.requests.lock().expect("mock lock").clone()
    }

    pub fn reading_calls(&self) -> usize {
        self.requests()
            .iter()
            .filter(|e| matches!(e, Endpoint::Readings { .. }))
            .count()
    }
}

impl ApiClient for MockApiClient {
    fn fetch(&self, endpoint: &Endpoint, _headers: &SignedHeaders) -> Result<Value, ApiError> {
        self.requests
            .lock()
            .expect("mock lock")
            .push(endpoint.clone());
        (self.handler)(endpoint)
    }
}

pub(crate) fn status(endpoint: &Endpoint, code: u16) -> ApiError {
    ApiError::HttpStatus {
        url: endpoint.path(),
        status: StatusCode::from_u16(code).expect("valid status code"),
        reason: None,
    }
}

/// A reading response for `unit` with one slot every ten minutes, starting on the hour.
pub(crate) fn hourly_reading(unit: DateUnit, values: &[Option<f64>]) -> Value {
    let slots: Vec<Value> = (0..values.len())
        .map(|i| json!({ "lowerEndPointDesc": format!("{:02}:{:02}", unit.hour(), i * 10) }))
        .collect();
    json!({
        "dateRange": format!("/Date({})/", unit.start().timestamp_millis()),
        "measure": "temperature",
        "slots": slots,
        "values": values,
    })
}

pub(crate) struct StaticAuth;

impl AuthProvider for StaticAuth {
    fn signed_headers(&self) -> Result<SignedHeaders, AuthError> {
        SignedHeaders::bearer("test-token")
    }
}

pub(crate) struct FailingAuth;

impl AuthProvider for FailingAuth {
    fn signed_headers(&self) -> Result<SignedHeaders, AuthError> {
        Err(AuthError::Expired { expiry: 0, now: 1 })
    }
}
