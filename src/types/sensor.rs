use crate::utils::string_or_number;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API classification of a physical quantity a sensor reports
/// (e.g. type `measuresForAir`, id `temperature`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub struct Measure {
    #[serde(deserialize_with = "string_or_number")]
    pub measure_type: String,
    #[serde(deserialize_with = "string_or_number")]
    pub measure_id: String,
}

impl Measure {
    pub fn new(measure_type: impl Into<String>, measure_id: impl Into<String>) -> Self {
        Self {
            measure_type: measure_type.into(),
            measure_id: measure_id.into(),
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.measure_type, self.measure_id)
    }
}

/// An instrument installed at exactly one station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sensor {
    pub id: String,
    pub station_id: String,
    /// Measures this sensor reports, without duplicates.
    pub measures: Vec<Measure>,
}

impl Sensor {
    pub fn new(id: impl Into<String>, station_id: impl Into<String>, measures: Vec<Measure>) -> Self {
        Self {
            id: id.into(),
            station_id: station_id.into(),
            measures,
        }
    }
}
