use crate::api::endpoint::Endpoint;
use crate::types::date_unit::DateUnit;
use crate::types::sensor::Sensor;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fmt;

/// One request of a harvest run, with its position in construction order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchTask {
    pub position: usize,
    pub station: String,
    pub sensor: String,
    pub measure_type: String,
    pub measure_id: String,
    pub unit: DateUnit,
}

impl FetchTask {
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::Readings {
            station: self.station.clone(),
            sensor: self.sensor.clone(),
            measure_type: self.measure_type.clone(),
            measure_id: self.measure_id.clone(),
            at: self.unit,
        }
    }
}

impl fmt::Display for FetchTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {}/{} {}/{} at {}",
            self.position,
            self.station,
            self.sensor,
            self.measure_type,
            self.measure_id,
            self.unit
        )
    }
}

/// Cross product of sensors, their measures and the hourly units of `[start, end]`.
///
/// Sensor-major, then measure, then ascending date. Repeated combinations are
/// emitted once, at their first position.
pub fn build_tasks(
    station: &str,
    sensors: &[Sensor],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<FetchTask> {
    let units: Vec<DateUnit> = DateUnit::range(start, end).collect();
    let mut seen = HashSet::new();
    let mut tasks = Vec::new();

    for sensor in sensors {
        for measure in &sensor.measures {
            for unit in &units {
                let key = (
                    sensor.id.as_str(),
                    measure.measure_type.as_str(),
                    measure.measure_id.as_str(),
                    *unit,
                );
                if !seen.insert(key) {
                    continue;
                }
                tasks.push(FetchTask {
                    position: tasks.len(),
                    station: station.to_string(),
                    sensor: sensor.id.clone(),
                    measure_type: measure.measure_type.clone(),
                    measure_id: measure.measure_id.clone(),
                    unit: *unit,
                });
            }
        }
    }
    tasks
}
