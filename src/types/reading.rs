use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One value reported by one sensor measure at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingRecord {
    pub timestamp: DateTime<Utc>,
    pub station: String,
    pub sensor: String,
    pub measure_type: String,
    pub measure_id: String,
    /// `None` when the API reported the slot without a value.
    pub value: Option<f64>,
}

/// Identity of a record in a dataset, in output order.
pub(crate) type RecordKey<'a> = (DateTime<Utc>, &'a str, &'a str, &'a str, &'a str);

impl ReadingRecord {
    pub(crate) fn key(&self) -> RecordKey<'_> {
        (
            self.timestamp,
            &self.station,
            &self.sensor,
            &self.measure_type,
            &self.measure_id,
        )
    }
}
