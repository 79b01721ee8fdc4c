//! Decoding of the hourly reading document into [`ReadingRecord`]s.
//!
//! A reading response looks like
//! `{"dateRange": "/Date(1652054400000)/...", "slots": [{"lowerEndPointDesc": "07:00"}, ...], "values": [12.5, null, ...]}`:
//! one value per sub-hourly slot, with slot times relative to the UTC day of `dateRange`.

use crate::harvest::task::FetchTask;
use crate::types::reading::ReadingRecord;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadingParseError {
    #[error("Reading document has an unexpected shape")]
    Decode(#[from] serde_json::Error),

    #[error("Reading document has {slots} slots but {values} values")]
    SlotMismatch { slots: usize, values: usize },

    #[error("Invalid slot time '{0}'")]
    InvalidSlot(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadingDocument {
    #[serde(default)]
    date_range: Option<String>,
    slots: Vec<Slot>,
    values: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Slot {
    lower_end_point_desc: String,
}

/// UTC day of the first `/Date(...)/` epoch in `date_range`. Epochs longer than
/// ten digits are milliseconds.
fn base_date(date_range: &str) -> Option<NaiveDate> {
    let digits: String = date_range
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    let epoch: i64 = digits.parse().ok()?;
    let datetime = if digits.len() > 10 {
        DateTime::<Utc>::from_timestamp_millis(epoch)
    } else {
        DateTime::<Utc>::from_timestamp(epoch, 0)
    }?;
    Some(datetime.date_naive())
}

pub fn parse_readings(
    task: &FetchTask,
    body: &Value,
) -> Result<Vec<ReadingRecord>, ReadingParseError> {
    let document = ReadingDocument::deserialize(body)?;
    if document.slots.len() != document.values.len() {
        return Err(ReadingParseError::SlotMismatch {
            slots: document.slots.len(),
            values: document.values.len(),
        });
    }

    let date = document
        .date_range
        .as_deref()
        .and_then(base_date)
        .unwrap_or_else(|| task.unit.date());

    document
        .slots
        .iter()
        .zip(document.values)
        .map(|(slot, value)| {
            let desc = slot.lower_end_point_desc.trim();
            let time = NaiveTime::parse_from_str(desc, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(desc, "%H:%M:%S"))
                .map_err(|_| ReadingParseError::InvalidSlot(desc.to_string()))?;
            Ok(ReadingRecord {
                timestamp: date.and_time(time).and_utc(),
                station: task.station.clone(),
                sensor: task.sensor.clone(),
                measure_type: task.measure_type.clone(),
                measure_id: task.measure_id.clone(),
                value,
            })
        })
        .collect()
}
