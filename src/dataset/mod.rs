//! The ordered, de-duplicated result of a harvest, plus its tabular and on-disk forms.

pub mod error;
pub mod store;
pub mod table;

use crate::types::reading::ReadingRecord;
use chrono::{DateTime, Utc};

/// Records sorted by `(timestamp, station, sensor, measure_type, measure_id)`,
/// with at most one record per key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<ReadingRecord>,
}

impl Dataset {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sorts `records` and collapses duplicate keys. Among duplicates, the record
    /// that comes later in `records` wins.
    pub fn from_records(mut records: Vec<ReadingRecord>) -> Self {
        records.sort_by(|a, b| a.key().cmp(&b.key()));

        let mut deduped: Vec<ReadingRecord> = Vec::with_capacity(records.len());
        for record in records {
            match deduped.last_mut() {
                Some(last) if last.key() == record.key() => *last = record,
                _ => deduped.push(record),
            }
        }
        Self { records: deduped }
    }

    /// Union of both datasets. Records of `newer` replace records of `self` with the same key.
    pub fn merge(self, newer: Dataset) -> Dataset {
        let mut records = self.records;
        records.extend(newer.records);
        Self::from_records(records)
    }

    pub fn records(&self) -> &[ReadingRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ReadingRecord> {
        self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReadingRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.records.first().map(|r| r.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.records.last().map(|r| r.timestamp)
    }

    /// Records of one sensor, in dataset order.
    pub fn for_sensor<'a>(&'a self, sensor: &'a str) -> impl Iterator<Item = &'a ReadingRecord> {
        self.records.iter().filter(move |r| r.sensor == sensor)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a ReadingRecord;
    type IntoIter = std::slice::Iter<'a, ReadingRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
