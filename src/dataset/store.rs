//! A CSV file of previously harvested observations of one station, used to resume
//! harvesting from the last stored hour.

use crate::dataset::error::DatasetError;
use crate::dataset::table::{write_csv_to, COLUMNS};
use crate::dataset::Dataset;
use crate::types::reading::ReadingRecord;
use crate::utils::default_data_dir;
use chrono::{DateTime, Utc};
use log::{debug, info};
use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const STORE_FILE_SUFFIX: &str = "_OBS_MERGED.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationStore {
    path: PathBuf,
}

impl ObservationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/<station>_OBS_MERGED.csv`
    pub fn for_station(dir: &Path, station: &str) -> Self {
        Self::new(dir.join(format!("{station}{STORE_FILE_SUFFIX}")))
    }

    /// The station's store under the user data directory, if one can be resolved.
    pub fn default_for_station(station: &str) -> Option<Self> {
        default_data_dir().map(|dir| Self::for_station(&dir, station))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// `None` when nothing has been stored yet.
    pub fn load(&self) -> Result<Option<Dataset>, DatasetError> {
        if !self.exists() {
            debug!("No observation store at {}", self.path.display());
            return Ok(None);
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .try_into_reader_with_file_path(Some(self.path.clone()))
            .and_then(|reader| reader.finish())
            .map_err(|e| DatasetError::CsvRead(self.path.clone(), e))?;

        let records = self.parse_rows(&df)?;
        debug!(
            "Loaded {} observations from {}",
            records.len(),
            self.path.display()
        );
        Ok(Some(Dataset::from_records(records)))
    }

    pub fn last_timestamp(&self) -> Result<Option<DateTime<Utc>>, DatasetError> {
        Ok(self.load()?.and_then(|dataset| dataset.last_timestamp()))
    }

    /// Replaces the stored file. The new content is written to a temporary file in the
    /// same directory and renamed over the old one, so readers never see a partial file.
    pub fn save(&self, dataset: &Dataset) -> Result<(), DatasetError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| DatasetError::Io(dir.clone(), e))?;

        let mut temp = NamedTempFile::new_in(&dir).map_err(|e| DatasetError::Io(dir.clone(), e))?;
        write_csv_to(dataset, temp.as_file_mut()).map_err(|e| match e {
            DatasetError::Table(source) => DatasetError::CsvWrite(self.path.clone(), source),
            other => other,
        })?;
        temp.persist(&self.path)
            .map_err(|e| DatasetError::Persist(self.path.clone(), e))?;

        info!(
            "Saved {} observations to {}",
            dataset.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Merges `fresh` over the stored observations and saves the result.
    pub fn merge_and_save(&self, fresh: Dataset) -> Result<Dataset, DatasetError> {
        let merged = match self.load()? {
            Some(stored) => stored.merge(fresh),
            None => fresh,
        };
        self.save(&merged)?;
        Ok(merged)
    }

    fn column<'a>(
        &self,
        df: &'a DataFrame,
        column: &'static str,
    ) -> Result<&'a StringChunked, DatasetError> {
        df.column(column)
            .and_then(|c| c.as_materialized_series().str())
            .map_err(|_| DatasetError::MissingColumn {
                path: self.path.clone(),
                column,
            })
    }

    fn parse_rows(&self, df: &DataFrame) -> Result<Vec<ReadingRecord>, DatasetError> {
        let [timestamp, station, sensor, measure_type, measure_id, value] =
            COLUMNS.map(|name| self.column(df, name));
        let (timestamp, station, sensor, measure_type, measure_id, value) = (
            timestamp?,
            station?,
            sensor?,
            measure_type?,
            measure_id?,
            value?,
        );

        let invalid = |row: usize, column: &'static str, value: Option<&str>| {
            DatasetError::InvalidField {
                path: self.path.clone(),
                row,
                column,
                value: value.unwrap_or_default().to_string(),
            }
        };

        (0..df.height())
            .map(|row| -> Result<ReadingRecord, DatasetError> {
                let raw_timestamp = timestamp.get(row);
                let parsed = raw_timestamp
                    .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
                    .ok_or_else(|| invalid(row, "timestamp", raw_timestamp))?;

                let raw_value = value.get(row).map(str::trim).filter(|s| !s.is_empty());
                let parsed_value = match raw_value {
                    Some(s) => Some(
                        s.parse::<f64>()
                            .map_err(|_| invalid(row, "value", Some(s)))?,
                    ),
                    None => None,
                };

                Ok(ReadingRecord {
                    timestamp: parsed.with_timezone(&Utc),
                    station: station.get(row).unwrap_or_default().to_string(),
                    sensor: sensor.get(row).unwrap_or_default().to_string(),
                    measure_type: measure_type.get(row).unwrap_or_default().to_string(),
                    measure_id: measure_id.get(row).unwrap_or_default().to_string(),
                    value: parsed_value,
                })
            })
            .collect()
    }
}
