use crate::dataset::error::DatasetError;
use crate::dataset::Dataset;
use polars::prelude::*;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Output columns, in order.
pub const COLUMNS: [&str; 6] = [
    "timestamp",
    "station",
    "sensor",
    "measure_type",
    "measure_id",
    "value",
];

pub(crate) const CSV_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// One row per record, in dataset order. `timestamp` is a millisecond datetime
/// column in UTC; missing values are nulls.
pub fn to_table(dataset: &Dataset) -> Result<DataFrame, DatasetError> {
    let records = dataset.records();
    let timestamps: Vec<i64> = records
        .iter()
        .map(|r| r.timestamp.timestamp_millis())
        .collect();
    let stations: Vec<&str> = records.iter().map(|r| r.station.as_str()).collect();
    let sensors: Vec<&str> = records.iter().map(|r| r.sensor.as_str()).collect();
    let measure_types: Vec<&str> = records.iter().map(|r| r.measure_type.as_str()).collect();
    let measure_ids: Vec<&str> = records.iter().map(|r| r.measure_id.as_str()).collect();
    let values: Vec<Option<f64>> = records.iter().map(|r| r.value).collect();

    let df = df!(
        COLUMNS[0] => timestamps,
        COLUMNS[1] => stations,
        COLUMNS[2] => sensors,
        COLUMNS[3] => measure_types,
        COLUMNS[4] => measure_ids,
        COLUMNS[5] => values
    )?;

    let df = df
        .lazy()
        .with_column(col(COLUMNS[0]).cast(DataType::Datetime(TimeUnit::Milliseconds, None)))
        .collect()?;
    Ok(df)
}

/// Writes the table as CSV with a header row and ISO-8601 UTC timestamps.
pub fn write_csv_to<W: Write>(dataset: &Dataset, writer: W) -> Result<(), DatasetError> {
    let mut df = to_table(dataset)?;
    CsvWriter::new(writer)
        .include_header(true)
        .with_datetime_format(Some(CSV_DATETIME_FORMAT.to_string()))
        .finish(&mut df)?;
    Ok(())
}

pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<(), DatasetError> {
    let file = File::create(path).map_err(|e| DatasetError::Io(path.to_path_buf(), e))?;
    write_csv_to(dataset, file).map_err(|e| match e {
        DatasetError::Table(source) => DatasetError::CsvWrite(path.to_path_buf(), source),
        other => other,
    })
}
