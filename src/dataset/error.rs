use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to build the observation table")]
    Table(#[from] PolarsError),

    #[error("Failed to write CSV file '{0}'")]
    CsvWrite(PathBuf, #[source] PolarsError),

    #[error("Failed to read CSV file '{0}'")]
    CsvRead(PathBuf, #[source] PolarsError),

    #[error("I/O error on '{0}'")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to move the checkpoint into place at '{0}'")]
    Persist(PathBuf, #[source] tempfile::PersistError),

    #[error("CSV file '{path}' has no '{column}' column")]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("CSV file '{path}' row {row}: invalid {column} '{value}'")]
    InvalidField {
        path: PathBuf,
        row: usize,
        column: &'static str,
        value: String,
    },
}
