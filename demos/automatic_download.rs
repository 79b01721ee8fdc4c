use chrono::{Duration, Utc};
use euskalmet::{DatasetFrameExt, Euskalmet, EuskalmetError, ObservationStore, RetryPolicy};
use polars::prelude::IntoLazy;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<(), EuskalmetError> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    configure_polars_display();

    let station = env::args().nth(1).unwrap_or_else(|| "C017".to_string());
    let client = Euskalmet::new()?;

    // Harvest the last six hours on a worker pool, retrying server errors twice.
    let end = Utc::now();
    let report = client
        .harvest()
        .station(&station)
        .start(end - Duration::hours(6))
        .end(end)
        .parallel(true)
        .retry(RetryPolicy::attempts(3))
        .call()?;
    println!(
        "{} readings from {} requests, {} skipped",
        report.dataset.len(),
        report.dispatched,
        report.invalid.len()
    );

    let last_hour = euskalmet::to_table(&report.dataset)?
        .lazy()
        .filter_period(end - Duration::hours(1), end)
        .collect()
        .map_err(euskalmet::DatasetError::from)?;
    println!("{:#?}", last_hour);

    // Keep a local CSV of the station up to date.
    let store = ObservationStore::for_station(&PathBuf::from("data"), &station);
    let merged = client
        .update_store()
        .station(&station)
        .store(store.clone())
        .parallel(true)
        .call()?;
    println!(
        "{} now holds {} observations",
        store.path().display(),
        merged.len()
    );

    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    // show 20 rows
    env::set_var("POLARS_FMT_MAX_ROWS", "20");
}
