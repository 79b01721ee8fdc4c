use crate::types::into_utc_trait::IntoUtcDateTime;
use polars::prelude::{col, lit, DataType, LazyFrame, TimeUnit};

/// Row filters for frames produced by [`crate::to_table`].
pub trait DatasetFrameExt {
    /// Keeps rows whose `timestamp` lies in `[start, end]`.
    fn filter_period(self, start: impl IntoUtcDateTime, end: impl IntoUtcDateTime) -> LazyFrame;

    fn filter_sensor(self, sensor: &str) -> LazyFrame;

    fn filter_measure(self, measure_id: &str) -> LazyFrame;
}

impl DatasetFrameExt for LazyFrame {
    fn filter_period(self, start: impl IntoUtcDateTime, end: impl IntoUtcDateTime) -> LazyFrame {
        let start_naive = start.into_utc().naive_utc();
        let end_naive = end.into_utc().naive_utc();

        self.filter(
            col("timestamp")
                .cast(DataType::Datetime(TimeUnit::Milliseconds, None))
                .gt_eq(lit(start_naive))
                .and(
                    col("timestamp")
                        .cast(DataType::Datetime(TimeUnit::Milliseconds, None))
                        .lt_eq(lit(end_naive)),
                ),
        )
    }

    fn filter_sensor(self, sensor: &str) -> LazyFrame {
        self.filter(col("sensor").eq(lit(sensor.to_string())))
    }

    fn filter_measure(self, measure_id: &str) -> LazyFrame {
        self.filter(col("measure_id").eq(lit(measure_id.to_string())))
    }
}
