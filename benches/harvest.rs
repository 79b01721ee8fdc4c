use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use euskalmet::{to_table, Dataset, ReadingRecord};

/// A month of ten-minute readings for four measures, in reverse order with
/// every tenth reading repeated.
fn synthetic_records() -> Vec<ReadingRecord> {
    let start = Utc.with_ymd_and_hms(2022, 5, 1, 0, 0, 0).unwrap();
    let measures = ["temperature", "humidity", "pressure", "rain"];
    let mut records = Vec::new();
    for slot in 0..(30 * 24 * 6) {
        for (i, measure) in measures.iter().enumerate() {
            let record = ReadingRecord {
                timestamp: start + Duration::minutes(10 * slot),
                station: "C017".to_string(),
                sensor: format!("S{}", i % 2 + 1),
                measure_type: "measuresForAir".to_string(),
                measure_id: measure.to_string(),
                value: Some(slot as f64 * 0.1),
            };
            if slot % 10 == 0 {
                records.push(record.clone());
            }
            records.push(record);
        }
    }
    records.reverse();
    records
}

fn bench_assembly(c: &mut Criterion) {
    let records = synthetic_records();
    c.bench_function("dataset_from_records", |b| {
        b.iter(|| Dataset::from_records(black_box(records.clone())))
    });

    let dataset = Dataset::from_records(records);
    c.bench_function("to_table", |b| b.iter(|| to_table(black_box(&dataset))));
}

criterion_group!(benches, bench_assembly);
criterion_main!(benches);
