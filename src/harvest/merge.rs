use crate::dataset::Dataset;
use crate::harvest::error::HarvestError;
use crate::harvest::outcome::{FetchOutcome, FetchResult, InvalidTask};
use log::{info, warn};

/// Combines the per-worker result lists of one run.
///
/// Results are ordered by task position first, so the output does not depend on
/// how tasks were split between workers. The lowest-positioned fatal outcome
/// aborts the merge.
pub fn merge(batches: Vec<Vec<FetchResult>>) -> Result<(Dataset, Vec<InvalidTask>), HarvestError> {
    let mut results: Vec<FetchResult> = batches.into_iter().flatten().collect();
    results.sort_by_key(|r| r.task.position);

    let mut records = Vec::new();
    let mut invalid = Vec::new();
    for result in results {
        match result.outcome {
            FetchOutcome::Ok(batch) => records.extend(batch),
            FetchOutcome::Invalid(reason) => {
                warn!("Skipping task {}: {}", result.task, reason);
                invalid.push(InvalidTask {
                    task: result.task,
                    reason,
                });
            }
            FetchOutcome::Fatal(reason) => {
                return Err(HarvestError::Fatal {
                    task: Box::new(result.task),
                    reason,
                });
            }
        }
    }

    let dataset = Dataset::from_records(records);
    info!(
        "Merged {} records ({} tasks skipped)",
        dataset.len(),
        invalid.len()
    );
    Ok((dataset, invalid))
}
