use super::RunResult;
use serde::{Deserialize, Serialize};

/// Replications of one sweep value reduced by arithmetic mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub axis: String,
    pub value: f64,
    pub replications: usize,
    pub mean_handled: f64,
    pub mean_blocked: f64,
    pub mean_loss_ratio: Option<f64>,
    pub mean_makespan: Option<f64>,
    pub mean_wait_time: Option<f64>,
    pub mean_service_time: Option<f64>,
}

/// Count means are NaN when `runs` is empty; callers reject zero replications.
pub fn average_runs(axis: &str, value: f64, runs: &[RunResult]) -> SweepPoint {
    let n = runs.len() as f64;

    SweepPoint {
        axis: axis.to_string(),
        value,
        replications: runs.len(),
        mean_handled: runs.iter().map(|r| r.handled_count as f64).sum::<f64>() / n,
        mean_blocked: runs.iter().map(|r| r.blocked_count as f64).sum::<f64>() / n,
        mean_loss_ratio: mean_defined(runs.iter().map(RunResult::loss_ratio)),
        mean_makespan: mean_defined(runs.iter().map(|r| r.makespan)),
        mean_wait_time: mean_defined(runs.iter().map(|r| r.average_wait_time)),
        mean_service_time: mean_defined(runs.iter().map(|r| r.average_service_time)),
    }
}

// Runs where a metric is undefined are left out of its mean.
fn mean_defined(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
