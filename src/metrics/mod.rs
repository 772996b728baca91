pub mod analyzer;
pub mod logger;

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Counters for one output port.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerQueueStats {
    pub handled_count: u64,
    pub blocked_count: u64,
    /// Sum of sojourn times (queueing delay plus service).
    pub wait_time_sum: f64,
    pub service_time_sum: f64,
    pub last_finish_time: Option<f64>,
}

impl PerQueueStats {
    pub fn record_admission(&mut self, arrival_time: f64, finish_time: f64, service_time: f64) {
        self.handled_count += 1;
        self.wait_time_sum += finish_time - arrival_time;
        self.service_time_sum += service_time;
        self.last_finish_time = Some(finish_time);
    }

    pub fn arrivals(&self) -> u64 {
        self.handled_count + self.blocked_count
    }
}

/// Outcome of one simulation run. Undefined metrics (nothing was handled)
/// are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub per_queue: Vec<PerQueueStats>,
    pub handled_count: u64,
    pub blocked_count: u64,
    pub makespan: Option<f64>,
    pub average_wait_time: Option<f64>,
    pub average_service_time: Option<f64>,
}

impl RunResult {
    pub fn arrivals(&self) -> u64 {
        self.handled_count + self.blocked_count
    }

    pub fn loss_ratio(&self) -> Option<f64> {
        match self.arrivals() {
            0 => None,
            n => Some(self.blocked_count as f64 / n as f64),
        }
    }

    /// Single space separated line:
    /// `handled handled[0..M] blocked blocked[0..M] makespan avg_wait avg_service`.
    pub fn report_line(&self) -> String {
        let mut line = String::new();
        let _ = write!(line, "{}", self.handled_count);
        for q in &self.per_queue {
            let _ = write!(line, " {}", q.handled_count);
        }
        let _ = write!(line, " {}", self.blocked_count);
        for q in &self.per_queue {
            let _ = write!(line, " {}", q.blocked_count);
        }
        for metric in [self.makespan, self.average_wait_time, self.average_service_time] {
            let _ = write!(line, " {}", metric.unwrap_or(f64::NAN));
        }
        line
    }
}

impl std::fmt::Display for RunResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.report_line())
    }
}

pub struct StatisticsAggregator;

impl StatisticsAggregator {
    pub fn finalize(per_queue: Vec<PerQueueStats>) -> RunResult {
        let handled_count: u64 = per_queue.iter().map(|q| q.handled_count).sum();
        let blocked_count: u64 = per_queue.iter().map(|q| q.blocked_count).sum();

        let (average_wait_time, average_service_time) = if handled_count > 0 {
            let wait: f64 = per_queue.iter().map(|q| q.wait_time_sum).sum();
            let service: f64 = per_queue.iter().map(|q| q.service_time_sum).sum();
            (
                Some(wait / handled_count as f64),
                Some(service / handled_count as f64),
            )
        } else {
            (None, None)
        };

        let makespan = per_queue
            .iter()
            .filter(|q| q.handled_count > 0)
            .filter_map(|q| q.last_finish_time)
            .reduce(f64::max);

        RunResult {
            per_queue,
            handled_count,
            blocked_count,
            makespan,
            average_wait_time,
            average_service_time,
        }
    }
}
