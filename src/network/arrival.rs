use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A unit leaving an input port at a given simulated time.
///
/// Ordered by arrival time, then by input port so equal timestamps always
/// pop in the same order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ArrivalEvent {
    arrival_time: f64,
    input_port: usize,
}

impl ArrivalEvent {
    pub fn new(arrival_time: f64, input_port: usize) -> Self {
        Self {
            arrival_time,
            input_port,
        }
    }

    pub fn arrival_time(&self) -> f64 {
        self.arrival_time
    }

    pub fn input_port(&self) -> usize {
        self.input_port
    }
}

impl Ord for ArrivalEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        self.arrival_time
            .total_cmp(&other.arrival_time)
            .then_with(|| self.input_port.cmp(&other.input_port))
    }
}

impl PartialOrd for ArrivalEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ArrivalEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ArrivalEvent {}
