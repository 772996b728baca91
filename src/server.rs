// Output port: a single server with a finite FIFO buffer in front of it.
// Nothing is simulated per departure; each record only carries the time its
// unit leaves, and arrivals evict whatever has already left.

use crate::error::ConfigError;
use crate::metrics::PerQueueStats;
use crate::random::{self, RandomVariateGenerator};
use rand_distr::Exp;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::trace;

// Upper bound on the up-front allocation for the record deque. Ports with a
// larger capacity still grow on demand.
const MAX_PREALLOC: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Admission {
    Accepted {
        start_time: f64,
        finish_time: f64,
        service_time: f64,
    },
    Blocked,
}

impl Admission {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Admission::Blocked)
    }
}

#[derive(Debug, Clone)]
pub struct OutputPort {
    id: usize,
    capacity: usize,
    service: Exp<f64>,
    // Finish times of units queued or in service, in admission order.
    in_system: VecDeque<f64>,
    stats: PerQueueStats,
}

impl OutputPort {
    pub fn new(id: usize, capacity: usize, service_rate: f64) -> Result<Self, ConfigError> {
        let service = random::exponential(service_rate)?;
        let prealloc = capacity.saturating_add(1).min(MAX_PREALLOC);
        Ok(Self {
            id,
            capacity,
            service,
            in_system: VecDeque::with_capacity(prealloc),
            stats: PerQueueStats::default(),
        })
    }

    /// Units that may be in the port at once: the buffer plus the one in service.
    pub fn limit(&self) -> usize {
        self.capacity.saturating_add(1)
    }

    /// Units queued or in service as of the last admission call.
    pub fn occupancy(&self) -> usize {
        self.in_system.len()
    }

    pub fn stats(&self) -> &PerQueueStats {
        &self.stats
    }

    pub fn into_stats(self) -> PerQueueStats {
        self.stats
    }

    /// Offers a unit arriving at `now` to the port.
    pub fn admit(&mut self, now: f64, rng: &mut RandomVariateGenerator) -> Admission {
        self.evict(now);

        if self.in_system.len() >= self.limit() {
            self.stats.blocked_count += 1;
            trace!(port = self.id, now, occupancy = self.in_system.len(), "blocked");
            return Admission::Blocked;
        }

        let service_time = rng.sample(&self.service);
        let start_time = self.in_system.back().copied().unwrap_or(now);
        let finish_time = start_time + service_time;
        self.in_system.push_back(finish_time);

        self.stats.record_admission(now, finish_time, service_time);
        trace!(port = self.id, now, start_time, finish_time, "accepted");

        Admission::Accepted {
            start_time,
            finish_time,
            service_time,
        }
    }

    // Finish times are non-decreasing front to back, so departed units are
    // always a prefix.
    fn evict(&mut self, now: f64) {
        while let Some(&finish) = self.in_system.front() {
            if finish > now {
                break;
            }
            self.in_system.pop_front();
        }
    }
}
