pub mod config;
pub mod scheduler;
pub mod sweep;

pub use config::SimulationConfig;
pub use scheduler::EventScheduler;
pub use sweep::{Sweep, SweepAxis};

use crate::agent::Source;
use crate::error::{ConfigError, RateKind, SimResult};
use crate::metrics::{RunResult, StatisticsAggregator};
use crate::network::RoutingPolicy;
use crate::random::RandomVariateGenerator;
use crate::server::{Admission, OutputPort};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Initializing,
    Running,
    Finished,
}

/// One processed arrival: where it came from, where it was sent, what happened.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub arrival_time: f64,
    pub input_port: usize,
    pub output_port: usize,
    pub admission: Admission,
}

/// Discrete-event engine for one run. Either drive it with [`Engine::step`]
/// or hand it to [`Engine::run`]; both end in a consuming call, so a result
/// is produced exactly once.
#[derive(Debug)]
pub struct Engine {
    horizon: f64,
    state: EngineState,
    processed: u64,
    rng: RandomVariateGenerator,
    routing: RoutingPolicy,
    sources: Vec<Source>,
    ports: Vec<OutputPort>,
    scheduler: EventScheduler,
}

impl Engine {
    pub fn new(config: SimulationConfig, seed: u64) -> SimResult<Self> {
        config.validate()?;

        let routing = RoutingPolicy::new(&config.routing_matrix)?;
        let sources = config
            .arrival_rates
            .iter()
            .enumerate()
            .map(|(id, &rate)| Source::new(id, rate))
            .collect::<Result<Vec<_>, _>>()?;
        let ports = config
            .service_rates
            .iter()
            .zip(&config.capacities)
            .enumerate()
            .map(|(id, (&rate, &capacity))| {
                OutputPort::new(id, capacity, rate).map_err(|_| ConfigError::NonPositiveRate {
                    kind: RateKind::Service,
                    port: id,
                    value: rate,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            horizon: config.horizon,
            state: EngineState::Initializing,
            processed: 0,
            rng: RandomVariateGenerator::new(seed),
            routing,
            scheduler: EventScheduler::with_capacity(sources.len()),
            sources,
            ports,
        })
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Arrivals processed so far.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    pub fn run(self) -> RunResult {
        self.finish()
    }

    /// Same as [`Engine::run`], also returning every routing and admission decision.
    pub fn run_traced(mut self) -> (RunResult, Vec<TraceEntry>) {
        let trace: Vec<TraceEntry> = std::iter::from_fn(|| self.step()).collect();
        (self.finish(), trace)
    }

    /// Processes the next arrival. The first call schedules each source's
    /// first arrival; returns `None` once the scheduler is drained.
    pub fn step(&mut self) -> Option<TraceEntry> {
        if self.state == EngineState::Initializing {
            self.initialize();
        }

        while let Some(event) = self.scheduler.pop_min() {
            let now = event.arrival_time();
            debug_assert!(now <= self.horizon, "arrival scheduled past the horizon");
            if now > self.horizon {
                continue;
            }

            let input = event.input_port();
            let output = self.routing.route(input, &mut self.rng);
            let admission = self.ports[output].admit(now, &mut self.rng);
            self.processed += 1;

            if let Some(next) = self.sources[input].next_arrival(now, self.horizon, &mut self.rng) {
                self.scheduler.push(next);
            }

            return Some(TraceEntry {
                arrival_time: now,
                input_port: input,
                output_port: output,
                admission,
            });
        }

        if self.state != EngineState::Finished {
            self.state = EngineState::Finished;
            debug!("Engine finished after {} arrivals", self.processed);
        }
        None
    }

    fn initialize(&mut self) {
        info!(
            "Starting run: horizon {}, {} inputs, {} outputs, seed {}",
            self.horizon,
            self.sources.len(),
            self.ports.len(),
            self.rng.seed()
        );

        for source in &self.sources {
            if let Some(first) = source.next_arrival(0.0, self.horizon, &mut self.rng) {
                self.scheduler.push(first);
            }
        }

        self.state = EngineState::Running;
        debug!("Engine running with {} initial arrivals", self.scheduler.len());
    }

    /// Drains any remaining arrivals and aggregates the per-port counters.
    pub fn finish(mut self) -> RunResult {
        while self.step().is_some() {}

        let per_queue = self.ports.into_iter().map(OutputPort::into_stats).collect();
        let result = StatisticsAggregator::finalize(per_queue);

        info!(
            "Run complete: handled {}, blocked {}, avg wait {:?}, avg service {:?}",
            result.handled_count,
            result.blocked_count,
            result.average_wait_time,
            result.average_service_time
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SimError, ValidationError};

    fn fan_in() -> SimulationConfig {
        SimulationConfig {
            horizon: 200.0,
            input_ports: 3,
            output_ports: 2,
            arrival_rates: vec![2.0, 3.0, 1.5],
            service_rates: vec![4.0, 5.0],
            capacities: vec![3, 1],
            routing_matrix: vec![vec![0.5, 0.5], vec![0.9, 0.1], vec![0.0, 1.0]],
        }
    }

    #[test]
    fn new_engine_starts_initializing() {
        let engine = Engine::new(fan_in(), 1).unwrap();
        assert_eq!(engine.state(), EngineState::Initializing);
    }

    #[test]
    fn stepping_walks_through_every_state() {
        let mut engine = Engine::new(fan_in(), 6).unwrap();
        let first = engine.step().unwrap();
        assert_eq!(engine.state(), EngineState::Running);
        assert_eq!(engine.processed(), 1);
        assert!(first.arrival_time <= 200.0);

        while engine.step().is_some() {
            assert_eq!(engine.state(), EngineState::Running);
        }
        assert_eq!(engine.state(), EngineState::Finished);
        assert!(engine.step().is_none());
        assert_eq!(engine.state(), EngineState::Finished);
    }

    #[test]
    fn finishing_mid_run_matches_full_run() {
        let mut engine = Engine::new(fan_in(), 13).unwrap();
        for _ in 0..10 {
            engine.step();
        }
        let partial = engine.finish();
        let full = Engine::new(fan_in(), 13).unwrap().run();
        assert_eq!(partial, full);
    }

    #[test]
    fn empty_horizon_finishes_on_first_step() {
        let config = SimulationConfig::single_queue(1e-9, 0.001, 1.0, 0);
        let mut engine = Engine::new(config, 4).unwrap();
        assert!(engine.step().is_none());
        assert_eq!(engine.state(), EngineState::Finished);
        assert_eq!(engine.processed(), 0);
    }

    #[test]
    fn invalid_routing_fails_at_construction() {
        let mut config = fan_in();
        config.routing_matrix[2] = vec![0.6, 0.6];
        assert!(matches!(
            Engine::new(config, 1),
            Err(SimError::Validation(ValidationError::RowSum { row: 2, .. }))
        ));
    }

    #[test]
    fn same_seed_same_result() {
        let a = Engine::new(fan_in(), 99).unwrap().run_traced();
        let b = Engine::new(fan_in(), 99).unwrap().run_traced();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seed_different_trace() {
        let (_, a) = Engine::new(fan_in(), 1).unwrap().run_traced();
        let (_, b) = Engine::new(fan_in(), 2).unwrap().run_traced();
        assert_ne!(a, b);
    }

    #[test]
    fn trace_is_time_ordered_and_within_horizon() {
        let (_, trace) = Engine::new(fan_in(), 5).unwrap().run_traced();
        assert!(!trace.is_empty());
        for pair in trace.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.arrival_time < b.arrival_time
                    || (a.arrival_time == b.arrival_time && a.input_port <= b.input_port)
            );
        }
        assert!(trace.iter().all(|e| e.arrival_time <= 200.0));
    }

    #[test]
    fn trace_agrees_with_counters() {
        let (result, trace) = Engine::new(fan_in(), 8).unwrap().run_traced();
        assert_eq!(trace.len() as u64, result.arrivals());
        for (j, stats) in result.per_queue.iter().enumerate() {
            let routed = trace.iter().filter(|e| e.output_port == j).count() as u64;
            let blocked = trace
                .iter()
                .filter(|e| e.output_port == j && e.admission.is_blocked())
                .count() as u64;
            assert_eq!(stats.arrivals(), routed);
            assert_eq!(stats.blocked_count, blocked);
        }
    }

    #[test]
    fn zero_probability_port_never_sees_input() {
        let (_, trace) = Engine::new(fan_in(), 3).unwrap().run_traced();
        assert!(
            trace
                .iter()
                .filter(|e| e.input_port == 2)
                .all(|e| e.output_port == 1)
        );
    }

    #[test]
    fn tiny_horizon_can_yield_undefined_metrics() {
        let config = SimulationConfig::single_queue(1e-9, 0.001, 1.0, 0);
        let result = Engine::new(config, 4).unwrap().run();
        assert_eq!(result.arrivals(), 0);
        assert_eq!(result.makespan, None);
        assert_eq!(result.average_wait_time, None);
    }
}
