// Replication orchestrator: independent engines per sweep value, reduced by
// mean. Runs are sequential; every engine owns its own generator.

use super::{Engine, SimulationConfig};
use crate::error::{ConfigError, SimResult};
use crate::metrics::analyzer::{self, SweepPoint};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SweepAxis {
    Horizon(Vec<f64>),
    /// Same buffer size applied to every output port.
    Capacity(Vec<usize>),
}

impl SweepAxis {
    pub fn name(&self) -> &'static str {
        match self {
            SweepAxis::Horizon(_) => "horizon",
            SweepAxis::Capacity(_) => "capacity",
        }
    }

    fn points(&self, base: &SimulationConfig) -> Vec<(f64, SimulationConfig)> {
        match self {
            SweepAxis::Horizon(values) => values
                .iter()
                .map(|&t| (t, base.clone().with_horizon(t)))
                .collect(),
            SweepAxis::Capacity(values) => values
                .iter()
                .map(|&c| (c as f64, base.clone().with_uniform_capacity(c)))
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Sweep {
    pub base: SimulationConfig,
    pub axis: SweepAxis,
    pub replications: usize,
    pub seed: u64,
    pub show_progress: bool,
}

impl Sweep {
    pub fn new(base: SimulationConfig, axis: SweepAxis) -> Self {
        Self {
            base,
            axis,
            replications: 10,
            seed: 0,
            show_progress: false,
        }
    }

    pub fn with_replications(mut self, replications: usize) -> Self {
        self.replications = replications;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Seed for replication `rep` of sweep point `point`. Distinct for
    /// every (point, rep) pair so no two runs share a stream.
    pub fn seed_for(&self, point: usize, rep: usize) -> u64 {
        self.seed
            .wrapping_add((point * self.replications + rep) as u64)
    }

    /// Validates every derived configuration, then runs all replications.
    pub fn run(&self) -> SimResult<Vec<SweepPoint>> {
        if self.replications == 0 {
            return Err(ConfigError::NoReplications.into());
        }
        let points = self.axis.points(&self.base);
        for (_, config) in &points {
            config.validate()?;
        }

        info!(
            "Sweeping {} over {} values, {} replications each",
            self.axis.name(),
            points.len(),
            self.replications
        );

        let pb = self.progress_bar((points.len() * self.replications) as u64);
        let mut results = Vec::with_capacity(points.len());

        for (idx, (value, config)) in points.into_iter().enumerate() {
            let mut runs = Vec::with_capacity(self.replications);
            for rep in 0..self.replications {
                let engine = Engine::new(config.clone(), self.seed_for(idx, rep))?;
                runs.push(engine.run());
                pb.inc(1);
            }

            let point = analyzer::average_runs(self.axis.name(), value, &runs);
            debug!(
                "{} = {}: mean handled {:.1}, mean blocked {:.1}, mean wait {:?}",
                point.axis, point.value, point.mean_handled, point.mean_blocked, point.mean_wait_time
            );
            pb.set_message(format!("{} = {}", point.axis, point.value));
            results.push(point);
        }

        pb.finish_with_message("Sweep complete");
        Ok(results)
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        if let Ok(style) =
            ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40.orange/yellow} {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, SimError};

    #[test]
    fn one_point_per_axis_value() {
        let sweep = Sweep::new(
            SimulationConfig::single_queue(10.0, 9.0, 12.0, 1000),
            SweepAxis::Horizon(vec![5.0, 10.0, 20.0]),
        )
        .with_replications(3)
        .with_seed(17);

        let points = sweep.run().unwrap();
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| p.replications == 3 && p.axis == "horizon"));
        assert_eq!(points[2].value, 20.0);
        // Longer horizon, more traffic.
        assert!(points[2].mean_handled > points[0].mean_handled);
    }

    #[test]
    fn sweep_is_reproducible() {
        let sweep = Sweep::new(
            SimulationConfig::single_queue(50.0, 9.0, 12.0, 2),
            SweepAxis::Capacity(vec![0, 2, 8]),
        )
        .with_replications(4)
        .with_seed(3);
        assert_eq!(sweep.run().unwrap(), sweep.run().unwrap());
    }

    #[test]
    fn seeds_do_not_collide_across_points() {
        let sweep = Sweep::new(SimulationConfig::default(), SweepAxis::Capacity(vec![1, 2]))
            .with_replications(5);
        let mut seeds: Vec<u64> = (0..2)
            .flat_map(|p| (0..5).map(move |r| (p, r)))
            .map(|(p, r)| sweep.seed_for(p, r))
            .collect();
        seeds.sort_unstable();
        seeds.dedup();
        assert_eq!(seeds.len(), 10);
    }

    #[test]
    fn invalid_axis_value_fails_before_running() {
        let sweep = Sweep::new(SimulationConfig::default(), SweepAxis::Horizon(vec![10.0, -1.0]));
        assert_eq!(
            sweep.run().unwrap_err(),
            SimError::Config(ConfigError::InvalidHorizon(-1.0))
        );
    }

    #[test]
    fn zero_replications_are_rejected() {
        let sweep = Sweep::new(SimulationConfig::default(), SweepAxis::Horizon(vec![10.0]))
            .with_replications(0);
        assert_eq!(
            sweep.run().unwrap_err(),
            SimError::Config(ConfigError::NoReplications)
        );
    }

    #[test]
    fn more_buffer_less_loss() {
        let sweep = Sweep::new(
            SimulationConfig::single_queue(200.0, 9.0, 12.0, 0),
            SweepAxis::Capacity(vec![0, 50]),
        )
        .with_replications(5)
        .with_seed(21);
        let points = sweep.run().unwrap();
        assert!(points[0].mean_blocked > points[1].mean_blocked);
    }
}
