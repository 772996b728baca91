use crate::error::{ConfigError, PortSide, RateKind, SimError};
use crate::network::routing;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub horizon: f64,
    pub input_ports: usize,
    pub output_ports: usize,
    pub arrival_rates: Vec<f64>,
    pub service_rates: Vec<f64>,
    /// Buffer slots per output port, not counting the unit in service.
    pub capacities: Vec<usize>,
    /// `routing_matrix[i][j]`: probability that a unit from input `i` goes to output `j`.
    pub routing_matrix: Vec<Vec<f64>>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::single_queue(1000.0, 9.0, 12.0, 1000)
    }
}

impl SimulationConfig {
    /// One source feeding one output port.
    pub fn single_queue(horizon: f64, arrival_rate: f64, service_rate: f64, capacity: usize) -> Self {
        Self {
            horizon,
            input_ports: 1,
            output_ports: 1,
            arrival_rates: vec![arrival_rate],
            service_rates: vec![service_rate],
            capacities: vec![capacity],
            routing_matrix: vec![vec![1.0]],
        }
    }

    /// Rebuilds a config from the flat argument order of the command line
    /// tool: `N*M` routing probabilities (row major), `N` arrival rates,
    /// `M` capacities, `M` service rates.
    pub fn from_flat(horizon: f64, n: usize, m: usize, values: &[f64]) -> Result<Self, ConfigError> {
        if n == 0 {
            return Err(ConfigError::NoPorts(PortSide::Input));
        }
        if m == 0 {
            return Err(ConfigError::NoPorts(PortSide::Output));
        }

        let too_many = ConfigError::TooManyPorts { inputs: n, outputs: m };
        let cells = n.checked_mul(m).ok_or_else(|| too_many.clone())?;
        let expected = m
            .checked_mul(2)
            .and_then(|per_output| cells.checked_add(per_output))
            .and_then(|total| total.checked_add(n))
            .ok_or(too_many)?;
        if values.len() != expected {
            return Err(ConfigError::DimensionMismatch {
                what: "flattened argument list",
                expected,
                actual: values.len(),
            });
        }

        let (probs, rest) = values.split_at(cells);
        let (arrival_rates, rest) = rest.split_at(n);
        let (capacities, service_rates) = rest.split_at(m);

        let capacities = capacities
            .iter()
            .enumerate()
            .map(|(port, &value)| {
                if value.is_finite() && value >= 0.0 && value.fract() == 0.0 {
                    Ok(value as usize)
                } else {
                    Err(ConfigError::InvalidCapacity { port, value })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            horizon,
            input_ports: n,
            output_ports: m,
            arrival_rates: arrival_rates.to_vec(),
            service_rates: service_rates.to_vec(),
            capacities,
            routing_matrix: probs.chunks(m).map(<[f64]>::to_vec).collect(),
        })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_horizon(mut self, horizon: f64) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_uniform_capacity(mut self, capacity: usize) -> Self {
        self.capacities = vec![capacity; self.output_ports];
        self
    }

    /// Checks dimensions, ranges and routing rows. Anything rejected here
    /// would otherwise surface mid-run.
    pub fn validate(&self) -> Result<(), SimError> {
        if !self.horizon.is_finite() || self.horizon <= 0.0 {
            return Err(ConfigError::InvalidHorizon(self.horizon).into());
        }
        if self.input_ports == 0 {
            return Err(ConfigError::NoPorts(PortSide::Input).into());
        }
        if self.output_ports == 0 {
            return Err(ConfigError::NoPorts(PortSide::Output).into());
        }

        check_len("arrival_rates", self.input_ports, self.arrival_rates.len())?;
        check_len("service_rates", self.output_ports, self.service_rates.len())?;
        check_len("capacities", self.output_ports, self.capacities.len())?;
        check_len("routing_matrix rows", self.input_ports, self.routing_matrix.len())?;
        for row in &self.routing_matrix {
            check_len("routing_matrix row", self.output_ports, row.len())?;
        }

        check_rates(RateKind::Arrival, &self.arrival_rates)?;
        check_rates(RateKind::Service, &self.service_rates)?;

        for (idx, row) in self.routing_matrix.iter().enumerate() {
            routing::validate_row(idx, row)?;
        }
        Ok(())
    }

    /// Offered load per output port, `sum_i(lambda_i * p_ij) / mu_j`.
    pub fn utilization(&self) -> Vec<f64> {
        (0..self.output_ports)
            .map(|j| {
                let offered: f64 = self
                    .arrival_rates
                    .iter()
                    .zip(&self.routing_matrix)
                    .map(|(rate, row)| rate * row[j])
                    .sum();
                offered / self.service_rates[j]
            })
            .collect()
    }
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<(), ConfigError> {
    if expected != actual {
        return Err(ConfigError::DimensionMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

fn check_rates(kind: RateKind, rates: &[f64]) -> Result<(), ConfigError> {
    match rates
        .iter()
        .enumerate()
        .find(|&(_, r)| !r.is_finite() || *r <= 0.0)
    {
        Some((port, &value)) => Err(ConfigError::NonPositiveRate { kind, port, value }),
        None => Ok(()),
    }
}
