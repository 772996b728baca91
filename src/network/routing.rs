use crate::error::ValidationError;
use crate::random::RandomVariateGenerator;
use rand::distributions::WeightedIndex;

/// Tolerance on a routing row summing to one.
pub const ROW_SUM_TOLERANCE: f64 = 1e-6;

/// Fixed probabilistic routing from input ports to output ports.
#[derive(Debug, Clone)]
pub struct RoutingPolicy {
    rows: Vec<WeightedIndex<f64>>,
}

impl RoutingPolicy {
    /// Checks every row and precomputes one categorical sampler per input port.
    pub fn new(matrix: &[Vec<f64>]) -> Result<Self, ValidationError> {
        let mut rows = Vec::with_capacity(matrix.len());

        for (row_idx, row) in matrix.iter().enumerate() {
            validate_row(row_idx, row)?;
            let index = WeightedIndex::new(row).map_err(|_| ValidationError::RowSum {
                row: row_idx,
                sum: row.iter().sum(),
            })?;
            rows.push(index);
        }

        Ok(Self { rows })
    }

    /// Picks the output port for a unit from `input_port`.
    pub fn route(&self, input_port: usize, rng: &mut RandomVariateGenerator) -> usize {
        rng.sample(&self.rows[input_port])
    }
}

pub fn validate_row(row_idx: usize, row: &[f64]) -> Result<(), ValidationError> {
    for (col, &p) in row.iter().enumerate() {
        if !p.is_finite() || p < 0.0 {
            return Err(ValidationError::InvalidProbability {
                row: row_idx,
                col,
                value: p,
            });
        }
    }

    let sum: f64 = row.iter().sum();
    if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
        return Err(ValidationError::RowSum { row: row_idx, sum });
    }
    Ok(())
}
