use thiserror::Error;

/// Problems with the shape or numeric ranges of a configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("horizon must be finite and > 0, got {0}")]
    InvalidHorizon(f64),

    #[error("{kind} rate for port {port} must be finite and > 0, got {value}")]
    NonPositiveRate {
        kind: RateKind,
        port: usize,
        value: f64,
    },

    #[error("rate must be finite and > 0, got {0}")]
    InvalidRate(f64),

    #[error("capacity for output port {port} must be a non-negative integer, got {value}")]
    InvalidCapacity { port: usize, value: f64 },

    #[error("need at least one {0} port")]
    NoPorts(PortSide),

    #[error("{what} has {actual} entries, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{inputs} x {outputs} ports overflows the argument count")]
    TooManyPorts { inputs: usize, outputs: usize },

    #[error("need at least one replication")]
    NoReplications,
}

/// Problems with the routing matrix contents.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("routing probability [{row}][{col}] is invalid: {value}")]
    InvalidProbability { row: usize, col: usize, value: f64 },

    #[error("routing row {row} sums to {sum}, expected 1")]
    RowSum { row: usize, sum: f64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateKind {
    Arrival,
    Service,
}

impl std::fmt::Display for RateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateKind::Arrival => write!(f, "arrival"),
            RateKind::Service => write!(f, "service"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortSide {
    Input,
    Output,
}

impl std::fmt::Display for PortSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortSide::Input => write!(f, "input"),
            PortSide::Output => write!(f, "output"),
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
