pub mod agent;
pub mod error;
pub mod metrics;
pub mod network;
pub mod random;
pub mod server;
pub mod simulation;

pub use error::{ConfigError, SimError, ValidationError};
pub use metrics::{PerQueueStats, RunResult, StatisticsAggregator};
pub use simulation::{Engine, SimulationConfig};

pub mod prelude {
    pub use crate::agent::Source;
    pub use crate::error::{ConfigError, SimError, SimResult, ValidationError};
    pub use crate::metrics::analyzer::SweepPoint;
    pub use crate::metrics::{PerQueueStats, RunResult, StatisticsAggregator};
    pub use crate::network::{ArrivalEvent, RoutingPolicy};
    pub use crate::random::RandomVariateGenerator;
    pub use crate::server::{Admission, OutputPort};
    pub use crate::simulation::{Engine, EngineState, EventScheduler, SimulationConfig, Sweep, SweepAxis, TraceEntry};
}
