pub mod arrival;
pub mod routing;

pub use arrival::ArrivalEvent;
pub use routing::RoutingPolicy;
