// Input port traffic. Each source is a Poisson renewal process: its next
// arrival only depends on its own previous arrival.

use crate::error::{ConfigError, RateKind};
use crate::network::ArrivalEvent;
use crate::random::{self, RandomVariateGenerator};
use rand_distr::Exp;

#[derive(Debug, Clone)]
pub struct Source {
    id: usize,
    interarrival: Exp<f64>,
}

impl Source {
    pub fn new(id: usize, rate: f64) -> Result<Self, ConfigError> {
        let interarrival = random::exponential(rate).map_err(|_| ConfigError::NonPositiveRate {
            kind: RateKind::Arrival,
            port: id,
            value: rate,
        })?;
        Ok(Self { id, interarrival })
    }

    /// Next arrival after `previous`, or `None` when it falls past the horizon.
    pub fn next_arrival(
        &self,
        previous: f64,
        horizon: f64,
        rng: &mut RandomVariateGenerator,
    ) -> Option<ArrivalEvent> {
        let next = previous + rng.sample(&self.interarrival);
        (next <= horizon).then(|| ArrivalEvent::new(next, self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respects_horizon() {
        let source = Source::new(2, 5.0).unwrap();
        let mut rng = RandomVariateGenerator::new(9);
        let mut t = 0.0;
        let mut count = 0;
        while let Some(event) = source.next_arrival(t, 10.0, &mut rng) {
            assert_eq!(event.input_port(), 2);
            assert!(event.arrival_time() > t);
            assert!(event.arrival_time() <= 10.0);
            t = event.arrival_time();
            count += 1;
        }
        // About 50 arrivals expected.
        assert!((20..100).contains(&count), "count {count}");
    }

    #[test]
    fn invalid_rate_names_the_port() {
        let err = Source::new(3, -1.0).unwrap_err();
        assert_eq!(
            err,
            ConfigError::NonPositiveRate {
                kind: RateKind::Arrival,
                port: 3,
                value: -1.0
            }
        );
    }
}
