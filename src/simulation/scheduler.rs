use crate::network::ArrivalEvent;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Pending arrivals, earliest first.
#[derive(Debug, Default)]
pub struct EventScheduler {
    events: BinaryHeap<Reverse<ArrivalEvent>>,
}

impl EventScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: BinaryHeap::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, event: ArrivalEvent) {
        self.events.push(Reverse(event));
    }

    pub fn pop_min(&mut self) -> Option<ArrivalEvent> {
        self.events.pop().map(|Reverse(event)| event)
    }

    pub fn peek_time(&self) -> Option<f64> {
        self.events.peek().map(|Reverse(event)| event.arrival_time())
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
