// src/load_balancer/round_robin.rs
use crate::config::ConfigError;
use crate::load_balancer::LoadBalancer;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Cycles through a fixed list of backends in order.
#[derive(Debug)]
pub struct RoundRobinBalancer {
    backends: Vec<String>,
    counter: AtomicUsize,
}

impl RoundRobinBalancer {
    pub fn new(backends: Vec<String>) -> Result<Self, ConfigError> {
        if backends.is_empty() {
            return Err(ConfigError::NoBackends);
        }

        Ok(Self {
            backends,
            counter: AtomicUsize::new(0),
        })
    }

    pub fn backends(&self) -> &[String] {
        &self.backends
    }
}

impl LoadBalancer for RoundRobinBalancer {
    fn choose(&self) -> &str {
        // fetch_add serializes callers: each one observes a distinct counter value.
        // Wraps at usize::MAX, after which the order skips unless len divides 2^64.
        let index = self.counter.fetch_add(1, Ordering::Relaxed) % self.backends.len();
        &self.backends[index]
    }

    fn len(&self) -> usize {
        self.backends.len()
    }

    fn name(&self) -> &'static str {
        "round_robin"
    }
}
