mod algorithm;
mod round_robin;

pub use algorithm::LoadBalancer; // trait
pub use round_robin::RoundRobinBalancer;

use crate::config::ConfigError;
use std::sync::Arc;

/// Build the shared selector from an already validated backend list.
pub fn create_load_balancer(backends: Vec<String>) -> Result<Arc<dyn LoadBalancer>, ConfigError> {
    let balancer = RoundRobinBalancer::new(backends)?;
    tracing::debug!(
        algorithm = balancer.name(),
        backends = ?balancer.backends(),
        "load balancer ready"
    );
    Ok(Arc::new(balancer))
}
