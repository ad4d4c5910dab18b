// src/load_balancer/algorithm.rs

/// Picks the backend each new connection or request is sent to.
pub trait LoadBalancer: Send + Sync {
    /// Returns the next backend address. Never fails: implementations
    /// reject an empty backend set at construction.
    fn choose(&self) -> &str;

    /// Number of configured backends.
    fn len(&self) -> usize;

    fn name(&self) -> &'static str;
}
