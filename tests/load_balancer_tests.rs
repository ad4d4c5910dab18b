// tests/load_balancer_tests.rs
use rust_balance::config::ConfigError;
use rust_balance::load_balancer::{create_load_balancer, LoadBalancer, RoundRobinBalancer};
use std::collections::HashMap;
use std::sync::Arc;

fn backends(list: &[&str]) -> Vec<String> {
    list.iter().map(|b| b.to_string()).collect()
}

#[test]
fn test_round_robin_order() {
    let lb = RoundRobinBalancer::new(backends(&["a:1", "b:2", "c:3"])).unwrap();
    let picks: Vec<&str> = (0..7).map(|_| lb.choose()).collect();
    assert_eq!(picks, ["a:1", "b:2", "c:3", "a:1", "b:2", "c:3", "a:1"]);
}

#[test]
fn test_ith_call_follows_modulo() {
    let list = backends(&["w:1", "x:2", "y:3", "z:4"]);
    let lb = RoundRobinBalancer::new(list.clone()).unwrap();
    for i in 0..100 {
        assert_eq!(lb.choose(), list[i % list.len()]);
    }
}

#[test]
fn test_len_is_constant() {
    let lb = RoundRobinBalancer::new(backends(&["a:1", "b:2", "c:3"])).unwrap();
    assert_eq!(lb.len(), 3);
    for _ in 0..10 {
        lb.choose();
    }
    assert_eq!(lb.len(), 3);
    assert_eq!(lb.name(), "round_robin");
}

#[test]
fn test_empty_backends_rejected() {
    let err = RoundRobinBalancer::new(Vec::new()).unwrap_err();
    assert!(matches!(err, ConfigError::NoBackends));
    assert!(create_load_balancer(Vec::new()).is_err());
}

#[test]
fn test_round_robin_distribution_under_contention() {
    const THREADS: usize = 8;
    const CALLS: usize = 300;

    let lb: Arc<dyn LoadBalancer> =
        create_load_balancer(backends(&["a:1", "b:2", "c:3"])).unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let lb = lb.clone();
            std::thread::spawn(move || {
                (0..CALLS)
                    .map(|_| lb.choose().to_string())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for handle in handles {
        for pick in handle.join().unwrap() {
            *counts.entry(pick).or_default() += 1;
        }
    }

    // 2400 calls over 3 backends: nothing skipped, nothing double counted.
    assert_eq!(counts.len(), 3);
    for backend in ["a:1", "b:2", "c:3"] {
        assert_eq!(counts[backend], THREADS * CALLS / 3);
    }

    // The next pick continues the global sequence.
    assert_eq!(lb.choose(), "a:1");
}

#[tokio::test]
async fn test_concurrent_tasks_share_rotation() {
    let lb = create_load_balancer(backends(&["a:1", "b:2"])).unwrap();

    let tasks: Vec<_> = (0..50)
        .map(|_| {
            let lb = lb.clone();
            tokio::spawn(async move { lb.choose().to_string() })
        })
        .collect();

    let mut a = 0;
    for task in tasks {
        if task.await.unwrap() == "a:1" {
            a += 1;
        }
    }
    assert_eq!(a, 25);
}
