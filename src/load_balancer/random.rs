//! Uniform random port selection.

use rand::seq::SliceRandom;

use crate::load_balancer::PortSelector;

/// Picks every port in the pool with equal probability.
/// Uses the thread-local generator, so it is safe to share across tasks.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformRandom;

impl UniformRandom {
    pub fn new() -> Self {
        Self
    }
}

impl PortSelector for UniformRandom {
    fn select(&self, ports: &[u16]) -> Option<u16> {
        ports.choose(&mut rand::thread_rng()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_pool_selects_nothing() {
        assert_eq!(UniformRandom::new().select(&[]), None);
    }

    #[test]
    fn single_port_is_always_chosen() {
        let lb = UniformRandom::new();
        for _ in 0..100 {
            assert_eq!(lb.select(&[7001]), Some(7001));
        }
    }

    #[test]
    fn selection_is_roughly_uniform() {
        let lb = UniformRandom::new();
        let pool = [7001, 7002, 7003];
        let draws = 30_000;
        let mut counts: HashMap<u16, usize> = HashMap::new();
        for _ in 0..draws {
            let port = lb.select(&pool).unwrap();
            *counts.entry(port).or_default() += 1;
        }

        assert_eq!(counts.len(), 3);
        let expected = draws / pool.len();
        for port in pool {
            let seen = counts[&port];
            // well over six standard deviations from the mean
            assert!(seen.abs_diff(expected) < expected / 10, "port {port} drawn {seen} times");
        }
    }
}
