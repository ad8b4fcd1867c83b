use std::hint::black_box;
use tracing::info;

use super::arena::MemoryArena;
use crate::config::LoadConfig;

/// Produces configurable CPU and memory pressure for a single request.
///
/// The work runs synchronously on the calling task. Request latency is meant
/// to grow with the configured load, so nothing here yields or offloads.
pub struct LoadGenerator {
    config: LoadConfig,
    arena: MemoryArena,
}

impl LoadGenerator {
    /// Allocates the arena up front (`memory_mb` MiB).
    pub fn new(config: LoadConfig) -> Self {
        let bytes = config.arena_bytes();
        if bytes > 0 {
            info!("Pre-allocating {} MB of memory...", config.memory_mb);
        }
        Self {
            config,
            arena: MemoryArena::new(bytes),
        }
    }

    pub fn arena(&self) -> &MemoryArena {
        &self.arena
    }

    pub fn simulate(&self) {
        burn_cpu(self.config.cpu_iterations);
        if !self.arena.is_empty() {
            self.arena.touch();
        }
    }
}

/// `sqrt` over `0..iterations`, results discarded.
pub fn burn_cpu(iterations: u64) {
    for i in 0..iterations {
        black_box((i as f64).sqrt());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_load_is_noop() {
        let gen = LoadGenerator::new(LoadConfig::default());
        assert!(gen.arena().is_empty());
        gen.simulate();
        gen.simulate();
    }

    #[test]
    fn test_arena_sized_from_config() {
        let gen = LoadGenerator::new(LoadConfig {
            cpu_iterations: 1_000,
            memory_mb: 1,
        });
        assert_eq!(gen.arena().len(), 1024 * 1024);
        gen.simulate();
        assert_eq!(gen.arena().len(), 1024 * 1024);
    }

    #[test]
    fn test_simulate_from_many_threads() {
        let gen = std::sync::Arc::new(LoadGenerator::new(LoadConfig {
            cpu_iterations: 10_000,
            memory_mb: 1,
        }));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let gen = gen.clone();
                std::thread::spawn(move || gen.simulate())
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
    }
}
