//! Simulation context implementing WalkContext for deterministic replays.

use async_trait::async_trait;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use travelers_env::{derive_stream_seed, WalkContext};

/// Simulation context backed by a virtual clock and seeded RNG streams.
///
/// This implements `WalkContext` using:
/// - A virtual clock that only moves when advanced or slept on
/// - Seeded ChaCha8 streams, one per traveler id
///
/// `sleep` returns immediately after advancing the clock, so a single
/// walk replays instantly with exact, reproducible elapsed times. The
/// clock is shared by every task using the context; concurrent walks see
/// each other's advances.
pub struct SimContext {
    /// Master seed for this simulation
    seed: u64,

    /// Current virtual time (nanoseconds since simulation start)
    virtual_time_ns: Arc<AtomicU64>,
}

impl SimContext {
    /// Creates a new SimContext with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            virtual_time_ns: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Creates an Arc-wrapped context for sharing.
    pub fn shared(seed: u64) -> Arc<Self> {
        Arc::new(Self::new(seed))
    }

    /// Advances virtual time by the given duration.
    pub fn advance_time(&self, duration: Duration) {
        self.virtual_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Returns the current virtual time in nanoseconds.
    pub fn time_ns(&self) -> u64 {
        self.virtual_time_ns.load(Ordering::SeqCst)
    }
}

impl Clone for SimContext {
    fn clone(&self) -> Self {
        Self {
            seed: self.seed,
            virtual_time_ns: Arc::clone(&self.virtual_time_ns),
        }
    }
}

#[async_trait]
impl WalkContext for SimContext {
    type Rng = ChaCha8Rng;

    fn now(&self) -> Duration {
        Duration::from_nanos(self.time_ns())
    }

    async fn sleep(&self, duration: Duration) {
        self.advance_time(duration);
    }

    fn rng(&self, stream: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(derive_stream_seed(self.seed, stream))
    }

    fn seed(&self) -> Option<u64> {
        Some(self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use travelers_core::{DelayRange, Grid, Traveler};
    use travelers_env::TravelerId;

    #[test]
    fn test_sim_context_time() {
        let ctx = SimContext::new(42);
        assert_eq!(ctx.now(), Duration::ZERO);

        ctx.advance_time(Duration::from_secs(1));
        assert_eq!(ctx.now(), Duration::from_secs(1));

        ctx.advance_time(Duration::from_millis(500));
        assert_relative_eq!(ctx.now().as_secs_f64(), 1.5);
    }

    #[tokio::test]
    async fn test_sim_sleep_advances_clock() {
        let ctx = SimContext::new(42);
        ctx.sleep(Duration::from_millis(250)).await;
        assert_eq!(ctx.time_ns(), 250_000_000);
    }

    #[test]
    fn test_sim_context_clone_shares_time() {
        let ctx1 = SimContext::new(42);
        let ctx2 = ctx1.clone();

        ctx1.advance_time(Duration::from_secs(5));

        assert_eq!(ctx1.now(), ctx2.now());
        assert_eq!(ctx2.seed(), Some(42));
    }

    #[tokio::test]
    async fn test_replay_is_exact() {
        let grid = Grid::new(15, 15).unwrap();
        let delays = DelayRange::from_secs_f64(0.01, 0.05).unwrap();

        let ctx1 = SimContext::new(777);
        let ctx2 = SimContext::new(777);
        let a = Traveler::new(grid, TravelerId(4), 10..100, delays, ctx1.rng(4));
        let b = Traveler::new(grid, TravelerId(4), 10..100, delays, ctx2.rng(4));

        let path_a = a.walk(&ctx1).await.unwrap();
        let path_b = b.walk(&ctx2).await.unwrap();

        // Same seed: same cells and same virtual timestamps
        assert_eq!(path_a, path_b);
    }

    #[tokio::test]
    async fn test_replay_elapsed_within_delay_bounds() {
        let grid = Grid::new(15, 15).unwrap();
        let delays = DelayRange::from_secs_f64(0.01, 0.05).unwrap();
        let ctx = SimContext::new(5);
        let traveler = Traveler::new(grid, TravelerId(0), 10..100, delays, ctx.rng(0));
        let steps = traveler.step_count() as f64;

        let path = traveler.walk(&ctx).await.unwrap();
        let total = path.total_elapsed().as_secs_f64();

        assert!(total >= steps * 0.01 - 1e-9);
        assert!(total < steps * 0.05);
        assert_relative_eq!(total, ctx.now().as_secs_f64(), epsilon = 1e-9);
    }
}
