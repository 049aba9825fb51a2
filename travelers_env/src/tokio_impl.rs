//! Production implementation of WalkContext using Tokio.

use crate::types::derive_stream_seed;
use crate::WalkContext;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Production context backed by the Tokio clock.
///
/// Time comes from `tokio::time`, so a paused test runtime drives it
/// virtually. Randomness comes from OS entropy unless a seed is given.
pub struct TokioContext {
    /// Start time for monotonic duration calculations
    start: Instant,

    /// Optional master seed for reproducible random streams
    seed: Option<u64>,
}

impl TokioContext {
    /// Creates a new unseeded TokioContext.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            seed: None,
        }
    }

    /// Creates a TokioContext whose random streams derive from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self {
            start: Instant::now(),
            seed: Some(seed),
        }
    }

    /// Creates an Arc-wrapped context for sharing across tasks.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl Default for TokioContext {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalkContext for TokioContext {
    type Rng = StdRng;

    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn rng(&self, stream: u64) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(derive_stream_seed(seed, stream)),
            None => StdRng::from_entropy(),
        }
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }
}
