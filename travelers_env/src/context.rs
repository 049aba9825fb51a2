//! Core environment context trait for travelers.

use async_trait::async_trait;
use rand::RngCore;
use std::time::Duration;

/// The central interface for environment interaction.
///
/// This trait abstracts the "real world" so that the walk engine can run
/// against the tokio clock in production and a virtual clock in simulation.
///
/// # Implementations
///
/// - **Production**: `TokioContext` - wraps `tokio::time`, `StdRng`
/// - **Simulation**: `SimContext` - virtual clock, `ChaCha8Rng(seed)`
///
/// # Determinism
///
/// Every source of non-determinism a traveler touches (time, randomness)
/// goes through this trait.
#[async_trait]
pub trait WalkContext: Send + Sync + 'static {
    /// Random source handed to each traveler.
    type Rng: RngCore + Send + 'static;

    /// Returns the current monotonic time since context creation.
    ///
    /// Used for elapsed-time stamps on path entries.
    /// In simulation, this is the virtual clock time.
    fn now(&self) -> Duration;

    /// Suspends the calling task for the given duration.
    ///
    /// In production: wraps `tokio::time::sleep`
    /// In simulation: advances the virtual clock
    async fn sleep(&self, duration: Duration);

    /// Returns an independent random source for the given stream.
    ///
    /// The orchestrator uses one stream per traveler id. When the context
    /// is seeded, the same `(seed, stream)` pair always yields the same
    /// sequence.
    ///
    /// # Arguments
    /// * `stream` - Stream index, combined with the master seed
    fn rng(&self, stream: u64) -> Self::Rng;

    /// Returns the context's master seed (for logging/debugging).
    ///
    /// `None` means randomness comes from OS entropy.
    fn seed(&self) -> Option<u64>;
}
