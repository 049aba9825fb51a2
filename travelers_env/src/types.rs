//! Common types for the travelers environment abstraction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display alphabet for traveler symbols: `A..Z` then `a..z`.
const SYMBOLS: &[u8; 52] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Identifier of a traveler within one run.
///
/// Ids are dense: a run with N travelers uses `0..N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TravelerId(pub u32);

impl TravelerId {
    /// Returns the display symbol derived from this id.
    ///
    /// Ids 0-25 map to `'A'..='Z'`, 26-51 to `'a'..='z'`; larger ids
    /// cycle through the same 52 letters.
    pub fn symbol(&self) -> char {
        SYMBOLS[self.0 as usize % SYMBOLS.len()] as char
    }

    /// Returns the id as a random stream index.
    pub fn stream(&self) -> u64 {
        u64::from(self.0)
    }
}

impl std::fmt::Display for TravelerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for one orchestrator run.
///
/// Uses UUID v4 so independent runs never collide in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Creates a new random RunId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Show first 8 chars for readability
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Derives the seed of one random stream from a master seed.
///
/// `master_seed * golden_ratio_prime + stream * prime`, so adding more
/// streams never changes the seeds of existing ones.
pub fn derive_stream_seed(master_seed: u64, stream: u64) -> u64 {
    master_seed
        .wrapping_mul(0x9e3779b97f4a7c15)
        .wrapping_add(stream.wrapping_mul(0x517cc1b727220a95))
}
