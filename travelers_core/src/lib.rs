//! Travelers Core - Bounded Random Walks on a Torus
//!
//! This library provides the walk engine:
//! 1. **Grid**: toroidal coordinate space and wrap-around arithmetic
//! 2. **Direction**: the closed vocabulary of single-cell moves
//! 3. **Traveler**: one agent performing a randomized walk of randomized
//!    length, recording a timestamped path

pub mod error;
pub mod grid;
pub mod traveler;

// Re-export key types for convenience
pub use error::{GridError, WalkError};
pub use grid::{Delta, Direction, Grid, Position};
pub use traveler::{DelayRange, Path, PathEntry, Traveler};
