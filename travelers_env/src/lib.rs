//! Travelers Environment Abstraction Layer
//!
//! This crate provides the seam that lets the walk engine run against the
//! real clock (tokio) or a virtual one (simulation), without the engine
//! knowing which.
//!
//! # Core Concept
//!
//! A traveler's walk only needs three things from the outside world:
//! - Time (`now()`, `sleep()`)
//! - Randomness (`rng(stream)`)
//! - An optional master seed for reproducibility (`seed()`)
//!
//! With a master seed every traveler draws from its own derived stream,
//! so a run's positions and step counts are reproducible from one number.
//!
//! # Example
//!
//! ```ignore
//! use travelers_env::{TokioContext, WalkContext};
//!
//! async fn tick<Ctx: WalkContext>(ctx: &Ctx) {
//!     let start = ctx.now();
//!     ctx.sleep(Duration::from_millis(10)).await;
//!     assert!(ctx.now() > start);
//! }
//! ```

mod context;
mod tokio_impl;
mod types;

pub use context::WalkContext;
pub use tokio_impl::TokioContext;
pub use types::{derive_stream_seed, RunId, TravelerId};
