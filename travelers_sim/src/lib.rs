//! Travelers Simulation Harness
//!
//! Runs N travelers concurrently on one torus and collects their paths.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Orchestrator                         │
//! │  ┌──────────────────────────────────────────────────────┐   │
//! │  │ WalkContext (TokioContext | SimContext)              │   │
//! │  └──────────────────────────────────────────────────────┘   │
//! │       │                  │                    │             │
//! │  ┌────▼─────┐       ┌────▼─────┐         ┌────▼─────┐       │
//! │  │Traveler 0│       │Traveler 1│   ...   │Traveler N│       │
//! │  └────┬─────┘       └────┬─────┘         └────┬─────┘       │
//! │       └──────────────────┼────────────────────┘             │
//! │                     JoinSet (fan-in)                        │
//! │                          │                                  │
//! │                      RunReport                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use travelers_sim::{Orchestrator, SimConfig};
//! use travelers_env::TokioContext;
//!
//! let config = SimConfig::default().with_seed(42);
//! let report = Orchestrator::new(&config, TokioContext::shared())?
//!     .run()
//!     .await;
//! ```

mod config;
mod context;
mod faults;
mod report;
mod runner;

pub use config::{ConfigError, SimConfig, WalkPlan};
pub use context::SimContext;
pub use faults::{FaultPlan, FaultSpec};
pub use report::{OutputFormat, ReportWriter};
pub use runner::{Orchestrator, RunReport, TravelerOutcome};
