//! Run configuration and validation.

use std::ops::Range;
use thiserror::Error;
use travelers_core::{DelayRange, Grid, GridError};

/// Configuration for a simulation run.
///
/// Passed explicitly to the orchestrator, so independent runs never share
/// state.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Grid width in cells
    pub width: u32,

    /// Grid height in cells
    pub height: u32,

    /// Number of concurrent travelers
    pub traveler_count: u32,

    /// Inclusive lower bound on a traveler's step count
    pub min_steps: usize,

    /// Exclusive upper bound on a traveler's step count
    pub max_steps: usize,

    /// Inclusive lower bound on the per-step delay (seconds)
    pub min_delay_secs: f64,

    /// Exclusive upper bound on the per-step delay (seconds)
    pub max_delay_secs: f64,

    /// Master seed for reproducible walks (None = OS entropy)
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 15,
            height: 15,
            traveler_count: 15,
            min_steps: 10,
            max_steps: 100,
            min_delay_secs: 0.01,
            max_delay_secs: 0.05,
            seed: None,
        }
    }
}

/// Reasons a configuration is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid grid: {0}")]
    Grid(#[from] GridError),

    #[error("At least one traveler is required")]
    NoTravelers,

    #[error("min_steps must be at least 1, got {0}")]
    StepsBelowOne(usize),

    #[error("min_steps ({min}) must be below max_steps ({max})")]
    EmptyStepRange { min: usize, max: usize },

    #[error("Delay bounds must be finite, got [{min}, {max})")]
    NonFiniteDelay { min: f64, max: f64 },

    #[error("min_delay must be positive, got {0}")]
    NonPositiveDelay(f64),

    #[error("min_delay ({min}) must be below max_delay ({max})")]
    EmptyDelayRange { min: f64, max: f64 },

    #[error("Delay bounds [{min}, {max}) collapse to the same nanosecond")]
    DelayBelowResolution { min: f64, max: f64 },
}

/// A validated configuration, in the types the walk engine consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkPlan {
    pub grid: Grid,
    pub traveler_count: u32,
    pub steps: Range<usize>,
    pub delays: DelayRange,
}

impl SimConfig {
    /// Sets the grid dimensions.
    pub fn with_grid(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the number of travelers.
    pub fn with_travelers(mut self, count: u32) -> Self {
        self.traveler_count = count;
        self
    }

    /// Sets the step count range `[min, max)`.
    pub fn with_steps(mut self, min: usize, max: usize) -> Self {
        self.min_steps = min;
        self.max_steps = max;
        self
    }

    /// Sets the per-step delay range `[min, max)` in seconds.
    pub fn with_delays(mut self, min_secs: f64, max_secs: f64) -> Self {
        self.min_delay_secs = min_secs;
        self.max_delay_secs = max_secs;
        self
    }

    /// Sets the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Degenerate ranges are rejected rather than clamped.
    pub fn validate(&self) -> Result<WalkPlan, ConfigError> {
        let grid = Grid::new(self.width, self.height)?;

        if self.traveler_count == 0 {
            return Err(ConfigError::NoTravelers);
        }

        if self.min_steps < 1 {
            return Err(ConfigError::StepsBelowOne(self.min_steps));
        }
        if self.min_steps >= self.max_steps {
            return Err(ConfigError::EmptyStepRange {
                min: self.min_steps,
                max: self.max_steps,
            });
        }

        let (min, max) = (self.min_delay_secs, self.max_delay_secs);
        if !min.is_finite() || !max.is_finite() {
            return Err(ConfigError::NonFiniteDelay { min, max });
        }
        if min <= 0.0 {
            return Err(ConfigError::NonPositiveDelay(min));
        }
        if min >= max {
            return Err(ConfigError::EmptyDelayRange { min, max });
        }
        let delays = DelayRange::from_secs_f64(min, max)
            .ok_or(ConfigError::DelayBelowResolution { min, max })?;

        Ok(WalkPlan {
            grid,
            traveler_count: self.traveler_count,
            steps: self.min_steps..self.max_steps,
            delays,
        })
    }
}
