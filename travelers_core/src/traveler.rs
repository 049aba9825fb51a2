//! The Traveler - one agent performing a bounded random walk.
//!
//! A traveler is created with a random start cell and a random step count,
//! then walks: each step sleeps for a random delay, picks a random
//! direction and moves through the grid's checked move primitive,
//! recording a [`PathEntry`].
//!
//! ```text
//!   Walking ──(all steps ok)──────► Done(Path)
//!      │
//!      └────(move rejected)───────► Done(WalkError)
//! ```

use crate::error::WalkError;
use crate::grid::{Delta, Direction, Grid, Position};
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Serialize, Serializer};
use std::ops::Range;
use std::time::Duration;
use travelers_env::{TravelerId, WalkContext};

/// Delta submitted in place of a real move when a fault is injected.
const FAULT_DELTA: Delta = Delta::new(1, 1);

/// Half-open range `[min, max)` of per-step delays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayRange {
    min: Duration,
    max: Duration,
}

impl DelayRange {
    /// Creates a delay range. Returns `None` if `min >= max`.
    pub fn new(min: Duration, max: Duration) -> Option<Self> {
        (min < max).then_some(Self { min, max })
    }

    /// Creates a delay range from bounds in seconds.
    ///
    /// Returns `None` for non-finite, negative or empty ranges.
    pub fn from_secs_f64(min: f64, max: f64) -> Option<Self> {
        let min = Duration::try_from_secs_f64(min).ok()?;
        let max = Duration::try_from_secs_f64(max).ok()?;
        Self::new(min, max)
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    fn sampler(&self) -> Uniform<f64> {
        Uniform::new(self.min.as_secs_f64(), self.max.as_secs_f64())
    }
}

/// One recorded step of a walk.
///
/// Serializes flat as `{"time", "id", "x", "y", "symbol"}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathEntry {
    /// Time since this traveler's walk began
    #[serde(rename = "time", serialize_with = "serialize_secs")]
    pub elapsed: Duration,

    /// Traveler that produced the entry
    #[serde(rename = "id")]
    pub traveler: TravelerId,

    /// Position after the step
    #[serde(flatten)]
    pub position: Position,

    /// Traveler's display symbol
    pub symbol: char,
}

fn serialize_secs<S: Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(elapsed.as_secs_f64())
}

impl PathEntry {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

impl std::fmt::Display for PathEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "time:{:.2} id:{} x:{} y:{} symbol:{}",
            self.elapsed_secs(),
            self.traveler,
            self.position.x,
            self.position.y,
            self.symbol
        )
    }
}

/// The completed walk of one traveler, in step order.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    traveler: TravelerId,
    symbol: char,
    entries: Vec<PathEntry>,
}

impl Path {
    /// Assembles a path from already recorded entries (e.g. a replay).
    pub fn new(traveler: TravelerId, symbol: char, entries: Vec<PathEntry>) -> Self {
        Self {
            traveler,
            symbol,
            entries,
        }
    }

    pub fn traveler(&self) -> TravelerId {
        self.traveler
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PathEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathEntry> {
        self.entries.iter()
    }

    /// Elapsed time of the last step (zero for an empty path).
    pub fn total_elapsed(&self) -> Duration {
        self.entries.last().map(|e| e.elapsed).unwrap_or_default()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathEntry;
    type IntoIter = std::slice::Iter<'a, PathEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A single simulated agent.
///
/// Owned exclusively by the task that runs it; [`Traveler::walk`]
/// consumes it.
pub struct Traveler<R: Rng> {
    grid: Grid,
    id: TravelerId,
    symbol: char,
    position: Position,
    step_count: usize,
    delays: DelayRange,
    rng: R,
    fault_step: Option<usize>,
}

impl<R: Rng> Traveler<R> {
    /// Creates a traveler with a random start cell and step count.
    ///
    /// # Arguments
    /// * `grid` - The torus to walk on
    /// * `id` - Traveler id; the display symbol is derived from it
    /// * `steps` - Half-open range the step count is drawn from
    /// * `delays` - Range each per-step delay is drawn from
    /// * `rng` - The traveler's own random source
    ///
    /// # Panics
    /// Panics if `steps` is empty.
    pub fn new(grid: Grid, id: TravelerId, steps: Range<usize>, delays: DelayRange, mut rng: R) -> Self {
        let position = grid.random_position(&mut rng);
        let step_count = rng.gen_range(steps);

        Self {
            grid,
            id,
            symbol: id.symbol(),
            position,
            step_count,
            delays,
            rng,
            fault_step: None,
        }
    }

    /// Makes the traveler submit an illegal delta at `step` (0-based).
    ///
    /// A step at or beyond the step count never fires.
    pub fn inject_fault(&mut self, step: usize) {
        self.fault_step = Some(step);
    }

    pub fn id(&self) -> TravelerId {
        self.id
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Performs the whole walk.
    ///
    /// Steps run strictly in sequence. Each one waits a random delay via
    /// the context, so suspension only blocks this traveler's task. A
    /// rejected move aborts the walk and discards the partial path.
    pub async fn walk<Ctx: WalkContext>(mut self, ctx: &Ctx) -> Result<Path, WalkError> {
        let sampler = self.delays.sampler();
        let mut entries = Vec::with_capacity(self.step_count);
        let start = ctx.now();

        for step in 0..self.step_count {
            let wait = sampler.sample(&mut self.rng);
            ctx.sleep(Duration::from_secs_f64(wait)).await;

            let delta = if self.fault_step == Some(step) {
                FAULT_DELTA
            } else {
                Direction::random(&mut self.rng).delta()
            };

            self.position = self
                .grid
                .step(self.position, delta)
                .map_err(|source| WalkError::Move {
                    traveler: self.id,
                    step,
                    source,
                })?;

            entries.push(PathEntry {
                elapsed: ctx.now().saturating_sub(start),
                traveler: self.id,
                position: self.position,
                symbol: self.symbol,
            });
        }

        Ok(Path {
            traveler: self.id,
            symbol: self.symbol,
            entries,
        })
    }
}
