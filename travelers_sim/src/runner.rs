//! Orchestrator - runs every traveler concurrently and joins on all of them.
//!
//! ```text
//!                 ┌──► Traveler 0 ──┐
//!   Orchestrator ─┼──► Traveler 1 ──┼──► join (all done) ──► RunReport
//!                 └──► Traveler N ──┘
//! ```
//!
//! Travelers never communicate. The only synchronization is the fan-in
//! over the `JoinSet`; outcomes are reported in completion order.

use crate::config::{ConfigError, SimConfig, WalkPlan};
use crate::faults::FaultPlan;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use travelers_core::{Path, Traveler, WalkError};
use travelers_env::{RunId, TravelerId, WalkContext};

/// Result of one traveler's walk.
#[derive(Debug)]
pub struct TravelerOutcome {
    /// Traveler that produced this outcome
    pub traveler: TravelerId,

    /// Traveler's display symbol
    pub symbol: char,

    /// The completed path, or why the walk was abandoned
    pub result: Result<Path, WalkError>,
}

impl TravelerOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn path(&self) -> Option<&Path> {
        self.result.as_ref().ok()
    }
}

/// Results from one run.
#[derive(Debug)]
pub struct RunReport {
    /// Identifier of this run
    pub run_id: RunId,

    /// Outcomes in completion order
    pub outcomes: Vec<TravelerOutcome>,

    /// Time from first spawn until the last traveler finished
    pub elapsed: Duration,
}

impl RunReport {
    /// Number of travelers that produced a full path.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of travelers that reported an error.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Completed paths, in completion order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.outcomes.iter().filter_map(TravelerOutcome::path)
    }

    /// Total number of recorded steps across all completed paths.
    pub fn total_steps(&self) -> usize {
        self.paths().map(Path::len).sum()
    }

    /// Looks up the outcome of a specific traveler.
    pub fn outcome(&self, traveler: TravelerId) -> Option<&TravelerOutcome> {
        self.outcomes.iter().find(|o| o.traveler == traveler)
    }
}

/// Runs all travelers of a configuration concurrently.
pub struct Orchestrator<Ctx: WalkContext> {
    /// Validated run parameters
    plan: WalkPlan,

    /// Shared environment (clock, randomness)
    context: Arc<Ctx>,

    /// Faults to inject
    faults: FaultPlan,
}

impl<Ctx: WalkContext> Orchestrator<Ctx> {
    /// Creates an orchestrator, validating the configuration.
    pub fn new(config: &SimConfig, context: Arc<Ctx>) -> Result<Self, ConfigError> {
        let plan = config.validate()?;

        Ok(Self {
            plan,
            context,
            faults: FaultPlan::default(),
        })
    }

    /// Sets the faults to inject.
    pub fn with_faults(mut self, faults: FaultPlan) -> Self {
        self.faults = faults;
        self
    }

    /// Returns the validated plan.
    pub fn plan(&self) -> &WalkPlan {
        &self.plan
    }

    /// Runs every traveler and waits for all of them.
    pub async fn run(&self) -> RunReport {
        self.run_with(|_| {}).await
    }

    /// Runs every traveler, calling `on_complete` as each one finishes.
    ///
    /// Returns only once every traveler has completed. A failed traveler
    /// is reported and the run carries on.
    pub async fn run_with<F>(&self, mut on_complete: F) -> RunReport
    where
        F: FnMut(&TravelerOutcome),
    {
        let run_id = RunId::new();
        let count = self.plan.traveler_count;

        info!(
            "Starting run {} | travelers={} grid={}x{} seed={:?}",
            run_id,
            count,
            self.plan.grid.width(),
            self.plan.grid.height(),
            self.context.seed()
        );

        for id in self.faults.out_of_range(count) {
            warn!("Ignoring fault for traveler {}: only {} travelers", id, count);
        }

        let started = self.context.now();
        let mut tasks = JoinSet::new();
        let mut pending = BTreeSet::new();

        // Fan-out
        for index in 0..count {
            let id = TravelerId(index);
            let mut traveler = Traveler::new(
                self.plan.grid,
                id,
                self.plan.steps.clone(),
                self.plan.delays,
                self.context.rng(id.stream()),
            );

            if let Some(step) = self.faults.fault_for(id) {
                warn!("Injecting direction fault into traveler {} at step {}", id, step);
                traveler.inject_fault(step);
            }

            debug!(
                "Spawning traveler {} ({}) at ({}, {}) with {} steps",
                traveler.id(),
                traveler.symbol(),
                traveler.position().x,
                traveler.position().y,
                traveler.step_count()
            );

            let context = Arc::clone(&self.context);
            pending.insert(id);
            tasks.spawn(async move {
                let result = traveler.walk(context.as_ref()).await;
                (id, result)
            });
        }

        // Fan-in
        let mut outcomes = Vec::with_capacity(count as usize);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((id, result)) => {
                    pending.remove(&id);
                    match &result {
                        Ok(path) => debug!(
                            "Traveler {} finished: {} steps in {:.2}s",
                            id,
                            path.len(),
                            path.total_elapsed().as_secs_f64()
                        ),
                        Err(e) => warn!("Traveler {} failed: {}", e.traveler(), e),
                    }

                    let outcome = TravelerOutcome {
                        traveler: id,
                        symbol: id.symbol(),
                        result,
                    };
                    on_complete(&outcome);
                    outcomes.push(outcome);
                }
                Err(join_error) => {
                    error!("Traveler task did not complete: {}", join_error);
                }
            }
        }

        // Tasks that panicked never reported their id
        for id in pending {
            let outcome = TravelerOutcome {
                traveler: id,
                symbol: id.symbol(),
                result: Err(WalkError::task_failed(id, "task panicked or was cancelled")),
            };
            on_complete(&outcome);
            outcomes.push(outcome);
        }

        let report = RunReport {
            run_id,
            outcomes,
            elapsed: self.context.now().saturating_sub(started),
        };

        info!(
            "Run {} complete | succeeded={} failed={} steps={} elapsed={:.2}s",
            run_id,
            report.succeeded(),
            report.failed(),
            report.total_steps(),
            report.elapsed.as_secs_f64()
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::SimContext;
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::RngCore;
    use std::collections::HashMap;
    use travelers_core::{Direction, Position};
    use travelers_env::TokioContext;

    fn orchestrator(config: SimConfig) -> Orchestrator<TokioContext> {
        let seed = config.seed.unwrap_or(42);
        Orchestrator::new(&config, Arc::new(TokioContext::seeded(seed))).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_scenario_bounds() {
        let report = orchestrator(SimConfig::default()).run().await;

        assert_eq!(report.outcomes.len(), 15);
        assert_eq!(report.failed(), 0);

        for path in report.paths() {
            assert!((10..=99).contains(&path.len()));
            for entry in path {
                assert!(entry.position.x <= 14);
                assert!(entry.position.y <= 14);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_ids_and_symbols_distinct() {
        let report = orchestrator(SimConfig::default()).run().await;

        let mut ids: Vec<u32> = report.outcomes.iter().map(|o| o.traveler.0).collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..15).collect::<Vec<_>>());

        let symbols: BTreeSet<char> = report.outcomes.iter().map(|o| o.symbol).collect();
        assert_eq!(symbols, ('A'..='O').collect());

        for path in report.paths() {
            assert!(path.iter().all(|e| e.traveler == path.traveler()));
            assert!(path.iter().all(|e| e.symbol == path.traveler().symbol()));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_paths_move_one_cell_at_a_time() {
        let config = SimConfig::default().with_grid(4, 3).with_seed(11);
        let grid = config.validate().unwrap().grid;
        let report = orchestrator(config).run().await;

        for path in report.paths() {
            for pair in path.entries().windows(2) {
                let moved = Direction::ALL
                    .iter()
                    .any(|d| grid.apply(pair[0].position, *d) == pair[1].position);
                assert!(moved, "jump from {:?} to {:?}", pair[0].position, pair[1].position);
                assert!(pair[1].elapsed > pair[0].elapsed);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_cell_scenario() {
        let report = orchestrator(SimConfig::default().with_grid(1, 1)).run().await;

        assert_eq!(report.succeeded(), 15);
        for path in report.paths() {
            assert!((10..100).contains(&path.len()));
            assert!(path.iter().all(|e| e.position == Position::new(0, 0)));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_time_is_slowest_traveler_not_sum() {
        // Each walk is exactly 10 steps of 100-200ms: 1-2s per traveler
        let config = SimConfig::default()
            .with_travelers(8)
            .with_steps(10, 11)
            .with_delays(0.1, 0.2);
        let report = orchestrator(config).run().await;

        let totals: Vec<Duration> = report.paths().map(Path::total_elapsed).collect();
        let slowest = totals.iter().max().copied().unwrap();
        let sum: Duration = totals.iter().sum();

        assert_eq!(totals.len(), 8);
        assert!(sum >= Duration::from_secs(8));
        assert!(report.elapsed >= slowest);
        assert!(report.elapsed <= Duration::from_millis(2100));
    }

    #[tokio::test]
    async fn test_travelers_run_in_parallel_on_real_clock() {
        // Serialized, ten 5-step walks of 20-30ms would take at least 1s
        let config = SimConfig::default()
            .with_travelers(10)
            .with_steps(5, 6)
            .with_delays(0.02, 0.03);
        let started = std::time::Instant::now();
        let report = orchestrator(config).run().await;

        assert_eq!(report.succeeded(), 10);
        assert!(started.elapsed() < Duration::from_millis(700));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_traveler_does_not_affect_others() {
        let config = SimConfig::default();
        let faults = FaultPlan::new().corrupt(TravelerId(2), 0);
        let report = orchestrator(config).with_faults(faults).run().await;

        assert_eq!(report.outcomes.len(), 15);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.succeeded(), 14);

        let failed = report.outcome(TravelerId(2)).unwrap();
        assert!(matches!(
            failed.result,
            Err(WalkError::Move { step: 0, .. })
        ));

        for path in report.paths() {
            assert!((10..100).contains(&path.len()));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_with_every_traveler_failing_completes() {
        let config = SimConfig::default().with_travelers(5);
        let faults: FaultPlan = (0..5)
            .map(|i| crate::faults::FaultSpec { traveler: TravelerId(i), step: 3 })
            .collect();
        let report = orchestrator(config).with_faults(faults).run().await;

        assert_eq!(report.succeeded(), 0);
        assert_eq!(report.failed(), 5);
        assert_eq!(report.total_steps(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_callback_sees_completion_order() {
        let orchestrator = orchestrator(SimConfig::default().with_travelers(6));
        let mut seen = Vec::new();
        let report = orchestrator.run_with(|o| seen.push(o.traveler)).await;

        let reported: Vec<TravelerId> = report.outcomes.iter().map(|o| o.traveler).collect();
        assert_eq!(seen, reported);
    }

    #[tokio::test]
    async fn test_seeded_runs_walk_same_cells_on_virtual_clock() {
        let config = SimConfig::default().with_seed(31337);

        let first = Orchestrator::new(&config, SimContext::shared(31337)).unwrap().run().await;
        let second = Orchestrator::new(&config, SimContext::shared(31337)).unwrap().run().await;

        let cells = |report: &RunReport| -> HashMap<TravelerId, Vec<Position>> {
            report
                .paths()
                .map(|p| (p.traveler(), p.iter().map(|e| e.position).collect()))
                .collect()
        };
        assert_eq!(first.succeeded(), 15);
        assert_eq!(cells(&first), cells(&second));
    }

    /// Random source that panics once its draw budget is spent.
    struct ExhaustibleRng {
        inner: StdRng,
        remaining: Option<usize>,
    }

    impl ExhaustibleRng {
        fn draw(&mut self) {
            if let Some(remaining) = self.remaining.as_mut() {
                assert!(*remaining > 0, "random source exhausted");
                *remaining -= 1;
            }
        }
    }

    impl RngCore for ExhaustibleRng {
        fn next_u32(&mut self) -> u32 {
            self.draw();
            self.inner.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.draw();
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.draw();
            self.inner.fill_bytes(dest)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.draw();
            self.inner.try_fill_bytes(dest)
        }
    }

    /// Tokio context whose stream for one traveler runs dry mid-walk.
    struct ExhaustingContext {
        inner: TokioContext,
        exhausted_stream: u64,
        budget: usize,
    }

    #[async_trait]
    impl WalkContext for ExhaustingContext {
        type Rng = ExhaustibleRng;

        fn now(&self) -> Duration {
            self.inner.now()
        }

        async fn sleep(&self, duration: Duration) {
            self.inner.sleep(duration).await
        }

        fn rng(&self, stream: u64) -> ExhaustibleRng {
            ExhaustibleRng {
                inner: self.inner.rng(stream),
                remaining: (stream == self.exhausted_stream).then_some(self.budget),
            }
        }

        fn seed(&self) -> Option<u64> {
            self.inner.seed()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_traveler_reported_as_task_failure() {
        // Creation takes 3 draws and each step at least 2, so the panic
        // lands inside the spawned walk
        let context = Arc::new(ExhaustingContext {
            inner: TokioContext::seeded(5),
            exhausted_stream: 2,
            budget: 10,
        });
        let config = SimConfig::default().with_travelers(4);
        let orchestrator = Orchestrator::new(&config, context).unwrap();

        let mut seen = Vec::new();
        let report = orchestrator.run_with(|o| seen.push(o.traveler)).await;

        assert_eq!(report.outcomes.len(), 4);
        assert_eq!(report.succeeded(), 3);
        assert_eq!(report.failed(), 1);
        assert_eq!(seen.len(), 4);
        assert_eq!(seen.last(), Some(&TravelerId(2)));

        let failed = report.outcome(TravelerId(2)).unwrap();
        match &failed.result {
            Err(err @ WalkError::TaskFailed { .. }) => {
                assert_eq!(err.traveler(), TravelerId(2));
                assert_eq!(
                    err.to_string(),
                    "Traveler 2 task failed: task panicked or was cancelled"
                );
            }
            other => panic!("expected task failure, got {:?}", other),
        }

        for path in report.paths() {
            assert_ne!(path.traveler(), TravelerId(2));
            assert!((10..100).contains(&path.len()));
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SimConfig::default().with_steps(0, 5);
        let result = Orchestrator::new(&config, TokioContext::shared());
        assert!(matches!(result, Err(ConfigError::StepsBelowOne(0))));
    }
}
