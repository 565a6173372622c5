//! Batch execution.

use super::config::BatchConfig;
use crate::algorithm::{EpochAlgorithm, EpochStrategy, RunConfig, RunOutcome};
use crate::analysis::RunStatisticSummary;
use crate::error::{HarnessResult, InitialisationError};
use crate::problem::Problem;
use crate::random::derive_seed;

/// Outcomes of a batch, in run-index order.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchResult<R> {
    /// One outcome per run.
    pub outcomes: Vec<RunOutcome<R>>,

    /// Orientation of the problem the batch ran on.
    pub minimization: bool,
}

impl<R> BatchResult<R> {
    /// Best score of each run, in run-index order.
    pub fn best_scores(&self) -> Vec<f64> {
        self.outcomes.iter().map(|o| o.best_score).collect()
    }

    /// Aggregates the best scores into a summary.
    pub fn summary(&self, label: impl Into<String>) -> RunStatisticSummary {
        RunStatisticSummary::new(label, self.best_scores(), self.minimization)
    }

    /// The run with the best score; the earliest wins ties.
    pub fn best_outcome(&self) -> Option<&RunOutcome<R>> {
        let mut best: Option<&RunOutcome<R>> = None;
        for outcome in &self.outcomes {
            let better = match best {
                Some(b) if self.minimization => outcome.best_score < b.best_score,
                Some(b) => outcome.best_score > b.best_score,
                None => true,
            };
            if better {
                best = Some(outcome);
            }
        }
        best
    }
}

/// Executes independent runs of one (strategy, problem) pairing.
///
/// # Usage
///
/// ```ignore
/// let config = BatchConfig::default().with_runs(30).with_base_seed(42);
/// let result = BatchRunner::run(&problem, &config, |_, run| {
///     EpochAlgorithm::new(RandomSearch::new(20), run)
///         .with_stop_condition(MaxEvaluations::new(2_000))
/// })?;
/// let summary = result.summary("random-search");
/// ```
///
/// The factory is called once per run with the run index and a
/// configuration carrying that run's derived seed. It must build fresh
/// observers each time; the problem is the only state shared between runs.
pub struct BatchRunner;

impl BatchRunner {
    /// Runs the batch.
    ///
    /// # Errors
    ///
    /// [`InitialisationError::InvalidConfiguration`] for an invalid config,
    /// otherwise the error of a failing run, which aborts the batch.
    pub fn run<P, S, F>(
        problem: &P,
        config: &BatchConfig,
        factory: F,
    ) -> HarnessResult<BatchResult<P::Representation>>
    where
        P: Problem,
        S: EpochStrategy<P>,
        F: Fn(usize, RunConfig) -> EpochAlgorithm<P, S> + Send + Sync,
    {
        config
            .validate()
            .map_err(InitialisationError::InvalidConfiguration)?;

        log::info!(
            "batch started: runs={} base_seed={}",
            config.runs,
            config.base_seed
        );

        let run_one = |index: usize| -> HarnessResult<RunOutcome<P::Representation>> {
            let run_config = config
                .run
                .clone()
                .with_seed(derive_seed(config.base_seed, index));
            let mut algorithm = factory(index, run_config);
            algorithm.run(problem)
        };

        let outcomes = execute(config, run_one)?;

        log::info!("batch finished: runs={}", outcomes.len());
        Ok(BatchResult {
            outcomes,
            minimization: problem.is_minimization(),
        })
    }
}

#[cfg(feature = "parallel")]
fn execute<T, F>(config: &BatchConfig, run_one: F) -> HarnessResult<Vec<T>>
where
    T: Send,
    F: Fn(usize) -> HarnessResult<T> + Send + Sync,
{
    use rayon::prelude::*;

    if config.parallel {
        (0..config.runs).into_par_iter().map(run_one).collect()
    } else {
        (0..config.runs).map(run_one).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn execute<T, F>(config: &BatchConfig, run_one: F) -> HarnessResult<Vec<T>>
where
    F: Fn(usize) -> HarnessResult<T>,
{
    (0..config.runs).map(run_one).collect()
}
