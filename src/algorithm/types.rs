//! Core trait and state definitions for epoch-based algorithms.

use crate::error::HarnessResult;
use crate::observer::Evaluator;
use crate::problem::{Problem, Solution};
use rand::Rng;

/// A population-based search heuristic driven one epoch at a time.
///
/// The run engine owns the population, the random source and the
/// observers; the strategy only decides how the next population is built.
///
/// # Evaluation
///
/// Candidates can be evaluated as they are created through the
/// [`Evaluator`], which fires the "solution evaluated" event immediately.
/// Any solution returned unevaluated from
/// [`execute_epoch`](EpochStrategy::execute_epoch) is evaluated by the
/// engine, in order, right after the call. Already evaluated solutions
/// (carried-over elites) are never re-evaluated.
///
/// # Errors
///
/// Errors returned here abort the run. Candidates evaluated before the
/// failure have fired their events; no epoch-complete event fires.
pub trait EpochStrategy<P: Problem> {
    /// Short identifier reported to observers and in run outcomes.
    fn name(&self) -> &str;

    /// Builds the seed population and clears per-run strategy state.
    fn initialise<R: Rng>(
        &mut self,
        problem: &P,
        rng: &mut R,
    ) -> HarnessResult<Vec<Solution<P::Representation>>>;

    /// Produces the next population from the current one.
    fn execute_epoch<R: Rng>(
        &mut self,
        population: &[Solution<P::Representation>],
        rng: &mut R,
        evaluator: &mut Evaluator<'_, P>,
    ) -> HarnessResult<Vec<Solution<P::Representation>>>;

    /// Called after every solution of the new population is evaluated and
    /// before the epoch-complete event. The default is a no-op.
    fn after_evaluation(
        &mut self,
        _problem: &P,
        _population: &mut Vec<Solution<P::Representation>>,
    ) -> HarnessResult<()> {
        Ok(())
    }
}

/// Lifecycle state of an [`EpochAlgorithm`](super::EpochAlgorithm).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Constructed, or a previous initialisation failed.
    Created,
    /// Seed population built and observers armed; nothing evaluated yet.
    InitializedForRun,
    /// At least the seed population has been evaluated.
    Running {
        /// Number of completed epochs.
        epoch: usize,
    },
    /// A stop condition fired or the run failed.
    Stopped,
}

impl RunState {
    /// Name used in lifecycle error messages.
    pub fn label(&self) -> &'static str {
        match self {
            RunState::Created => "created",
            RunState::InitializedForRun => "initialised",
            RunState::Running { .. } => "running",
            RunState::Stopped => "stopped",
        }
    }
}
