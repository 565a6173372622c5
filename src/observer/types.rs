//! Observer traits shared by stop conditions and probes.
//!
//! Both roles receive the same event stream: one `solution_evaluated`
//! per evaluation, one `epoch_complete` per finished epoch. They differ in
//! effect only. A [`StopCondition`] is consulted after each epoch and can end
//! the run; a [`Probe`] records measurements and never affects control flow.

use crate::error::{HarnessResult, InitialisationError};
use crate::problem::{Problem, Solution};

/// Run metadata handed to observers when a run is armed.
#[derive(Debug, Clone, Copy)]
pub struct RunInfo<'a> {
    /// Name of the strategy driving the run.
    pub algorithm: &'a str,
    /// Seed of the run's random source.
    pub seed: u64,
}

/// Receives the evaluation event stream of a run.
///
/// Instances are commonly reused across a batch of runs, so
/// [`reset`](Observer::reset) must return the observer to a state
/// observationally identical to a freshly constructed one.
///
/// Errors returned from any handler abort the run exactly like an
/// algorithm error; there is no isolation between observers and the loop.
pub trait Observer<P: Problem> {
    /// Short identifier used in stop reasons and measurement tables.
    fn name(&self) -> &str;

    /// Arms the observer for a run. Called after [`reset`](Observer::reset)
    /// and before any evaluation.
    fn initialise_before_run(
        &mut self,
        _problem: &P,
        _run: &RunInfo<'_>,
    ) -> Result<(), InitialisationError> {
        Ok(())
    }

    /// Called once per evaluated solution, before the score is returned to
    /// the strategy.
    fn solution_evaluated(
        &mut self,
        _problem: &P,
        _solution: &Solution<P::Representation>,
    ) -> HarnessResult<()> {
        Ok(())
    }

    /// Called once per completed epoch with the new population.
    fn epoch_complete(
        &mut self,
        _problem: &P,
        _epoch: usize,
        _population: &[Solution<P::Representation>],
    ) -> HarnessResult<()> {
        Ok(())
    }

    /// Clears all per-run state.
    fn reset(&mut self);
}

/// An observer that decides whether the run must terminate.
///
/// Once [`must_stop`](StopCondition::must_stop) returns `true` it keeps
/// returning `true` until the next [`reset`](Observer::reset).
pub trait StopCondition<P: Problem>: Observer<P> {
    /// Whether the run must end after the current epoch.
    fn must_stop(&self) -> bool;
}

/// A purely observational measurement collector.
pub trait Probe<P: Problem>: Observer<P> {
    /// Current measurement value.
    fn measurement(&self) -> Measurement;
}

/// Value recorded by a [`Probe`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Measurement {
    /// A single number, e.g. the best score seen.
    Scalar(f64),
    /// One value per epoch.
    Series(Vec<f64>),
    /// Nothing observed yet.
    Missing,
}

impl Measurement {
    /// Returns the scalar value, if this is a scalar measurement.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Measurement::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the series, if this is a series measurement.
    pub fn as_series(&self) -> Option<&[f64]> {
        match self {
            Measurement::Series(v) => Some(v),
            _ => None,
        }
    }
}

/// The stop condition that ended a run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopReason {
    /// Registration index of the condition.
    pub index: usize,
    /// Name of the condition.
    pub condition: String,
}
