//! Event dispatch between the run loop and its observers.

use super::types::{Measurement, Probe, RunInfo, StopCondition, StopReason};
use crate::error::{HarnessResult, InitialisationError};
use crate::problem::{Problem, Solution};
use rand::Rng;

/// Owns the observers of one run and broadcasts events to them.
///
/// Dispatch is synchronous and in registration order: stop conditions
/// first, then probes. Each event is fully handled before the caller
/// proceeds, and the first observer error aborts the dispatch.
pub struct EventBus<P: Problem> {
    stop_conditions: Vec<Box<dyn StopCondition<P>>>,
    probes: Vec<Box<dyn Probe<P>>>,
    evaluations: usize,
}

impl<P: Problem> Default for EventBus<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Problem> EventBus<P> {
    /// Creates a bus with no observers.
    pub fn new() -> Self {
        Self {
            stop_conditions: Vec::new(),
            probes: Vec::new(),
            evaluations: 0,
        }
    }

    /// Registers a stop condition after the existing ones.
    pub fn register_stop_condition(&mut self, condition: Box<dyn StopCondition<P>>) {
        self.stop_conditions.push(condition);
    }

    /// Registers a probe after the existing ones.
    pub fn register_probe(&mut self, probe: Box<dyn Probe<P>>) {
        self.probes.push(probe);
    }

    /// Evaluations broadcast since the last reset.
    pub fn evaluations(&self) -> usize {
        self.evaluations
    }

    /// Resets every observer and the evaluation counter.
    pub fn reset(&mut self) {
        self.evaluations = 0;
        for condition in &mut self.stop_conditions {
            condition.reset();
        }
        for probe in &mut self.probes {
            probe.reset();
        }
    }

    /// Arms every observer for a run.
    ///
    /// Fails with [`InitialisationError::NoStopCondition`] when no stop
    /// condition is registered, or with the first observer's error.
    pub fn initialise(&mut self, problem: &P, run: &RunInfo<'_>) -> Result<(), InitialisationError> {
        if self.stop_conditions.is_empty() {
            return Err(InitialisationError::NoStopCondition);
        }
        for condition in &mut self.stop_conditions {
            condition.initialise_before_run(problem, run)?;
        }
        for probe in &mut self.probes {
            probe.initialise_before_run(problem, run)?;
        }
        Ok(())
    }

    /// Broadcasts a "solution evaluated" event.
    pub fn notify_evaluated(
        &mut self,
        problem: &P,
        solution: &Solution<P::Representation>,
    ) -> HarnessResult<()> {
        self.evaluations += 1;
        for condition in &mut self.stop_conditions {
            condition.solution_evaluated(problem, solution)?;
        }
        for probe in &mut self.probes {
            probe.solution_evaluated(problem, solution)?;
        }
        Ok(())
    }

    /// Broadcasts an "epoch complete" event.
    pub fn notify_epoch_complete(
        &mut self,
        problem: &P,
        epoch: usize,
        population: &[Solution<P::Representation>],
    ) -> HarnessResult<()> {
        for condition in &mut self.stop_conditions {
            condition.epoch_complete(problem, epoch, population)?;
        }
        for probe in &mut self.probes {
            probe.epoch_complete(problem, epoch, population)?;
        }
        Ok(())
    }

    /// The first satisfied stop condition in registration order.
    pub fn first_satisfied(&self) -> Option<StopReason> {
        self.stop_conditions
            .iter()
            .position(|c| c.must_stop())
            .map(|index| StopReason {
                index,
                condition: self.stop_conditions[index].name().to_string(),
            })
    }

    /// Current measurement of every probe, in registration order.
    pub fn measurements(&self) -> Vec<(String, Measurement)> {
        self.probes
            .iter()
            .map(|p| (p.name().to_string(), p.measurement()))
            .collect()
    }
}

/// Evaluation handle given to strategies during an epoch.
///
/// Every call to [`evaluate`](Evaluator::evaluate) scores the solution
/// against the problem and broadcasts the event before returning, so stop
/// conditions see evaluations as they happen rather than at the epoch
/// boundary.
pub struct Evaluator<'a, P: Problem> {
    problem: &'a P,
    bus: &'a mut EventBus<P>,
}

impl<'a, P: Problem> Evaluator<'a, P> {
    /// Wraps a problem and the run's event bus.
    pub fn new(problem: &'a P, bus: &'a mut EventBus<P>) -> Self {
        Self { problem, bus }
    }

    /// The problem under evaluation.
    pub fn problem(&self) -> &'a P {
        self.problem
    }

    /// Evaluations performed in this run so far.
    pub fn evaluations(&self) -> usize {
        self.bus.evaluations()
    }

    /// Evaluates one solution and broadcasts the event.
    pub fn evaluate(&mut self, solution: &mut Solution<P::Representation>) -> HarnessResult<f64> {
        let score = self.problem.evaluate(solution)?;
        self.bus.notify_evaluated(self.problem, solution)?;
        Ok(score)
    }

    /// Evaluates every unevaluated solution, in order.
    ///
    /// Already evaluated solutions (e.g. carried-over elites) are skipped.
    pub fn evaluate_pending(
        &mut self,
        population: &mut [Solution<P::Representation>],
    ) -> HarnessResult<usize> {
        let mut count = 0;
        for solution in population.iter_mut().filter(|s| !s.is_evaluated()) {
            self.evaluate(solution)?;
            count += 1;
        }
        Ok(count)
    }

    /// Generates a random solution and evaluates it.
    pub fn random_evaluated<R: Rng>(
        &mut self,
        rng: &mut R,
    ) -> HarnessResult<Solution<P::Representation>> {
        let mut solution = self.problem.random_solution(rng);
        self.evaluate(&mut solution)?;
        Ok(solution)
    }
}
