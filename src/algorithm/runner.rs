//! Epoch loop execution.
//!
//! [`EpochAlgorithm`] drives one run through its lifecycle:
//! initialisation → seed evaluation → (epoch → evaluation → post-hook →
//! epoch-complete event → stop check) repeated until a stop condition fires.

use super::config::RunConfig;
use super::types::{EpochStrategy, RunState};
use crate::error::{AlgorithmInvariantViolation, HarnessError, HarnessResult, InitialisationError};
use crate::observer::{
    Evaluator, EventBus, Measurement, Probe, RunInfo, StopCondition, StopReason,
};
use crate::problem::{Problem, Solution};
use crate::random::{create_rng, RunRng};

/// Result of a completed run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunOutcome<R> {
    /// Name of the strategy that produced the run.
    pub algorithm: String,

    /// Seed of the run's random source.
    pub seed: u64,

    /// Best solution among the seed and every epoch's population.
    pub best: Solution<R>,

    /// Score of `best`.
    pub best_score: f64,

    /// Number of completed epochs.
    pub epochs: usize,

    /// Number of evaluations, seed population included.
    pub evaluations: usize,

    /// The stop condition that ended the run.
    pub stop_reason: StopReason,

    /// Best-so-far score after the seed evaluation and after each epoch.
    pub best_history: Vec<f64>,

    /// Final measurement of every probe, in registration order.
    pub measurements: Vec<(String, Measurement)>,
}

impl<R> RunOutcome<R> {
    /// Looks up a probe measurement by probe name.
    pub fn measurement(&self, probe: &str) -> Option<&Measurement> {
        self.measurements
            .iter()
            .find(|(name, _)| name == probe)
            .map(|(_, m)| m)
    }
}

/// Runs an [`EpochStrategy`] against a problem under registered observers.
///
/// # Usage
///
/// ```ignore
/// let mut algorithm = EpochAlgorithm::new(RandomSearch::new(20), RunConfig::default().with_seed(42))
///     .with_stop_condition(MaxEpochs::new(100))
///     .with_probe(ConvergenceProbe::new());
/// let outcome = algorithm.run(&problem)?;
/// println!("best: {} after {} epochs", outcome.best_score, outcome.epochs);
/// ```
///
/// The same instance may be run repeatedly; each run resets the observers,
/// the counters and the random source.
pub struct EpochAlgorithm<P: Problem, S> {
    strategy: S,
    config: RunConfig,
    bus: EventBus<P>,
    state: RunState,
    rng: Option<RunRng>,
    seed: u64,
    population: Vec<Solution<P::Representation>>,
    epoch: usize,
    best: Option<Solution<P::Representation>>,
    best_history: Vec<f64>,
    optimum: Option<f64>,
    stop_reason: Option<StopReason>,
}

impl<P, S> EpochAlgorithm<P, S>
where
    P: Problem,
    S: EpochStrategy<P>,
{
    /// Creates an algorithm with no observers.
    pub fn new(strategy: S, config: RunConfig) -> Self {
        Self {
            strategy,
            config,
            bus: EventBus::new(),
            state: RunState::Created,
            rng: None,
            seed: 0,
            population: Vec::new(),
            epoch: 0,
            best: None,
            best_history: Vec::new(),
            optimum: None,
            stop_reason: None,
        }
    }

    /// Registers a stop condition (builder form).
    pub fn with_stop_condition<C: StopCondition<P> + 'static>(mut self, condition: C) -> Self {
        self.add_stop_condition(condition);
        self
    }

    /// Registers a probe (builder form).
    pub fn with_probe<Q: Probe<P> + 'static>(mut self, probe: Q) -> Self {
        self.add_probe(probe);
        self
    }

    /// Registers a stop condition after the existing ones.
    pub fn add_stop_condition<C: StopCondition<P> + 'static>(&mut self, condition: C) {
        self.bus.register_stop_condition(Box::new(condition));
    }

    /// Registers a probe after the existing ones.
    pub fn add_probe<Q: Probe<P> + 'static>(&mut self, probe: Q) {
        self.bus.register_probe(Box::new(probe));
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The wrapped strategy.
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// Run configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Completed epochs in the current run.
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    /// Evaluations in the current run.
    pub fn evaluations(&self) -> usize {
        self.bus.evaluations()
    }

    /// Seed of the current run's random source.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Population after the last completed epoch (the seed before epoch 1).
    pub fn population(&self) -> &[Solution<P::Representation>] {
        &self.population
    }

    /// Best solution of the current run so far.
    pub fn best(&self) -> Option<&Solution<P::Representation>> {
        self.best.as_ref()
    }

    /// Best-so-far score after the seed evaluation and after each epoch.
    pub fn best_history(&self) -> &[f64] {
        &self.best_history
    }

    /// The condition that stopped the current run, once stopped.
    pub fn stop_reason(&self) -> Option<&StopReason> {
        self.stop_reason.as_ref()
    }

    /// Current measurement of every probe.
    pub fn measurements(&self) -> Vec<(String, Measurement)> {
        self.bus.measurements()
    }

    /// Prepares a fresh run.
    ///
    /// Resets counters, the random source and every observer, arms the
    /// observers in registration order, then builds the seed population.
    /// Nothing is evaluated here.
    ///
    /// # Errors
    ///
    /// [`InitialisationError`] when the configuration is invalid, no stop
    /// condition is registered, an observer cannot be armed, or the seed
    /// population is empty. The state stays [`RunState::Created`].
    pub fn initialise_before_run(&mut self, problem: &P) -> HarnessResult<()> {
        self.state = RunState::Created;
        self.config
            .validate()
            .map_err(InitialisationError::InvalidConfiguration)?;

        self.seed = self.config.seed.unwrap_or_else(rand::random);
        let mut rng = create_rng(self.seed);
        self.population.clear();
        self.epoch = 0;
        self.best = None;
        self.best_history.clear();
        self.stop_reason = None;
        self.optimum = None;

        self.bus.reset();
        let run = RunInfo {
            algorithm: self.strategy.name(),
            seed: self.seed,
        };
        self.bus.initialise(problem, &run)?;

        if self.config.check_optimum {
            self.optimum = problem.optimum_score()?;
        }

        let seed_population = self.strategy.initialise(problem, &mut rng)?;
        if seed_population.is_empty() {
            return Err(InitialisationError::EmptySeedPopulation {
                strategy: self.strategy.name().to_string(),
            }
            .into());
        }

        self.population = seed_population;
        self.rng = Some(rng);
        self.state = RunState::InitializedForRun;
        Ok(())
    }

    /// Executes one epoch and checks the stop conditions.
    ///
    /// The first call after initialisation evaluates the seed population
    /// before running epoch 1. Returns the terminating condition once one
    /// is satisfied; the state is then [`RunState::Stopped`].
    ///
    /// # Errors
    ///
    /// Any strategy, evaluation, observer or invariant error. The run is
    /// left in [`RunState::Stopped`].
    pub fn execute_epoch(&mut self, problem: &P) -> HarnessResult<Option<StopReason>> {
        if matches!(self.state, RunState::Created | RunState::Stopped) {
            return Err(HarnessError::InvalidState {
                expected: "initialised or running",
                found: self.state.label(),
            });
        }

        let result = self.try_execute_epoch(problem);
        if result.is_err() {
            self.state = RunState::Stopped;
        }
        result
    }

    /// Initialises and runs until a stop condition is satisfied.
    pub fn run(&mut self, problem: &P) -> HarnessResult<RunOutcome<P::Representation>> {
        self.initialise_before_run(problem)?;
        log::info!(
            "run started: algorithm={} seed={} population={}",
            self.strategy.name(),
            self.seed,
            self.population.len()
        );

        let stop_reason = loop {
            if let Some(reason) = self.execute_epoch(problem)? {
                break reason;
            }
        };

        let best = self.best.clone().ok_or(HarnessError::InvalidState {
            expected: "evaluated population",
            found: self.state.label(),
        })?;
        let best_score = best.evaluated_score()?;

        log::info!(
            "run stopped: algorithm={} epochs={} evaluations={} best={} reason={}",
            self.strategy.name(),
            self.epoch,
            self.bus.evaluations(),
            best_score,
            stop_reason.condition
        );

        Ok(RunOutcome {
            algorithm: self.strategy.name().to_string(),
            seed: self.seed,
            best,
            best_score,
            epochs: self.epoch,
            evaluations: self.bus.evaluations(),
            stop_reason,
            best_history: self.best_history.clone(),
            measurements: self.bus.measurements(),
        })
    }

    fn try_execute_epoch(&mut self, problem: &P) -> HarnessResult<Option<StopReason>> {
        if self.state == RunState::InitializedForRun {
            self.evaluate_seed(problem)?;
            if let Some(reason) = self.check_stop() {
                return Ok(Some(reason));
            }
        }

        let Some(rng) = self.rng.as_mut() else {
            return Err(HarnessError::InvalidState {
                expected: "seeded random source",
                found: self.state.label(),
            });
        };

        let mut evaluator = Evaluator::new(problem, &mut self.bus);
        let mut next = self
            .strategy
            .execute_epoch(&self.population, rng, &mut evaluator)?;
        evaluator.evaluate_pending(&mut next)?;
        self.strategy.after_evaluation(problem, &mut next)?;

        self.epoch += 1;
        self.population = next;
        self.bus
            .notify_epoch_complete(problem, self.epoch, &self.population)?;

        let best_score = self.record_best(problem)?;
        self.state = RunState::Running { epoch: self.epoch };
        log::debug!(
            "epoch {} complete: evaluations={} best={}",
            self.epoch,
            self.bus.evaluations(),
            best_score
        );

        Ok(self.check_stop())
    }

    /// Latches the first satisfied stop condition, if any.
    fn check_stop(&mut self) -> Option<StopReason> {
        let reason = self.bus.first_satisfied()?;
        log::debug!(
            "stop condition '{}' satisfied at epoch {}",
            reason.condition,
            self.epoch
        );
        self.stop_reason = Some(reason.clone());
        self.state = RunState::Stopped;
        Some(reason)
    }

    fn evaluate_seed(&mut self, problem: &P) -> HarnessResult<()> {
        let mut evaluator = Evaluator::new(problem, &mut self.bus);
        evaluator.evaluate_pending(&mut self.population)?;
        self.state = RunState::Running { epoch: 0 };
        self.record_best(problem)?;
        Ok(())
    }

    /// Updates the best-so-far solution from the current population and
    /// checks it against the known optimum.
    fn record_best(&mut self, problem: &P) -> HarnessResult<f64> {
        if let Some(candidate) = problem.best_of(&self.population) {
            let improved = match &self.best {
                Some(best) => problem.is_better_solution(candidate, best)?,
                None => true,
            };
            if improved {
                self.best = Some(candidate.clone());
            }
        }

        let best_score = self
            .best
            .as_ref()
            .and_then(Solution::score)
            .unwrap_or_else(|| problem.worst_score());

        if let Some(optimum) = self.optimum {
            if problem.is_better(best_score, optimum)
                && (best_score - optimum).abs() > self.config.optimum_tolerance
            {
                log::warn!(
                    "epoch {}: best score {} beats known optimum {}",
                    self.epoch,
                    best_score,
                    optimum
                );
                return Err(AlgorithmInvariantViolation::BetterThanOptimum {
                    epoch: self.epoch,
                    best: best_score,
                    optimum,
                }
                .into());
            }
        }

        self.best_history.push(best_score);
        Ok(best_score)
    }
}
