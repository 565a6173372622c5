//! Built-in stop conditions.
//!
//! Epoch and evaluation budgets, target scores, optimum detection,
//! stagnation and wall-clock limits are all expressed as
//! [`StopCondition`]s so that every termination policy goes through the
//! same post-epoch check.

use super::types::{Observer, RunInfo, StopCondition};
use crate::error::{HarnessResult, InitialisationError};
use crate::problem::{Problem, Solution};
use std::time::{Duration, Instant};

/// Stops once `max` epochs have completed.
#[derive(Debug, Clone)]
pub struct MaxEpochs {
    max: usize,
    reached: bool,
}

impl MaxEpochs {
    pub fn new(max: usize) -> Self {
        Self {
            max,
            reached: false,
        }
    }
}

impl<P: Problem> Observer<P> for MaxEpochs {
    fn name(&self) -> &str {
        "max-epochs"
    }

    fn initialise_before_run(
        &mut self,
        _problem: &P,
        _run: &RunInfo<'_>,
    ) -> Result<(), InitialisationError> {
        if self.max == 0 {
            return Err(InitialisationError::InvalidConfiguration(
                "max-epochs must be at least 1".into(),
            ));
        }
        Ok(())
    }

    fn epoch_complete(
        &mut self,
        _problem: &P,
        epoch: usize,
        _population: &[Solution<P::Representation>],
    ) -> HarnessResult<()> {
        if epoch >= self.max {
            self.reached = true;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.reached = false;
    }
}

impl<P: Problem> StopCondition<P> for MaxEpochs {
    fn must_stop(&self) -> bool {
        self.reached
    }
}

/// Stops once `max` solutions have been evaluated.
///
/// Checked at epoch boundaries, so a run may overshoot by up to one
/// epoch's worth of evaluations.
#[derive(Debug, Clone)]
pub struct MaxEvaluations {
    max: usize,
    count: usize,
}

impl MaxEvaluations {
    pub fn new(max: usize) -> Self {
        Self { max, count: 0 }
    }

    /// Evaluations counted since the last reset.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl<P: Problem> Observer<P> for MaxEvaluations {
    fn name(&self) -> &str {
        "max-evaluations"
    }

    fn solution_evaluated(
        &mut self,
        _problem: &P,
        _solution: &Solution<P::Representation>,
    ) -> HarnessResult<()> {
        self.count += 1;
        Ok(())
    }

    fn reset(&mut self) {
        self.count = 0;
    }
}

impl<P: Problem> StopCondition<P> for MaxEvaluations {
    fn must_stop(&self) -> bool {
        self.count >= self.max
    }
}

/// Stops once any evaluated score is at least as good as a target.
///
/// "At least as good" follows the problem's orientation, relaxed by
/// `tolerance` towards the worse side.
#[derive(Debug, Clone)]
pub struct TargetScore {
    target: f64,
    tolerance: f64,
    reached: bool,
}

impl TargetScore {
    pub fn new(target: f64) -> Self {
        Self {
            target,
            tolerance: 0.0,
            reached: false,
        }
    }

    /// Accept scores up to `tolerance` worse than the target.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.abs();
        self
    }
}

impl<P: Problem> Observer<P> for TargetScore {
    fn name(&self) -> &str {
        "target-score"
    }

    fn solution_evaluated(
        &mut self,
        problem: &P,
        solution: &Solution<P::Representation>,
    ) -> HarnessResult<()> {
        let score = solution.evaluated_score()?;
        let threshold = if problem.is_minimization() {
            self.target + self.tolerance
        } else {
            self.target - self.tolerance
        };
        if !problem.is_better(threshold, score) {
            self.reached = true;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.reached = false;
    }
}

impl<P: Problem> StopCondition<P> for TargetScore {
    fn must_stop(&self) -> bool {
        self.reached
    }
}

/// Stops once a solution exactly equal to a known global optimum has been
/// evaluated.
///
/// The flag is set the instant the matching evaluation happens, not at the
/// epoch boundary. Arming fails if the problem defines no optima.
#[derive(Debug, Clone)]
pub struct OptimumLocated<R> {
    optima: Vec<R>,
    located: bool,
}

impl<R> Default for OptimumLocated<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> OptimumLocated<R> {
    pub fn new() -> Self {
        Self {
            optima: Vec::new(),
            located: false,
        }
    }
}

impl<P> Observer<P> for OptimumLocated<P::Representation>
where
    P: Problem,
    P::Representation: PartialEq,
{
    fn name(&self) -> &str {
        "optimum-located"
    }

    fn initialise_before_run(
        &mut self,
        problem: &P,
        _run: &RunInfo<'_>,
    ) -> Result<(), InitialisationError> {
        match problem.global_optima() {
            Some(optima) if !optima.is_empty() => {
                self.optima = optima.to_vec();
                Ok(())
            }
            _ => Err(InitialisationError::MissingGlobalOptima {
                observer: "optimum-located".into(),
            }),
        }
    }

    fn solution_evaluated(
        &mut self,
        _problem: &P,
        solution: &Solution<P::Representation>,
    ) -> HarnessResult<()> {
        if !self.located && self.optima.contains(solution.representation()) {
            self.located = true;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.optima.clear();
        self.located = false;
    }
}

impl<P> StopCondition<P> for OptimumLocated<P::Representation>
where
    P: Problem,
    P::Representation: PartialEq,
{
    fn must_stop(&self) -> bool {
        self.located
    }
}

/// Stops after `window` consecutive epochs that did not strictly improve
/// the best score seen.
///
/// The first epoch boundary only records the baseline; each later boundary
/// compares the best score so far against the one recorded at the
/// previous boundary.
#[derive(Debug, Clone)]
pub struct Stagnation {
    window: usize,
    best: Option<f64>,
    baseline: Option<f64>,
    idle_epochs: usize,
    stalled: bool,
}

impl Stagnation {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            best: None,
            baseline: None,
            idle_epochs: 0,
            stalled: false,
        }
    }

    /// Consecutive epochs without improvement.
    pub fn idle_epochs(&self) -> usize {
        self.idle_epochs
    }
}

impl<P: Problem> Observer<P> for Stagnation {
    fn name(&self) -> &str {
        "stagnation"
    }

    fn initialise_before_run(
        &mut self,
        _problem: &P,
        _run: &RunInfo<'_>,
    ) -> Result<(), InitialisationError> {
        if self.window == 0 {
            return Err(InitialisationError::InvalidConfiguration(
                "stagnation window must be at least 1".into(),
            ));
        }
        Ok(())
    }

    fn solution_evaluated(
        &mut self,
        problem: &P,
        solution: &Solution<P::Representation>,
    ) -> HarnessResult<()> {
        let score = solution.evaluated_score()?;
        match self.best {
            Some(best) if !problem.is_better(score, best) => {}
            _ => self.best = Some(score),
        }
        Ok(())
    }

    fn epoch_complete(
        &mut self,
        problem: &P,
        _epoch: usize,
        _population: &[Solution<P::Representation>],
    ) -> HarnessResult<()> {
        if self.stalled {
            return Ok(());
        }
        match (self.baseline, self.best) {
            (Some(baseline), Some(best)) if problem.is_better(best, baseline) => {
                self.baseline = Some(best);
                self.idle_epochs = 0;
            }
            (Some(_), _) => self.idle_epochs += 1,
            (None, best) => self.baseline = best,
        }
        if self.idle_epochs >= self.window {
            self.stalled = true;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.best = None;
        self.baseline = None;
        self.idle_epochs = 0;
        self.stalled = false;
    }
}

impl<P: Problem> StopCondition<P> for Stagnation {
    fn must_stop(&self) -> bool {
        self.stalled
    }
}

/// Stops at the first epoch boundary after `limit` has elapsed since the
/// run was armed.
#[derive(Debug, Clone)]
pub struct WallClock {
    limit: Duration,
    started: Option<Instant>,
    expired: bool,
}

impl WallClock {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            started: None,
            expired: false,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }
}

impl<P: Problem> Observer<P> for WallClock {
    fn name(&self) -> &str {
        "wall-clock"
    }

    fn initialise_before_run(
        &mut self,
        _problem: &P,
        _run: &RunInfo<'_>,
    ) -> Result<(), InitialisationError> {
        self.started = Some(Instant::now());
        Ok(())
    }

    fn epoch_complete(
        &mut self,
        _problem: &P,
        _epoch: usize,
        _population: &[Solution<P::Representation>],
    ) -> HarnessResult<()> {
        if let Some(started) = self.started {
            if started.elapsed() >= self.limit {
                self.expired = true;
            }
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.started = None;
        self.expired = false;
    }
}

impl<P: Problem> StopCondition<P> for WallClock {
    fn must_stop(&self) -> bool {
        self.expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{evaluated, Grid};

    fn info() -> RunInfo<'static> {
        RunInfo {
            algorithm: "test",
            seed: 0,
        }
    }

    fn feed<S: StopCondition<Grid>>(cond: &mut S, problem: &Grid, points: &[[f64; 2]]) {
        for p in points {
            let s = evaluated(problem, p);
            cond.solution_evaluated(problem, &s).unwrap();
        }
    }

    // ---- MaxEpochs ----

    #[test]
    fn test_max_epochs() {
        let p = Grid::with_origin_optimum();
        let mut c = MaxEpochs::new(3);
        for epoch in 1..=2 {
            Observer::<Grid>::epoch_complete(&mut c, &p, epoch, &[]).unwrap();
            assert!(!StopCondition::<Grid>::must_stop(&c));
        }
        Observer::<Grid>::epoch_complete(&mut c, &p, 3, &[]).unwrap();
        assert!(StopCondition::<Grid>::must_stop(&c));
    }

    #[test]
    fn test_max_epochs_zero_rejected() {
        let p = Grid::with_origin_optimum();
        let mut c = MaxEpochs::new(0);
        assert!(Observer::<Grid>::initialise_before_run(&mut c, &p, &info()).is_err());
    }

    // ---- MaxEvaluations ----

    #[test]
    fn test_max_evaluations() {
        let p = Grid::with_origin_optimum();
        let mut c = MaxEvaluations::new(3);
        feed(&mut c, &p, &[[1.0, 1.0], [2.0, 2.0]]);
        assert!(!StopCondition::<Grid>::must_stop(&c));
        feed(&mut c, &p, &[[3.0, 3.0]]);
        assert!(StopCondition::<Grid>::must_stop(&c));
        assert_eq!(c.count(), 3);
    }

    // ---- TargetScore ----

    #[test]
    fn test_target_score_minimization() {
        let p = Grid::with_origin_optimum();
        let mut c = TargetScore::new(1.0);
        feed(&mut c, &p, &[[1.0, 1.0]]); // 2.0
        assert!(!StopCondition::<Grid>::must_stop(&c));
        feed(&mut c, &p, &[[1.0, 0.0]]); // 1.0, equal counts
        assert!(StopCondition::<Grid>::must_stop(&c));
    }

    #[test]
    fn test_target_score_tolerance() {
        let p = Grid::with_origin_optimum();
        let mut c = TargetScore::new(1.0).with_tolerance(1.5);
        feed(&mut c, &p, &[[1.0, 1.0]]);
        assert!(StopCondition::<Grid>::must_stop(&c));
    }

    #[test]
    fn test_target_score_maximization() {
        let p = Grid::maximizing();
        let mut c = TargetScore::new(5.0);
        feed(&mut c, &p, &[[1.0, 1.0]]);
        assert!(!StopCondition::<Grid>::must_stop(&c));
        feed(&mut c, &p, &[[2.0, 1.0]]);
        assert!(StopCondition::<Grid>::must_stop(&c));
    }

    // ---- OptimumLocated ----

    #[test]
    fn test_optimum_located_only_on_exact_match() {
        let p = Grid::with_origin_optimum();
        let mut c = OptimumLocated::<Vec<f64>>::new();
        Observer::<Grid>::initialise_before_run(&mut c, &p, &info()).unwrap();

        feed(&mut c, &p, &[[1.0, 1.0]]);
        assert!(!StopCondition::<Grid>::must_stop(&c));
        feed(&mut c, &p, &[[0.5, 0.5]]);
        assert!(!StopCondition::<Grid>::must_stop(&c));
        feed(&mut c, &p, &[[0.0, 0.0]]);
        assert!(StopCondition::<Grid>::must_stop(&c));
    }

    #[test]
    fn test_optimum_located_requires_optima() {
        let p = Grid::without_optima();
        let mut c = OptimumLocated::<Vec<f64>>::new();
        let err = Observer::<Grid>::initialise_before_run(&mut c, &p, &info()).unwrap_err();
        assert!(matches!(err, InitialisationError::MissingGlobalOptima { .. }));
    }

    #[test]
    fn test_optimum_located_stays_satisfied() {
        let p = Grid::with_origin_optimum();
        let mut c = OptimumLocated::<Vec<f64>>::new();
        Observer::<Grid>::initialise_before_run(&mut c, &p, &info()).unwrap();
        feed(&mut c, &p, &[[0.0, 0.0], [3.0, 3.0]]);
        Observer::<Grid>::epoch_complete(&mut c, &p, 1, &[]).unwrap();
        assert!(StopCondition::<Grid>::must_stop(&c));
    }

    // ---- Stagnation ----

    #[test]
    fn test_stagnation_counts_idle_epochs() {
        let p = Grid::with_origin_optimum();
        let mut c = Stagnation::new(2);
        feed(&mut c, &p, &[[2.0, 2.0]]);
        // epoch 1 sets the baseline, epoch 2 is the first idle one
        for epoch in 1..=2 {
            feed(&mut c, &p, &[[3.0, 3.0]]);
            Observer::<Grid>::epoch_complete(&mut c, &p, epoch, &[]).unwrap();
            assert!(!StopCondition::<Grid>::must_stop(&c));
        }
        assert_eq!(c.idle_epochs(), 1);
        Observer::<Grid>::epoch_complete(&mut c, &p, 3, &[]).unwrap();
        assert!(StopCondition::<Grid>::must_stop(&c));
    }

    #[test]
    fn test_stagnation_improvement_resets() {
        let p = Grid::with_origin_optimum();
        let mut c = Stagnation::new(1);
        feed(&mut c, &p, &[[2.0, 2.0]]);
        Observer::<Grid>::epoch_complete(&mut c, &p, 1, &[]).unwrap();
        feed(&mut c, &p, &[[1.0, 1.0]]);
        Observer::<Grid>::epoch_complete(&mut c, &p, 2, &[]).unwrap();
        assert_eq!(c.idle_epochs(), 0);
        assert!(!StopCondition::<Grid>::must_stop(&c));
        Observer::<Grid>::epoch_complete(&mut c, &p, 3, &[]).unwrap();
        assert!(StopCondition::<Grid>::must_stop(&c));
    }

    // ---- WallClock ----

    #[test]
    fn test_wall_clock_expires() {
        let p = Grid::with_origin_optimum();
        let mut c = WallClock::new(Duration::ZERO);
        Observer::<Grid>::initialise_before_run(&mut c, &p, &info()).unwrap();
        assert!(!StopCondition::<Grid>::must_stop(&c));
        Observer::<Grid>::epoch_complete(&mut c, &p, 1, &[]).unwrap();
        assert!(StopCondition::<Grid>::must_stop(&c));
    }

    #[test]
    fn test_wall_clock_unarmed_never_expires() {
        let p = Grid::with_origin_optimum();
        let mut c = WallClock::from_millis(0);
        Observer::<Grid>::epoch_complete(&mut c, &p, 1, &[]).unwrap();
        assert!(!StopCondition::<Grid>::must_stop(&c));
    }

    // ---- reset ----

    #[test]
    fn test_reset_matches_fresh_instance() {
        let p = Grid::with_origin_optimum();
        let sequence = [[1.0, 1.0], [0.0, 0.0], [2.0, 0.0]];

        let mut reused = OptimumLocated::<Vec<f64>>::new();
        Observer::<Grid>::initialise_before_run(&mut reused, &p, &info()).unwrap();
        feed(&mut reused, &p, &sequence);
        Observer::<Grid>::reset(&mut reused);

        let mut fresh = OptimumLocated::<Vec<f64>>::new();
        for c in [&mut reused, &mut fresh] {
            Observer::<Grid>::initialise_before_run(c, &p, &info()).unwrap();
            feed(c, &p, &sequence[..1]);
        }
        assert_eq!(
            StopCondition::<Grid>::must_stop(&reused),
            StopCondition::<Grid>::must_stop(&fresh)
        );
        assert!(!StopCondition::<Grid>::must_stop(&reused));

        let mut counter = MaxEvaluations::new(2);
        feed(&mut counter, &p, &sequence);
        Observer::<Grid>::reset(&mut counter);
        assert_eq!(counter.count(), 0);
        assert!(!StopCondition::<Grid>::must_stop(&counter));
    }
}
