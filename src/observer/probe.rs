//! Built-in probes.

use super::types::{Measurement, Observer, Probe};
use crate::error::HarnessResult;
use crate::problem::{Problem, Solution};

/// Tracks the best score seen and retains a copy of that solution.
///
/// The retained solution is independent of the active population, so it
/// survives strategies that discard their parents.
#[derive(Debug, Clone)]
pub struct BestScoreProbe<R> {
    best: Option<Solution<R>>,
}

impl<R> Default for BestScoreProbe<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> BestScoreProbe<R> {
    pub fn new() -> Self {
        Self { best: None }
    }

    /// Best solution evaluated since the last reset.
    pub fn best_solution(&self) -> Option<&Solution<R>> {
        self.best.as_ref()
    }

    /// Best score evaluated since the last reset.
    pub fn best_score(&self) -> Option<f64> {
        self.best.as_ref().and_then(Solution::score)
    }
}

impl<P: Problem> Observer<P> for BestScoreProbe<P::Representation> {
    fn name(&self) -> &str {
        "best-score"
    }

    fn solution_evaluated(
        &mut self,
        problem: &P,
        solution: &Solution<P::Representation>,
    ) -> HarnessResult<()> {
        let score = solution.evaluated_score()?;
        let improved = match self.best_score() {
            Some(best) => problem.is_better(score, best),
            None => true,
        };
        if improved {
            self.best = Some(solution.clone());
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.best = None;
    }
}

impl<P: Problem> Probe<P> for BestScoreProbe<P::Representation> {
    fn measurement(&self) -> Measurement {
        self.best_score()
            .map_or(Measurement::Missing, Measurement::Scalar)
    }
}

/// Counts evaluation events.
#[derive(Debug, Clone, Default)]
pub struct EvaluationCountProbe {
    count: usize,
}

impl EvaluationCountProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl<P: Problem> Observer<P> for EvaluationCountProbe {
    fn name(&self) -> &str {
        "evaluations"
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

impl<P: Problem> Probe<P> for EvaluationCountProbe {
    fn measurement(&self) -> Measurement {
        Measurement::Scalar(self.count as f64)
    }
}

/// Records the best-so-far score at the end of every epoch.
#[derive(Debug, Clone, Default)]
pub struct ConvergenceProbe {
    best: Option<f64>,
    history: Vec<f64>,
}

impl ConvergenceProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[f64] {
        &self.history
    }
}

impl<P: Problem> Observer<P> for ConvergenceProbe {
    fn name(&self) -> &str {
        "convergence"
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
        self.history.push(self.best.unwrap_or_else(|| problem.worst_score()));
        Ok(())
    }

    fn reset(&mut self) {
        self.best = None;
        self.history.clear();
    }
}

impl<P: Problem> Probe<P> for ConvergenceProbe {
    fn measurement(&self) -> Measurement {
        Measurement::Series(self.history.clone())
    }
}

/// Records the mean score of each epoch's population.
#[derive(Debug, Clone, Default)]
pub struct PopulationMeanProbe {
    means: Vec<f64>,
}

impl PopulationMeanProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }
}

impl<P: Problem> Observer<P> for PopulationMeanProbe {
    fn name(&self) -> &str {
        "population-mean"
    }

    fn epoch_complete(
        &mut self,
        _problem: &P,
        _epoch: usize,
        population: &[Solution<P::Representation>],
    ) -> HarnessResult<()> {
        let scores: Vec<f64> = population.iter().filter_map(Solution::score).collect();
        let mean = if scores.is_empty() {
            f64::NAN
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };
        self.means.push(mean);
        Ok(())
    }

    fn reset(&mut self) {
        self.means.clear();
    }
}

impl<P: Problem> Probe<P> for PopulationMeanProbe {
    fn measurement(&self) -> Measurement {
        Measurement::Series(self.means.clone())
    }
}
