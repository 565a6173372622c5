//! Reference strategies.
//!
//! Minimal heuristics used to exercise the engine and as baselines in
//! comparisons. Domain-specific algorithms implement
//! [`EpochStrategy`] themselves.

use super::types::EpochStrategy;
use crate::error::{HarnessResult, InitialisationError};
use crate::observer::Evaluator;
use crate::problem::{Neighbourhood, Problem, Solution};
use rand::Rng;

/// Samples a fresh random population every epoch.
///
/// Nothing is carried between epochs; the best-so-far is tracked by the
/// engine and by probes.
#[derive(Debug, Clone)]
pub struct RandomSearch {
    population_size: usize,
}

impl RandomSearch {
    pub fn new(population_size: usize) -> Self {
        Self { population_size }
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }
}

impl<P: Problem> EpochStrategy<P> for RandomSearch {
    fn name(&self) -> &str {
        "random-search"
    }

    fn initialise<R: Rng>(
        &mut self,
        problem: &P,
        rng: &mut R,
    ) -> HarnessResult<Vec<Solution<P::Representation>>> {
        if self.population_size == 0 {
            return Err(InitialisationError::InvalidConfiguration(
                "population_size must be at least 1".into(),
            )
            .into());
        }
        Ok((0..self.population_size)
            .map(|_| problem.random_solution(rng))
            .collect())
    }

    fn execute_epoch<R: Rng>(
        &mut self,
        _population: &[Solution<P::Representation>],
        rng: &mut R,
        evaluator: &mut Evaluator<'_, P>,
    ) -> HarnessResult<Vec<Solution<P::Representation>>> {
        (0..self.population_size)
            .map(|_| evaluator.random_evaluated(rng))
            .collect()
    }
}

/// Parallel first-improvement hill climbing.
///
/// Each member proposes one neighbour per epoch. The neighbours are
/// returned unevaluated for the engine to score; the post-evaluation hook
/// then restores any parent that is strictly better than its child.
#[derive(Debug, Clone)]
pub struct HillClimber<R> {
    population_size: usize,
    parents: Vec<Solution<R>>,
}

impl<R> HillClimber<R> {
    pub fn new(population_size: usize) -> Self {
        Self {
            population_size,
            parents: Vec::new(),
        }
    }
}

impl<P: Neighbourhood> EpochStrategy<P> for HillClimber<P::Representation> {
    fn name(&self) -> &str {
        "hill-climber"
    }

    fn initialise<R: Rng>(
        &mut self,
        problem: &P,
        rng: &mut R,
    ) -> HarnessResult<Vec<Solution<P::Representation>>> {
        if self.population_size == 0 {
            return Err(InitialisationError::InvalidConfiguration(
                "population_size must be at least 1".into(),
            )
            .into());
        }
        self.parents.clear();
        Ok((0..self.population_size)
            .map(|_| problem.random_solution(rng))
            .collect())
    }

    fn execute_epoch<R: Rng>(
        &mut self,
        population: &[Solution<P::Representation>],
        rng: &mut R,
        evaluator: &mut Evaluator<'_, P>,
    ) -> HarnessResult<Vec<Solution<P::Representation>>> {
        let problem = evaluator.problem();
        self.parents = population.to_vec();
        Ok(population
            .iter()
            .map(|parent| Solution::new(problem.neighbour(parent.representation(), rng)))
            .collect())
    }

    fn after_evaluation(
        &mut self,
        problem: &P,
        population: &mut Vec<Solution<P::Representation>>,
    ) -> HarnessResult<()> {
        for (child, parent) in population.iter_mut().zip(self.parents.drain(..)) {
            if problem.is_better_solution(&parent, child)? {
                *child = parent;
            }
        }
        Ok(())
    }
}
