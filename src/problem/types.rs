//! Core trait definitions for problems.
//!
//! [`Problem`] is the contract between the generic run engine and a
//! domain-specific cost function. It bundles three capabilities: generating
//! random solutions, evaluating them, and comparing scores under the
//! problem's optimisation direction.

use super::solution::Solution;
use crate::error::InvalidSolutionError;
use rand::Rng;

/// Defines an optimisation problem.
///
/// Implementors supply [`cost`](Problem::cost), the orientation and a
/// random generator. The provided methods implement the evaluation and
/// comparison contract and are not meant to be overridden.
///
/// # Orientation
///
/// When [`is_minimization`](Problem::is_minimization) is `true`, lower
/// scores are better; otherwise higher scores are better. The flag must be
/// fixed for the lifetime of the instance.
///
/// # Thread Safety
///
/// `Problem` must be `Send + Sync` because batches share one problem
/// read-only across concurrently executing runs.
///
/// # Implementing
///
/// ```ignore
/// struct Sphere { dim: usize }
///
/// impl Problem for Sphere {
///     type Representation = Vec<f64>;
///
///     fn is_minimization(&self) -> bool { true }
///
///     fn cost(&self, x: &Vec<f64>) -> Result<f64, InvalidSolutionError> {
///         check_dimension(self.dim, x.len())?;
///         Ok(x.iter().map(|v| v * v).sum())
///     }
///
///     fn random_solution<R: Rng>(&self, rng: &mut R) -> Solution<Vec<f64>> {
///         Solution::new((0..self.dim).map(|_| rng.random_range(-5.0..5.0)).collect())
///     }
/// }
/// ```
pub trait Problem: Send + Sync {
    /// The representation of a candidate solution.
    type Representation: Clone + Send + Sync;

    /// Whether lower scores are better.
    fn is_minimization(&self) -> bool;

    /// Computes the score of a representation.
    ///
    /// Must be pure with respect to the representation and must reject
    /// structurally incompatible inputs rather than panic.
    fn cost(&self, representation: &Self::Representation) -> Result<f64, InvalidSolutionError>;

    /// Creates a random, unevaluated solution.
    fn random_solution<R: Rng>(&self, rng: &mut R) -> Solution<Self::Representation>;

    /// Known global optimum representations, if the problem defines any.
    ///
    /// Not every problem has known optima; callers must handle `None`.
    fn global_optima(&self) -> Option<&[Self::Representation]> {
        None
    }

    /// Evaluates a solution and assigns its score.
    ///
    /// Fails if the solution was already evaluated, if the representation
    /// is rejected by [`cost`](Problem::cost), or if the cost is NaN.
    fn evaluate(
        &self,
        solution: &mut Solution<Self::Representation>,
    ) -> Result<f64, InvalidSolutionError> {
        if let Some(existing) = solution.score() {
            return Err(InvalidSolutionError::AlreadyEvaluated(existing));
        }
        let score = self.cost(solution.representation())?;
        if score.is_nan() {
            return Err(InvalidSolutionError::NonFiniteScore(score));
        }
        solution.assign_score(score)?;
        Ok(score)
    }

    /// Strict comparison of two scores under the problem's orientation.
    ///
    /// Ties are never better, and NaN is never better than anything.
    fn is_better(&self, a: f64, b: f64) -> bool {
        if self.is_minimization() {
            a < b
        } else {
            a > b
        }
    }

    /// Strict comparison of two evaluated solutions.
    fn is_better_solution(
        &self,
        a: &Solution<Self::Representation>,
        b: &Solution<Self::Representation>,
    ) -> Result<bool, InvalidSolutionError> {
        Ok(self.is_better(a.evaluated_score()?, b.evaluated_score()?))
    }

    /// The score every real score improves upon.
    fn worst_score(&self) -> f64 {
        if self.is_minimization() {
            f64::INFINITY
        } else {
            f64::NEG_INFINITY
        }
    }

    /// Returns the best evaluated solution; the earliest wins ties.
    ///
    /// Unevaluated solutions are skipped. Returns `None` if none is evaluated.
    fn best_of<'a>(
        &self,
        population: &'a [Solution<Self::Representation>],
    ) -> Option<&'a Solution<Self::Representation>> {
        let mut best: Option<(&Solution<Self::Representation>, f64)> = None;
        for candidate in population {
            let Some(score) = candidate.score() else {
                continue;
            };
            match best {
                Some((_, best_score)) if !self.is_better(score, best_score) => {}
                _ => best = Some((candidate, score)),
            }
        }
        best.map(|(s, _)| s)
    }

    /// Best score among the known optima, or `None` if none are defined.
    fn optimum_score(&self) -> Result<Option<f64>, InvalidSolutionError> {
        let Some(optima) = self.global_optima() else {
            return Ok(None);
        };
        let mut best: Option<f64> = None;
        for optimum in optima {
            let score = self.cost(optimum)?;
            best = match best {
                Some(b) if !self.is_better(score, b) => Some(b),
                _ => Some(score),
            };
        }
        Ok(best)
    }
}

/// A problem that can propose a nearby representation.
///
/// Used by local-search strategies such as
/// [`HillClimber`](crate::algorithm::HillClimber).
pub trait Neighbourhood: Problem {
    /// Returns a small perturbation of `representation`.
    fn neighbour<R: Rng>(
        &self,
        representation: &Self::Representation,
        rng: &mut R,
    ) -> Self::Representation;
}

/// Checks that a representation has the expected length.
pub fn check_dimension(expected: usize, actual: usize) -> Result<(), InvalidSolutionError> {
    if expected == actual {
        Ok(())
    } else {
        Err(InvalidSolutionError::DimensionMismatch { expected, actual })
    }
}
