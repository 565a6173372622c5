//! Shared fixtures for unit tests.

use crate::error::InvalidSolutionError;
use crate::problem::{check_dimension, Neighbourhood, Problem, Solution};
use rand::Rng;

/// Sum of squares over two coordinates.
pub(crate) struct Grid {
    minimize: bool,
    optima: Option<Vec<Vec<f64>>>,
}

impl Grid {
    pub(crate) fn with_origin_optimum() -> Self {
        Self {
            minimize: true,
            optima: Some(vec![vec![0.0, 0.0]]),
        }
    }

    pub(crate) fn without_optima() -> Self {
        Self {
            minimize: true,
            optima: None,
        }
    }

    pub(crate) fn maximizing() -> Self {
        Self {
            minimize: false,
            optima: None,
        }
    }

    /// Claims an optimum that is worse than the true minimum.
    pub(crate) fn with_wrong_optimum() -> Self {
        Self {
            minimize: true,
            optima: Some(vec![vec![1.0, 1.0]]),
        }
    }
}

impl Problem for Grid {
    type Representation = Vec<f64>;

    fn is_minimization(&self) -> bool {
        self.minimize
    }

    fn cost(&self, x: &Vec<f64>) -> Result<f64, InvalidSolutionError> {
        check_dimension(2, x.len())?;
        Ok(x.iter().map(|v| v * v).sum())
    }

    fn random_solution<R: Rng>(&self, rng: &mut R) -> Solution<Vec<f64>> {
        Solution::new((0..2).map(|_| rng.random_range(-5.0..5.0)).collect())
    }

    fn global_optima(&self) -> Option<&[Vec<f64>]> {
        self.optima.as_deref()
    }
}

impl Neighbourhood for Grid {
    fn neighbour<R: Rng>(&self, x: &Vec<f64>, rng: &mut R) -> Vec<f64> {
        let mut next = x.clone();
        let i = rng.random_range(0..next.len());
        next[i] += rng.random_range(-0.5..0.5);
        next
    }
}

/// Builds and evaluates a grid point.
pub(crate) fn evaluated(problem: &Grid, point: &[f64; 2]) -> Solution<Vec<f64>> {
    let mut s = Solution::new(point.to_vec());
    problem
        .evaluate(&mut s)
        .unwrap_or_else(|e| panic!("fixture point must evaluate: {e}"));
    s
}
