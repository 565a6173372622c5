//! Benchmark problems shared by the integration tests.

#![allow(dead_code)]

use rand::Rng;
use u_metalab::error::InvalidSolutionError;
use u_metalab::problem::{check_dimension, Neighbourhood, Problem, Solution};

/// Sum of squares, optionally negated into a maximization problem.
pub struct Sphere {
    dim: usize,
    minimize: bool,
    optima: Vec<Vec<f64>>,
}

impl Sphere {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            minimize: true,
            optima: vec![vec![0.0; dim]],
        }
    }

    /// Maximizes `-sum(x^2)`; same optimum.
    pub fn negated(dim: usize) -> Self {
        Self {
            minimize: false,
            ..Self::new(dim)
        }
    }
}

impl Problem for Sphere {
    type Representation = Vec<f64>;

    fn is_minimization(&self) -> bool {
        self.minimize
    }

    fn cost(&self, x: &Vec<f64>) -> Result<f64, InvalidSolutionError> {
        check_dimension(self.dim, x.len())?;
        let ss: f64 = x.iter().map(|v| v * v).sum();
        Ok(if self.minimize { ss } else { -ss })
    }

    fn random_solution<R: Rng>(&self, rng: &mut R) -> Solution<Vec<f64>> {
        Solution::new((0..self.dim).map(|_| rng.random_range(-5.0..5.0)).collect())
    }

    fn global_optima(&self) -> Option<&[Vec<f64>]> {
        Some(&self.optima)
    }
}

impl Neighbourhood for Sphere {
    fn neighbour<R: Rng>(&self, x: &Vec<f64>, rng: &mut R) -> Vec<f64> {
        x.iter().map(|v| v + rng.random_range(-0.25..0.25)).collect()
    }
}

/// Unevaluated solution at `x`.
pub fn at(x: &[f64]) -> Solution<Vec<f64>> {
    Solution::new(x.to_vec())
}
