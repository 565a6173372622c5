//! Research harness for population-based metaheuristics.
//!
//! Provides the plumbing needed to run and compare optimization algorithms
//! on benchmark problems:
//!
//! - **Problem**: evaluation contract with orientation-aware comparison
//!   (minimization or maximization) and optional known global optima.
//! - **Algorithm**: epoch-based run engine with an explicit lifecycle,
//!   seeded random source, and a known-optimum invariant check.
//! - **Observer**: stop conditions and probes notified of every evaluation
//!   and every completed epoch.
//! - **Batch**: reproducible independent runs, optionally on rayon's pool.
//! - **Analysis**: run summaries and hypothesis tests (Mann-Whitney U,
//!   Kruskal-Wallis, Welch's t, one-way ANOVA) deciding whether two or
//!   more algorithms perform differently.
//!
//! # Architecture
//!
//! Concrete problems, strategies and observers implement the traits in
//! [`problem`], [`algorithm`] and [`observer`] directly; nothing is
//! discovered by name at runtime. Every run owns its random source, so
//! independent runs share no mutable state.

pub mod algorithm;
pub mod analysis;
pub mod batch;
pub mod error;
pub mod observer;
pub mod problem;
pub mod random;

#[cfg(test)]
mod testing;
