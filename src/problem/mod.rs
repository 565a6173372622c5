//! Problem and solution evaluation contract.
//!
//! A [`Problem`] defines a search space, a cost function, an optimisation
//! direction and, optionally, a registry of known global optima. A
//! [`Solution`] is a candidate point that is scored exactly once.
//!
//! # Key Types
//!
//! - [`Solution`]: representation plus score, immutable after evaluation
//! - [`Problem`]: evaluation, comparison and random generation
//! - [`Neighbourhood`]: optional local-move capability for local search

mod solution;
mod types;

pub use solution::Solution;
pub use types::{check_dimension, Neighbourhood, Problem};
