//! Independent repeated runs.
//!
//! [`BatchRunner`] executes `runs` fresh [`EpochAlgorithm`](crate::algorithm::EpochAlgorithm)
//! instances against one problem. Each run gets its own random source seeded
//! with [`derive_seed`](crate::random::derive_seed)`(base_seed, index)`, so
//! results do not depend on scheduling and the `parallel` feature only
//! changes wall time.

mod config;
mod runner;

pub use config::BatchConfig;
pub use runner::{BatchResult, BatchRunner};
