//! Epoch-based algorithm lifecycle.
//!
//! An [`EpochAlgorithm`] owns one run's population, random source and
//! observers, and repeatedly asks an [`EpochStrategy`] for the next
//! population until a stop condition is satisfied.
//!
//! # Lifecycle
//!
//! ```text
//! Created ──initialise_before_run──▶ InitializedForRun
//!    ──execute_epoch──▶ Running(1) ──▶ Running(2) ──▶ … ──▶ Stopped
//! ```
//!
//! Each epoch: strategy produces candidates → every new candidate is
//! evaluated (one event each) → post-evaluation hook → epoch-complete
//! event → stop conditions checked in registration order.
//!
//! # Key Types
//!
//! - [`EpochStrategy`]: the search heuristic
//! - [`EpochAlgorithm`]: the run engine
//! - [`RunConfig`]: seed and invariant settings
//! - [`RunOutcome`]: best solution, counters, stop reason, probe measurements
//! - [`RandomSearch`], [`HillClimber`]: reference strategies

mod config;
mod runner;
mod strategies;
mod types;

pub use config::RunConfig;
pub use runner::{EpochAlgorithm, RunOutcome};
pub use strategies::{HillClimber, RandomSearch};
pub use types::{EpochStrategy, RunState};
