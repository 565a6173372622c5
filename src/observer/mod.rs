//! Stop-condition and probe observer protocol.
//!
//! A run broadcasts two kinds of events through its [`EventBus`]: one
//! "solution evaluated" event per evaluation, and one "epoch complete" event
//! per epoch. Two observer roles consume them:
//!
//! - [`StopCondition`]: consulted after each epoch; may terminate the run
//! - [`Probe`]: records a [`Measurement`]; never affects control flow
//!
//! Observers are reused across runs and must be [`reset`](Observer::reset)
//! between them. An observer error aborts the run like any other error.
//!
//! # Submodules
//!
//! - [`stop`]: epoch/evaluation budgets, target score, optimum detection,
//!   stagnation, wall-clock limit
//! - [`probe`]: best score, evaluation count, convergence curve, population mean

mod bus;
pub mod probe;
pub mod stop;
mod types;

pub use bus::{Evaluator, EventBus};
pub use probe::{BestScoreProbe, ConvergenceProbe, EvaluationCountProbe, PopulationMeanProbe};
pub use stop::{MaxEpochs, MaxEvaluations, OptimumLocated, Stagnation, TargetScore, WallClock};
pub use types::{Measurement, Observer, Probe, RunInfo, StopCondition, StopReason};
