//! Error taxonomy for the harness.
//!
//! Every failure propagates to the caller of the run or analysis; nothing
//! here is recovered internally. [`HarnessError`] is the umbrella type
//! returned by the run loop and wraps the four specific families:
//!
//! - [`InvalidSolutionError`]: a solution does not fit its problem
//! - [`InitialisationError`]: a run cannot establish its preconditions
//! - [`AnalysisError`]: a comparison test was misused
//! - [`AlgorithmInvariantViolation`]: the engine observed an impossible result

use thiserror::Error;

/// A solution's representation or evaluation state is incompatible with
/// the operation requested on it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvalidSolutionError {
    /// Representation has the wrong length or dimensionality.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Representation is structurally invalid for the problem.
    #[error("malformed solution: {0}")]
    Malformed(String),

    /// The score was read or compared before evaluation.
    #[error("solution has not been evaluated")]
    NotEvaluated,

    /// A solution is scored exactly once.
    #[error("solution has already been evaluated (score {0})")]
    AlreadyEvaluated(f64),

    /// The cost function produced NaN.
    #[error("cost function returned a non-finite score: {0}")]
    NonFiniteScore(f64),
}

/// A run could not be prepared; raised before any evaluation happens.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InitialisationError {
    /// An observer needs known global optima but the problem defines none.
    #[error("{observer} requires known global optima, but the problem defines none")]
    MissingGlobalOptima { observer: String },

    /// Without a stop condition the run could never terminate.
    #[error("no stop condition registered")]
    NoStopCondition,

    /// The strategy produced no seed solutions.
    #[error("strategy '{strategy}' produced an empty seed population")]
    EmptySeedPopulation { strategy: String },

    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Any other precondition an observer or strategy could not satisfy.
    #[error("{component}: {reason}")]
    Precondition { component: String, reason: String },
}

/// A statistical comparison was asked for something it cannot compute.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// Pairwise evaluation on a test without two-population support.
    #[error("{test} does not support two-population comparison")]
    TwoPopulationsUnsupported { test: String },

    /// More than two populations on a test without N-population support.
    #[error("{test} does not support comparing {count} populations")]
    NPopulationsUnsupported { test: String, count: usize },

    /// A comparison needs at least two populations.
    #[error("at least two populations are required, got {0}")]
    TooFewPopulations(usize),

    /// A summary holds no scores.
    #[error("summary '{0}' is empty")]
    EmptySample(String),

    /// Summaries were produced under different optimisation directions.
    #[error("summaries mix minimization and maximization orientations")]
    MixedOrientation,

    /// The statistic is undefined for the supplied data.
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// A distribution function could not be constructed.
    #[error("numerical error: {0}")]
    Numerical(String),
}

/// The engine observed a result that the problem definition rules out.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AlgorithmInvariantViolation {
    /// A reported score beats the best known optimum.
    #[error("epoch {epoch}: best score {best} is better than the known optimum {optimum}")]
    BetterThanOptimum {
        epoch: usize,
        best: f64,
        optimum: f64,
    },
}

/// Top-level error type for runs, batches and observers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HarnessError {
    #[error("invalid solution: {0}")]
    InvalidSolution(#[from] InvalidSolutionError),

    #[error("initialisation failed: {0}")]
    Initialisation(#[from] InitialisationError),

    #[error("analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("algorithm invariant violated: {0}")]
    InvariantViolation(#[from] AlgorithmInvariantViolation),

    /// The epoch-generation strategy failed.
    #[error("strategy '{strategy}' failed: {message}")]
    Strategy { strategy: String, message: String },

    /// A stop condition or probe failed while handling an event.
    #[error("observer '{observer}' failed: {message}")]
    Observer { observer: String, message: String },

    /// A lifecycle method was called in the wrong state.
    #[error("invalid run state: expected {expected}, found {found}")]
    InvalidState {
        expected: &'static str,
        found: &'static str,
    },
}

impl HarnessError {
    /// Convenience constructor for strategy failures.
    pub fn strategy(strategy: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Strategy {
            strategy: strategy.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for observer failures.
    pub fn observer(observer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Observer {
            observer: observer.into(),
            message: message.into(),
        }
    }
}

/// Result alias used throughout the run loop.
pub type HarnessResult<T> = Result<T, HarnessError>;
