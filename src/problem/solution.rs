//! Scored candidate solutions.

use crate::error::InvalidSolutionError;

/// A candidate point in the search space plus its score.
///
/// The representation is opaque to the harness. The score is undefined
/// until [`Problem::evaluate`](super::Problem::evaluate) assigns it, which
/// happens exactly once; afterwards the solution is treated as immutable
/// and may be cloned freely into probes or elite archives.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution<R> {
    representation: R,
    score: Option<f64>,
}

impl<R> Solution<R> {
    /// Creates an unevaluated solution.
    pub fn new(representation: R) -> Self {
        Self {
            representation,
            score: None,
        }
    }

    /// The domain-specific representation.
    pub fn representation(&self) -> &R {
        &self.representation
    }

    /// Consumes the solution and returns its representation.
    pub fn into_representation(self) -> R {
        self.representation
    }

    /// The score, or `None` before evaluation.
    pub fn score(&self) -> Option<f64> {
        self.score
    }

    /// The score, failing with [`InvalidSolutionError::NotEvaluated`] if unset.
    pub fn evaluated_score(&self) -> Result<f64, InvalidSolutionError> {
        self.score.ok_or(InvalidSolutionError::NotEvaluated)
    }

    /// Whether a score has been assigned.
    pub fn is_evaluated(&self) -> bool {
        self.score.is_some()
    }

    /// Assigns the score. Only the evaluation contract may call this.
    pub(crate) fn assign_score(&mut self, score: f64) -> Result<(), InvalidSolutionError> {
        if let Some(existing) = self.score {
            return Err(InvalidSolutionError::AlreadyEvaluated(existing));
        }
        self.score = Some(score);
        Ok(())
    }
}
