//! Hypothesis-test driver over run summaries.

use super::summary::RunStatisticSummary;
use crate::error::AnalysisError;

/// Null hypothesis shared by every comparison test.
pub const NULL_HYPOTHESIS: &str = "Sample populations have the same distribution";

/// Default rejection threshold.
pub const DEFAULT_SIGNIFICANCE: f64 = 0.05;

/// Result of a single hypothesis test.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TestOutcome {
    /// Test statistic (U, H, t or F).
    pub statistic: f64,

    /// Two-sided p-value.
    pub p_value: f64,

    /// Number of populations compared.
    pub populations: usize,
}

/// A hypothesis test over samples of run scores.
///
/// Implementations declare which population counts they handle. The
/// default sample methods report the corresponding capability as missing.
pub trait ComparisonTest {
    fn name(&self) -> &str;

    fn supports_two_populations(&self) -> bool;

    fn supports_n_populations(&self) -> bool;

    /// Pairwise test.
    fn two_sample(&self, _a: &[f64], _b: &[f64]) -> Result<TestOutcome, AnalysisError> {
        Err(AnalysisError::TwoPopulationsUnsupported {
            test: self.name().to_string(),
        })
    }

    /// Test over two or more samples.
    fn n_sample(&self, samples: &[&[f64]]) -> Result<TestOutcome, AnalysisError> {
        Err(AnalysisError::NPopulationsUnsupported {
            test: self.name().to_string(),
            count: samples.len(),
        })
    }
}

/// Runs a [`ComparisonTest`] against [`RunStatisticSummary`] values and
/// holds the verdict.
///
/// With exactly two summaries and a test that supports pairwise
/// comparison, the two-sample statistic is used even when the test also
/// supports N populations.
///
/// # Examples
///
/// ```
/// use u_metalab::analysis::{MannWhitneyU, RunStatisticSummary, StatisticalComparison};
///
/// let a = RunStatisticSummary::new("a", vec![10.0, 12.0, 9.0, 11.0], true);
/// let b = RunStatisticSummary::new("b", vec![20.0, 22.0, 19.0, 21.0], true);
///
/// let mut comparison = StatisticalComparison::new(MannWhitneyU);
/// comparison.evaluate(&a, &b).unwrap();
/// assert!(comparison.can_reject_null_hypothesis());
/// ```
#[derive(Debug, Clone)]
pub struct StatisticalComparison<T> {
    test: T,
    significance: f64,
    outcome: Option<TestOutcome>,
}

impl<T: ComparisonTest> StatisticalComparison<T> {
    pub fn new(test: T) -> Self {
        Self {
            test,
            significance: DEFAULT_SIGNIFICANCE,
            outcome: None,
        }
    }

    /// Sets the rejection threshold.
    pub fn with_significance(mut self, alpha: f64) -> Self {
        self.significance = alpha;
        self
    }

    pub fn test(&self) -> &T {
        &self.test
    }

    pub fn significance(&self) -> f64 {
        self.significance
    }

    pub fn supports_two_populations(&self) -> bool {
        self.test.supports_two_populations()
    }

    pub fn supports_n_populations(&self) -> bool {
        self.test.supports_n_populations()
    }

    /// Compares two summaries.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::TwoPopulationsUnsupported`] if the test is
    /// N-population only; also fails on empty or mixed-orientation
    /// summaries. A failure clears any previous result.
    pub fn evaluate(
        &mut self,
        a: &RunStatisticSummary,
        b: &RunStatisticSummary,
    ) -> Result<TestOutcome, AnalysisError> {
        self.outcome = None;
        if !self.test.supports_two_populations() {
            return Err(AnalysisError::TwoPopulationsUnsupported {
                test: self.test.name().to_string(),
            });
        }
        validate(&[a, b])?;
        let outcome = self.test.two_sample(a.scores(), b.scores())?;
        self.outcome = Some(outcome);
        Ok(outcome)
    }

    /// Compares any number of summaries.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::TooFewPopulations`] below two summaries,
    /// [`AnalysisError::NPopulationsUnsupported`] when the count cannot be
    /// handled by the test. A failure clears any previous result.
    pub fn evaluate_all(
        &mut self,
        summaries: &[&RunStatisticSummary],
    ) -> Result<TestOutcome, AnalysisError> {
        self.outcome = None;
        if summaries.len() < 2 {
            return Err(AnalysisError::TooFewPopulations(summaries.len()));
        }

        let outcome = if summaries.len() == 2 && self.test.supports_two_populations() {
            validate(summaries)?;
            self.test
                .two_sample(summaries[0].scores(), summaries[1].scores())?
        } else if self.test.supports_n_populations() {
            validate(summaries)?;
            let samples: Vec<&[f64]> = summaries.iter().map(|s| s.scores()).collect();
            self.test.n_sample(&samples)?
        } else {
            return Err(AnalysisError::NPopulationsUnsupported {
                test: self.test.name().to_string(),
                count: summaries.len(),
            });
        };

        log::debug!(
            "{}: statistic={} p={} populations={}",
            self.test.name(),
            outcome.statistic,
            outcome.p_value,
            outcome.populations
        );
        self.outcome = Some(outcome);
        Ok(outcome)
    }

    /// Last successful result.
    pub fn outcome(&self) -> Option<&TestOutcome> {
        self.outcome.as_ref()
    }

    pub fn p_value(&self) -> Option<f64> {
        self.outcome.map(|o| o.p_value)
    }

    /// `p <= alpha`. `false` until an evaluation succeeds.
    pub fn can_reject_null_hypothesis(&self) -> bool {
        self.p_value().is_some_and(|p| p <= self.significance)
    }

    pub fn null_hypothesis_description(&self) -> &'static str {
        NULL_HYPOTHESIS
    }

    /// Alias of [`can_reject_null_hypothesis`](Self::can_reject_null_hypothesis).
    pub fn is_populations_different(&self) -> bool {
        self.can_reject_null_hypothesis()
    }
}

fn validate(summaries: &[&RunStatisticSummary]) -> Result<(), AnalysisError> {
    for summary in summaries {
        if summary.is_empty() {
            return Err(AnalysisError::EmptySample(summary.label().to_string()));
        }
        if summary.scores().iter().any(|s| !s.is_finite()) {
            return Err(AnalysisError::InsufficientData(format!(
                "summary '{}' contains a non-finite score",
                summary.label()
            )));
        }
    }
    let minimization = summaries[0].is_minimization();
    if summaries.iter().any(|s| s.is_minimization() != minimization) {
        return Err(AnalysisError::MixedOrientation);
    }
    Ok(())
}
