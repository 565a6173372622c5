//! Per-pairing run statistics.

use crate::algorithm::RunOutcome;

/// Best scores of independent runs of one (algorithm, problem) pairing.
///
/// Read-only after construction. Descriptive statistics return `None` when
/// they are undefined for the sample size.
///
/// # Examples
///
/// ```
/// use u_metalab::analysis::RunStatisticSummary;
///
/// let summary = RunStatisticSummary::new("ga", vec![10.0, 12.0, 9.0, 11.0], true);
/// assert_eq!(summary.mean(), Some(10.5));
/// assert_eq!(summary.best(), Some(9.0));
/// assert_eq!(summary.worst(), Some(12.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunStatisticSummary {
    label: String,
    scores: Vec<f64>,
    minimization: bool,
}

impl RunStatisticSummary {
    pub fn new(label: impl Into<String>, scores: Vec<f64>, minimization: bool) -> Self {
        Self {
            label: label.into(),
            scores,
            minimization,
        }
    }

    /// Collects `best_score` from each outcome, in order.
    pub fn from_outcomes<R>(
        label: impl Into<String>,
        outcomes: &[RunOutcome<R>],
        minimization: bool,
    ) -> Self {
        Self::new(
            label,
            outcomes.iter().map(|o| o.best_score).collect(),
            minimization,
        )
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn is_minimization(&self) -> bool {
        self.minimization
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.scores.is_empty() {
            return None;
        }
        Some(self.scores.iter().sum::<f64>() / self.scores.len() as f64)
    }

    /// Sample variance (n - 1 denominator). `None` below two runs.
    pub fn variance(&self) -> Option<f64> {
        if self.scores.len() < 2 {
            return None;
        }
        let mean = self.mean()?;
        let ss: f64 = self.scores.iter().map(|s| (s - mean).powi(2)).sum();
        Some(ss / (self.scores.len() - 1) as f64)
    }

    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }

    pub fn median(&self) -> Option<f64> {
        if self.scores.is_empty() {
            return None;
        }
        let mut sorted = self.scores.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            Some((sorted[mid - 1] + sorted[mid]) / 2.0)
        } else {
            Some(sorted[mid])
        }
    }

    /// Best score under the summary's orientation.
    pub fn best(&self) -> Option<f64> {
        if self.minimization {
            self.min()
        } else {
            self.max()
        }
    }

    /// Worst score under the summary's orientation.
    pub fn worst(&self) -> Option<f64> {
        if self.minimization {
            self.max()
        } else {
            self.min()
        }
    }

    fn min(&self) -> Option<f64> {
        self.scores.iter().copied().reduce(f64::min)
    }

    fn max(&self) -> Option<f64> {
        self.scores.iter().copied().reduce(f64::max)
    }
}
