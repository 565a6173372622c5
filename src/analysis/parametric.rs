//! Parametric tests.
//!
//! Both assume approximately normal scores. Prefer the rank tests when
//! runs frequently hit the same optimum.

use super::comparison::{ComparisonTest, TestOutcome};
use crate::error::AnalysisError;
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};

/// Welch's unequal-variance t-test, two-sided.
#[derive(Debug, Clone, Copy, Default)]
pub struct WelchTTest;

impl ComparisonTest for WelchTTest {
    fn name(&self) -> &str {
        "welch-t"
    }

    fn supports_two_populations(&self) -> bool {
        true
    }

    fn supports_n_populations(&self) -> bool {
        false
    }

    fn two_sample(&self, a: &[f64], b: &[f64]) -> Result<TestOutcome, AnalysisError> {
        if a.len() < 2 || b.len() < 2 {
            return Err(AnalysisError::InsufficientData(
                "Welch's t-test needs at least two scores per sample".into(),
            ));
        }

        let (mean_a, var_a) = mean_variance(a);
        let (mean_b, var_b) = mean_variance(b);
        let se_a = var_a / a.len() as f64;
        let se_b = var_b / b.len() as f64;
        let se2 = se_a + se_b;

        if se2 == 0.0 {
            return Ok(degenerate(mean_a == mean_b, mean_a - mean_b, 2));
        }

        let t = (mean_a - mean_b) / se2.sqrt();
        let df = se2 * se2
            / (se_a * se_a / (a.len() - 1) as f64 + se_b * se_b / (b.len() - 1) as f64);
        let dist =
            StudentsT::new(0.0, 1.0, df).map_err(|e| AnalysisError::Numerical(e.to_string()))?;

        Ok(TestOutcome {
            statistic: t,
            p_value: (2.0 * dist.sf(t.abs())).min(1.0),
            populations: 2,
        })
    }
}

/// One-way analysis of variance F-test.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneWayAnova;

impl ComparisonTest for OneWayAnova {
    fn name(&self) -> &str {
        "one-way-anova"
    }

    fn supports_two_populations(&self) -> bool {
        false
    }

    fn supports_n_populations(&self) -> bool {
        true
    }

    fn n_sample(&self, samples: &[&[f64]]) -> Result<TestOutcome, AnalysisError> {
        let k = samples.len();
        if k < 2 {
            return Err(AnalysisError::TooFewPopulations(k));
        }
        if samples.iter().any(|s| s.is_empty()) {
            return Err(AnalysisError::InsufficientData(
                "ANOVA needs non-empty samples".into(),
            ));
        }
        let n: usize = samples.iter().map(|s| s.len()).sum();
        if n <= k {
            return Err(AnalysisError::InsufficientData(format!(
                "ANOVA needs more than {k} scores in total, got {n}"
            )));
        }

        let grand_mean = samples.iter().flat_map(|s| s.iter()).sum::<f64>() / n as f64;
        let mut ss_between = 0.0;
        let mut ss_within = 0.0;
        for sample in samples {
            let mean = sample.iter().sum::<f64>() / sample.len() as f64;
            ss_between += sample.len() as f64 * (mean - grand_mean).powi(2);
            ss_within += sample.iter().map(|x| (x - mean).powi(2)).sum::<f64>();
        }

        if ss_within == 0.0 {
            return Ok(degenerate(ss_between == 0.0, ss_between, k));
        }

        let df_between = (k - 1) as f64;
        let df_within = (n - k) as f64;
        let f = (ss_between / df_between) / (ss_within / df_within);
        let dist = FisherSnedecor::new(df_between, df_within)
            .map_err(|e| AnalysisError::Numerical(e.to_string()))?;

        Ok(TestOutcome {
            statistic: f,
            p_value: dist.sf(f),
            populations: k,
        })
    }
}

fn mean_variance(xs: &[f64]) -> (f64, f64) {
    let n = xs.len() as f64;
    let mean = xs.iter().sum::<f64>() / n;
    let ss: f64 = xs.iter().map(|x| (x - mean).powi(2)).sum();
    (mean, ss / (n - 1.0))
}

/// Zero within-sample spread: identical groups cannot be told apart,
/// distinct constant groups are maximally different.
fn degenerate(identical: bool, signed_effect: f64, populations: usize) -> TestOutcome {
    if identical {
        TestOutcome {
            statistic: 0.0,
            p_value: 1.0,
            populations,
        }
    } else {
        TestOutcome {
            statistic: f64::INFINITY.copysign(signed_effect),
            p_value: 0.0,
            populations,
        }
    }
}
