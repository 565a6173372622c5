//! Rank-based (non-parametric) tests.

use super::comparison::{ComparisonTest, TestOutcome};
use crate::error::AnalysisError;
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

/// Combined size up to which the exact U distribution is enumerated.
pub const EXACT_LIMIT: usize = 40;

/// Mann-Whitney U test (Wilcoxon rank-sum), two-sided.
///
/// Uses the exact null distribution of U when the samples are untied and
/// `n1 + n2 <= 40`, otherwise the normal approximation with tie and
/// continuity corrections. The reported statistic is `min(U1, U2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MannWhitneyU;

impl ComparisonTest for MannWhitneyU {
    fn name(&self) -> &str {
        "mann-whitney-u"
    }

    fn supports_two_populations(&self) -> bool {
        true
    }

    fn supports_n_populations(&self) -> bool {
        false
    }

    fn two_sample(&self, a: &[f64], b: &[f64]) -> Result<TestOutcome, AnalysisError> {
        let (n1, n2) = (a.len(), b.len());
        if n1 == 0 || n2 == 0 {
            return Err(AnalysisError::InsufficientData(
                "Mann-Whitney U needs non-empty samples".into(),
            ));
        }

        let combined: Vec<f64> = a.iter().chain(b).copied().collect();
        let ranking = rank(&combined);
        let rank_sum_a: f64 = ranking.ranks[..n1].iter().sum();

        let u1 = rank_sum_a - (n1 * (n1 + 1)) as f64 / 2.0;
        let u2 = (n1 * n2) as f64 - u1;
        let u = u1.min(u2);

        let p_value = if ranking.tie_term == 0.0 && n1 + n2 <= EXACT_LIMIT {
            exact_p_value(n1, n2, u)
        } else {
            normal_p_value(n1, n2, u1, ranking.tie_term)?
        };

        Ok(TestOutcome {
            statistic: u,
            p_value,
            populations: 2,
        })
    }
}

/// Kruskal-Wallis H test.
///
/// H is corrected for ties and referred to a chi-square distribution with
/// `k - 1` degrees of freedom.
#[derive(Debug, Clone, Copy, Default)]
pub struct KruskalWallis;

impl ComparisonTest for KruskalWallis {
    fn name(&self) -> &str {
        "kruskal-wallis"
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
                "Kruskal-Wallis needs non-empty samples".into(),
            ));
        }

        let combined: Vec<f64> = samples.iter().flat_map(|s| s.iter().copied()).collect();
        let n = combined.len() as f64;
        let ranking = rank(&combined);

        let mut offset = 0;
        let mut weighted = 0.0;
        for sample in samples {
            let r: f64 = ranking.ranks[offset..offset + sample.len()].iter().sum();
            weighted += r * r / sample.len() as f64;
            offset += sample.len();
        }

        let correction = 1.0 - ranking.tie_term / (n * n * n - n);
        if correction <= 0.0 {
            // every observation tied
            return Ok(TestOutcome {
                statistic: 0.0,
                p_value: 1.0,
                populations: k,
            });
        }

        let h = (12.0 / (n * (n + 1.0)) * weighted - 3.0 * (n + 1.0)) / correction;
        let h = h.max(0.0);
        let chi = ChiSquared::new((k - 1) as f64)
            .map_err(|e| AnalysisError::Numerical(e.to_string()))?;

        Ok(TestOutcome {
            statistic: h,
            p_value: chi.sf(h),
            populations: k,
        })
    }
}

/// Mann-Whitney U for two populations, Kruskal-Wallis for more.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankSumComparison;

impl ComparisonTest for RankSumComparison {
    fn name(&self) -> &str {
        "rank-sum"
    }

    fn supports_two_populations(&self) -> bool {
        true
    }

    fn supports_n_populations(&self) -> bool {
        true
    }

    fn two_sample(&self, a: &[f64], b: &[f64]) -> Result<TestOutcome, AnalysisError> {
        MannWhitneyU.two_sample(a, b)
    }

    fn n_sample(&self, samples: &[&[f64]]) -> Result<TestOutcome, AnalysisError> {
        KruskalWallis.n_sample(samples)
    }
}

struct Ranking {
    /// 1-based ranks, ties averaged, in input order.
    ranks: Vec<f64>,
    /// Σ (t³ - t) over tie groups.
    tie_term: f64,
}

fn rank(values: &[f64]) -> Ranking {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));

    let mut ranks = vec![0.0; values.len()];
    let mut tie_term = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end share the average of ranks start+1..=end
        let average = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = average;
        }
        let t = (end - start) as f64;
        tie_term += t * t * t - t;
        start = end;
    }

    Ranking { ranks, tie_term }
}

/// Two-sided exact p-value of `u` under H0.
///
/// `counts[i][j][u]` is the number of arrangements of `i` and `j` untied
/// observations in which exactly `u` (a, b) pairs have `a > b`.
fn exact_p_value(n1: usize, n2: usize, u: f64) -> f64 {
    let mut counts: Vec<Vec<Vec<u64>>> = vec![vec![Vec::new(); n2 + 1]; n1 + 1];
    for i in 0..=n1 {
        for j in 0..=n2 {
            if i == 0 || j == 0 {
                counts[i][j] = vec![1];
                continue;
            }
            let mut row = vec![0u64; i * j + 1];
            // largest observation from a: it beats all j of b
            for (k, &c) in counts[i - 1][j].iter().enumerate() {
                row[k + j] += c;
            }
            // largest observation from b: contributes nothing
            for (k, &c) in counts[i][j - 1].iter().enumerate() {
                row[k] += c;
            }
            counts[i][j] = row;
        }
    }

    let distribution = &counts[n1][n2];
    let total: u64 = distribution.iter().sum();
    let bound = u.floor() as usize;
    let tail: u64 = distribution.iter().take(bound + 1).sum();
    (2.0 * tail as f64 / total as f64).min(1.0)
}

fn normal_p_value(n1: usize, n2: usize, u1: f64, tie_term: f64) -> Result<f64, AnalysisError> {
    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let n = n1f + n2f;
    let mean = n1f * n2f / 2.0;
    let variance = n1f * n2f / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    if variance <= 0.0 || !variance.is_finite() {
        // all observations tied
        return Ok(1.0);
    }

    let z = ((u1 - mean).abs() - 0.5).max(0.0) / variance.sqrt();
    let normal = Normal::new(0.0, 1.0).map_err(|e| AnalysisError::Numerical(e.to_string()))?;
    Ok((2.0 * normal.sf(z)).min(1.0))
}
