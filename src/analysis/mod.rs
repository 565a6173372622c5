//! Statistical comparison of algorithms.
//!
//! Independent runs of an (algorithm, problem) pairing are collected into a
//! [`RunStatisticSummary`]; a [`StatisticalComparison`] then applies a
//! [`ComparisonTest`] to two or more summaries and reports whether the
//! null hypothesis "Sample populations have the same distribution" can be
//! rejected.
//!
//! # Tests
//!
//! | Test | 2 populations | N populations |
//! |------|---------------|---------------|
//! | [`MannWhitneyU`] | yes | no |
//! | [`KruskalWallis`] | no | yes |
//! | [`RankSumComparison`] | yes (U) | yes (H) |
//! | [`WelchTTest`] | yes | no |
//! | [`OneWayAnova`] | no | yes |
//!
//! Everything here is deterministic: no random source, no clock.

mod comparison;
mod parametric;
mod rank;
mod summary;

pub use comparison::{
    ComparisonTest, StatisticalComparison, TestOutcome, DEFAULT_SIGNIFICANCE, NULL_HYPOTHESIS,
};
pub use parametric::{OneWayAnova, WelchTTest};
pub use rank::{KruskalWallis, MannWhitneyU, RankSumComparison, EXACT_LIMIT};
pub use summary::RunStatisticSummary;
