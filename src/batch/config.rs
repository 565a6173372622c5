//! Batch configuration.

use crate::algorithm::RunConfig;

/// Configuration for a batch of independent runs.
///
/// # Examples
///
/// ```
/// use u_metalab::batch::BatchConfig;
///
/// let config = BatchConfig::default()
///     .with_runs(50)
///     .with_base_seed(7)
///     .with_parallel(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchConfig {
    /// Number of independent runs.
    pub runs: usize,

    /// Base seed from which every run's seed is derived.
    pub base_seed: u64,

    /// Whether to execute runs on rayon's pool.
    ///
    /// Only effective with the `parallel` feature; results are identical
    /// either way.
    pub parallel: bool,

    /// Template for each run's configuration. Its seed is overwritten with
    /// the derived per-run seed.
    pub run: RunConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            runs: 30,
            base_seed: 0,
            parallel: true,
            run: RunConfig::default(),
        }
    }
}

impl BatchConfig {
    /// Sets the number of runs.
    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    /// Sets the base seed.
    pub fn with_base_seed(mut self, seed: u64) -> Self {
        self.base_seed = seed;
        self
    }

    /// Enables or disables parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the per-run configuration template.
    pub fn with_run_config(mut self, run: RunConfig) -> Self {
        self.run = run;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.runs == 0 {
            return Err("runs must be at least 1".into());
        }
        self.run.validate()
    }
}
