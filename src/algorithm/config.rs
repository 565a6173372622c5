//! Run configuration.
//!
//! [`RunConfig`] holds the per-run parameters that are independent of the
//! search heuristic. Termination policy is deliberately absent here: epoch
//! and evaluation budgets are stop conditions.

/// Configuration for a single run.
///
/// # Examples
///
/// ```
/// use u_metalab::algorithm::RunConfig;
///
/// let config = RunConfig::default()
///     .with_seed(42)
///     .with_optimum_tolerance(1e-6);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunConfig {
    /// Seed of the run's random source.
    ///
    /// `None` draws a fresh seed at initialisation; the seed actually used
    /// is reported in the run outcome.
    pub seed: Option<u64>,

    /// Whether to fail the run when a score beats the problem's known
    /// optimum.
    pub check_optimum: bool,

    /// Slack allowed before a score counts as better than the optimum.
    pub optimum_tolerance: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: None,
            check_optimum: true,
            optimum_tolerance: 1e-9,
        }
    }
}

impl RunConfig {
    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables the known-optimum invariant check.
    pub fn with_optimum_check(mut self, enabled: bool) -> Self {
        self.check_optimum = enabled;
        self
    }

    /// Sets the optimum tolerance.
    pub fn with_optimum_tolerance(mut self, tolerance: f64) -> Self {
        self.optimum_tolerance = tolerance;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if !self.optimum_tolerance.is_finite() || self.optimum_tolerance < 0.0 {
            return Err("optimum_tolerance must be finite and non-negative".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert!(config.seed.is_none());
        assert!(config.check_optimum);
        assert!((config.optimum_tolerance - 1e-9).abs() < 1e-20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = RunConfig::default()
            .with_seed(7)
            .with_optimum_check(false)
            .with_optimum_tolerance(0.5);
        assert_eq!(config.seed, Some(7));
        assert!(!config.check_optimum);
        assert!((config.optimum_tolerance - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_validate_negative_tolerance() {
        let config = RunConfig::default().with_optimum_tolerance(-1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_nan_tolerance() {
        let config = RunConfig::default().with_optimum_tolerance(f64::NAN);
        assert!(config.validate().is_err());
    }
}
