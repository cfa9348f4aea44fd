//! Configuration shared by the sequential scans.

/// Iterations of the convex scan when the setup leaves `max_generations` at 0.
pub const DEFAULT_CONVEX_ITERATIONS: usize = 100;

/// Grid steps per dimension of the brute-force scan when the setup leaves
/// `population_size` at 0.
pub const DEFAULT_BRUTE_FORCE_STEPS: usize = 100;

/// Passes of the brute-force scan when the setup leaves `max_generations` at 0.
pub const DEFAULT_BRUTE_FORCE_PASSES: usize = 100;

/// Configuration of the convex and brute-force scans.
///
/// Without hints a single region spanning the whole box is scanned. Every
/// hint seeds its own region: a sub-box centered on the hint whose
/// half-width is `region_fraction` of each dimension's range.
///
/// # Examples
///
/// ```
/// use u_fitsolve::sequential::ScanConfig;
///
/// let config = ScanConfig::default().with_region_fraction(0.1);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanConfig {
    /// Half-width of a hint region, as a fraction of the dimension range.
    pub region_fraction: f64,

    /// A bracket narrower than `tolerance` times the dimension range is
    /// considered closed.
    pub tolerance: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            region_fraction: 0.25,
            tolerance: 1e-12,
        }
    }
}

impl ScanConfig {
    pub fn with_region_fraction(mut self, f: f64) -> Self {
        self.region_fraction = f;
        self
    }

    pub fn with_tolerance(mut self, t: f64) -> Self {
        self.tolerance = t;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.region_fraction > 0.0 && self.region_fraction <= 1.0) {
            return Err(format!(
                "region_fraction must be in (0, 1], got {}",
                self.region_fraction
            ));
        }
        if !(self.tolerance >= 0.0 && self.tolerance.is_finite()) {
            return Err(format!("tolerance must be non-negative, got {}", self.tolerance));
        }
        Ok(())
    }
}
