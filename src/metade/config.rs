//! MetaDE configuration.

use super::types::MutationStrategy;

/// Population used when the setup leaves `population_size` at 0.
pub const DEFAULT_POPULATION: usize = 100;

/// Generation budget used when the setup leaves `max_generations` at 0.
pub const DEFAULT_GENERATIONS: usize = 1000;

/// Smallest population that can feed every strategy with distinct members.
pub const MIN_POPULATION: usize = 5;

/// Configuration for self-adaptive differential evolution.
///
/// Each individual draws its crossover rate from `cr_range`, its scale
/// factor from `f_range` and its strategy from `strategies`, and redraws all
/// three whenever its trial vector fails to improve on it.
///
/// # Examples
///
/// ```
/// use u_fitsolve::metade::{MetaDeConfig, MutationStrategy};
///
/// let config = MetaDeConfig::default()
///     .with_p_best_fraction(0.2)
///     .with_strategies(vec![MutationStrategy::CurrentToPBest, MutationStrategy::Best2Bin]);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetaDeConfig {
    /// Fraction of the population forming the top-k set.
    pub p_best_fraction: f64,

    /// Range of the crossover rate, `[min, max)`.
    pub cr_range: (f64, f64),

    /// Range of the scale factor, `[min, max)`.
    pub f_range: (f64, f64),

    /// Strategies an individual may adopt.
    pub strategies: Vec<MutationStrategy>,
}

impl Default for MetaDeConfig {
    fn default() -> Self {
        Self {
            p_best_fraction: 0.1,
            cr_range: (0.0, 1.0),
            f_range: (0.1, 1.0),
            strategies: MutationStrategy::ALL.to_vec(),
        }
    }
}

impl MetaDeConfig {
    pub fn with_p_best_fraction(mut self, p: f64) -> Self {
        self.p_best_fraction = p;
        self
    }

    pub fn with_cr_range(mut self, min: f64, max: f64) -> Self {
        self.cr_range = (min, max);
        self
    }

    pub fn with_f_range(mut self, min: f64, max: f64) -> Self {
        self.f_range = (min, max);
        self
    }

    pub fn with_strategies(mut self, strategies: Vec<MutationStrategy>) -> Self {
        self.strategies = strategies;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.p_best_fraction > 0.0 && self.p_best_fraction <= 1.0) {
            return Err(format!(
                "p_best_fraction must be in (0, 1], got {}",
                self.p_best_fraction
            ));
        }
        let (cr_lo, cr_hi) = self.cr_range;
        if !(0.0 <= cr_lo && cr_lo <= cr_hi && cr_hi <= 1.0) {
            return Err(format!("cr_range must be within [0, 1], got {:?}", self.cr_range));
        }
        let (f_lo, f_hi) = self.f_range;
        if !(0.0 < f_lo && f_lo <= f_hi && f_hi <= 2.0) {
            return Err(format!("f_range must be within (0, 2], got {:?}", self.f_range));
        }
        if self.strategies.is_empty() {
            return Err("at least one mutation strategy is required".into());
        }
        Ok(())
    }
}
