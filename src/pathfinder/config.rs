//! Pathfinder configuration.

use super::types::PathfinderVariant;

/// Samples per generation used when the setup leaves `population_size` at 0.
pub const DEFAULT_SAMPLES: usize = 40;

/// Generation budget used when the setup leaves `max_generations` at 0.
pub const DEFAULT_GENERATIONS: usize = 200;

/// Configuration for the pathfinder samplers.
///
/// Radii are measured in normalized coordinates, where every dimension of
/// the box spans `[0, 1]`.
///
/// # Examples
///
/// ```
/// use u_fitsolve::pathfinder::{PathfinderConfig, PathfinderVariant};
///
/// let config = PathfinderConfig::default()
///     .with_variant(PathfinderVariant::Spiral)
///     .with_initial_radius(0.25);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathfinderConfig {
    /// Shape of the sample cloud.
    pub variant: PathfinderVariant,

    /// Radius of the first sample cloud.
    pub initial_radius: f64,

    /// Radius factor after a generation without improvement.
    pub shrink: f64,

    /// Radius factor after an improving generation.
    pub grow: f64,
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        Self {
            variant: PathfinderVariant::default(),
            initial_radius: 0.5,
            shrink: 0.5,
            grow: 1.25,
        }
    }
}

impl PathfinderConfig {
    pub fn with_variant(mut self, variant: PathfinderVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_initial_radius(mut self, r: f64) -> Self {
        self.initial_radius = r;
        self
    }

    pub fn with_shrink(mut self, f: f64) -> Self {
        self.shrink = f;
        self
    }

    pub fn with_grow(mut self, f: f64) -> Self {
        self.grow = f;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.initial_radius > 0.0 && self.initial_radius <= 1.0) {
            return Err(format!(
                "initial_radius must be in (0, 1], got {}",
                self.initial_radius
            ));
        }
        if !(self.shrink > 0.0 && self.shrink < 1.0) {
            return Err(format!("shrink must be in (0, 1), got {}", self.shrink));
        }
        if !(self.grow >= 1.0 && self.grow.is_finite()) {
            return Err(format!("grow must be at least 1, got {}", self.grow));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(PathfinderConfig::default().validate().is_ok());
        assert!(PathfinderConfig::default().with_initial_radius(0.0).validate().is_err());
        assert!(PathfinderConfig::default().with_shrink(1.0).validate().is_err());
        assert!(PathfinderConfig::default().with_grow(0.5).validate().is_err());
        assert!(PathfinderConfig::default().with_initial_radius(f64::NAN).validate().is_err());
        assert!(PathfinderConfig::default().with_shrink(f64::NAN).validate().is_err());
        assert!(PathfinderConfig::default().with_grow(f64::NAN).validate().is_err());
    }
}
