//! PSO configuration.

use super::types::{SwarmGenerator, VelocityModifier};

/// Swarm size used when the setup leaves `population_size` at 0.
pub const DEFAULT_SWARM_SIZE: usize = 100;

/// Generation budget used when the setup leaves `max_generations` at 0.
pub const DEFAULT_GENERATIONS: usize = 1000;

/// Settings of the repulsive multi-modal mode.
///
/// The generation budget is split into `restarts` sub-searches plus one
/// final consolidation pass. The best position of each sub-search becomes a
/// repulsor for the next `repulsor_lifetime` sub-searches; in the final pass
/// every archived optimum attracts the swarm instead.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepulsiveConfig {
    /// Number of sub-searches before the final pass.
    pub restarts: usize,

    /// Number of subsequent sub-searches a repulsor stays active.
    pub repulsor_lifetime: usize,

    /// Influence radius in normalized (unit-cube) coordinates.
    pub radius: f64,

    /// Peak push, as a fraction of the dimension range, at the repulsor center.
    pub strength: f64,

    /// Pull coefficient toward the nearest archived optimum in the final pass.
    pub attraction: f64,
}

impl Default for RepulsiveConfig {
    fn default() -> Self {
        Self {
            restarts: 4,
            repulsor_lifetime: 2,
            radius: 0.1,
            strength: 0.5,
            attraction: 0.5,
        }
    }
}

impl RepulsiveConfig {
    pub fn with_restarts(mut self, n: usize) -> Self {
        self.restarts = n;
        self
    }

    pub fn with_repulsor_lifetime(mut self, n: usize) -> Self {
        self.repulsor_lifetime = n;
        self
    }

    pub fn with_radius(mut self, r: f64) -> Self {
        self.radius = r;
        self
    }

    pub fn with_strength(mut self, s: f64) -> Self {
        self.strength = s;
        self
    }

    pub fn with_attraction(mut self, a: f64) -> Self {
        self.attraction = a;
        self
    }
}

/// Configuration for Particle Swarm Optimization.
///
/// The defaults are the constriction-equivalent coefficients of Clerc &
/// Kennedy (2002).
///
/// # Examples
///
/// ```
/// use u_fitsolve::pso::{PsoConfig, RepulsiveConfig, SwarmGenerator, VelocityModifier};
///
/// let config = PsoConfig::default()
///     .with_generator(SwarmGenerator::CrossDiagonal)
///     .with_velocity_modifier(VelocityModifier::IndependentVectors)
///     .with_repulsive(RepulsiveConfig::default().with_restarts(3));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PsoConfig {
    /// Weight of the previous velocity.
    pub inertia: f64,

    /// Pull toward the particle's personal best.
    pub cognitive: f64,

    /// Pull toward the swarm best.
    pub social: f64,

    /// Velocity limit per dimension, as a fraction of that dimension's range.
    pub max_velocity_fraction: f64,

    /// Placement of the particles not seeded from hints.
    pub generator: SwarmGenerator,

    /// Source of the random factors of the velocity update.
    pub velocity_modifier: VelocityModifier,

    /// Enables the repulsive multi-modal mode.
    pub repulsive: Option<RepulsiveConfig>,
}

impl Default for PsoConfig {
    fn default() -> Self {
        Self {
            inertia: 0.7298,
            cognitive: 1.49445,
            social: 1.49445,
            max_velocity_fraction: 0.2,
            generator: SwarmGenerator::default(),
            velocity_modifier: VelocityModifier::default(),
            repulsive: None,
        }
    }
}

impl PsoConfig {
    pub fn with_inertia(mut self, w: f64) -> Self {
        self.inertia = w;
        self
    }

    pub fn with_cognitive(mut self, c: f64) -> Self {
        self.cognitive = c;
        self
    }

    pub fn with_social(mut self, c: f64) -> Self {
        self.social = c;
        self
    }

    pub fn with_max_velocity_fraction(mut self, f: f64) -> Self {
        self.max_velocity_fraction = f;
        self
    }

    pub fn with_generator(mut self, generator: SwarmGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_velocity_modifier(mut self, modifier: VelocityModifier) -> Self {
        self.velocity_modifier = modifier;
        self
    }

    pub fn with_repulsive(mut self, repulsive: RepulsiveConfig) -> Self {
        self.repulsive = Some(repulsive);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.inertia) {
            return Err(format!("inertia must be in [0, 1], got {}", self.inertia));
        }
        if !(self.cognitive >= 0.0 && self.cognitive.is_finite())
            || !(self.social >= 0.0 && self.social.is_finite())
        {
            return Err(format!(
                "cognitive and social coefficients must be finite and non-negative, got {} and {}",
                self.cognitive, self.social
            ));
        }
        if !(self.max_velocity_fraction > 0.0 && self.max_velocity_fraction <= 1.0) {
            return Err(format!(
                "max_velocity_fraction must be in (0, 1], got {}",
                self.max_velocity_fraction
            ));
        }
        if let Some(rep) = &self.repulsive {
            if rep.restarts == 0 {
                return Err("repulsive mode needs at least one restart".into());
            }
            if !(rep.radius > 0.0 && rep.radius.is_finite()) {
                return Err(format!("repulsor radius must be positive, got {}", rep.radius));
            }
            if !(rep.strength >= 0.0 && rep.strength.is_finite())
                || !(rep.attraction >= 0.0 && rep.attraction.is_finite())
            {
                return Err("repulsor strength and attraction must be finite and non-negative".into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(PsoConfig::default().validate().is_ok());
        assert!(PsoConfig::default()
            .with_repulsive(RepulsiveConfig::default())
            .validate()
            .is_ok());
    }

    #[test]
    fn test_invalid_coefficients() {
        assert!(PsoConfig::default().with_inertia(1.5).validate().is_err());
        assert!(PsoConfig::default().with_social(-1.0).validate().is_err());
        assert!(PsoConfig::default()
            .with_max_velocity_fraction(0.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_invalid_repulsive() {
        let bad = RepulsiveConfig::default().with_restarts(0);
        assert!(PsoConfig::default().with_repulsive(bad).validate().is_err());
        let bad = RepulsiveConfig::default().with_radius(0.0);
        assert!(PsoConfig::default().with_repulsive(bad).validate().is_err());
    }

    #[test]
    fn test_nan_is_rejected() {
        let nan = f64::NAN;
        assert!(PsoConfig::default().with_inertia(nan).validate().is_err());
        assert!(PsoConfig::default().with_cognitive(nan).validate().is_err());
        assert!(PsoConfig::default().with_social(nan).validate().is_err());
        assert!(PsoConfig::default()
            .with_max_velocity_fraction(nan)
            .validate()
            .is_err());
        for bad in [
            RepulsiveConfig::default().with_radius(nan),
            RepulsiveConfig::default().with_strength(nan),
            RepulsiveConfig::default().with_attraction(nan),
        ] {
            assert!(PsoConfig::default().with_repulsive(bad).validate().is_err());
        }
    }
}
