//! Fitness vectors and their comparison.
//!
//! A [`Fitness`] holds one value per objective, up to [`MAX_OBJECTIVES`].
//! All objectives are **minimized**. A failed evaluation is represented by
//! `NaN` in every slot and always loses against a valid fitness.
//!
//! # Submodules
//!
//! - [`comparator`]: the "strictly better" relation under dominance and
//!   distance strategies
//! - [`pareto`]: non-dominated sorting for extracting Pareto fronts

pub mod comparator;
pub mod pareto;

pub use comparator::{compare, Comparator, DistanceMetric, DominanceStrategy, FitnessComparator};

use crate::error::SolverError;

/// Compile-time maximum number of objectives.
pub const MAX_OBJECTIVES: usize = 10;

/// Returns `true` if `v` is a usable objective value.
///
/// Zero and normal floats are valid; NaN, infinities and subnormals are
/// treated as evaluation garbage.
#[inline]
pub fn is_valid_value(v: f64) -> bool {
    v == 0.0 || v.is_normal()
}

/// A fixed-capacity vector of objective values.
///
/// Equality compares the active objectives only, so two failed fitnesses
/// are never equal (NaN).
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fitness {
    values: [f64; MAX_OBJECTIVES],
    len: usize,
}

impl Fitness {
    /// A failed fitness (`NaN` in every slot) with `count` objectives.
    pub fn failed(count: usize) -> Self {
        Self {
            values: [f64::NAN; MAX_OBJECTIVES],
            len: count.min(MAX_OBJECTIVES),
        }
    }

    /// A single-objective fitness.
    pub fn single(value: f64) -> Self {
        let mut f = Self::failed(1);
        f.values[0] = value;
        f
    }

    /// Builds a fitness from a slice of objective values.
    pub fn from_slice(values: &[f64]) -> Result<Self, SolverError> {
        if values.is_empty() || values.len() > MAX_OBJECTIVES {
            return Err(SolverError::InvalidObjectiveCount {
                count: values.len(),
                max: MAX_OBJECTIVES,
            });
        }
        let mut f = Self::failed(values.len());
        f.values[..values.len()].copy_from_slice(values);
        Ok(f)
    }

    /// Number of objectives.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the fitness has no objectives.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The objective values.
    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.len]
    }

    /// Mutable access to the objective values.
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.values[..self.len]
    }

    /// The first objective, or NaN for an empty fitness.
    pub fn primary(&self) -> f64 {
        if self.len == 0 {
            f64::NAN
        } else {
            self.values[0]
        }
    }

    /// Returns `true` if every objective holds a valid value.
    pub fn is_valid(&self) -> bool {
        self.len > 0 && self.as_slice().iter().all(|&v| is_valid_value(v))
    }

    /// Marks the whole fitness failed if any objective is invalid.
    pub fn sanitize(&mut self) {
        if !self.is_valid() {
            self.values = [f64::NAN; MAX_OBJECTIVES];
        }
    }

    /// Euclidean norm of the objective vector; used as the scalar metric
    /// when a single number must summarize a multi-objective fitness.
    pub fn norm(&self) -> f64 {
        if self.len == 1 {
            return self.values[0];
        }
        self.as_slice().iter().map(|v| v * v).sum::<f64>().sqrt()
    }
}

impl PartialEq for Fitness {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl std::ops::Index<usize> for Fitness {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.as_slice()[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_is_invalid() {
        let f = Fitness::failed(3);
        assert_eq!(f.len(), 3);
        assert!(!f.is_valid());
        assert!(f.as_slice().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_zero_is_valid_subnormal_is_not() {
        assert!(is_valid_value(0.0));
        assert!(is_valid_value(-0.0));
        assert!(is_valid_value(1.5));
        assert!(!is_valid_value(f64::MIN_POSITIVE / 2.0));
        assert!(!is_valid_value(f64::INFINITY));
        assert!(!is_valid_value(f64::NAN));
    }

    #[test]
    fn test_sanitize_poisons_all_objectives() {
        let mut f = Fitness::from_slice(&[1.0, f64::INFINITY, 2.0]).unwrap();
        f.sanitize();
        assert!(f.as_slice().iter().all(|v| v.is_nan()));

        let mut ok = Fitness::from_slice(&[1.0, 0.0]).unwrap();
        ok.sanitize();
        assert_eq!(ok.as_slice(), &[1.0, 0.0]);
    }

    #[test]
    fn test_from_slice_limits() {
        assert!(Fitness::from_slice(&[]).is_err());
        assert!(Fitness::from_slice(&[0.0; MAX_OBJECTIVES + 1]).is_err());
        assert_eq!(Fitness::from_slice(&[0.0; MAX_OBJECTIVES]).unwrap().len(), MAX_OBJECTIVES);
    }

    #[test]
    fn test_norm() {
        assert_eq!(Fitness::single(-2.0).norm(), -2.0);
        let f = Fitness::from_slice(&[3.0, 4.0]).unwrap();
        assert!((f.norm() - 5.0).abs() < 1e-12);
        assert_eq!(f[1], 4.0);
    }
}
