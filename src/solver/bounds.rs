//! Per-dimension box constraints.

use crate::error::SolverError;

/// Lower and upper limits for every problem dimension.
///
/// `lower[i] == upper[i]` marks dimension `i` as fixed: clamping pins it to
/// that value and no solver ever moves it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl Bounds {
    /// Validates and builds the bounds.
    ///
    /// Fails on length mismatch, empty vectors, NaN or infinite entries, or
    /// `lower > upper`.
    pub fn new(lower: Vec<f64>, upper: Vec<f64>) -> Result<Self, SolverError> {
        if lower.len() != upper.len() {
            return Err(SolverError::BoundsMismatch {
                lower_len: lower.len(),
                upper_len: upper.len(),
            });
        }
        if lower.is_empty() {
            return Err(SolverError::EmptyProblem);
        }
        for (index, (&lo, &hi)) in lower.iter().zip(&upper).enumerate() {
            if !lo.is_finite() || !hi.is_finite() || lo > hi {
                return Err(SolverError::InvalidBounds {
                    index,
                    lower: lo,
                    upper: hi,
                });
            }
        }
        Ok(Self { lower, upper })
    }

    /// Number of dimensions.
    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &[f64] {
        &self.lower
    }

    pub fn upper(&self) -> &[f64] {
        &self.upper
    }

    /// Width of dimension `i`.
    #[inline]
    pub fn range(&self, i: usize) -> f64 {
        self.upper[i] - self.lower[i]
    }

    /// Returns `true` if dimension `i` is degenerate.
    #[inline]
    pub fn is_fixed(&self, i: usize) -> bool {
        self.lower[i] == self.upper[i]
    }

    /// Center of dimension `i`.
    #[inline]
    pub fn midpoint(&self, i: usize) -> f64 {
        self.lower[i] + 0.5 * self.range(i)
    }

    /// Clamps a single coordinate. NaN maps to the midpoint.
    #[inline]
    pub fn clamp_value(&self, i: usize, x: f64) -> f64 {
        if x.is_nan() {
            self.midpoint(i)
        } else {
            x.clamp(self.lower[i], self.upper[i])
        }
    }

    /// Clamps every coordinate of `x` into the box.
    pub fn clamp(&self, x: &mut [f64]) {
        for (i, v) in x.iter_mut().enumerate() {
            *v = self.clamp_value(i, *v);
        }
    }

    /// Returns `true` if every coordinate lies inside the box.
    pub fn contains(&self, x: &[f64]) -> bool {
        x.len() == self.dim()
            && x
                .iter()
                .enumerate()
                .all(|(i, &v)| v >= self.lower[i] && v <= self.upper[i])
    }

    /// Maps a unit-cube coordinate `u` in `[0, 1]` onto dimension `i`.
    #[inline]
    pub fn from_unit(&self, i: usize, u: f64) -> f64 {
        self.clamp_value(i, self.lower[i] + u * self.range(i))
    }

    /// Maps a coordinate of dimension `i` into `[0, 1]`; fixed dimensions map to 0.5.
    #[inline]
    pub fn to_unit(&self, i: usize, x: f64) -> f64 {
        let r = self.range(i);
        if r > 0.0 {
            (x - self.lower[i]) / r
        } else {
            0.5
        }
    }

    /// Writes the box center into `out`.
    pub fn midpoint_into(&self, out: &mut [f64]) {
        for (i, o) in out.iter_mut().enumerate() {
            *o = self.midpoint(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(Bounds::new(vec![0.0, 0.0], vec![1.0, 1.0]).is_ok());
        assert!(matches!(
            Bounds::new(vec![0.0], vec![1.0, 1.0]),
            Err(SolverError::BoundsMismatch { .. })
        ));
        assert!(matches!(
            Bounds::new(vec![], vec![]),
            Err(SolverError::EmptyProblem)
        ));
        assert!(matches!(
            Bounds::new(vec![0.0, 2.0], vec![1.0, 1.0]),
            Err(SolverError::InvalidBounds { index: 1, .. })
        ));
        assert!(Bounds::new(vec![f64::NAN], vec![1.0]).is_err());
        assert!(Bounds::new(vec![1.0], vec![1.0]).is_ok());
    }

    #[test]
    fn test_clamp_and_fixed_dimension() {
        let b = Bounds::new(vec![0.0, 3.0], vec![1.0, 3.0]).unwrap();
        assert!(b.is_fixed(1));
        let mut x = [2.0, -7.0];
        b.clamp(&mut x);
        assert_eq!(x, [1.0, 3.0]);
        let mut y = [f64::NAN, f64::NAN];
        b.clamp(&mut y);
        assert_eq!(y, [0.5, 3.0]);
        assert!(b.contains(&y));
    }

    #[test]
    fn test_unit_mapping() {
        let b = Bounds::new(vec![-2.0, 5.0], vec![2.0, 5.0]).unwrap();
        assert_eq!(b.from_unit(0, 0.25), -1.0);
        assert_eq!(b.to_unit(0, -1.0), 0.25);
        assert_eq!(b.from_unit(1, 0.9), 5.0);
        assert_eq!(b.to_unit(1, 5.0), 0.5);
        assert_eq!(b.from_unit(0, 1.5), 2.0);
    }
}
