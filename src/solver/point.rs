//! Numeric vectors with compile-time or run-time dimensionality.
//!
//! Solvers are generic over [`Point`]. `[f64; N]` keeps small problems on
//! the stack with the dimension known to the compiler; `Vec<f64>` is the
//! general fallback. Both expose the same slice-based operations.

/// A candidate position in the search space.
pub trait Point: Clone + Send + Sync + std::fmt::Debug + AsRef<[f64]> + AsMut<[f64]> + 'static {
    /// The compile-time dimensionality, if any.
    fn fixed_dimension() -> Option<usize>;

    /// A point of dimension `dim` with every coordinate set to `value`.
    fn filled(dim: usize, value: f64) -> Self;

    /// Copies `values` into a new point.
    fn from_slice(values: &[f64]) -> Self {
        let mut p = Self::filled(values.len(), 0.0);
        p.as_mut().copy_from_slice(values);
        p
    }

    /// Returns `true` if this point type can represent `dim` dimensions.
    fn supports(dim: usize) -> bool {
        Self::fixed_dimension().is_none_or(|n| n == dim)
    }

    /// Number of coordinates.
    fn dim(&self) -> usize {
        self.as_ref().len()
    }
}

impl<const N: usize> Point for [f64; N] {
    fn fixed_dimension() -> Option<usize> {
        Some(N)
    }

    fn filled(dim: usize, value: f64) -> Self {
        debug_assert_eq!(dim, N, "fixed-size point requested with wrong dimension");
        [value; N]
    }
}

impl Point for Vec<f64> {
    fn fixed_dimension() -> Option<usize> {
        None
    }

    fn filled(dim: usize, value: f64) -> Self {
        vec![value; dim]
    }
}

/// `a - b`, elementwise, into `out`.
#[inline]
pub fn sub_into(a: &[f64], b: &[f64], out: &mut [f64]) {
    for ((o, x), y) in out.iter_mut().zip(a).zip(b) {
        *o = x - y;
    }
}

/// `y += alpha * x`.
#[inline]
pub fn axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi += alpha * xi;
    }
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_and_dynamic_points_agree() {
        let a = <[f64; 3]>::from_slice(&[1.0, 2.0, 3.0]);
        let b = Vec::<f64>::from_slice(&[1.0, 2.0, 3.0]);
        assert_eq!(a.as_ref(), b.as_slice());
        assert_eq!(a.dim(), 3);
        assert_eq!(b.dim(), 3);
    }

    #[test]
    fn test_supports() {
        assert!(<[f64; 4]>::supports(4));
        assert!(!<[f64; 4]>::supports(3));
        assert!(Vec::<f64>::supports(17));
    }

    #[test]
    fn test_vector_ops() {
        let mut out = [0.0; 2];
        sub_into(&[3.0, 1.0], &[1.0, 1.0], &mut out);
        assert_eq!(out, [2.0, 0.0]);
        let mut y = [1.0, 1.0];
        axpy(2.0, &[1.0, -1.0], &mut y);
        assert_eq!(y, [3.0, -1.0]);
        assert!((distance(&[0.0, 0.0], &[3.0, 4.0]) - 5.0).abs() < 1e-12);
    }
}
