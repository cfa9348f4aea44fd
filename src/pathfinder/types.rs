//! Sample placement and the per-dimension extremum estimate.

use crate::halton::HaltonPoints;

/// Golden angle in radians, `pi * (3 - sqrt(5))`.
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Shape of the sample cloud around the center.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathfinderVariant {
    /// Halton directions on concentric spheres of linearly growing radius.
    #[default]
    Spherical,

    /// A golden-angle spiral in every pair of dimensions, with radius
    /// growing as the square root of the sample index.
    Spiral,
}

impl PathfinderVariant {
    /// Writes the unit-cube offset of sample `k` of `count` into `out`.
    pub(crate) fn offset(self, k: usize, count: usize, radius: f64, halton: &mut HaltonPoints, out: &mut [f64]) {
        let step = (k + 1) as f64 / count.max(1) as f64;
        match self {
            PathfinderVariant::Spherical => {
                halton.next_into(out);
                for o in out.iter_mut() {
                    *o = 2.0 * *o - 1.0;
                }
                let norm = out.iter().map(|v| v * v).sum::<f64>().sqrt();
                let scale = if norm > 0.0 { radius * step / norm } else { 0.0 };
                for o in out.iter_mut() {
                    *o *= scale;
                }
            }
            PathfinderVariant::Spiral => {
                let r = radius * step.sqrt();
                let theta = k as f64 * GOLDEN_ANGLE;
                for (pair, chunk) in out.chunks_mut(2).enumerate() {
                    let angle = theta + pair as f64 * GOLDEN_ANGLE;
                    chunk[0] = r * angle.cos();
                    if let Some(second) = chunk.get_mut(1) {
                        *second = r * angle.sin();
                    }
                }
            }
        }
    }
}

/// Outcome of the quadratic estimate along one dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Estimate {
    /// Nothing to probe (fixed dimension or no spacing).
    Skip,
    /// Vertex of a convex parabola through the best point and its neighbors.
    Vertex(f64),
    /// The fit is not usable; probe both sides at these coordinates.
    Expand(f64, f64),
}

/// Vertex of the parabola through three points with `x0 < x1 < x2`.
///
/// Returns `None` unless the parabola opens upward and the vertex is finite.
pub(crate) fn quadratic_vertex(x0: f64, f0: f64, x1: f64, f1: f64, x2: f64, f2: f64) -> Option<f64> {
    let curvature = ((f2 - f1) / (x2 - x1) - (f1 - f0) / (x1 - x0)) / (x2 - x0);
    if curvature.is_nan() || curvature <= 0.0 {
        return None;
    }
    let num = (x1 - x0).powi(2) * (f1 - f2) - (x1 - x2).powi(2) * (f1 - f0);
    let den = (x1 - x0) * (f1 - f2) - (x1 - x2) * (f1 - f0);
    let vertex = x1 - 0.5 * num / den;
    vertex.is_finite().then_some(vertex)
}
