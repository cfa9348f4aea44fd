//! Halton low-discrepancy sequences with collision-free prime bases.
//!
//! Every [`Halton::new`] claims the next unused prime from a process-wide
//! atomic counter, so generators that are alive at the same time never share
//! a base and their sequences never correlate. The counter lives for the
//! whole process and only ever hands out increasing primes.
//!
//! [`Halton`] also implements [`rand::RngCore`], which lets it stand in for a
//! pseudo-random source anywhere a `rand::Rng` is accepted.
//!
//! # References
//!
//! - Halton (1960), "On the efficiency of certain quasi-random sequences of
//!   points in evaluating multi-dimensional integrals"

use rand::RngCore;
use std::sync::atomic::{AtomicU64, Ordering};

/// Last prime handed out by [`claim_prime`]. Starts below the first prime.
static LAST_PRIME: AtomicU64 = AtomicU64::new(1);

fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut d = 3u64;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

fn next_prime_after(n: u64) -> u64 {
    let mut candidate = n + 1;
    while !is_prime(candidate) {
        candidate += 1;
    }
    candidate
}

/// Atomically claims the next prime above the previously claimed one.
///
/// The solvers never claim from this counter; it is for callers that need
/// several mutually independent streams, e.g. one per worker thread.
///
/// # Examples
///
/// ```
/// use u_fitsolve::halton::{claim_prime, Halton};
///
/// let a = claim_prime();
/// let b = claim_prime();
/// assert!(b > a);
///
/// let mut stream = Halton::with_base(a);
/// assert!((0.0..1.0).contains(&stream.advance()));
/// ```
pub fn claim_prime() -> u64 {
    let mut current = LAST_PRIME.load(Ordering::Relaxed);
    loop {
        let next = next_prime_after(current);
        match LAST_PRIME.compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Relaxed)
        {
            Ok(_) => return next,
            Err(observed) => current = observed,
        }
    }
}

/// A one-dimensional Halton (van der Corput) sequence in a prime base.
///
/// # Examples
///
/// ```
/// use u_fitsolve::halton::Halton;
///
/// let mut h = Halton::with_base(2);
/// assert_eq!(h.advance(), 0.5);
/// assert_eq!(h.advance(), 0.25);
/// assert_eq!(h.advance(), 0.75);
/// ```
#[derive(Debug, Clone)]
pub struct Halton {
    base: u64,
    index: u64,
}

impl Halton {
    /// Creates a generator on a freshly claimed prime base.
    pub fn new() -> Self {
        Self::with_base(claim_prime())
    }

    /// Creates a generator on an explicit base without touching the global
    /// counter. Used when a reproducible sequence is required.
    ///
    /// # Panics
    /// Panics if `base < 2`.
    pub fn with_base(base: u64) -> Self {
        assert!(base >= 2, "halton base must be at least 2");
        Self { base, index: 0 }
    }

    /// The prime base of this sequence.
    pub fn base(&self) -> u64 {
        self.base
    }

    /// Skips the next `n` values.
    pub fn skip(&mut self, n: u64) {
        self.index = self.index.wrapping_add(n);
    }

    /// Returns the next value of the sequence, strictly inside `(0, 1)`.
    pub fn advance(&mut self) -> f64 {
        self.index = self.index.wrapping_add(1);
        if self.index == 0 {
            // wrapped after 2^64 draws; restart past the zero element
            self.index = 1;
        }
        radical_inverse(self.index, self.base)
    }
}

impl Default for Halton {
    fn default() -> Self {
        Self::new()
    }
}

/// Digit reversal of `index` in `base`, mapped into `[0, 1)`.
fn radical_inverse(mut index: u64, base: u64) -> f64 {
    let inv_base = 1.0 / base as f64;
    let mut factor = inv_base;
    let mut value = 0.0;
    while index > 0 {
        value += (index % base) as f64 * factor;
        index /= base;
        factor *= inv_base;
    }
    value
}

impl RngCore for Halton {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        // 53 significant bits, aligned so that `>> 11` recovers them
        let mantissa = (self.advance() * (1u64 << 53) as f64) as u64;
        mantissa << 11
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

/// A set of independent Halton sequences, one per problem dimension.
///
/// Produces quasi-random points in the unit hypercube.
#[derive(Debug, Clone)]
pub struct HaltonPoints {
    dims: Vec<Halton>,
}

impl HaltonPoints {
    /// Claims one prime base per dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            dims: (0..dimension).map(|_| Halton::new()).collect(),
        }
    }

    /// Uses the first `dimension` primes (2, 3, 5, ...) without touching the
    /// global counter, skipping `offset` points. Solvers seed their
    /// placement with this so a fixed seed reproduces the same points.
    pub fn leading(dimension: usize, offset: u64) -> Self {
        let mut prime = 1;
        let dims = (0..dimension)
            .map(|_| {
                prime = next_prime_after(prime);
                let mut h = Halton::with_base(prime);
                h.skip(offset);
                h
            })
            .collect();
        Self { dims }
    }

    /// Writes the next unit-cube point into `out`.
    pub fn next_into(&mut self, out: &mut [f64]) {
        for (o, h) in out.iter_mut().zip(self.dims.iter_mut()) {
            *o = h.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_is_prime() {
        let primes: Vec<u64> = (0..30).filter(|&n| is_prime(n)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
    }

    #[test]
    fn test_claimed_bases_are_distinct_primes() {
        let a = Halton::new();
        let b = Halton::new();
        assert_ne!(a.base(), b.base());
        assert!(is_prime(a.base()));
        assert!(is_prime(b.base()));
        assert!(b.base() > a.base(), "bases are claimed in increasing order");
    }

    #[test]
    fn test_concurrent_claims_never_collide() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| (0..50).map(|_| claim_prime()).collect::<Vec<_>>()))
            .collect();
        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        let n = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), n);
    }

    #[test]
    fn test_van_der_corput_base_3() {
        let mut h = Halton::with_base(3);
        let expected = [1.0 / 3.0, 2.0 / 3.0, 1.0 / 9.0, 4.0 / 9.0, 7.0 / 9.0];
        for e in expected {
            assert!((h.advance() - e).abs() < 1e-15);
        }
    }

    #[test]
    fn test_sequence_is_deterministic() {
        let base = claim_prime();
        let mut a = Halton::with_base(base);
        let mut b = Halton::with_base(base);
        let sa: Vec<f64> = (0..100).map(|_| a.advance()).collect();
        let sb: Vec<f64> = (0..100).map(|_| b.advance()).collect();
        assert_eq!(sa, sb);
    }

    #[test]
    fn test_values_strictly_inside_unit_interval() {
        let mut h = Halton::with_base(7);
        for _ in 0..10_000 {
            let v = h.advance();
            assert!(v > 0.0 && v < 1.0, "value {v} out of (0, 1)");
        }
    }

    #[test]
    fn test_rng_core_recovers_sequence() {
        let mut h = Halton::with_base(2);
        let v: f64 = h.random();
        assert!((v - 0.5).abs() < 1e-12);
        let r = h.random_range(0..10u32);
        assert!(r < 10);
        let mut buf = [0u8; 13];
        h.fill_bytes(&mut buf);
    }

    #[test]
    fn test_leading_points_are_reproducible() {
        let mut a = HaltonPoints::leading(2, 5);
        let mut b = HaltonPoints::leading(2, 5);
        let (mut pa, mut pb) = ([0.0; 2], [0.0; 2]);
        a.next_into(&mut pa);
        b.next_into(&mut pb);
        assert_eq!(pa, pb);
        // index 6: base 2 -> 0.375, base 3 -> 2/9
        assert!((pa[0] - 0.375).abs() < 1e-15);
        assert!((pa[1] - 2.0 / 9.0).abs() < 1e-15);
    }

    #[test]
    fn test_halton_points() {
        let mut pts = HaltonPoints::new(3);
        let mut p = [0.0; 3];
        pts.next_into(&mut p);
        assert!(p.iter().all(|&x| x > 0.0 && x < 1.0));
    }
}
