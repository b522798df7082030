//! Adaptive recursive Simpson quadrature of the max density.
//!
//! The density of `max(X₁..Xₙ)` for independent Xᵢ is
//!
//! ```text
//! p(x) = Σᵢ φᵢ(x) · Πⱼ≠ᵢ Φⱼ(x)
//! ```
//!
//! Each accepted segment `[a, b]` is integrated from CDF samples only:
//! Simpson's rule over `Φⱼ(a), Φⱼ(m), Φⱼ(b)` stands in for the average of
//! `Φⱼ` on the segment, and `Φᵢ(b) − Φᵢ(a)` is the exact integral of `φᵢ`.
//! No density is ever evaluated.
//!
//! # Refinement
//!
//! A segment is accepted when `Σᵢ |½(Φᵢ(a) + Φᵢ(b)) − Φᵢ(m)| ≤ ε`, the
//! linear-sum proxy for `1 − Πᵢ(1 − eᵢ)`. Otherwise it is bisected and both
//! halves are tested against the same ε. Recursion depth is capped; the
//! per-level midpoint CDFs live in one scratch buffer sized
//! `n · (max_depth + 1)`, so no allocation happens while recursing.

use std::ops::Add;

use crate::error::{MaxError, Result};
use crate::gaussian::Gaussian;
use crate::special;
use crate::stats::NeumaierSum;

/// Integration interval with the CDF of every variable at both ends.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Interval<'a> {
    pub a: f64,
    pub b: f64,
    pub cdf_a: &'a [f64],
    pub cdf_b: &'a [f64],
}

/// Mass-weighted raw moments of the max, accumulated over segments.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Moments {
    pub mass: NeumaierSum,
    pub first: NeumaierSum,
    pub second: NeumaierSum,
}

/// Everything one integration pass produces.
#[derive(Debug, Clone)]
pub(crate) struct Tally {
    pub moments: Moments,
    /// Unnormalised probability mass where variable `i` is the maximum.
    pub odds: Vec<f64>,
    /// Accepted leaf segments.
    pub segments: u32,
}

impl Tally {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            moments: Moments::default(),
            odds: vec![0.0; n],
            segments: 0,
        }
    }

    /// Adds the contribution of an accepted segment with midpoint `m`.
    fn accept(&mut self, m: f64, cdf_a: &[f64], cdf_m: &[f64], cdf_b: &[f64]) {
        let simpson = |i: usize| (cdf_a[i] + 4.0 * cdf_m[i] + cdf_b[i]) / 6.0;
        let n = self.odds.len();

        // Every CDF on the integration range is at least Φ(−k) > 0.
        let product: f64 = (0..n).map(simpson).product();

        let mut mass = 0.0;
        for (i, odds) in self.odds.iter_mut().enumerate() {
            let p = (cdf_b[i] - cdf_a[i]) * product / simpson(i);
            *odds += p;
            mass += p;
        }

        self.moments.mass += mass;
        self.moments.first += mass * m;
        self.moments.second += mass * m * m;
        self.segments += 1;
    }
}

impl Add for Tally {
    type Output = Tally;

    fn add(mut self, other: Tally) -> Tally {
        debug_assert_eq!(self.odds.len(), other.odds.len());
        self.moments.mass += other.moments.mass;
        self.moments.first += other.moments.first;
        self.moments.second += other.moments.second;
        for (mine, theirs) in self.odds.iter_mut().zip(&other.odds) {
            *mine += theirs;
        }
        self.segments += other.segments;
        self
    }
}

/// Integrates the max density of a fixed set of Gaussians.
pub(crate) struct Integrator<'g> {
    gaussians: &'g [Gaussian],
    epsilon: f64,
    max_depth: u32,
}

impl<'g> Integrator<'g> {
    pub fn new(gaussians: &'g [Gaussian], epsilon: f64, max_depth: u32) -> Self {
        debug_assert!(epsilon > 0.0);
        Self {
            gaussians,
            epsilon,
            max_depth,
        }
    }

    /// Integrates over one interval, returning a fresh tally.
    ///
    /// # Errors
    /// [`MaxError::DidNotConverge`] if a segment still fails the error test
    /// at `max_depth`.
    pub fn integrate(&self, interval: Interval<'_>) -> Result<Tally> {
        let n = self.gaussians.len();
        debug_assert!(interval.a < interval.b);
        debug_assert_eq!(interval.cdf_a.len(), n);
        debug_assert_eq!(interval.cdf_b.len(), n);

        let mut tally = Tally::new(n);
        let mut scratch = vec![0.0; n * (self.max_depth as usize + 1)];
        self.bisect(interval, 0, &mut scratch, &mut tally)?;
        Ok(tally)
    }

    fn bisect(
        &self,
        interval: Interval<'_>,
        depth: u32,
        scratch: &mut [f64],
        tally: &mut Tally,
    ) -> Result<()> {
        let Interval {
            a,
            b,
            cdf_a,
            cdf_b,
        } = interval;
        let (cdf_m, deeper) = scratch.split_at_mut(self.gaussians.len());

        let m = 0.5 * (a + b);
        let mut error_sum = 0.0;
        for (i, g) in self.gaussians.iter().enumerate() {
            cdf_m[i] = special::normal_cdf(m - g.mean(), g.std_dev());
            error_sum += (0.5 * (cdf_a[i] + cdf_b[i]) - cdf_m[i]).abs();
        }

        if error_sum <= self.epsilon {
            tally.accept(m, cdf_a, cdf_m, cdf_b);
            return Ok(());
        }
        if depth >= self.max_depth {
            tracing::debug!(a, b, error_sum, depth, "bisection depth exhausted");
            return Err(MaxError::DidNotConverge {
                max_depth: self.max_depth,
            });
        }

        let cdf_m: &[f64] = cdf_m;
        self.bisect(
            Interval {
                a,
                b: m,
                cdf_a,
                cdf_b: cdf_m,
            },
            depth + 1,
            deeper,
            tally,
        )?;
        self.bisect(
            Interval {
                a: m,
                b,
                cdf_a: cdf_m,
                cdf_b,
            },
            depth + 1,
            deeper,
            tally,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cdfs(gaussians: &[Gaussian], x: f64) -> Vec<f64> {
        gaussians.iter().map(|g| g.cdf(x)).collect()
    }

    fn standard_pair() -> Vec<Gaussian> {
        Gaussian::from_pairs(&[(0.0, 1.0), (0.0, 1.0)]).unwrap()
    }

    #[test]
    fn test_loose_epsilon_accepts_single_segment() {
        let g = standard_pair();
        let (lo, hi) = (cdfs(&g, -1.0), cdfs(&g, 1.0));
        let tally = Integrator::new(&g, 1.0, 10)
            .integrate(Interval {
                a: -1.0,
                b: 1.0,
                cdf_a: &lo,
                cdf_b: &hi,
            })
            .unwrap();
        assert_eq!(tally.segments, 1);
        // Symmetric variables share the mass exactly.
        assert_eq!(tally.odds[0], tally.odds[1]);
        assert!((tally.moments.mass.value() - (tally.odds[0] + tally.odds[1])).abs() < 1e-16);
    }

    #[test]
    fn test_tight_epsilon_bisects() {
        let g = standard_pair();
        // An interval symmetric about the common mean would pass the
        // error test immediately.
        let (lo, hi) = (cdfs(&g, -8.0), cdfs(&g, 9.0));
        let tally = Integrator::new(&g, 1e-8, 64)
            .integrate(Interval {
                a: -8.0,
                b: 9.0,
                cdf_a: &lo,
                cdf_b: &hi,
            })
            .unwrap();
        assert!(tally.segments > 100, "segments = {}", tally.segments);
        let mass = tally.moments.mass.value();
        assert!((mass - 1.0).abs() < 1e-5, "mass = {mass}");
        // E[max] = 1/√π
        let mean = tally.moments.first.value() / mass;
        assert!((mean - 0.5641895835477563).abs() < 1e-5, "mean = {mean}");
    }

    #[test]
    fn test_depth_cap_reports_non_convergence() {
        let g = standard_pair();
        let (lo, hi) = (cdfs(&g, -8.0), cdfs(&g, 9.0));
        let result = Integrator::new(&g, 1e-12, 3).integrate(Interval {
            a: -8.0,
            b: 9.0,
            cdf_a: &lo,
            cdf_b: &hi,
        });
        assert!(matches!(
            result,
            Err(MaxError::DidNotConverge { max_depth: 3 })
        ));
    }

    #[test]
    fn test_tallies_add() {
        let g = standard_pair();
        let (lo, mid, hi) = (cdfs(&g, -8.0), cdfs(&g, 0.0), cdfs(&g, 8.0));
        let integrator = Integrator::new(&g, 1e-6, 64);
        let left = integrator
            .integrate(Interval {
                a: -8.0,
                b: 0.0,
                cdf_a: &lo,
                cdf_b: &mid,
            })
            .unwrap();
        let right = integrator
            .integrate(Interval {
                a: 0.0,
                b: 8.0,
                cdf_a: &mid,
                cdf_b: &hi,
            })
            .unwrap();
        let (left_segments, right_segments) = (left.segments, right.segments);
        let left_mass = left.moments.mass.value();
        let total = left + right;
        assert_eq!(total.segments, left_segments + right_segments);
        // P(max ≤ 0) = 1/4
        assert!((left_mass - 0.25).abs() < 1e-5, "left mass = {left_mass}");
        assert!((total.moments.mass.value() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_odds_are_non_negative() {
        let g = Gaussian::from_pairs(&[(0.0, 1.0), (3.0, 0.1), (-2.0, 4.0)]).unwrap();
        let (lo, hi) = (cdfs(&g, -1.0), cdfs(&g, 12.0));
        let tally = Integrator::new(&g, 1e-7, 64)
            .integrate(Interval {
                a: -1.0,
                b: 12.0,
                cdf_a: &lo,
                cdf_b: &hi,
            })
            .unwrap();
        assert!(tally.odds.iter().all(|&p| p >= 0.0));
    }
}
