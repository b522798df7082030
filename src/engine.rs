//! Distribution of the maximum of independent Gaussians.
//!
//! [`max_of_gaussians`] returns the mean and standard deviation of
//! `max(X₁..Xₙ)` (the first two moments, reported as a Gaussian fit) and
//! the probability that each `Xᵢ` attains the maximum.
//!
//! # Algorithm
//!
//! - **n = 1**: the input itself.
//! - **n = 2**: Clark's exact formula.
//!   Reference: Clark (1961), "The Greatest of a Finite Set of Random
//!   Variables", *Operations Research* 9(2), pp. 145–162.
//! - **n ≥ 3**: adaptive Simpson quadrature over a
//!   finite range `[a, b]`, pre-split at the largest mean, in coordinates
//!   shifted so that the largest mean sits at 0.
//!
//! # Range selection
//!
//! The half-width multiplier `k = max(1, 2 + (ln n − ln ε)/5)` keeps the
//! total tail mass `n · Φ(−k)` below ε. The lower bound is the *largest*
//! `μᵢ − kσᵢ`: below it, the variable that owns it is almost surely not
//! yet reached, so the maximum has negligible mass there.

use serde::Serialize;

use crate::config::IntegrationConfig;
use crate::error::{MaxError, Result};
use crate::gaussian::Gaussian;
use crate::quadrature::{Integrator, Interval, Tally};
use crate::special;
use crate::stats::kahan_sum;

/// Negative variances up to this fraction of `E[X²]` are rounding noise.
const VARIANCE_TOLERANCE: f64 = 64.0 * f64::EPSILON;

/// How a [`MaxDistribution`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Method {
    /// Closed form (n ≤ 2); no approximation beyond the Gaussian fit.
    Exact,
    /// Numerical integration with `segments` accepted leaf intervals.
    Quadrature { segments: u32 },
}

/// Moments of the maximum and the per-variable odds of being the maximum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaxDistribution {
    #[serde(rename = "mu")]
    mean: f64,
    #[serde(rename = "sigma")]
    std_dev: f64,
    odds: Vec<f64>,
    #[serde(flatten)]
    method: Method,
}

impl MaxDistribution {
    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// `odds()[i]` is the probability that input `i` is the maximum.
    pub fn odds(&self) -> &[f64] {
        &self.odds
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn is_exact(&self) -> bool {
        self.method == Method::Exact
    }

    /// Quadrature leaf segments used; 0 for exact results.
    pub fn segments(&self) -> u32 {
        match self.method {
            Method::Exact => 0,
            Method::Quadrature { segments } => segments,
        }
    }

    /// Compensated sum of the odds; 1 up to rounding.
    pub fn odds_total(&self) -> f64 {
        kahan_sum(&self.odds)
    }

    /// The Gaussian with the same mean and standard deviation, so the
    /// result can feed a further maximum.
    ///
    /// # Errors
    /// [`MaxError::InvalidGaussian`] if the standard deviation collapsed to 0.
    pub fn as_gaussian(&self) -> Result<Gaussian> {
        Gaussian::new(self.mean, self.std_dev)
    }
}

/// Computes the distribution of the maximum of `gaussians` with error
/// bound `epsilon` (used only when there are three or more inputs).
///
/// # Errors
/// - [`MaxError::EmptyInput`] for an empty slice.
/// - [`MaxError::InvalidEpsilon`] unless `epsilon` is finite and positive.
/// - [`MaxError::NumericalInstability`] if the variance evaluates negative.
/// - [`MaxError::DidNotConverge`] if the quadrature exceeds its depth cap.
/// - [`MaxError::VanishingMass`] if the quadrature captured no probability.
///
/// # Examples
/// ```
/// use gauss_max::{max_of_gaussians, Gaussian};
/// let list = Gaussian::from_pairs(&[(1.0, 1.0), (0.75, 0.25)]).unwrap();
/// let max = max_of_gaussians(&list, 1e-6).unwrap();
/// assert!(max.is_exact());
/// assert!(max.odds()[0] > 0.5 && max.odds()[0] < 1.0);
/// assert_eq!(max.odds()[0] + max.odds()[1], 1.0);
/// ```
pub fn max_of_gaussians(gaussians: &[Gaussian], epsilon: f64) -> Result<MaxDistribution> {
    max_of_gaussians_with(gaussians, &IntegrationConfig::new(epsilon))
}

/// [`max_of_gaussians`] with explicit integration limits.
pub fn max_of_gaussians_with(
    gaussians: &[Gaussian],
    config: &IntegrationConfig,
) -> Result<MaxDistribution> {
    let epsilon = config.effective_epsilon()?;
    let result = match gaussians {
        [] => return Err(MaxError::EmptyInput),
        [single] => exact_single(single),
        [first, second] => exact_pair(first, second)?,
        _ => integrate(gaussians, epsilon, config.depth_limit())?,
    };
    tracing::debug!(
        n = gaussians.len(),
        epsilon,
        mean = result.mean,
        std_dev = result.std_dev,
        segments = result.segments(),
        "computed max distribution"
    );
    Ok(result)
}

/// Validates raw `(mean, std_dev)` pairs, then runs [`max_of_gaussians`].
///
/// # Examples
/// ```
/// use gauss_max::max_of_pairs;
/// let max = max_of_pairs(&[(0.123, 0.456)], 0.1).unwrap();
/// assert_eq!((max.mean(), max.std_dev()), (0.123, 0.456));
/// assert_eq!(max.odds(), &[1.0]);
/// ```
pub fn max_of_pairs(pairs: &[(f64, f64)], epsilon: f64) -> Result<MaxDistribution> {
    max_of_gaussians(&Gaussian::from_pairs(pairs)?, epsilon)
}

fn exact_single(g: &Gaussian) -> MaxDistribution {
    MaxDistribution {
        mean: g.mean(),
        std_dev: g.std_dev(),
        odds: vec![1.0],
        method: Method::Exact,
    }
}

fn exact_pair(first: &Gaussian, second: &Gaussian) -> Result<MaxDistribution> {
    // Evaluate relative to the larger mean so E[X²] does not carry μ².
    let shift = first.mean().max(second.mean());
    let (mu1, sigma1) = (first.mean() - shift, first.std_dev());
    let (mu2, sigma2) = (second.mean() - shift, second.std_dev());

    let theta = sigma1.hypot(sigma2);
    let alpha = (mu1 - mu2) / theta;

    let p = special::standard_normal_cdf(alpha);
    let q = special::standard_normal_cdf(-alpha);
    let d = special::standard_normal_pdf(alpha);

    let ex1 = mu1 * p + mu2 * q + theta * d;
    let ex2 = (sigma1 * sigma1 + mu1 * mu1) * p
        + (sigma2 * sigma2 + mu2 * mu2) * q
        + (mu1 + mu2) * theta * d;

    // P(X₁ − X₂ > 0)
    let odds_first = special::normal_cdf(mu1 - mu2, theta);

    Ok(MaxDistribution {
        mean: ex1 + shift,
        std_dev: std_dev_from_moments(ex2, ex1)?,
        odds: vec![odds_first, 1.0 - odds_first],
        method: Method::Exact,
    })
}

/// Half-width of the integration range in units of each σᵢ.
pub(crate) fn range_multiplier(n: usize, epsilon: f64) -> f64 {
    let k = 2.0 + ((n as f64).ln() - epsilon.ln()) / 5.0;
    k.max(1.0)
}

fn integrate(gaussians: &[Gaussian], epsilon: f64, max_depth: u32) -> Result<MaxDistribution> {
    let n = gaussians.len();
    let k = range_multiplier(n, epsilon);
    debug_assert!(
        n as f64 * special::standard_normal_cdf(-k) <= epsilon,
        "tail mass exceeds epsilon for n={n}, k={k}"
    );

    let pivot = gaussians
        .iter()
        .map(Gaussian::mean)
        .fold(f64::NEG_INFINITY, f64::max);

    // Centre on the largest mean so the second moment does not carry μ².
    // The range is chosen in these coordinates too: in absolute ones, kσ
    // can vanish against a large mean and collapse [a, pivot].
    let shifted: Vec<Gaussian> = gaussians.iter().map(|g| g.shifted(-pivot)).collect();
    let (mut a, mut b) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for g in &shifted {
        let k_sigma = k * g.std_dev();
        a = a.max(g.mean() - k_sigma);
        b = b.max(g.mean() + k_sigma);
    }
    tracing::trace!(n, k, a, b, pivot, "integration range");

    let cdf_at = |x: f64| -> Vec<f64> { shifted.iter().map(|g| g.cdf(x)).collect() };
    let (cdf_a, cdf_pivot, cdf_b) = (cdf_at(a), cdf_at(0.0), cdf_at(b));
    let integrator = Integrator::new(&shifted, epsilon, max_depth);

    // Pre-split at the pivot: the CDF is point-symmetric about each mean,
    // which would let a wide segment pass the error test by accident.
    let below = integrator.integrate(Interval {
        a,
        b: 0.0,
        cdf_a: &cdf_a,
        cdf_b: &cdf_pivot,
    })?;
    let above = integrator.integrate(Interval {
        a: 0.0,
        b,
        cdf_a: &cdf_pivot,
        cdf_b: &cdf_b,
    })?;

    finalize(below + above, pivot)
}

/// Turns raw moments into the reported distribution.
///
/// Both moments are divided by the captured mass before the variance is
/// formed, so σ is `√(m₂/m₀ − (m₁/m₀)²)` rather than `√(m₂ − m₁²)`. The
/// mean and the odds get the same normalisation.
fn finalize(tally: Tally, shift: f64) -> Result<MaxDistribution> {
    let mass = tally.moments.mass.value();
    if !(mass > 0.0 && mass.is_finite()) {
        tracing::warn!(mass, segments = tally.segments, "quadrature captured no mass");
        return Err(MaxError::VanishingMass { mass });
    }
    let first = tally.moments.first.value() / mass;
    let second = tally.moments.second.value() / mass;

    Ok(MaxDistribution {
        mean: first + shift,
        std_dev: std_dev_from_moments(second, first)?,
        odds: tally.odds.iter().map(|p| p / mass).collect(),
        method: Method::Quadrature {
            segments: tally.segments,
        },
    })
}

/// `√(E[X²] − E[X]²)`, treating tiny negative variances as 0.
fn std_dev_from_moments(second: f64, first: f64) -> Result<f64> {
    let variance = second - first * first;
    if variance >= 0.0 {
        return Ok(variance.sqrt());
    }
    if -variance <= VARIANCE_TOLERANCE * second.abs() {
        return Ok(0.0);
    }
    tracing::warn!(variance, second, first, "negative variance of the maximum");
    Err(MaxError::NumericalInstability { variance })
}
