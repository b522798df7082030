//! Normal density and cumulative distribution primitives.
//!
//! Scalar, stateless evaluations of the standard normal density φ and of
//! the zero-mean normal CDF. These are the only transcendental functions
//! the max-distribution engine calls, so they are evaluated to full
//! double precision.
//!
//! # Tail accuracy
//!
//! The CDF is computed through the complementary error function
//! (`libm::erfc`, the musl/fdlibm routine) rather than as `1 − erf(x)`. The
//! quadrature evaluates CDFs at ±kσ with k up to about 8, where
//! `1 − erf` would lose every significant digit to cancellation.
//!
//! # Continuity
//!
//! The adaptive quadrature reads `|½(Φ(a) + Φ(b)) − Φ(m)|` as local
//! error, so a step of δ anywhere in Φ stops bisection from converging
//! for any ε below δ. erfc must stay within a few ulps across the
//! boundaries between its rational approximations.

use libm::erfc;

/// −ln(√(2π)) ≈ −0.9189385332046727
const NEG_LN_SQRT_2PI: f64 = -0.918_938_533_204_672_7;

/// Standard normal PDF φ(x) = exp(−ln√(2π) − x²/2).
///
/// The normalisation constant is folded into the exponent, so one `exp`
/// is the only transcendental call.
///
/// # Examples
/// ```
/// use gauss_max::special::standard_normal_pdf;
/// let peak = standard_normal_pdf(0.0);
/// assert!((peak - 0.3989422804014327).abs() < 1e-15);
/// ```
#[inline]
pub fn standard_normal_pdf(x: f64) -> f64 {
    (NEG_LN_SQRT_2PI - 0.5 * x * x).exp()
}

/// CDF of N(0, σ²) at `x`: `0.5 · erfc(−x / (σ√2))`.
///
/// `sigma` must be positive; this is not checked here.
///
/// # Examples
/// ```
/// use gauss_max::special::normal_cdf;
/// assert_eq!(normal_cdf(0.0, 3.0), 0.5);
/// assert!((normal_cdf(2.0, 2.0) - 0.8413447460685429).abs() < 1e-14);
/// ```
#[inline]
pub fn normal_cdf(x: f64, sigma: f64) -> f64 {
    debug_assert!(sigma > 0.0, "normal_cdf requires sigma > 0, got {sigma}");
    0.5 * erfc(-x / (sigma * std::f64::consts::SQRT_2))
}

/// Standard normal CDF Φ(x) = `0.5 · erfc(−x / √2)`.
///
/// # Examples
/// ```
/// use gauss_max::special::standard_normal_cdf;
/// assert_eq!(standard_normal_cdf(0.0), 0.5);
/// assert!((standard_normal_cdf(1.96) - 0.9750021048517795).abs() < 1e-14);
/// ```
#[inline]
pub fn standard_normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}
