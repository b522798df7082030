//! Gaussian input variables.
//!
//! [`Gaussian`] is the immutable value type fed to the engine. Parameters
//! are validated once, on construction, so the numerical core can treat
//! `σ > 0` and finiteness as established facts.

use serde::{Deserialize, Serialize};

use crate::error::{MaxError, Result};
use crate::special;

/// Normal (Gaussian) distribution N(μ, σ²).
///
/// # Mathematical Definition
/// - PDF: φ(x) = (1/σ) φ₁((x−μ)/σ)
/// - CDF: Φ₁((x−μ)/σ)
/// - Mean: μ
/// - Variance: σ²
///
/// Serialized as `{"mu": μ, "sigma": σ}`; deserialization runs the same
/// validation as [`Gaussian::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGaussian")]
pub struct Gaussian {
    #[serde(rename = "mu")]
    mean: f64,
    #[serde(rename = "sigma")]
    std_dev: f64,
}

#[derive(Deserialize)]
struct RawGaussian {
    mu: f64,
    sigma: f64,
}

impl TryFrom<RawGaussian> for Gaussian {
    type Error = MaxError;

    fn try_from(raw: RawGaussian) -> Result<Self> {
        Gaussian::new(raw.mu, raw.sigma)
    }
}

impl Gaussian {
    /// Creates a new Gaussian N(mean, std_dev²).
    ///
    /// # Errors
    /// Returns [`MaxError::InvalidGaussian`] (with `index` 0) if either
    /// parameter is not finite or `std_dev <= 0`.
    pub fn new(mean: f64, std_dev: f64) -> Result<Self> {
        Self::checked(0, mean, std_dev)
    }

    fn checked(index: usize, mean: f64, std_dev: f64) -> Result<Self> {
        if !mean.is_finite() || !std_dev.is_finite() || std_dev <= 0.0 {
            return Err(MaxError::InvalidGaussian {
                index,
                mean,
                std_dev,
            });
        }
        Ok(Self { mean, std_dev })
    }

    /// Validates a list of raw `(mean, std_dev)` pairs.
    ///
    /// The reported error carries the position of the first offending pair.
    ///
    /// # Examples
    /// ```
    /// use gauss_max::Gaussian;
    /// let list = Gaussian::from_pairs(&[(1.0, 1.0), (0.75, 0.25)]).unwrap();
    /// assert_eq!(list.len(), 2);
    /// assert!(Gaussian::from_pairs(&[(1.0, 1.0), (0.0, -1.0)]).is_err());
    /// ```
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Vec<Self>> {
        pairs
            .iter()
            .enumerate()
            .map(|(index, &(mean, std_dev))| Self::checked(index, mean, std_dev))
            .collect()
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// CDF: Φ((x−μ)/σ), evaluated through erfc.
    pub fn cdf(&self, x: f64) -> f64 {
        special::normal_cdf(x - self.mean, self.std_dev)
    }

    /// The same distribution with its mean moved by `offset`.
    pub(crate) fn shifted(&self, offset: f64) -> Self {
        Self {
            mean: self.mean + offset,
            std_dev: self.std_dev,
        }
    }
}
