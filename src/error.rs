//! Error taxonomy for max-distribution computations.

use thiserror::Error;

/// Errors reported by the max-distribution engine and its harness.
#[derive(Debug, Error)]
pub enum MaxError {
    /// The input list was empty.
    #[error("at least one Gaussian is required")]
    EmptyInput,

    /// A (mean, sigma) pair violates the Gaussian constraints.
    #[error("invalid Gaussian at index {index}: requires finite mean and sigma > 0, got mean={mean}, sigma={std_dev}")]
    InvalidGaussian {
        index: usize,
        mean: f64,
        std_dev: f64,
    },

    /// The requested error bound is not a positive finite number.
    #[error("epsilon must be finite and > 0, got {0}")]
    InvalidEpsilon(f64),

    /// `E[X²] − E[X]²` came out negative beyond rounding tolerance.
    #[error("numerical instability: variance of the maximum evaluated to {variance:e}")]
    NumericalInstability { variance: f64 },

    /// Adaptive bisection exceeded the configured recursion depth.
    #[error("integration did not converge within {max_depth} bisection levels")]
    DidNotConverge { max_depth: u32 },

    /// The quadrature integrated to no usable probability mass.
    #[error("integration captured no probability mass (total {mass:e})")]
    VanishingMass { mass: f64 },

    /// A JSON-lines accuracy case could not be parsed.
    #[error("malformed accuracy case on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// Reading accuracy cases failed.
    #[error("failed to read accuracy cases: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MaxError>;
