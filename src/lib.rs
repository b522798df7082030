//! # gauss-max
//!
//! Distribution of the maximum of independent Gaussian random variables.
//!
//! Given `n` Gaussians `(μᵢ, σᵢ)`, computes the mean and standard deviation
//! of `max(X₁..Xₙ)` and the probability ("odds") that each `Xᵢ` is the one
//! attaining the maximum.
//!
//! ## Modules
//!
//! - [`special`] — Normal density and erfc-based cumulative distribution
//! - [`gaussian`] — Validated Gaussian input type
//! - [`engine`] — Exact n ≤ 2 formulas and dispatch to quadrature for n ≥ 3
//! - [`config`] — Error bound and recursion limits
//! - [`stats`] — Compensated summation and Welford accumulators
//! - [`accuracy`] — Epsilon sweeps and the JSON-lines accuracy harness
//!
//! ## Design Philosophy
//!
//! - **Exact where possible**: n = 1 and n = 2 are closed form; epsilon is
//!   ignored there.
//! - **Bounded numerics**: for n ≥ 3 the caller's epsilon trades accuracy
//!   for segments; the quadrature is clamped to a stable epsilon range and
//!   a finite recursion depth.
//! - **Stateless**: every call works on caller-owned input only, so calls
//!   are re-entrant and deterministic.
//!
//! ## Example
//!
//! ```
//! use gauss_max::{max_of_pairs, Method};
//! let max = max_of_pairs(
//!     &[(0.6412, 0.0316), (0.6281, 0.0135), (0.6073, 0.0323)],
//!     1e-6,
//! )
//! .unwrap();
//! assert!(matches!(max.method(), Method::Quadrature { .. }));
//! assert!((max.odds().iter().sum::<f64>() - 1.0).abs() < 1e-9);
//! ```

pub mod accuracy;
pub mod config;
pub mod engine;
pub mod error;
pub mod gaussian;
pub mod logging;
mod quadrature;
pub mod special;
pub mod stats;

pub use config::IntegrationConfig;
pub use engine::{max_of_gaussians, max_of_gaussians_with, max_of_pairs, MaxDistribution, Method};
pub use error::{MaxError, Result};
pub use gaussian::Gaussian;
