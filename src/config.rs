//! Integration settings.
//!
//! [`IntegrationConfig`] carries the caller's error bound together with the
//! safety limits that keep the adaptive quadrature well-conditioned: an
//! epsilon floor, the 0.25 ceiling, and a recursion depth cap.

use serde::Deserialize;

use crate::error::{MaxError, Result};

/// Largest epsilon handed to the quadrature. Looser tolerances can push
/// `E[X²] − E[X]²` negative.
pub const MAX_EPSILON: f64 = 0.25;

/// Default epsilon floor. Requests below it are raised to it.
pub const DEFAULT_MIN_EPSILON: f64 = 1e-13;

/// Default bisection depth cap.
pub const DEFAULT_MAX_DEPTH: u32 = 64;

/// Hard ceiling on the depth cap. Bisecting an f64 interval stops making
/// progress after about 1100 halvings, and each level
/// costs `n` scratch slots plus a stack frame.
pub const MAX_DEPTH_LIMIT: u32 = 1100;

/// Settings for one max-distribution computation.
///
/// # Examples
/// ```
/// use gauss_max::IntegrationConfig;
/// let config = IntegrationConfig::new(1e-8).with_max_depth(40);
/// assert_eq!(config.effective_epsilon().unwrap(), 1e-8);
/// assert_eq!(IntegrationConfig::new(3.0).effective_epsilon().unwrap(), 0.25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntegrationConfig {
    /// Requested error bound. Only used for n ≥ 3.
    pub epsilon: f64,
    /// Floor below which `epsilon` is clamped.
    pub min_epsilon: f64,
    /// Maximum bisection depth before [`MaxError::DidNotConverge`].
    /// Values above [`MAX_DEPTH_LIMIT`] are treated as the limit.
    pub max_depth: u32,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-6,
            min_epsilon: DEFAULT_MIN_EPSILON,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl IntegrationConfig {
    /// Default limits with the given error bound.
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            ..Self::default()
        }
    }

    pub fn with_min_epsilon(mut self, min_epsilon: f64) -> Self {
        self.min_epsilon = min_epsilon;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth.min(MAX_DEPTH_LIMIT);
        self
    }

    /// The depth cap actually enforced.
    pub fn depth_limit(&self) -> u32 {
        self.max_depth.min(MAX_DEPTH_LIMIT)
    }

    /// The epsilon actually used by the quadrature: the request clamped to
    /// `[min_epsilon, MAX_EPSILON]`.
    ///
    /// # Errors
    /// [`MaxError::InvalidEpsilon`] if the request is not finite and positive.
    pub fn effective_epsilon(&self) -> Result<f64> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(MaxError::InvalidEpsilon(self.epsilon));
        }
        let floor = self.min_epsilon.clamp(f64::MIN_POSITIVE, MAX_EPSILON);
        let clamped = self.epsilon.clamp(floor, MAX_EPSILON);
        if clamped < self.epsilon {
            tracing::debug!(requested = self.epsilon, clamped, "epsilon lowered to ceiling");
        } else if clamped > self.epsilon {
            tracing::warn!(
                requested = self.epsilon,
                clamped,
                "epsilon below the stable floor, raised"
            );
        }
        Ok(clamped)
    }
}
