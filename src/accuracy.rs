//! Accuracy measurement for the numerical path.
//!
//! Two tools:
//!
//! - [`sweep`]: evaluates one input list over a range of epsilons
//!   (`10⁰ … 10⁻¹⁰` by default) and reports each result's deviation from a
//!   reference computed at [`REFERENCE_EPSILON`].
//! - [`AccuracyReport`]: compares results against externally computed
//!   expectations read as JSON lines, grouped by input size, and decides
//!   whether the achieved accuracy meets a requested epsilon.
//!
//! # Case format
//!
//! One JSON object per line:
//!
//! ```text
//! {"input": [{"mu": 0.1, "sigma": 0.2}, ...],
//!  "expect": {"mu": 0.3, "sigma": 0.4, "odds": [0.5, ...]}}
//! ```

use std::collections::BTreeMap;
use std::io::BufRead;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::engine::{max_of_gaussians, MaxDistribution};
use crate::error::{MaxError, Result};
use crate::gaussian::Gaussian;
use crate::stats::WelfordAccumulator;

/// Epsilon of the near-exact reference used by [`sweep`].
pub const REFERENCE_EPSILON: f64 = 1e-12;

/// Default sweep: epsilon = 10^0 down to 10^-10.
pub const DEFAULT_EXPONENTS: RangeInclusive<i32> = 0..=10;

// ============================================================================
// Epsilon sweep
// ============================================================================

/// One evaluation of a [`sweep`].
#[derive(Debug, Clone, Serialize)]
pub struct SweepRow {
    pub epsilon: f64,
    pub result: MaxDistribution,
    pub mean_error: f64,
    pub std_dev_error: f64,
    pub odds_errors: Vec<f64>,
}

impl SweepRow {
    /// Largest absolute deviation from the reference over mean, standard
    /// deviation and all odds.
    pub fn max_error(&self) -> f64 {
        self.odds_errors
            .iter()
            .copied()
            .fold(self.mean_error.max(self.std_dev_error), f64::max)
    }
}

/// Evaluates `gaussians` at `epsilon = 10^-e` for every `e` in `exponents`,
/// against a reference at [`REFERENCE_EPSILON`].
///
/// Stops after the first exact result, since the epsilon is then irrelevant.
///
/// # Examples
/// ```
/// use gauss_max::{accuracy, Gaussian};
/// let pair = Gaussian::from_pairs(&[(1.0, 1.0), (0.75, 0.25)]).unwrap();
/// let rows = accuracy::sweep(&pair, accuracy::DEFAULT_EXPONENTS).unwrap();
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].max_error(), 0.0);
/// ```
pub fn sweep(gaussians: &[Gaussian], exponents: RangeInclusive<i32>) -> Result<Vec<SweepRow>> {
    let reference = max_of_gaussians(gaussians, REFERENCE_EPSILON)?;
    let mut rows = Vec::new();
    for e in exponents {
        let epsilon = 10.0_f64.powi(-e);
        let result = max_of_gaussians(gaussians, epsilon)?;
        let exact = result.is_exact();
        rows.push(SweepRow {
            epsilon,
            mean_error: (result.mean() - reference.mean()).abs(),
            std_dev_error: (result.std_dev() - reference.std_dev()).abs(),
            odds_errors: absolute_errors(result.odds(), reference.odds()),
            result,
        });
        if exact {
            break;
        }
    }
    Ok(rows)
}

fn absolute_errors(actual: &[f64], expected: &[f64]) -> Vec<f64> {
    actual
        .iter()
        .zip(expected)
        .map(|(a, e)| (a - e).abs())
        .collect()
}

// ============================================================================
// JSON-lines accuracy harness
// ============================================================================

/// Expected outputs for one case.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Expectation {
    pub mu: f64,
    pub sigma: f64,
    pub odds: Vec<f64>,
}

/// One input list with its expected result.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccuracyCase {
    pub input: Vec<Gaussian>,
    pub expect: Expectation,
}

/// Parses JSON-lines cases, skipping blank lines.
///
/// # Errors
/// [`MaxError::Parse`] with the 1-based line number for malformed JSON,
/// invalid Gaussians, or an `odds` list whose length differs from `input`;
/// [`MaxError::Io`] if reading fails.
pub fn read_cases<R: BufRead>(reader: R) -> Result<Vec<AccuracyCase>> {
    let mut cases = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let parse_err = |source: serde_json::Error| MaxError::Parse {
            line: idx + 1,
            source,
        };
        let case: AccuracyCase = serde_json::from_str(&line).map_err(parse_err)?;
        if case.expect.odds.len() != case.input.len() {
            return Err(parse_err(serde::de::Error::custom(format!(
                "expected {} odds, got {}",
                case.input.len(),
                case.expect.odds.len()
            ))));
        }
        cases.push(case);
    }
    Ok(cases)
}

/// Average, mean + 3σ, and maximum of a set of absolute errors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorSummary {
    pub average: f64,
    pub mean_plus_3_sigma: f64,
    pub max: f64,
    pub count: u64,
}

impl ErrorSummary {
    fn from_accumulator(acc: &WelfordAccumulator) -> Option<Self> {
        let average = acc.mean()?;
        Some(Self {
            average,
            mean_plus_3_sigma: average + 3.0 * acc.population_std_dev()?,
            max: acc.max()?,
            count: acc.count(),
        })
    }
}

/// Error summaries for all cases of one input size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GroupSummary {
    pub n: usize,
    pub mu: ErrorSummary,
    pub sigma: ErrorSummary,
    pub odds: ErrorSummary,
}

#[derive(Debug, Clone, Default)]
struct GroupErrors {
    mu: WelfordAccumulator,
    sigma: WelfordAccumulator,
    odds: WelfordAccumulator,
}

/// Accumulated errors of [`max_of_gaussians`] at a fixed epsilon.
#[derive(Debug, Clone)]
pub struct AccuracyReport {
    epsilon: f64,
    groups: BTreeMap<usize, GroupErrors>,
}

impl AccuracyReport {
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon,
            groups: BTreeMap::new(),
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Evaluates one case and records its errors.
    pub fn record(&mut self, case: &AccuracyCase) -> Result<()> {
        let result = max_of_gaussians(&case.input, self.epsilon)?;
        let group = self.groups.entry(case.input.len()).or_default();
        group.mu.update((result.mean() - case.expect.mu).abs());
        group.sigma.update((result.std_dev() - case.expect.sigma).abs());
        for err in absolute_errors(result.odds(), &case.expect.odds) {
            group.odds.update(err);
        }
        Ok(())
    }

    /// Per-size summaries in increasing `n`.
    pub fn groups(&self) -> Vec<GroupSummary> {
        self.groups
            .iter()
            .filter_map(|(&n, g)| {
                Some(GroupSummary {
                    n,
                    mu: ErrorSummary::from_accumulator(&g.mu)?,
                    sigma: ErrorSummary::from_accumulator(&g.sigma)?,
                    odds: ErrorSummary::from_accumulator(&g.odds)?,
                })
            })
            .collect()
    }

    /// `min(worst mean+3σ, worst max)` over every group and column, or
    /// `None` if nothing was recorded.
    pub fn achieved(&self) -> Option<f64> {
        let groups = self.groups();
        if groups.is_empty() {
            return None;
        }
        let summaries = groups.iter().flat_map(|g| [g.mu, g.sigma, g.odds]);
        let (m3s, max) = summaries.fold((0.0_f64, 0.0_f64), |(m3s, max), s| {
            (m3s.max(s.mean_plus_3_sigma), max.max(s.max))
        });
        Some(m3s.min(max))
    }

    /// Whether the achieved accuracy is within the requested epsilon.
    pub fn passed(&self) -> bool {
        self.achieved().is_some_and(|a| a <= self.epsilon)
    }
}
