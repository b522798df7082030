//! Numerically stable accumulation.
//!
//! # Algorithms
//!
//! - **Sums**: Neumaier compensated summation, both as a slice function
//!   ([`kahan_sum`]) and as a streaming accumulator ([`NeumaierSum`]) used
//!   to tally quadrature moments over thousands of segments.
//! - **Error statistics**: Welford's online mean/variance with max
//!   tracking ([`WelfordAccumulator`]).
//!   Reference: Welford (1962), "Note on a Method for Calculating
//!   Corrected Sums of Squares and Products", *Technometrics* 4(3).

use std::ops::AddAssign;

// ---------------------------------------------------------------------------
// Compensated summation
// ---------------------------------------------------------------------------

/// Neumaier compensated summation for O(ε) error independent of `n`.
///
/// This is an improved variant of Kahan summation that also handles the
/// case where the addend is larger in magnitude than the running sum.
///
/// Reference: Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren
/// zur Summation endlicher Summen", *Zeitschrift für Angewandte
/// Mathematik und Mechanik* 54(1), pp. 39–51.
///
/// # Examples
/// ```
/// use gauss_max::stats::kahan_sum;
/// assert_eq!(kahan_sum(&[1.0, 1e100, 1.0, -1e100]), 2.0);
/// ```
pub fn kahan_sum(data: &[f64]) -> f64 {
    let mut acc = NeumaierSum::new();
    for &x in data {
        acc.add(x);
    }
    acc.value()
}

/// Streaming Neumaier sum.
///
/// Maintains a running compensation term `c`; at each step the branch
/// captures the low-order bits of whichever operand is smaller.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NeumaierSum {
    sum: f64,
    c: f64,
}

impl NeumaierSum {
    pub fn new() -> Self {
        Self { sum: 0.0, c: 0.0 }
    }

    pub fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.c += (self.sum - t) + x;
        } else {
            self.c += (x - t) + self.sum;
        }
        self.sum = t;
    }

    /// Compensated total.
    pub fn value(&self) -> f64 {
        self.sum + self.c
    }
}

impl AddAssign<f64> for NeumaierSum {
    fn add_assign(&mut self, x: f64) {
        self.add(x);
    }
}

impl AddAssign for NeumaierSum {
    fn add_assign(&mut self, other: Self) {
        self.add(other.sum);
        self.add(other.c);
    }
}

// ---------------------------------------------------------------------------
// Welford online accumulator
// ---------------------------------------------------------------------------

/// Streaming accumulator for mean, variance and max.
///
/// # Examples
/// ```
/// use gauss_max::stats::WelfordAccumulator;
/// let mut acc = WelfordAccumulator::new();
/// for &x in &[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0] {
///     acc.update(x);
/// }
/// assert!((acc.mean().unwrap() - 5.0).abs() < 1e-15);
/// assert!((acc.population_std_dev().unwrap() - 2.0).abs() < 1e-15);
/// assert_eq!(acc.max(), Some(9.0));
/// ```
#[derive(Debug, Clone)]
pub struct WelfordAccumulator {
    count: u64,
    mean_acc: f64,
    m2: f64,
    max: f64,
}

impl WelfordAccumulator {
    /// Creates a new empty accumulator.
    pub fn new() -> Self {
        Self {
            count: 0,
            mean_acc: 0.0,
            m2: 0.0,
            max: f64::NEG_INFINITY,
        }
    }

    /// Feeds a new sample into the accumulator.
    pub fn update(&mut self, value: f64) {
        let n1 = self.count;
        self.count += 1;
        self.max = self.max.max(value);

        if n1 == 0 {
            self.mean_acc = value;
            return;
        }

        let delta = value - self.mean_acc;
        self.mean_acc += delta / self.count as f64;
        self.m2 += delta * (value - self.mean_acc);
    }

    /// Returns the number of samples seen so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns the running mean, or `None` if no samples have been added.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean_acc)
    }

    /// Returns the population variance (n denominator), or `None` if no
    /// samples have been added.
    pub fn population_variance(&self) -> Option<f64> {
        (self.count > 0).then(|| self.m2 / self.count as f64)
    }

    /// Returns the population standard deviation, or `None` if no samples
    /// have been added.
    pub fn population_std_dev(&self) -> Option<f64> {
        self.population_variance().map(f64::sqrt)
    }

    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }
}

impl Default for WelfordAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- kahan_sum ---

    #[test]
    fn test_kahan_sum_basic() {
        assert_eq!(kahan_sum(&[1.0, 2.0, 3.0]), 6.0);
        assert_eq!(kahan_sum(&[]), 0.0);
    }

    #[test]
    fn test_kahan_sum_recovers_lost_bits() {
        let data = vec![0.1; 10_000];
        let naive: f64 = data.iter().sum();
        let compensated = kahan_sum(&data);
        assert!((compensated - 1000.0).abs() <= (naive - 1000.0).abs());
        assert!((compensated - 1000.0).abs() < 1e-10);
    }

    // --- NeumaierSum ---

    #[test]
    fn test_streaming_matches_slice() {
        let data = [1e-3, 2.5, -7.25, 1e8, -1e8, 3.0];
        let mut acc = NeumaierSum::new();
        for &x in &data {
            acc += x;
        }
        assert_eq!(acc.value(), kahan_sum(&data));
    }

    #[test]
    fn test_merge_two_sums() {
        let mut a = NeumaierSum::new();
        let mut b = NeumaierSum::new();
        for i in 0..1000 {
            a += 0.1;
            b += i as f64 * 1e-3;
        }
        let expected = 100.0 + 499.5;
        a += b;
        assert!((a.value() - expected).abs() < 1e-10);
    }

    // --- WelfordAccumulator ---

    #[test]
    fn test_welford_empty() {
        let acc = WelfordAccumulator::new();
        assert_eq!(acc.count(), 0);
        assert_eq!(acc.mean(), None);
        assert_eq!(acc.population_variance(), None);
        assert_eq!(acc.max(), None);
    }

    #[test]
    fn test_welford_single() {
        let mut acc = WelfordAccumulator::new();
        acc.update(3.5);
        assert_eq!(acc.mean(), Some(3.5));
        assert_eq!(acc.population_variance(), Some(0.0));
        assert_eq!(acc.max(), Some(3.5));
    }

    #[test]
    fn test_welford_large_offset() {
        let mut acc = WelfordAccumulator::new();
        for &x in &[1e9 + 1.0, 1e9 + 2.0, 1e9 + 3.0] {
            acc.update(x);
        }
        let var = acc.population_variance().unwrap();
        assert!((var - 2.0 / 3.0).abs() < 1e-6, "got {var}");
    }
}
