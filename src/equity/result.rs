//! Equity results and the running tally behind them.

use serde::{Deserialize, Serialize};

/// How an equity figure was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquityMethod {
    /// Full enumeration of opponent holdings and board runouts.
    Exact,
    /// Random sampling.
    MonteCarlo,
}

impl std::fmt::Display for EquityMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EquityMethod::Exact => write!(f, "exact"),
            EquityMethod::MonteCarlo => write!(f, "monte_carlo"),
        }
    }
}

/// Which method the caller asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodPreference {
    /// Exact when small enough, otherwise Monte Carlo.
    #[default]
    Auto,
    /// Exact enumeration, falling back to Monte Carlo beyond the configured bound.
    Exact,
    /// Always sample.
    MonteCarlo,
}

/// Outcome of an equity calculation.
///
/// `win + tie + loss == 1`. A tie for best among `k` opponents counts as
/// `1 / (k + 1)` of a win in `equity`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityResult {
    /// Expected share of the pot in [0, 1].
    pub equity: f64,
    /// Fraction of outcomes won outright.
    pub win: f64,
    /// Fraction of outcomes tied for best.
    pub tie: f64,
    /// Fraction of outcomes lost.
    pub loss: f64,
    /// Trials sampled, or runouts enumerated.
    pub iterations: u64,
    /// Method used.
    pub method: EquityMethod,
    /// Standard error of `equity`; zero for exact enumeration.
    pub std_error: f64,
    /// Sampling stopped on the convergence threshold (always true when exact).
    pub converged: bool,
    /// Sampling stopped on the time budget.
    pub timed_out: bool,
    /// Wall-clock time spent.
    pub elapsed_ms: u64,
}

impl EquityResult {
    /// True when the figure carries no sampling error.
    pub fn is_exact(&self) -> bool {
        self.method == EquityMethod::Exact
    }
}

/// Weighted accumulator of showdown outcomes.
///
/// Partial tallies are merged in a fixed order so the floating-point sums
/// do not depend on thread scheduling.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Tally {
    pub trials: u64,
    pub weight: f64,
    pub win: f64,
    pub tie: f64,
    pub loss: f64,
    pub share: f64,
    pub share_sq: f64,
}

impl Tally {
    /// Record one showdown where hero's pot share is `share`.
    #[inline]
    pub fn record(&mut self, share: f64, weight: f64) {
        self.trials += 1;
        self.weight += weight;
        if share >= 1.0 {
            self.win += weight;
        } else if share > 0.0 {
            self.tie += weight;
        } else {
            self.loss += weight;
        }
        self.share += share * weight;
        self.share_sq += share * share * weight;
    }

    pub fn merge(&mut self, other: &Tally) {
        self.trials += other.trials;
        self.weight += other.weight;
        self.win += other.win;
        self.tie += other.tie;
        self.loss += other.loss;
        self.share += other.share;
        self.share_sq += other.share_sq;
    }

    pub fn equity(&self) -> f64 {
        if self.weight > 0.0 {
            self.share / self.weight
        } else {
            0.0
        }
    }

    /// Standard error of the mean share, for unit-weight samples.
    pub fn std_error(&self) -> f64 {
        if self.trials < 2 {
            return f64::INFINITY;
        }
        let n = self.trials as f64;
        let mean = self.equity();
        let variance = (self.share_sq / self.weight - mean * mean).max(0.0);
        (variance / n).sqrt()
    }

    pub fn into_result(self, method: EquityMethod, converged: bool, timed_out: bool, elapsed_ms: u64) -> EquityResult {
        let norm = if self.weight > 0.0 { 1.0 / self.weight } else { 0.0 };
        let std_error = match method {
            EquityMethod::Exact => 0.0,
            EquityMethod::MonteCarlo if self.trials < 2 => 0.0,
            EquityMethod::MonteCarlo => self.std_error(),
        };
        EquityResult {
            equity: self.equity().clamp(0.0, 1.0),
            win: self.win * norm,
            tie: self.tie * norm,
            loss: self.loss * norm,
            iterations: self.trials,
            method,
            std_error,
            converged,
            timed_out,
            elapsed_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_outcomes() {
        let mut tally = Tally::default();
        tally.record(1.0, 1.0);
        tally.record(0.5, 1.0);
        tally.record(0.0, 1.0);
        tally.record(1.0, 1.0);

        let result = tally.into_result(EquityMethod::MonteCarlo, false, false, 0);
        assert_eq!(result.iterations, 4);
        assert!((result.equity - 0.625).abs() < 1e-12);
        assert!((result.win - 0.5).abs() < 1e-12);
        assert!((result.tie - 0.25).abs() < 1e-12);
        assert!((result.loss - 0.25).abs() < 1e-12);
        assert!(result.std_error > 0.0);
    }

    #[test]
    fn test_weighted_tally() {
        let mut tally = Tally::default();
        tally.record(1.0, 3.0);
        tally.record(0.0, 1.0);
        let result = tally.into_result(EquityMethod::Exact, true, false, 0);
        assert!((result.equity - 0.75).abs() < 1e-12);
        assert_eq!(result.std_error, 0.0);
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let shares = [1.0, 0.0, 0.5, 1.0, 1.0 / 3.0, 0.0];
        let mut whole = Tally::default();
        let mut left = Tally::default();
        let mut right = Tally::default();
        for (i, &s) in shares.iter().enumerate() {
            whole.record(s, 1.0);
            if i < 3 {
                left.record(s, 1.0);
            } else {
                right.record(s, 1.0);
            }
        }
        left.merge(&right);
        assert_eq!(left.trials, whole.trials);
        assert!((left.equity() - whole.equity()).abs() < 1e-12);
        assert!((left.std_error() - whole.std_error()).abs() < 1e-12);
    }

    #[test]
    fn test_method_serde() {
        assert_eq!(serde_json::to_string(&EquityMethod::MonteCarlo).unwrap(), "\"monte_carlo\"");
        let pref: MethodPreference = serde_json::from_str("\"exact\"").unwrap();
        assert_eq!(pref, MethodPreference::Exact);
        assert_eq!(MethodPreference::default(), MethodPreference::Auto);
    }
}
