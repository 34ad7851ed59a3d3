use crate::utils::median;
use itertools::Itertools;
use once_cell::sync::Lazy;
use std::str::FromStr;

/// How per-column scores of one alignment window are reduced to one score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreStrategy {
    Sum,
    ArithmeticMean,
    GeometricMean,
    Median,
}

impl ScoreStrategy {
    pub const ALL: [ScoreStrategy; 4] = [
        ScoreStrategy::Sum,
        ScoreStrategy::ArithmeticMean,
        ScoreStrategy::GeometricMean,
        ScoreStrategy::Median,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScoreStrategy::Sum => "sum",
            ScoreStrategy::ArithmeticMean => "a.mean",
            ScoreStrategy::GeometricMean => "g.mean",
            ScoreStrategy::Median => "median",
        }
    }

    /// Reduces `scores` using only the entries flagged in `good`.
    ///
    /// Invalid entries are expected to be zero already. An empty valid set
    /// yields 0 for every strategy.
    pub fn aggregate(&self, scores: &[f64], good: &[bool]) -> f64 {
        debug_assert_eq!(scores.len(), good.len());
        let n = good.iter().filter(|&&g| g).count();
        if n == 0 {
            return 0.0;
        }
        match self {
            ScoreStrategy::Sum => scores.iter().sum(),
            ScoreStrategy::ArithmeticMean => scores.iter().sum::<f64>() / n as f64,
            ScoreStrategy::GeometricMean => geometric_mean(&keep_good(scores, good)),
            ScoreStrategy::Median => median(&keep_good(scores, good)).unwrap_or(0.0),
        }
    }
}

static STRATEGY_NAMES: Lazy<String> =
    Lazy::new(|| ScoreStrategy::ALL.iter().map(|s| s.name()).join(", "));

impl FromStr for ScoreStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScoreStrategy::ALL
            .into_iter()
            .find(|strat| strat.name() == s)
            .ok_or_else(|| {
                format!(
                    "Unknown score strategy '{}', must be one of: {}",
                    s, *STRATEGY_NAMES
                )
            })
    }
}

fn keep_good(scores: &[f64], good: &[bool]) -> Vec<f64> {
    scores
        .iter()
        .zip(good)
        .filter_map(|(&score, &g)| g.then_some(score))
        .collect()
}

// Non-positive values are skipped entirely
fn geometric_mean(scores: &[f64]) -> f64 {
    let (log_sum, count) = scores
        .iter()
        .filter(|&&s| s > 0.0)
        .fold((0.0, 0usize), |(sum, n), &s| (sum + s.ln(), n + 1));
    if count == 0 {
        0.0
    } else {
        (log_sum / count as f64).exp()
    }
}
