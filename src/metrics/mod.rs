//! Column-wise distance and similarity metrics between aligned motifs.
//!
//! Every metric scores each column pair where both motifs carry real data
//! (non-padding) and reduces the column scores with a [`ScoreStrategy`].

mod distance;
mod similarity;

use crate::aggregate::ScoreStrategy;
use crate::motif::{is_pad, Column};
use crate::utils::Result;
use itertools::Itertools;
use once_cell::sync::Lazy;
use std::str::FromStr;

pub use similarity::ALLR_LOWER_LIMIT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Euclidean distance
    Eucl,
    /// Kullback-Leibler divergence
    Kl,
    /// Hellinger distance
    Hell,
    /// Itakura-Saito distance
    Is,
    /// Squared Euclidean distance
    Seucl,
    /// Manhattan distance
    Man,
    /// Pearson correlation coefficient
    Pcc,
    /// Sandelin-Wasserman similarity
    Sw,
    /// Average log-likelihood ratio
    Allr,
    /// Bhattacharyya coefficient
    Bhat,
    /// Average log-likelihood ratio with a lower limit
    AllrLl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Minimize,
    Maximize,
}

/// Per-pair data some metrics need beyond the two column vectors.
#[derive(Debug, Clone, Copy)]
pub struct PairContext<'a> {
    pub bkg1: &'a [f64],
    pub bkg2: &'a [f64],
    pub nsites1: f64,
    pub nsites2: f64,
}

impl Metric {
    pub const ALL: [Metric; 11] = [
        Metric::Eucl,
        Metric::Kl,
        Metric::Hell,
        Metric::Is,
        Metric::Seucl,
        Metric::Man,
        Metric::Pcc,
        Metric::Sw,
        Metric::Allr,
        Metric::Bhat,
        Metric::AllrLl,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Eucl => "EUCL",
            Metric::Kl => "KL",
            Metric::Hell => "HELL",
            Metric::Is => "IS",
            Metric::Seucl => "SEUCL",
            Metric::Man => "MAN",
            Metric::Pcc => "PCC",
            Metric::Sw => "SW",
            Metric::Allr => "ALLR",
            Metric::Bhat => "BHAT",
            Metric::AllrLl => "ALLR_LL",
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            Metric::Eucl
            | Metric::Kl
            | Metric::Hell
            | Metric::Is
            | Metric::Seucl
            | Metric::Man => Direction::Minimize,
            Metric::Pcc | Metric::Sw | Metric::Allr | Metric::Bhat | Metric::AllrLl => {
                Direction::Maximize
            }
        }
    }

    pub fn is_distance(&self) -> bool {
        self.direction() == Direction::Minimize
    }

    /// Metrics taking logarithms of cell ratios, which need zero-free input.
    pub fn needs_positive_cells(&self) -> bool {
        matches!(
            self,
            Metric::Kl | Metric::Is | Metric::Allr | Metric::AllrLl
        )
    }

    pub fn uses_nsites(&self) -> bool {
        matches!(self, Metric::Allr | Metric::AllrLl)
    }

    /// Score that can never win a comparison.
    pub fn worst(&self) -> f64 {
        match self.direction() {
            Direction::Minimize => f64::INFINITY,
            Direction::Maximize => f64::NEG_INFINITY,
        }
    }

    /// Strict improvement test; ties keep the earlier candidate.
    pub fn is_better(&self, candidate: f64, best: f64) -> bool {
        match self.direction() {
            Direction::Minimize => candidate < best,
            Direction::Maximize => candidate > best,
        }
    }

    /// Rescales a window score from its effective overlap to the common baseline.
    pub fn rescale(&self, score: f64, alignlen: usize, tlen: usize) -> f64 {
        match self.direction() {
            Direction::Minimize => score * tlen as f64 / alignlen as f64,
            Direction::Maximize => score * alignlen as f64 / tlen as f64,
        }
    }

    pub fn column_score(&self, a: &[f64], b: &[f64], ctx: &PairContext) -> f64 {
        match self {
            Metric::Eucl => distance::eucl(a, b),
            Metric::Kl => distance::kl(a, b),
            Metric::Hell => distance::hell(a, b),
            Metric::Is => distance::is(a, b),
            Metric::Seucl => distance::seucl(a, b),
            Metric::Man => distance::man(a, b),
            Metric::Pcc => similarity::pcc(a, b),
            Metric::Sw => similarity::sw(a, b),
            Metric::Bhat => similarity::bhat(a, b),
            Metric::Allr => {
                similarity::allr(a, b, ctx.bkg1, ctx.bkg2, ctx.nsites1, ctx.nsites2)
            }
            Metric::AllrLl => {
                similarity::allr_ll(a, b, ctx.bkg1, ctx.bkg2, ctx.nsites1, ctx.nsites2)
            }
        }
    }

    /// Scores two equal-width windows over the columns where both hold real data.
    pub fn score(
        &self,
        mot1: &[Column],
        mot2: &[Column],
        ctx: &PairContext,
        strat: ScoreStrategy,
    ) -> f64 {
        let good = valid_columns(mot1, mot2);
        self.score_masked(mot1, mot2, &good, ctx, strat)
    }

    /// Like [`Metric::score`] with an explicit validity mask.
    pub fn score_masked(
        &self,
        mot1: &[Column],
        mot2: &[Column],
        good: &[bool],
        ctx: &PairContext,
        strat: ScoreStrategy,
    ) -> f64 {
        debug_assert_eq!(mot1.len(), mot2.len());
        let scores = mot1
            .iter()
            .zip(mot2)
            .zip(good)
            .map(|((a, b), &g)| if g { self.column_score(a, b, ctx) } else { 0.0 })
            .collect_vec();
        strat.aggregate(&scores, good)
    }
}

static METRIC_NAMES: Lazy<String> = Lazy::new(|| Metric::ALL.iter().map(|m| m.name()).join(", "));

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|metric| metric.name() == s)
            .ok_or_else(|| format!("Unknown metric '{}', must be one of: {}", s, *METRIC_NAMES))
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

pub fn valid_columns(mot1: &[Column], mot2: &[Column]) -> Vec<bool> {
    mot1.iter()
        .zip(mot2)
        .map(|(a, b)| !is_pad(a) && !is_pad(b))
        .collect()
}

/// Compares two single columns with `sum` aggregation.
pub fn compare_columns(
    col1: &[f64],
    col2: &[f64],
    bkg1: &[f64],
    bkg2: &[f64],
    nsites1: f64,
    nsites2: f64,
    metric: Metric,
) -> Result<f64> {
    if col1.len() < 2 {
        return Err("Columns should have at least 2 entries".into());
    }
    if col1.len() != col2.len() {
        return Err(format!(
            "Both columns must be equal in size ({} vs {})",
            col1.len(),
            col2.len()
        ));
    }
    if metric.uses_nsites() {
        if bkg1.len() != col1.len() || bkg2.len() != col1.len() {
            return Err("Incorrect background vector length".into());
        }
        if nsites1 <= 1.0 || nsites2 <= 1.0 {
            return Err("nsites1/nsites2 should be greater than 1".into());
        }
    }
    let ctx = PairContext {
        bkg1,
        bkg2,
        nsites1,
        nsites2,
    };
    let mot1 = [col1.to_vec()];
    let mot2 = [col2.to_vec()];
    Ok(metric.score(&mot1, &mot2, &ctx, ScoreStrategy::Sum))
}
