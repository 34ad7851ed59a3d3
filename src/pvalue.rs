//! Log p-values of comparison scores from a pre-fit table of score
//! distributions indexed by motif column counts.

use crate::metrics::Metric;
use crate::utils::{Result, INTERRUPT_CHECK_INTERVAL};
use itertools::Itertools;
use once_cell::sync::Lazy;
use statrs::distribution::{ContinuousCDF, Normal, Weibull};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Distribution {
    /// Parameters are mean and standard deviation
    Normal,
    /// Parameters are location and scale
    Logistic,
    /// Parameters are shape and scale
    Weibull,
}

static DISTRIBUTION_NAMES: Lazy<String> = Lazy::new(|| {
    [
        Distribution::Normal,
        Distribution::Logistic,
        Distribution::Weibull,
    ]
    .iter()
    .map(|d| d.name())
    .join(", ")
});

impl Distribution {
    pub fn name(&self) -> &'static str {
        match self {
            Distribution::Normal => "normal",
            Distribution::Logistic => "logistic",
            Distribution::Weibull => "weibull",
        }
    }
}

impl FromStr for Distribution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "normal" => Ok(Distribution::Normal),
            "logistic" => Ok(Distribution::Logistic),
            "weibull" => Ok(Distribution::Weibull),
            _ => Err(format!(
                "Unknown distribution '{}', must be one of: {}",
                s, *DISTRIBUTION_NAMES
            )),
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tail {
    Lower,
    Upper,
}

impl Tail {
    /// Small distances and large similarities are significant.
    pub fn for_metric(metric: Metric) -> Tail {
        if metric.is_distance() {
            Tail::Lower
        } else {
            Tail::Upper
        }
    }
}

/// Evaluates log tail probabilities of the table distributions.
pub trait CdfEvaluator {
    fn log_cdf(
        &self,
        x: f64,
        param_a: f64,
        param_b: f64,
        distribution: Distribution,
        tail: Tail,
    ) -> Result<f64>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StatrsCdf;

impl CdfEvaluator for StatrsCdf {
    fn log_cdf(
        &self,
        x: f64,
        param_a: f64,
        param_b: f64,
        distribution: Distribution,
        tail: Tail,
    ) -> Result<f64> {
        let p = match distribution {
            Distribution::Normal => {
                let dist = Normal::new(param_a, param_b).map_err(|e| {
                    format!(
                        "Invalid normal parameters ({}, {}): {}",
                        param_a, param_b, e
                    )
                })?;
                tail_probability(&dist, x, tail)
            }
            Distribution::Weibull => {
                let dist = Weibull::new(param_a, param_b).map_err(|e| {
                    format!(
                        "Invalid weibull parameters ({}, {}): {}",
                        param_a, param_b, e
                    )
                })?;
                tail_probability(&dist, x, tail)
            }
            Distribution::Logistic => return logistic_log_cdf(x, param_a, param_b, tail),
        };
        Ok(p.ln())
    }
}

fn tail_probability<D: ContinuousCDF<f64, f64>>(dist: &D, x: f64, tail: Tail) -> f64 {
    match tail {
        Tail::Lower => dist.cdf(x),
        Tail::Upper => dist.sf(x),
    }
}

fn logistic_log_cdf(x: f64, location: f64, scale: f64, tail: Tail) -> Result<f64> {
    if scale.is_nan() || scale <= 0.0 || !location.is_finite() {
        return Err(format!(
            "Invalid logistic parameters ({}, {})",
            location, scale
        ));
    }
    let z = (x - location) / scale;
    Ok(match tail {
        Tail::Lower => -softplus(-z),
        Tail::Upper => -softplus(z),
    })
}

// ln(1 + e^z) without overflow
fn softplus(z: f64) -> f64 {
    if z > 35.0 {
        z
    } else {
        z.exp().ln_1p()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PvalueRow {
    /// Column count of the shorter motif
    pub subject: usize,
    /// Column count of the longer motif
    pub target: usize,
    pub param_a: f64,
    pub param_b: f64,
    pub distribution: Distribution,
}

/// Pre-fit score distributions keyed by (subject, target) column counts.
#[derive(Debug, Clone)]
pub struct PvalueTable {
    rows: Vec<PvalueRow>,
    index: HashMap<(usize, usize), usize>,
    subject_range: (usize, usize),
    target_range: (usize, usize),
}

impl PvalueTable {
    pub fn new(rows: Vec<PvalueRow>) -> Result<Self> {
        if rows.is_empty() {
            return Err("Empty p-value table".into());
        }
        let mut index = HashMap::with_capacity(rows.len());
        for (row_idx, row) in rows.iter().enumerate() {
            // first row wins on duplicates
            index.entry((row.subject, row.target)).or_insert(row_idx);
        }
        let range = |values: Vec<usize>| {
            let min = values.iter().copied().min().unwrap_or(0);
            let max = values.iter().copied().max().unwrap_or(0);
            (min, max)
        };
        let subject_range = range(rows.iter().map(|r| r.subject).collect());
        let target_range = range(rows.iter().map(|r| r.target).collect());
        Ok(Self {
            rows,
            index,
            subject_range,
            target_range,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Finds the row for a pair of motif column counts, in either order.
    /// Counts are clamped to the table range and, when missing, both are
    /// incremented until a row matches or the table range is left.
    pub fn lookup(&self, ncol1: usize, ncol2: usize) -> Option<&PvalueRow> {
        let (subject_min, subject_max) = self.subject_range;
        let (target_min, target_max) = self.target_range;
        let mut n1 = ncol1.min(ncol2).clamp(subject_min, subject_max);
        let mut n2 = ncol1.max(ncol2).clamp(target_min, target_max);
        while n1 <= subject_max && n2 <= target_max {
            if let Some(&row_idx) = self.index.get(&(n1, n2)) {
                return Some(&self.rows[row_idx]);
            }
            n1 += 1;
            n2 += 1;
        }
        None
    }
}

/// Log p-values for already computed scores. `pairs[k]` holds the indices
/// into `ncols` of the two motifs behind `scores[k]`. Excluded (infinite)
/// scores and pairs without a table row are left at 0. A set `interrupt`
/// flag is noticed every 1000 scores and fails the call.
pub fn pvalues(
    ncols: &[usize],
    scores: &[f64],
    pairs: &[(usize, usize)],
    table: &PvalueTable,
    metric: Metric,
    cdf: &impl CdfEvaluator,
    interrupt: Option<&AtomicBool>,
) -> Result<Vec<f64>> {
    if scores.len() != pairs.len() {
        return Err(format!(
            "Different score and pair list lengths ({} vs {})",
            scores.len(),
            pairs.len()
        ));
    }
    if let Some((i, j)) = pairs
        .iter()
        .find(|(i, j)| *i >= ncols.len() || *j >= ncols.len())
    {
        return Err(format!(
            "Pair ({}, {}) is out of range for {} motifs",
            i,
            j,
            ncols.len()
        ));
    }

    let tail = Tail::for_metric(metric);
    let mut pvals = vec![0.0; scores.len()];
    for (k, (&score, &(i, j))) in scores.iter().zip(pairs).enumerate() {
        if k % INTERRUPT_CHECK_INTERVAL == 0
            && interrupt.is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            log::warn!("P-value lookup interrupted after {} of {} scores", k, scores.len());
            return Err("Interrupted".into());
        }
        if score.is_infinite() {
            continue;
        }
        match table.lookup(ncols[i], ncols[j]) {
            Some(row) => {
                pvals[k] = cdf.log_cdf(score, row.param_a, row.param_b, row.distribution, tail)?;
            }
            None => log::trace!(
                "No p-value table row for column counts ({}, {})",
                ncols[i],
                ncols[j]
            ),
        }
    }
    Ok(pvals)
}
