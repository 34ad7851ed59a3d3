use crate::aggregate::ScoreStrategy;
use crate::ic::IcType;
use crate::metrics::Metric;
use crate::utils::Result;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Options shared by every comparison, merge and alignment entry point.
#[derive(Debug, Clone)]
pub struct CompareParams {
    pub metric: Metric,
    pub strategy: ScoreStrategy,
    /// Minimum overlap in columns; values below 1 are a fraction of each
    /// motif's own length and negative values fall back to 1
    pub min_overlap: f64,
    /// Also try the reverse complement of the second motif
    pub rc: bool,
    pub min_mean_ic: f64,
    pub min_position_ic: f64,
    /// Rescale by the real overlap instead of the longer motif length
    pub normalize: bool,
    pub ic_type: IcType,
    /// Compute IC against the background instead of a uniform distribution
    pub relative_entropy: bool,
    pub num_threads: usize,
    /// Cooperative cancellation flag polled between comparisons
    pub interrupt: Option<Arc<AtomicBool>>,
}

impl Default for CompareParams {
    fn default() -> Self {
        Self {
            metric: Metric::Pcc,
            strategy: ScoreStrategy::ArithmeticMean,
            min_overlap: 6.0,
            rc: true,
            min_mean_ic: 0.25,
            min_position_ic: 0.0,
            normalize: false,
            ic_type: IcType::Entropy,
            relative_entropy: false,
            num_threads: 1,
            interrupt: None,
        }
    }
}

impl CompareParams {
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            ..Default::default()
        }
    }

    /// Builds params from the metric and score strategy names.
    pub fn from_names(metric: &str, strategy: &str) -> Result<Self> {
        Ok(Self {
            metric: metric.parse()?,
            strategy: strategy.parse()?,
            ..Default::default()
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_mean_ic < 0.0 || self.min_mean_ic.is_nan() {
            return Err(format!(
                "Minimum mean IC must be non-negative, got {}",
                self.min_mean_ic
            ));
        }
        if self.min_position_ic < 0.0 || self.min_position_ic.is_nan() {
            return Err(format!(
                "Minimum position IC must be non-negative, got {}",
                self.min_position_ic
            ));
        }
        if self.min_overlap.is_nan() {
            return Err("Minimum overlap must be a number".into());
        }
        Ok(())
    }

    pub fn min_overlap(&self) -> f64 {
        if self.min_overlap < 0.0 {
            1.0
        } else {
            self.min_overlap
        }
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupt
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
