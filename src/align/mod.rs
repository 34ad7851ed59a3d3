//! Sliding-window alignment of two motifs.
//!
//! The shorter motif is padded so that every register keeps the requested
//! overlap, every register is scored, and the best one (optionally also over
//! the reverse complement of the second motif) is reported.

mod equalize;
mod search;

pub use equalize::{
    add_columns, count_left_pad, equalize, required_overlaps, trim_both, Track,
};
pub use search::{best_alignment, compare_motif_pair, search_registers, Alignment, Register};

use crate::ic::{motif_ic, IcType};
use crate::metrics::Metric;
use crate::motif::{fix_mot_bkg_zeros, Motif};
use crate::params::CompareParams;
use crate::utils::Result;

/// A motif ready for comparison: zero-smoothed if the metric needs it,
/// with its background and per-column IC.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedMotif {
    pub motif: Motif,
    pub bkg: Vec<f64>,
    pub ic: Vec<f64>,
}

impl PreparedMotif {
    pub fn new(motif: &Motif, bkg: &[f64], params: &CompareParams) -> Result<Self> {
        Self::with_ic_type(
            motif,
            bkg,
            params.metric,
            params.ic_type,
            params.relative_entropy,
        )
    }

    pub fn with_ic_type(
        motif: &Motif,
        bkg: &[f64],
        metric: Metric,
        ic_type: IcType,
        relative: bool,
    ) -> Result<Self> {
        motif.validate()?;
        if bkg.len() != motif.alphabet_size() {
            return Err(format!(
                "Background has {} entries but the motif alphabet has {}",
                bkg.len(),
                motif.alphabet_size()
            ));
        }
        if metric.uses_nsites() && motif.nsites <= 0.0 {
            return Err(format!(
                "{} requires a positive site count, got {}",
                metric, motif.nsites
            ));
        }
        let (motif, bkg) = fix_mot_bkg_zeros(motif, bkg, metric);
        let ic = motif_ic(&motif.columns, &bkg, ic_type, relative);
        Ok(Self { motif, bkg, ic })
    }

    /// Wraps already smoothed data, recomputing nothing but the IC.
    pub fn from_parts(motif: Motif, bkg: Vec<f64>, ic_type: IcType, relative: bool) -> Self {
        let ic = motif_ic(&motif.columns, &bkg, ic_type, relative);
        Self { motif, bkg, ic }
    }

    pub fn len(&self) -> usize {
        self.motif.len()
    }

    pub fn is_empty(&self) -> bool {
        self.motif.is_empty()
    }

    pub fn track(&self) -> Track {
        Track::new(self.motif.columns.clone(), self.ic.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_rejects_mismatched_background() {
        let motif = Motif::new(vec![vec![0.25; 4]]);
        let params = CompareParams::default();
        assert!(PreparedMotif::new(&motif, &[0.5, 0.5], &params).is_err());
        assert!(PreparedMotif::new(&motif, &[0.25; 4], &params).is_ok());
    }

    #[test]
    fn test_prepare_rejects_empty_motif() {
        let params = CompareParams::default();
        assert!(PreparedMotif::new(&Motif::new(vec![]), &[0.25; 4], &params).is_err());
    }

    #[test]
    fn test_prepare_smooths_for_allr() {
        let motif = Motif::new(vec![vec![1.0, 0.0, 0.0, 0.0]]);
        let params = CompareParams::new(Metric::Allr);
        let prepared = PreparedMotif::new(&motif, &[0.5, 0.5, 0.0, 0.0], &params).unwrap();
        assert!(prepared.motif.columns[0].iter().all(|&v| v > 0.0));
        assert!(prepared.bkg.iter().all(|&v| v > 0.0));
        // the caller's motif is left alone
        assert_eq!(motif.columns[0][1], 0.0);
    }
}
