use crate::metrics::Metric;
use crate::utils::{Result, PAD};

/// One motif position: a frequency per alphabet symbol.
pub type Column = Vec<f64>;

pub const DEFAULT_NSITES: f64 = 100.0;

// Additive pseudocount applied before ratio-based metrics
const ZERO_FIX: f64 = 0.01;

/// Position frequency matrix stored column-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Motif {
    pub columns: Vec<Column>,
    /// Number of sequences the motif was built from (used by ALLR)
    pub nsites: f64,
}

impl Motif {
    pub fn new(columns: Vec<Column>) -> Self {
        Self::with_nsites(columns, DEFAULT_NSITES)
    }

    pub fn with_nsites(columns: Vec<Column>, nsites: f64) -> Self {
        Self { columns, nsites }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn alphabet_size(&self) -> usize {
        self.columns.first().map_or(0, |col| col.len())
    }

    /// Checks that the motif has columns and that all of them share one alphabet size.
    pub fn validate(&self) -> Result<()> {
        let nrow = self.alphabet_size();
        if self.is_empty() {
            return Err("Encountered an empty motif".into());
        }
        if nrow == 0 {
            return Err("Motif columns must have at least one entry".into());
        }
        if let Some(pos) = self.columns.iter().position(|col| col.len() != nrow) {
            return Err(format!(
                "Motif column {} has {} entries, expected {}",
                pos,
                self.columns[pos].len(),
                nrow
            ));
        }
        Ok(())
    }

    pub fn reverse_complement(&self) -> Motif {
        Motif {
            columns: reverse_complement_columns(&self.columns),
            nsites: self.nsites,
        }
    }

    /// Adds the pseudocount to every cell of every real column.
    pub fn smoothed(&self) -> Motif {
        let columns = self
            .columns
            .iter()
            .map(|col| {
                if is_pad(col) {
                    col.clone()
                } else {
                    col.iter().map(|v| v + ZERO_FIX).collect()
                }
            })
            .collect();
        Motif {
            columns,
            nsites: self.nsites,
        }
    }
}

#[inline]
pub fn is_pad(col: &[f64]) -> bool {
    col[0] < 0.0
}

pub fn pad_column(nrow: usize) -> Column {
    vec![PAD; nrow]
}

/// Reverses column order and the symbol order inside every column.
pub fn reverse_complement_columns(columns: &[Column]) -> Vec<Column> {
    columns
        .iter()
        .rev()
        .map(|col| col.iter().rev().copied().collect())
        .collect()
}

/// Spreads a pseudocount over the background if any entry is exactly zero.
pub fn fix_background_zeros(bkg: &[f64]) -> Vec<f64> {
    if bkg.iter().any(|&b| b == 0.0) {
        let fix = ZERO_FIX / bkg.len() as f64;
        bkg.iter().map(|b| b + fix).collect()
    } else {
        bkg.to_vec()
    }
}

/// Returns smoothed copies of the motif and background when the metric takes
/// logarithms of cell ratios; plain copies otherwise.
pub fn fix_mot_bkg_zeros(motif: &Motif, bkg: &[f64], metric: Metric) -> (Motif, Vec<f64>) {
    if metric.needs_positive_cells() {
        (motif.smoothed(), fix_background_zeros(bkg))
    } else {
        (motif.clone(), bkg.to_vec())
    }
}

/// Replaces padding cells with zeros, producing a plain frequency matrix.
pub fn neg_to_zero(columns: &mut [Column]) {
    for cell in columns.iter_mut().flat_map(|col| col.iter_mut()) {
        if *cell < 0.0 {
            *cell = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn motif() -> Motif {
        Motif::new(vec![
            vec![0.7, 0.1, 0.1, 0.1],
            vec![0.0, 0.5, 0.5, 0.0],
            vec![0.25, 0.25, 0.2, 0.3],
        ])
    }

    #[test]
    fn test_reverse_complement() {
        let rc = motif().reverse_complement();
        assert_eq!(rc.columns[0], vec![0.3, 0.2, 0.25, 0.25]);
        assert_eq!(rc.columns[2], vec![0.1, 0.1, 0.1, 0.7]);
        assert_eq!(rc.reverse_complement(), motif());
    }

    #[test]
    fn test_validate() {
        assert!(motif().validate().is_ok());
        assert!(Motif::new(vec![]).validate().is_err());
        let ragged = Motif::new(vec![vec![0.5, 0.5], vec![1.0]]);
        assert!(ragged.validate().is_err());
    }

    #[test]
    fn test_fix_mot_bkg_zeros_for_ratio_metrics() {
        let bkg = vec![0.5, 0.0, 0.5, 0.0];
        let (fixed, fixed_bkg) = fix_mot_bkg_zeros(&motif(), &bkg, Metric::Kl);
        assert!(fixed.columns.iter().flatten().all(|&v| v > 0.0));
        assert_eq!(fixed.columns[0][0], 0.7 + 0.01);
        for (got, expected) in fixed_bkg.iter().zip([0.5025, 0.0025, 0.5025, 0.0025]) {
            assert_abs_diff_eq!(*got, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_fix_mot_bkg_zeros_leaves_other_metrics_alone() {
        let bkg = vec![0.5, 0.0, 0.5, 0.0];
        let (fixed, fixed_bkg) = fix_mot_bkg_zeros(&motif(), &bkg, Metric::Eucl);
        assert_eq!(fixed, motif());
        assert_eq!(fixed_bkg, bkg);
    }

    #[test]
    fn test_background_without_zeros_is_unchanged() {
        let bkg = vec![0.25; 4];
        assert_eq!(fix_background_zeros(&bkg), bkg);
    }

    #[test]
    fn test_neg_to_zero() {
        let mut cols = vec![pad_column(4), vec![0.1, 0.2, 0.3, 0.4]];
        neg_to_zero(&mut cols);
        assert_eq!(cols[0], vec![0.0; 4]);
        assert_eq!(cols[1], vec![0.1, 0.2, 0.3, 0.4]);
    }
}
