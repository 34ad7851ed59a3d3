use crate::align::{
    add_columns, best_alignment, count_left_pad, equalize, trim_both, PreparedMotif, Register,
    Track,
};
use crate::batch::validate_inputs;
use crate::ic::IcType;
use crate::motif::{is_pad, neg_to_zero, Column, Motif};
use crate::params::CompareParams;
use crate::utils::Result;
use itertools::izip;
use std::cmp::Ordering;

/// Motifs padded onto shared coordinates, for stacked display.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedMotifs {
    pub motifs: Vec<Motif>,
    /// Whether each motif was reverse complemented to fit the first one
    pub used_rc: Vec<bool>,
}

/// Merges `mot2` into `mot1`, where `mot1` already stands for `weight` motifs.
pub fn merge_pair(
    mot1: &PreparedMotif,
    mot2: &PreparedMotif,
    weight: usize,
    params: &CompareParams,
) -> Motif {
    let (track1, track2, _) = aligned_tracks(mot1, mot2, params);
    let columns = merge_columns(&track1.columns, &track2.columns, weight);
    Motif::with_nsites(columns, mot1.motif.nsites + mot2.motif.nsites)
}

pub fn merge_backgrounds(bkg1: &[f64], bkg2: &[f64], weight: usize) -> Vec<f64> {
    let w = weight as f64;
    izip!(bkg1, bkg2)
        .map(|(a, b)| (a * w + b) / (w + 1.0))
        .collect()
}

/// Column-wise weighted average; columns present in only one motif are
/// copied and columns present in neither are dropped.
pub fn merge_columns(cols1: &[Column], cols2: &[Column], weight: usize) -> Vec<Column> {
    let w = weight as f64;
    izip!(cols1, cols2)
        .filter_map(|(a, b)| match (is_pad(a), is_pad(b)) {
            (true, true) => None,
            (true, false) => Some(b.clone()),
            (false, true) => Some(a.clone()),
            (false, false) => Some(
                izip!(a, b)
                    .map(|(x, y)| (x * w + y) / (w + 1.0))
                    .collect(),
            ),
        })
        .collect()
}

/// Folds all motifs, in order, into one merged motif and background.
pub fn merge_many(
    motifs: &[Motif],
    bkgs: &[Vec<f64>],
    params: &CompareParams,
) -> Result<(Motif, Vec<f64>)> {
    validate_inputs(motifs, bkgs, params)?;
    if motifs.len() == 1 {
        return Ok((motifs[0].clone(), bkgs[0].clone()));
    }

    let relative = params.relative_entropy;
    let prepared = motifs
        .iter()
        .zip(bkgs)
        .map(|(motif, bkg)| {
            PreparedMotif::with_ic_type(motif, bkg, params.metric, IcType::Entropy, relative)
        })
        .collect::<Result<Vec<_>>>()?;

    log::debug!("Merging {} motifs with {}", prepared.len(), params.metric);
    let mut weight = 1;
    let mut merged = fold(&prepared[0], &prepared[1], weight, params);
    for next in &prepared[2..] {
        weight += 1;
        merged = fold(&merged, next, weight, params);
    }
    Ok((merged.motif, merged.bkg))
}

fn fold(
    acc: &PreparedMotif,
    next: &PreparedMotif,
    weight: usize,
    params: &CompareParams,
) -> PreparedMotif {
    let motif = merge_pair(acc, next, weight, params);
    let bkg = merge_backgrounds(&acc.bkg, &next.bkg, weight);
    PreparedMotif::from_parts(motif, bkg, IcType::Entropy, params.relative_entropy)
}

/// Aligns every motif to the first one and pads them onto shared coordinates.
/// Padding cells are returned as zeros.
pub fn align_motifs(
    motifs: &[Motif],
    bkgs: &[Vec<f64>],
    params: &CompareParams,
) -> Result<AlignedMotifs> {
    validate_inputs(motifs, bkgs, params)?;
    let relative = params.relative_entropy;
    let prepared = motifs
        .iter()
        .zip(bkgs)
        .map(|(motif, bkg)| {
            PreparedMotif::with_ic_type(motif, bkg, params.metric, IcType::Entropy, relative)
        })
        .collect::<Result<Vec<_>>>()?;

    let first = &prepared[0];
    let mut placed = Vec::with_capacity(prepared.len() - 1);
    let mut used_rc = vec![false];
    for other in &prepared[1..] {
        let (track1, track2, rc) = aligned_tracks(first, other, params);
        placed.push((count_left_pad(&track1.columns), track2, other.motif.nsites));
        used_rc.push(rc);
    }

    let max_left = placed.iter().map(|(left, _, _)| *left).max().unwrap_or(0);
    let mut out = Vec::with_capacity(prepared.len());
    out.push(shift_right(&first.track(), max_left, first.motif.nsites));
    for (left, track, nsites) in &placed {
        out.push(shift_right(track, max_left - left, *nsites));
    }

    Ok(AlignedMotifs {
        motifs: out,
        used_rc,
    })
}

fn shift_right(track: &Track, by: usize, nsites: f64) -> Motif {
    let mut columns = add_columns(track, track.len() + by, by).columns;
    neg_to_zero(&mut columns);
    Motif::with_nsites(columns, nsites)
}

/// Equal-length, trimmed tracks of both motifs placed at their best register.
fn aligned_tracks(
    mot1: &PreparedMotif,
    mot2: &PreparedMotif,
    params: &CompareParams,
) -> (Track, Track, bool) {
    let aln = best_alignment(mot1, mot2, params);
    let track2 = if aln.used_rc {
        mot2.track().reverse_complement()
    } else {
        mot2.track()
    };
    let (track1, track2) = equalize(mot1.track(), track2, params.min_overlap());
    let (track1, track2) = line_up(track1, track2, aln.register);
    let (track1, track2) = trim_both(track1, track2);
    (track1, track2, aln.used_rc)
}

// Pads the shorter track so its columns sit at the chosen register of the longer one
fn line_up(track1: Track, track2: Track, register: Register) -> (Track, Track) {
    let shift = register.shift().unsigned_abs();
    match track1.len().cmp(&track2.len()) {
        Ordering::Greater => {
            let track2 = add_columns(&track2, track1.len(), shift);
            (track1, track2)
        }
        Ordering::Less => {
            let track1 = add_columns(&track1, track2.len(), shift);
            (track1, track2)
        }
        Ordering::Equal => (track1, track2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Metric;
    use crate::motif::pad_column;
    use approx::assert_abs_diff_eq;

    const UNIFORM: [f64; 4] = [0.25; 4];

    fn params(metric: Metric) -> CompareParams {
        CompareParams {
            metric,
            min_overlap: 1.0,
            rc: false,
            min_mean_ic: 0.0,
            ..Default::default()
        }
    }

    fn core() -> Vec<Column> {
        vec![
            vec![0.85, 0.05, 0.05, 0.05],
            vec![0.05, 0.85, 0.05, 0.05],
            vec![0.05, 0.05, 0.85, 0.05],
        ]
    }

    #[test]
    fn test_merge_columns_weights() {
        let cols1 = vec![vec![1.0, 0.0], pad_column(2), vec![0.5, 0.5], pad_column(2)];
        let cols2 = vec![vec![0.0, 1.0], vec![0.3, 0.7], pad_column(2), pad_column(2)];
        let merged = merge_columns(&cols1, &cols2, 3);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0], vec![0.75, 0.25]);
        assert_eq!(merged[1], vec![0.3, 0.7]);
        assert_eq!(merged[2], vec![0.5, 0.5]);
    }

    #[test]
    fn test_merge_backgrounds() {
        let merged = merge_backgrounds(&[0.4, 0.6], &[0.2, 0.8], 1);
        assert_abs_diff_eq!(merged[0], 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(merged[1], 0.7, epsilon = 1e-12);
    }

    #[test]
    fn test_merge_identical_motifs() {
        let motif = Motif::new(core());
        let bkgs = vec![UNIFORM.to_vec(), UNIFORM.to_vec()];
        let (merged, bkg) =
            merge_many(&[motif.clone(), motif.clone()], &bkgs, &params(Metric::Eucl)).unwrap();
        assert_eq!(merged.columns, motif.columns);
        assert_eq!(merged.nsites, 200.0);
        assert_eq!(bkg, UNIFORM.to_vec());
    }

    #[test]
    fn test_merge_overhanging_motifs_extends() {
        // second motif shares two columns with the end of the first
        let motif1 = Motif::new(core());
        let motif2 = Motif::new(vec![
            core()[1].clone(),
            core()[2].clone(),
            vec![0.05, 0.05, 0.05, 0.85],
        ]);
        let bkgs = vec![UNIFORM.to_vec(), UNIFORM.to_vec()];
        let (merged, _) = merge_many(&[motif1, motif2], &bkgs, &params(Metric::Pcc)).unwrap();
        assert_eq!(merged.len(), 4);
        assert_eq!(merged.columns[0], core()[0]);
        assert_eq!(merged.columns[3], vec![0.05, 0.05, 0.05, 0.85]);
    }

    #[test]
    fn test_merge_with_reverse_complement() {
        let motif1 = Motif::new(vec![
            vec![0.7, 0.1, 0.1, 0.1],
            vec![0.1, 0.1, 0.6, 0.2],
            vec![0.2, 0.3, 0.2, 0.3],
        ]);
        let motif2 = motif1.reverse_complement();
        let mut params = params(Metric::Eucl);
        params.rc = true;
        params.min_overlap = 3.0;
        let bkgs = vec![UNIFORM.to_vec(), UNIFORM.to_vec()];
        let (merged, _) = merge_many(&[motif1.clone(), motif2], &bkgs, &params).unwrap();
        assert_eq!(merged.len(), 3);
        let expected = motif1.columns.iter().flatten();
        for (got, expected) in merged.columns.iter().flatten().zip(expected) {
            assert_abs_diff_eq!(*got, *expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_merge_many_accumulates_weight() {
        let a = Motif::new(vec![vec![0.7, 0.1, 0.1, 0.1]; 3]);
        let b = Motif::new(vec![vec![0.1, 0.7, 0.1, 0.1]; 3]);
        let mut params = params(Metric::Eucl);
        params.min_overlap = 3.0;
        let bkgs = vec![UNIFORM.to_vec(); 3];
        let (merged, _) = merge_many(&[a.clone(), a, b], &bkgs, &params).unwrap();
        assert_eq!(merged.len(), 3);
        // two thirds of the first motif, one third of the last
        assert_abs_diff_eq!(merged.columns[0][0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(merged.columns[0][1], 0.3, epsilon = 1e-12);
        assert_eq!(merged.nsites, 300.0);
    }

    #[test]
    fn test_merge_many_single_and_invalid() {
        let motif = Motif::new(core());
        let params = params(Metric::Eucl);
        let (merged, _) = merge_many(&[motif.clone()], &[UNIFORM.to_vec()], &params).unwrap();
        assert_eq!(merged, motif);
        assert!(merge_many(&[], &[], &params).is_err());
        assert!(merge_many(&[motif.clone(), motif], &[UNIFORM.to_vec()], &params).is_err());
    }

    #[test]
    fn test_mixed_alphabet_sizes_are_rejected() {
        let motifs = [
            Motif::new(vec![vec![0.7, 0.1, 0.1, 0.1]; 3]),
            Motif::new(vec![vec![0.6, 0.1, 0.1, 0.1, 0.1]; 3]),
        ];
        let bkgs = vec![UNIFORM.to_vec(), vec![0.2; 5]];
        let params = params(Metric::Pcc);
        assert!(merge_many(&motifs, &bkgs, &params).is_err());
        assert!(align_motifs(&motifs, &bkgs, &params).is_err());
    }

    #[test]
    fn test_align_motifs_shares_coordinates() {
        let motif1 = Motif::new(core());
        let mut cols = vec![vec![0.25; 4]];
        cols.extend(core());
        let motif2 = Motif::new(cols);
        let bkgs = vec![UNIFORM.to_vec(), UNIFORM.to_vec()];
        let aligned = align_motifs(&[motif1, motif2], &bkgs, &params(Metric::Pcc)).unwrap();
        assert_eq!(aligned.used_rc, vec![false, false]);
        let first = &aligned.motifs[0];
        let second = &aligned.motifs[1];
        // the first motif is shifted one column right to meet the second
        assert_eq!(first.columns[0], vec![0.0; 4]);
        assert_eq!(first.columns[1], core()[0]);
        assert_eq!(second.columns[1], core()[0]);
        assert_eq!(second.columns[0], vec![0.25; 4]);
    }
}
