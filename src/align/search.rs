use super::equalize::{equalize, Track};
use super::PreparedMotif;
use crate::ic::mean_ic;
use crate::metrics::{valid_columns, PairContext};
use crate::params::CompareParams;

/// Column offsets of the window start in the first and second motif.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Register {
    pub i: usize,
    pub j: usize,
}

impl Register {
    /// Offset of the second motif relative to the first.
    pub fn shift(&self) -> isize {
        self.i as isize - self.j as isize
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    pub score: f64,
    pub register: Register,
    /// The register refers to the reverse complement of the second motif
    pub used_rc: bool,
}

/// Best alignment of `mot2` (and, if enabled, its reverse complement) onto `mot1`.
pub fn best_alignment(
    mot1: &PreparedMotif,
    mot2: &PreparedMotif,
    params: &CompareParams,
) -> Alignment {
    let track1 = mot1.track();
    let ctx = PairContext {
        bkg1: &mot1.bkg,
        bkg2: &mot2.bkg,
        nsites1: mot1.motif.nsites,
        nsites2: mot2.motif.nsites,
    };
    let forward = search_registers(&track1, &mot2.track(), &ctx, params);
    if !params.rc {
        return forward;
    }

    let rc_bkg2 = mot2.bkg.iter().rev().copied().collect::<Vec<_>>();
    let rc_ctx = PairContext {
        bkg2: &rc_bkg2,
        ..ctx
    };
    let reverse = search_registers(&track1, &mot2.track().reverse_complement(), &rc_ctx, params);
    if params.metric.is_better(reverse.score, forward.score) {
        Alignment {
            used_rc: true,
            ..reverse
        }
    } else {
        forward
    }
}

/// Best score over all registers, including the reverse complement if enabled.
pub fn compare_motif_pair(
    mot1: &PreparedMotif,
    mot2: &PreparedMotif,
    params: &CompareParams,
) -> f64 {
    best_alignment(mot1, mot2, params).score
}

/// Slides the shorter (equalized) motif along the longer one and keeps the
/// first best-scoring register in row-major order.
pub fn search_registers(
    track1: &Track,
    track2: &Track,
    ctx: &PairContext,
    params: &CompareParams,
) -> Alignment {
    let tlen = track1.len().max(track2.len());
    let (track1, track2) = equalize(track1.clone(), track2.clone(), params.min_overlap());
    let width = track1.len().min(track2.len());

    let mut best = Alignment {
        score: params.metric.worst(),
        register: Register::default(),
        used_rc: false,
    };
    for i in 0..=(track1.len() - width) {
        for j in 0..=(track2.len() - width) {
            let score = score_window(&track1, &track2, i, j, width, tlen, ctx, params);
            if params.metric.is_better(score, best.score) {
                best.score = score;
                best.register = Register { i, j };
            }
        }
    }
    best
}

#[allow(clippy::too_many_arguments)]
fn score_window(
    track1: &Track,
    track2: &Track,
    i: usize,
    j: usize,
    width: usize,
    tlen: usize,
    ctx: &PairContext,
    params: &CompareParams,
) -> f64 {
    let metric = params.metric;
    let cols1 = &track1.columns[i..i + width];
    let cols2 = &track2.columns[j..j + width];
    let mut ic1 = track1.ic[i..i + width].to_vec();
    let mut ic2 = track2.ic[j..j + width].to_vec();
    let mut good = valid_columns(cols1, cols2);

    let posic = params.min_position_ic;
    if posic > 0.0 {
        for k in 0..width {
            if ic1[k] < posic || ic2[k] < posic {
                good[k] = false;
                ic1[k] = -1.0;
                ic2[k] = -1.0;
            }
        }
    }

    if mean_ic(&ic1) < params.min_mean_ic || mean_ic(&ic2) < params.min_mean_ic {
        return metric.worst();
    }

    let overlap = good.iter().filter(|&&g| g).count();
    if overlap == 0 {
        return metric.worst();
    }

    let alignlen = if params.normalize { overlap } else { tlen };
    let raw = metric.score_masked(cols1, cols2, &good, ctx, params.strategy);
    metric.rescale(raw, alignlen, tlen)
}
