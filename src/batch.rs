//! Batched motif comparisons on a rayon thread pool.
//!
//! All motifs are prepared (zero-smoothed, IC computed) up front, then each
//! requested pair is scored independently into its own output slot.

use crate::align::{compare_motif_pair, PreparedMotif};
use crate::motif::Motif;
use crate::params::CompareParams;
use crate::utils::{Result, INTERRUPT_CHECK_INTERVAL};
use rayon::{
    iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
    ThreadPool, ThreadPoolBuilder,
};

pub fn initialize_thread_pool(num_threads: usize) -> Result<ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("motifcmp-{}", i))
        .start_handler(|_thread_index| {
            log::trace!("Initialized thread {:?}", std::thread::current().id());
        })
        .build()
        .map_err(|e| format!("Failed to initialize thread pool: {}", e))
}

pub(crate) fn validate_inputs(
    motifs: &[Motif],
    bkgs: &[Vec<f64>],
    params: &CompareParams,
) -> Result<()> {
    params.validate()?;
    if motifs.is_empty() {
        return Err("Empty motif list".into());
    }
    if bkgs.is_empty() {
        return Err("Empty background list".into());
    }
    if motifs.len() != bkgs.len() {
        return Err(format!(
            "Different motif and background list lengths ({} vs {})",
            motifs.len(),
            bkgs.len()
        ));
    }
    let nrow = motifs[0].alphabet_size();
    if let Some(pos) = motifs.iter().position(|m| m.alphabet_size() != nrow) {
        return Err(format!(
            "Motif {} has an alphabet of {} symbols, expected {}",
            pos,
            motifs[pos].alphabet_size(),
            nrow
        ));
    }
    Ok(())
}

/// Validates the inputs and prepares every motif for comparison.
pub fn prepare_all(
    motifs: &[Motif],
    bkgs: &[Vec<f64>],
    params: &CompareParams,
) -> Result<Vec<PreparedMotif>> {
    validate_inputs(motifs, bkgs, params)?;
    motifs
        .iter()
        .zip(bkgs)
        .enumerate()
        .map(|(idx, (motif, bkg))| {
            PreparedMotif::new(motif, bkg, params).map_err(|e| format!("Motif {}: {}", idx, e))
        })
        .collect()
}

/// Best score of each `(i, j)` pair of motif indices.
pub fn compare_many(
    motifs: &[Motif],
    bkgs: &[Vec<f64>],
    pairs: &[(usize, usize)],
    params: &CompareParams,
) -> Result<Vec<f64>> {
    let prepared = prepare_all(motifs, bkgs, params)?;
    if let Some((i, j)) = pairs
        .iter()
        .find(|(i, j)| *i >= prepared.len() || *j >= prepared.len())
    {
        return Err(format!(
            "Pair ({}, {}) is out of range for {} motifs",
            i,
            j,
            prepared.len()
        ));
    }
    score_pairs(&prepared, pairs, params)
}

/// Scores every pair with `i <= j`. Row `i` of the result holds the scores
/// against motifs `i..n`.
pub fn compare_all(
    motifs: &[Motif],
    bkgs: &[Vec<f64>],
    params: &CompareParams,
) -> Result<Vec<Vec<f64>>> {
    let prepared = prepare_all(motifs, bkgs, params)?;
    let n = prepared.len();
    let pairs = (0..n)
        .flat_map(|i| (i..n).map(move |j| (i, j)))
        .collect::<Vec<_>>();
    let scores = score_pairs(&prepared, &pairs, params)?;

    let mut rows = Vec::with_capacity(n);
    let mut rest = scores.as_slice();
    for i in 0..n {
        let (row, tail) = rest.split_at(n - i);
        rows.push(row.to_vec());
        rest = tail;
    }
    Ok(rows)
}

/// Mirrors the triangular output of [`compare_all`] into a full matrix.
pub fn to_square_matrix(triangular: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = triangular.len();
    let mut square = vec![vec![0.0; n]; n];
    for (i, row) in triangular.iter().enumerate() {
        for (offset, &score) in row.iter().enumerate() {
            let j = i + offset;
            square[i][j] = score;
            square[j][i] = score;
        }
    }
    square
}

fn score_pairs(
    prepared: &[PreparedMotif],
    pairs: &[(usize, usize)],
    params: &CompareParams,
) -> Result<Vec<f64>> {
    log::debug!(
        "Comparing {} pairs of {} motifs with {} using {} threads",
        pairs.len(),
        prepared.len(),
        params.metric,
        params.num_threads
    );
    let pool = initialize_thread_pool(params.num_threads)?;
    pool.install(|| {
        pairs
            .par_iter()
            .enumerate()
            .map(|(k, &(i, j))| {
                if k % INTERRUPT_CHECK_INTERVAL == 0 && params.is_interrupted() {
                    log::warn!("Comparison interrupted after {} of {} pairs", k, pairs.len());
                    return Err("Interrupted".to_string());
                }
                Ok(compare_motif_pair(&prepared[i], &prepared[j], params))
            })
            .collect()
    })
}
