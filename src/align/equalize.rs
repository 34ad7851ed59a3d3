use crate::motif::{is_pad, pad_column, reverse_complement_columns, Column};
use crate::utils::{fraction_of, PAD};

/// Motif columns travelling together with their per-column IC.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub columns: Vec<Column>,
    pub ic: Vec<f64>,
}

impl Track {
    pub fn new(columns: Vec<Column>, ic: Vec<f64>) -> Self {
        debug_assert_eq!(columns.len(), ic.len());
        Self { columns, ic }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    fn nrow(&self) -> usize {
        self.columns.first().map_or(0, |col| col.len())
    }

    pub fn reverse_complement(&self) -> Track {
        Track {
            columns: reverse_complement_columns(&self.columns),
            ic: self.ic.iter().rev().copied().collect(),
        }
    }
}

/// Required overlap in columns for each of the two motifs.
pub fn required_overlaps(min_overlap: f64, len1: usize, len2: usize) -> (usize, usize) {
    if min_overlap < 1.0 {
        (fraction_of(min_overlap, len1), fraction_of(min_overlap, len2))
    } else {
        let overlap = min_overlap.floor() as usize;
        (overlap, overlap)
    }
}

/// Pads the shorter motif (the second one on equal lengths) on both sides so
/// every register of the sliding window honours the overlap requirement.
/// Returns the inputs untouched when either motif needs no padding.
pub fn equalize(t1: Track, t2: Track, min_overlap: f64) -> (Track, Track) {
    let (len1, len2) = (t1.len(), t2.len());
    let (overlap1, overlap2) = required_overlaps(min_overlap, len1, len2);
    let to_add1 = len2.saturating_sub(overlap1);
    let to_add2 = len1.saturating_sub(overlap2);

    if to_add1 == 0 || to_add2 == 0 {
        return (t1, t2);
    }

    if len2 > len1 {
        let padded = add_columns(&t1, len1 + 2 * to_add1, to_add1);
        (padded, t2)
    } else {
        let padded = add_columns(&t2, len2 + 2 * to_add2, to_add2);
        (t1, padded)
    }
}

/// Places `track` at offset `left` inside `total` columns of padding.
pub fn add_columns(track: &Track, total: usize, left: usize) -> Track {
    debug_assert!(left + track.len() <= total);
    let nrow = track.nrow();
    let right = total - left - track.len();
    let columns = std::iter::repeat_with(|| pad_column(nrow))
        .take(left)
        .chain(track.columns.iter().cloned())
        .chain(std::iter::repeat_with(|| pad_column(nrow)).take(right))
        .collect();
    let ic = std::iter::repeat(PAD)
        .take(left)
        .chain(track.ic.iter().copied())
        .chain(std::iter::repeat(PAD).take(right))
        .collect();
    Track { columns, ic }
}

/// Drops the leading and trailing columns that are padding in both tracks.
/// Tracks must have equal length.
pub fn trim_both(t1: Track, t2: Track) -> (Track, Track) {
    debug_assert_eq!(t1.len(), t2.len());
    let both_pad = |k: usize| is_pad(&t1.columns[k]) && is_pad(&t2.columns[k]);
    let n = t1.len().min(t2.len());
    let left = (0..n).take_while(|&k| both_pad(k)).count();
    if left == n {
        return (t1, t2);
    }
    let right = (left..n).rev().take_while(|&k| both_pad(k)).count();
    let end = n - right;
    let cut = |t: &Track| Track {
        columns: t.columns[left..end].to_vec(),
        ic: t.ic[left..end].to_vec(),
    };
    (cut(&t1), cut(&t2))
}

pub fn count_left_pad(columns: &[Column]) -> usize {
    columns.iter().take_while(|col| is_pad(col)).count()
}
