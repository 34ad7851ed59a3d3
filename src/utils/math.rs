/// Median of a score vector; the mean of the two middle values for even sizes.
pub fn median(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Floor of `x * len` as a column count, as used for fractional overlaps.
#[inline]
pub fn fraction_of(x: f64, len: usize) -> usize {
    (x * len as f64).floor() as usize
}
