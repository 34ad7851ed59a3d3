use itertools::izip;

pub const ALLR_LOWER_LIMIT: f64 = -2.0;

/// Pearson correlation between two columns; 0 when either column has no variance.
pub fn pcc(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    let (mut sum_a, mut sum_b, mut sum_ab, mut sum_a2, mut sum_b2) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for (x, y) in izip!(a, b) {
        sum_a += x;
        sum_b += y;
        sum_ab += x * y;
        sum_a2 += x * x;
        sum_b2 += y * y;
    }
    let top = n * sum_ab - sum_a * sum_b;
    let bot = ((n * sum_a2 - sum_a.powi(2)) * (n * sum_b2 - sum_b.powi(2))).sqrt();
    if bot == 0.0 {
        0.0
    } else {
        top / bot
    }
}

/// Sandelin-Wasserman similarity.
pub fn sw(a: &[f64], b: &[f64]) -> f64 {
    let ssd: f64 = izip!(a, b).map(|(x, y)| (x - y).powi(2)).sum();
    2.0 - ssd
}

/// Bhattacharyya coefficient.
pub fn bhat(a: &[f64], b: &[f64]) -> f64 {
    izip!(a, b).map(|(x, y)| (x * y).sqrt()).sum()
}

/// Average log-likelihood ratio. Cells and backgrounds must be positive.
pub fn allr(a: &[f64], b: &[f64], bkg1: &[f64], bkg2: &[f64], nsites1: f64, nsites2: f64) -> f64 {
    let left: f64 = izip!(a, b, bkg1)
        .map(|(x, y, bg)| y * nsites2 * (x / bg).ln())
        .sum();
    let right: f64 = izip!(a, b, bkg2)
        .map(|(x, y, bg)| x * nsites1 * (y / bg).ln())
        .sum();
    (left + right) / (nsites1 + nsites2)
}

pub fn allr_ll(
    a: &[f64],
    b: &[f64],
    bkg1: &[f64],
    bkg2: &[f64],
    nsites1: f64,
    nsites2: f64,
) -> f64 {
    allr(a, b, bkg1, bkg2, nsites1, nsites2).max(ALLR_LOWER_LIMIT)
}
