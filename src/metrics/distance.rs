use itertools::izip;

pub fn eucl(a: &[f64], b: &[f64]) -> f64 {
    seucl(a, b).sqrt()
}

pub fn seucl(a: &[f64], b: &[f64]) -> f64 {
    izip!(a, b).map(|(x, y)| (x - y).powi(2)).sum()
}

pub fn man(a: &[f64], b: &[f64]) -> f64 {
    izip!(a, b).map(|(x, y)| (x - y).abs()).sum()
}

pub fn hell(a: &[f64], b: &[f64]) -> f64 {
    let total: f64 = izip!(a, b)
        .map(|(x, y)| (x.sqrt() - y.sqrt()).powi(2))
        .sum();
    total.sqrt() / std::f64::consts::SQRT_2
}

/// Symmetrised Kullback-Leibler divergence. Cells must be positive.
pub fn kl(a: &[f64], b: &[f64]) -> f64 {
    let total: f64 = izip!(a, b)
        .map(|(x, y)| x * (x / y).ln() + y * (y / x).ln())
        .sum();
    0.5 * total
}

/// Itakura-Saito distance. Cells must be positive.
pub fn is(a: &[f64], b: &[f64]) -> f64 {
    izip!(a, b)
        .map(|(x, y)| {
            let ratio = x / y;
            ratio - ratio.ln() - 1.0
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const A: [f64; 4] = [0.7, 0.1, 0.1, 0.1];
    const B: [f64; 4] = [0.1, 0.1, 0.1, 0.7];

    #[test]
    fn test_identity_is_zero() {
        for f in [eucl, seucl, man, hell, kl, is] {
            assert_abs_diff_eq!(f(&A, &A), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_known_values() {
        assert_abs_diff_eq!(seucl(&A, &B), 0.72, epsilon = 1e-12);
        assert_abs_diff_eq!(eucl(&A, &B), 0.72_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(man(&A, &B), 1.2, epsilon = 1e-12);
        let expected_kl = 0.6 * 7.0_f64.ln();
        assert_abs_diff_eq!(kl(&A, &B), expected_kl, epsilon = 1e-12);
    }

    #[test]
    fn test_hellinger_is_bounded() {
        let x = [1.0, 0.0, 0.0, 0.0];
        let y = [0.0, 0.0, 0.0, 1.0];
        assert_abs_diff_eq!(hell(&x, &y), 1.0, epsilon = 1e-12);
    }
}
