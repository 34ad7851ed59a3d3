use crate::motif::Column;
use std::str::FromStr;

/// How per-position information content is derived from a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IcType {
    /// Bits relative to the background or to a uniform distribution
    #[default]
    Entropy,
    /// Plain column sum, for columns already scaled by their information content
    RawSum,
}

impl FromStr for IcType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entropy" => Ok(IcType::Entropy),
            "raw-sum" => Ok(IcType::RawSum),
            _ => Err(format!(
                "Unknown IC type '{}', must be one of: entropy, raw-sum",
                s
            )),
        }
    }
}

/// Information content of one column, in bits.
///
/// With `relative` set the column is compared to `bkg` (per-symbol
/// contributions below zero are dropped); otherwise it is compared to a
/// uniform distribution over the alphabet.
pub fn position_ic(column: &[f64], bkg: &[f64], ic_type: IcType, relative: bool) -> f64 {
    if ic_type == IcType::RawSum {
        return column.iter().sum();
    }

    if relative {
        return column
            .iter()
            .zip(bkg)
            .map(|(&v, &b)| {
                let ratio = v / b;
                if ratio > 0.0 {
                    (v * ratio.log2()).max(0.0)
                } else {
                    0.0
                }
            })
            .sum();
    }

    let entropy: f64 = column
        .iter()
        .filter(|&&v| v > 0.0)
        .map(|&v| -v * v.log2())
        .sum();
    (column.len() as f64).log2() - entropy
}

pub fn motif_ic(columns: &[Column], bkg: &[f64], ic_type: IcType, relative: bool) -> Vec<f64> {
    columns
        .iter()
        .map(|col| position_ic(col, bkg, ic_type, relative))
        .collect()
}

/// Mean over the non-negative entries; negative entries mark padded or
/// excluded positions. Returns 0 when nothing is left.
pub fn mean_ic(ic: &[f64]) -> f64 {
    let (total, count) = ic
        .iter()
        .filter(|&&v| v >= 0.0)
        .fold((0.0, 0usize), |(total, n), &v| (total + v, n + 1));
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const UNIFORM: [f64; 4] = [0.25; 4];

    #[test]
    fn test_background_column_has_no_relative_ic() {
        let bkg = [0.3, 0.2, 0.2, 0.3];
        assert_abs_diff_eq!(position_ic(&bkg, &bkg, IcType::Entropy, true), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unit_column_has_maximal_ic() {
        let col = [0.0, 0.0, 1.0, 0.0];
        assert_abs_diff_eq!(
            position_ic(&col, &UNIFORM, IcType::Entropy, false),
            2.0,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            position_ic(&col, &UNIFORM, IcType::Entropy, true),
            2.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_uniform_column_has_no_ic() {
        assert_abs_diff_eq!(
            position_ic(&UNIFORM, &UNIFORM, IcType::Entropy, false),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_raw_sum() {
        let col = [0.5, 0.25, 0.1, 0.0];
        assert_abs_diff_eq!(
            position_ic(&col, &UNIFORM, IcType::RawSum, false),
            0.85,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_relative_ic_drops_negative_terms() {
        let col = [0.5, 0.5, 0.0, 0.0];
        // each present symbol contributes 0.5 * log2(2)
        assert_abs_diff_eq!(
            position_ic(&col, &UNIFORM, IcType::Entropy, true),
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_mean_ic_skips_negative() {
        assert_abs_diff_eq!(mean_ic(&[1.0, -1.0, 2.0, -1.0]), 1.5, epsilon = 1e-12);
        assert_eq!(mean_ic(&[-1.0, -1.0]), 0.0);
    }

    #[test]
    fn test_parse_ic_type() {
        assert_eq!("raw-sum".parse::<IcType>(), Ok(IcType::RawSum));
        assert!("bits".parse::<IcType>().is_err());
    }
}
