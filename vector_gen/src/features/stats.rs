//! NaN-skipping aggregates shared by the feature groups.
//!
//! Only finite values take part; each helper documents what it returns when
//! nothing finite is left.

use std::cmp::Ordering;

use crate::models::Bar;

/// One value per bar for `name`, NaN where the bar lacks a numeric value.
pub fn column(bars: &[Bar], name: &str) -> Vec<f64> {
    bars.iter().map(|b| b.value(name)).collect()
}

fn finite(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
    values.iter().copied().filter(|v| v.is_finite())
}

/// Largest finite value, NaN if none.
pub fn max(values: &[f64]) -> f64 {
    finite(values).fold(f64::NAN, f64::max)
}

/// Smallest finite value, NaN if none.
pub fn min(values: &[f64]) -> f64 {
    finite(values).fold(f64::NAN, f64::min)
}

/// Sum of finite values, 0.0 if none.
pub fn sum(values: &[f64]) -> f64 {
    finite(values).sum()
}

/// Mean of finite values, NaN if none.
pub fn mean(values: &[f64]) -> f64 {
    let (s, n) = finite(values).fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { f64::NAN } else { s / n as f64 }
}

/// Median of finite values (midpoint of the middle pair for even counts), NaN if none.
pub fn median(values: &[f64]) -> f64 {
    let mut v: Vec<f64> = finite(values).collect();
    if v.is_empty() {
        return f64::NAN;
    }
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = v.len() / 2;
    if v.len() % 2 == 1 {
        v[mid]
    } else {
        (v[mid - 1] + v[mid]) / 2.0
    }
}

/// Position of the first finite maximum.
pub fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.iter().copied().enumerate() {
        if !v.is_finite() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

/// Position of the maximum as a fraction of the window, `argmax / (n - 1)`.
/// 0.0 for a one-bar window, NaN when nothing is finite.
pub fn time_to_peak(values: &[f64]) -> f64 {
    match argmax(values) {
        None => f64::NAN,
        Some(_) if values.len() == 1 => 0.0,
        Some(i) => i as f64 / (values.len() - 1) as f64,
    }
}

/// Share of the window at or above `threshold`. Non-finite entries count as
/// inactive but stay in the denominator; an empty window is 0.0.
pub fn active_frac(values: &[f64], threshold: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let active = finite(values).filter(|v| *v >= threshold).count();
    active as f64 / values.len() as f64
}

/// OLS slope of `y` against bar position. Positions span the whole window,
/// non-finite `y` are left out of the sums. NaN for fewer than two bars or no
/// finite `y`.
pub fn ols_slope(y: &[f64]) -> f64 {
    let n = y.len();
    if n < 2 {
        return f64::NAN;
    }
    let y_mean = mean(y);
    if y_mean.is_nan() {
        return f64::NAN;
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let denom: f64 = (0..n).map(|i| (i as f64 - x_mean).powi(2)).sum();
    if denom <= 0.0 {
        return f64::NAN;
    }
    let num: f64 = y
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, v)| (i as f64 - x_mean) * (v - y_mean))
        .sum();
    num / denom
}

/// Sign changes between consecutive differences. A zero difference never
/// counts as a crossing on either side.
pub fn sign_changes(diffs: &[f64]) -> u32 {
    diffs
        .windows(2)
        .filter(|w| {
            let (a, b) = (sign(w[0]), sign(w[1]));
            a != 0 && b != 0 && a != b
        })
        .count() as u32
}

fn sign(v: f64) -> i8 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAN: f64 = f64::NAN;

    #[test]
    fn aggregates_skip_nan() {
        let v = [1.0, NAN, 3.0, 2.0];
        assert_eq!(max(&v), 3.0);
        assert_eq!(min(&v), 1.0);
        assert_eq!(sum(&v), 6.0);
        assert_eq!(mean(&v), 2.0);
        assert_eq!(median(&v), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn all_nan_defaults() {
        let v = [NAN, NAN];
        assert!(max(&v).is_nan());
        assert!(mean(&v).is_nan());
        assert!(median(&v).is_nan());
        assert_eq!(sum(&v), 0.0);
        assert_eq!(active_frac(&v, 50.0), 0.0);
        assert!(time_to_peak(&v).is_nan());
        assert!(ols_slope(&v).is_nan());
    }

    #[test]
    fn time_to_peak_uses_first_max() {
        assert_eq!(time_to_peak(&[1.0, 5.0, 5.0, 2.0, 0.0]), 0.25);
        assert_eq!(time_to_peak(&[7.0]), 0.0);
        assert_eq!(time_to_peak(&[1.0, 2.0]), 1.0);
    }

    #[test]
    fn active_frac_keeps_nan_in_denominator() {
        assert_eq!(active_frac(&[60.0, NAN, 10.0, 50.0], 50.0), 0.5);
        assert_eq!(active_frac(&[], 50.0), 0.0);
    }

    #[test]
    fn slope_of_line() {
        assert!((ols_slope(&[10.0, 20.0, 30.0]) - 10.0).abs() < 1e-12);
        assert_eq!(ols_slope(&[5.0, 5.0, 5.0]), 0.0);
        assert!(ols_slope(&[5.0]).is_nan());
    }

    #[test]
    fn zero_differences_never_cross() {
        assert_eq!(sign_changes(&[1.0, -1.0, 1.0]), 2);
        assert_eq!(sign_changes(&[1.0, 0.0, -1.0]), 0);
        assert_eq!(sign_changes(&[-2.0, -1.0]), 0);
        assert_eq!(sign_changes(&[]), 0);
    }
}
