//! Where closes sit relative to the reversal anchor price (`REV_avwap`) and
//! the higher-timeframe VWAP.

use crate::features::stats;
use crate::models::Bar;
use crate::models::bar::field;
use crate::models::record::AnchorStructure;

/// `close - reference` for bars where both are finite and `keep(reference)` holds.
fn diffs(bars: &[Bar], reference: &str, keep: impl Fn(f64) -> bool) -> Vec<(f64, f64)> {
    bars.iter()
        .filter_map(|b| {
            let c = b.finite(field::CLOSE)?;
            let r = b.finite(reference).filter(|r| keep(*r))?;
            Some((c - r, r))
        })
        .collect()
}

fn side_frac(d: &[f64]) -> f64 {
    d.iter().filter(|v| **v > 0.0).count() as f64 / d.len() as f64
}

pub fn compute(bars: &[Bar]) -> AnchorStructure {
    let mut out = AnchorStructure::default();

    // a zero anchor price would make the distance undefined
    let rev = diffs(bars, field::REV_AVWAP, |r| r != 0.0);
    if !rev.is_empty() {
        let d: Vec<f64> = rev.iter().map(|(d, _)| *d).collect();
        let dist: Vec<f64> = rev.iter().map(|(d, r)| d.abs() / r).collect();
        out.rev_avwap_side_frac = side_frac(&d);
        out.rev_avwap_cross_count = stats::sign_changes(&d);
        out.rev_avwap_dist_abs_mean_pct = stats::mean(&dist) * 100.0;
    }

    let htf = diffs(bars, field::HTF_VWAP, |_| true);
    if !htf.is_empty() {
        let d: Vec<f64> = htf.iter().map(|(d, _)| *d).collect();
        out.htf_vwap_side_frac = side_frac(&d);
        out.htf_vwap_cross_count = stats::sign_changes(&d);
    }
    out
}
