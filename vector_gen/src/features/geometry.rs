//! Price geometry of a window: move size, speed, range and path efficiency.

use crate::features::stats::{self, column};
use crate::models::Bar;
use crate::models::bar::field;
use crate::models::record::Geometry;

/// All NaN when no bar carries `close`. `high`/`low` fall back to `close`
/// when the window has no such field at all.
pub fn compute(bars: &[Bar], duration_min: f64) -> Geometry {
    if bars.is_empty() || !bars.iter().any(|b| b.has(field::CLOSE)) {
        return Geometry::default();
    }
    let p0 = bars[0].value(field::CLOSE);
    let p1 = bars[bars.len() - 1].value(field::CLOSE);
    let delta = p1 - p0;
    let delta_pct = if p0 != 0.0 {
        delta / p0 * 100.0
    } else {
        f64::NAN
    };
    let slope_pct_per_min = if duration_min != 0.0 {
        delta_pct / duration_min
    } else {
        f64::NAN
    };

    let hi = stats::max(&column(bars, extreme_field(bars, field::HIGH)));
    let lo = stats::min(&column(bars, extreme_field(bars, field::LOW)));
    let range = hi - lo;
    let range_pct = if p0 != 0.0 {
        range / p0 * 100.0
    } else {
        f64::NAN
    };
    let efficiency = if range != 0.0 {
        delta.abs() / range
    } else {
        f64::NAN
    };

    Geometry {
        p0_close: p0,
        p1_close: p1,
        delta_pct,
        slope_pct_per_min,
        range_pct,
        efficiency,
    }
}

fn extreme_field<'a>(bars: &[Bar], name: &'a str) -> &'a str {
    if bars.iter().any(|b| b.has(name)) {
        name
    } else {
        field::CLOSE
    }
}
