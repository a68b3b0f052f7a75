//! Shock, trend persistence, regime and SMA-cross summaries.
//!
//! Indicator scores live on a 0..100 scale; a bar is "active" at or above the
//! group's threshold.

use crate::features::stats::{self, column};
use crate::models::Bar;
use crate::models::bar::field;
use crate::models::record::TrendShock;

pub const SHOCK_THRESHOLD: f64 = 50.0;
pub const TREND_THRESHOLD: f64 = 50.0;
pub const REGIME_THRESHOLD: f64 = 50.0;
pub const SMA_THRESHOLD: f64 = 50.0;

pub fn compute(bars: &[Bar]) -> TrendShock {
    let shock = column(bars, field::SHOCK_TOTAL);
    let trend = column(bars, field::TREND_ABS);
    TrendShock {
        shock_peak: stats::max(&shock),
        shock_density: stats::active_frac(&shock, SHOCK_THRESHOLD),
        shock_time_to_peak: stats::time_to_peak(&shock),
        trend_abs_area: stats::sum(&trend),
        trend_abs_active_frac: stats::active_frac(&trend, TREND_THRESHOLD),
        in_trend_area: stats::sum(&column(bars, field::IN_TREND_SCORE)),
        regime_abs_active_frac: stats::active_frac(
            &column(bars, field::REGIME_ABS),
            REGIME_THRESHOLD,
        ),
        sma_cross_active_frac: stats::active_frac(
            &column(bars, field::SMA_CROSS_SCORE),
            SMA_THRESHOLD,
        ),
    }
}
