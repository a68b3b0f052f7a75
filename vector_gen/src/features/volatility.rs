use crate::features::stats::{self, column};
use crate::models::Bar;
use crate::models::bar::field;
use crate::models::record::Volatility;

/// Peak and median of the ATR ratio; both NaN without data.
pub fn compute(bars: &[Bar]) -> Volatility {
    let atr = column(bars, field::ATR_RATIO);
    Volatility {
        atr_ratio_peak: stats::max(&atr),
        atr_ratio_q50: stats::median(&atr),
    }
}
