use crate::features::stats::{self, column};
use crate::models::Bar;
use crate::models::bar::field;
use crate::models::record::VolumeStats;

/// Dollar volume, volume trend and volume spike ratio.
pub fn compute(bars: &[Bar]) -> VolumeStats {
    let vol = column(bars, field::VOLUME);
    let close = column(bars, field::CLOSE);
    let dollar: Vec<f64> = close.iter().zip(&vol).map(|(c, v)| c * v).collect();

    let med = stats::median(&vol);
    let vol_peak_ratio = if med.is_nan() || med == 0.0 {
        f64::NAN
    } else {
        stats::max(&vol) / med
    };

    VolumeStats {
        dollar_vol_sum: stats::sum(&dollar),
        vol_slope: stats::ols_slope(&vol),
        vol_peak_ratio,
    }
}
