//! Per-window feature records and the score fields the scoring pass adds.
//!
//! A [`FeatureRecord`] is produced once per window (a whole segment, or one
//! prefix of it) and later mutated in place by [`crate::scoring`] and by the
//! next-vector augmentation. Field names on the wire match the historical
//! output files, hence the camelCase renames.
//!
//! Undefined floats are NaN in memory and `null` on the wire; decoding maps
//! `null` (or an absent field) back to the group's neutral default.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

fn nan_or_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::NAN))
}

/// Which window a record describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WindowRef {
    /// Prefix `[0..=closing_bar_index]` of the segment stored in `segment_id`.
    Prefix {
        closing_bar_index: usize,
        segment_id: String,
    },
    /// A whole segment, keyed by its [`VectorKey`](crate::models::VectorKey).
    Vector { vector_id: String, ordinal: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(flatten)]
    pub window: WindowRef,
    pub ticker: String,
    pub tf: String,
    pub date: String,
    /// Raw `time` text of the first bar, empty when absent.
    pub start_time: String,
    /// Minutes between first and last parsed timestamps; NaN if either is unparsable.
    #[serde(deserialize_with = "nan_or_f64")]
    pub duration_min: f64,
    pub bars: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    #[serde(deserialize_with = "nan_or_f64")]
    pub p0_close: f64,
    #[serde(deserialize_with = "nan_or_f64")]
    pub p1_close: f64,
    #[serde(deserialize_with = "nan_or_f64")]
    pub delta_pct: f64,
    #[serde(rename = "slope_pctPerMin", deserialize_with = "nan_or_f64")]
    pub slope_pct_per_min: f64,
    #[serde(deserialize_with = "nan_or_f64")]
    pub range_pct: f64,
    #[serde(deserialize_with = "nan_or_f64")]
    pub efficiency: f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            p0_close: f64::NAN,
            p1_close: f64::NAN,
            delta_pct: f64::NAN,
            slope_pct_per_min: f64::NAN,
            range_pct: f64::NAN,
            efficiency: f64::NAN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeStats {
    #[serde(rename = "dollarVol_sum", deserialize_with = "nan_or_f64")]
    pub dollar_vol_sum: f64,
    #[serde(deserialize_with = "nan_or_f64")]
    pub vol_slope: f64,
    #[serde(deserialize_with = "nan_or_f64")]
    pub vol_peak_ratio: f64,
}

impl Default for VolumeStats {
    fn default() -> Self {
        Self {
            dollar_vol_sum: 0.0,
            vol_slope: f64::NAN,
            vol_peak_ratio: f64::NAN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Volatility {
    #[serde(rename = "atrRatio_peak", deserialize_with = "nan_or_f64")]
    pub atr_ratio_peak: f64,
    #[serde(rename = "atrRatio_q50", deserialize_with = "nan_or_f64")]
    pub atr_ratio_q50: f64,
}

impl Default for Volatility {
    fn default() -> Self {
        Self {
            atr_ratio_peak: f64::NAN,
            atr_ratio_q50: f64::NAN,
        }
    }
}

/// Shock, trend, regime and SMA-cross indicator summaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendShock {
    #[serde(rename = "tShockScoreTot_peak", deserialize_with = "nan_or_f64")]
    pub shock_peak: f64,
    #[serde(rename = "tShockScoreTot_density", deserialize_with = "nan_or_f64")]
    pub shock_density: f64,
    #[serde(rename = "tShock_time_to_peak", deserialize_with = "nan_or_f64")]
    pub shock_time_to_peak: f64,
    #[serde(rename = "tTrendAbs_area", deserialize_with = "nan_or_f64")]
    pub trend_abs_area: f64,
    #[serde(rename = "tTrendAbs_active_frac", deserialize_with = "nan_or_f64")]
    pub trend_abs_active_frac: f64,
    #[serde(rename = "inTrendScore_area", deserialize_with = "nan_or_f64")]
    pub in_trend_area: f64,
    #[serde(rename = "tRegimeAbs_active_frac", deserialize_with = "nan_or_f64")]
    pub regime_abs_active_frac: f64,
    #[serde(rename = "smaCrossScoreInd_active_frac", deserialize_with = "nan_or_f64")]
    pub sma_cross_active_frac: f64,
}

impl Default for TrendShock {
    fn default() -> Self {
        Self {
            shock_peak: f64::NAN,
            shock_density: 0.0,
            shock_time_to_peak: f64::NAN,
            trend_abs_area: 0.0,
            trend_abs_active_frac: 0.0,
            in_trend_area: 0.0,
            regime_abs_active_frac: 0.0,
            sma_cross_active_frac: 0.0,
        }
    }
}

/// Close-price structure relative to the reversal anchor and the HTF VWAP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorStructure {
    #[serde(deserialize_with = "nan_or_f64")]
    pub rev_avwap_side_frac: f64,
    pub rev_avwap_cross_count: u32,
    #[serde(deserialize_with = "nan_or_f64")]
    pub rev_avwap_dist_abs_mean_pct: f64,
    #[serde(rename = "htfVwap_side_frac", deserialize_with = "nan_or_f64")]
    pub htf_vwap_side_frac: f64,
    #[serde(rename = "htfVwap_cross_count")]
    pub htf_vwap_cross_count: u32,
}

impl Default for AnchorStructure {
    fn default() -> Self {
        Self {
            rev_avwap_side_frac: 0.0,
            rev_avwap_cross_count: 0,
            rev_avwap_dist_abs_mean_pct: f64::NAN,
            htf_vwap_side_frac: 0.0,
            htf_vwap_cross_count: 0,
        }
    }
}

/// Discrete trade-quality label, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Elite,
    HighQuality,
    Tradable,
    Difficult,
    LowEdge,
    NonTradable,
}

impl Tier {
    /// Maps a tier percentile (0..=100) onto a label.
    pub fn from_percentile(pct: f64) -> Self {
        if pct >= 85.0 {
            Tier::Elite
        } else if pct >= 70.0 {
            Tier::HighQuality
        } else if pct >= 55.0 {
            Tier::Tradable
        } else if pct >= 40.0 {
            Tier::Difficult
        } else if pct >= 25.0 {
            Tier::LowEdge
        } else {
            Tier::NonTradable
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Elite => "elite",
            Tier::HighQuality => "high_quality",
            Tier::Tradable => "tradable",
            Tier::Difficult => "difficult",
            Tier::LowEdge => "low_edge",
            Tier::NonTradable => "non_tradable",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields added by the scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    #[serde(deserialize_with = "nan_or_f64")]
    pub profit_score: f64,
    #[serde(deserialize_with = "nan_or_f64")]
    pub entry_score: f64,
    #[serde(deserialize_with = "nan_or_f64")]
    pub maintain_score: f64,
    #[serde(deserialize_with = "nan_or_f64")]
    pub tradeability_score: f64,
    pub tier: Tier,
}

/// Score snapshot of the chronologically next vector in the same group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextVector {
    #[serde(deserialize_with = "nan_or_f64")]
    pub next_profit_score: f64,
    #[serde(deserialize_with = "nan_or_f64")]
    pub next_entry_score: f64,
    #[serde(deserialize_with = "nan_or_f64")]
    pub next_maintain_score: f64,
    #[serde(deserialize_with = "nan_or_f64")]
    pub next_tradeability_score: f64,
    #[serde(deserialize_with = "nan_or_f64")]
    pub next_delta_pct: f64,
    pub next_tier: Tier,
}

/// Feature record for one window, optionally carrying scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(flatten)]
    pub identity: Identity,
    #[serde(flatten)]
    pub geometry: Geometry,
    #[serde(flatten)]
    pub volume: VolumeStats,
    #[serde(flatten)]
    pub volatility: Volatility,
    #[serde(flatten)]
    pub trend: TrendShock,
    #[serde(flatten)]
    pub anchor: AnchorStructure,
    #[serde(flatten)]
    pub scores: Option<Scores>,
    #[serde(flatten)]
    pub next: Option<NextVector>,
}

impl FeatureRecord {
    /// `|delta_pct|`, NaN when undefined.
    pub fn abs_delta_pct(&self) -> f64 {
        self.geometry.delta_pct.abs()
    }

    /// Snapshot used to annotate the previous vector of the group.
    /// `None` until the record has been scored.
    pub fn next_snapshot(&self) -> Option<NextVector> {
        let s = self.scores.as_ref()?;
        Some(NextVector {
            next_profit_score: s.profit_score,
            next_entry_score: s.entry_score,
            next_maintain_score: s.maintain_score,
            next_tradeability_score: s.tradeability_score,
            next_delta_pct: self.geometry.delta_pct,
            next_tier: s.tier,
        })
    }
}
