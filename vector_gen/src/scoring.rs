//! Causal scoring of an ordered record sequence.
//!
//! Records are processed strictly in order. Each rank-based sub-score ranks the
//! current record against a pool holding itself and every earlier record, never
//! a later one, so record `k` scores the same whether or not records after it
//! exist.
//!
//! The profit score is absolute. Its thresholds model a $500 trade unit: $7 is
//! the smallest worthwhile profit (1.4%) and $25 the target (5.0%).

use crate::models::FeatureRecord;
use crate::models::record::{Scores, Tier};

/// Below this `|delta_pct|` a move is not worth trading.
pub const PROFIT_MIN_PCT: f64 = 1.4;
/// At or above this `|delta_pct|` the profit score saturates at 100.
pub const PROFIT_TARGET_PCT: f64 = 5.0;

/// Rank returned for NaN input or a pool without finite members.
pub const NEUTRAL_RANK: f64 = 50.0;

/// `100 * |{v in pool : v <= x}| / |finite pool|`. Non-finite pool members are
/// ignored.
pub fn percentile_rank(pool: &[f64], x: f64) -> f64 {
    if x.is_nan() {
        return NEUTRAL_RANK;
    }
    let (n, leq) = pool
        .iter()
        .filter(|v| v.is_finite())
        .fold((0usize, 0usize), |(n, leq), v| {
            (n + 1, leq + usize::from(*v <= x))
        });
    if n == 0 {
        return NEUTRAL_RANK;
    }
    100.0 * leq as f64 / n as f64
}

/// 0 below [`PROFIT_MIN_PCT`], 100 from [`PROFIT_TARGET_PCT`], linear between.
pub fn profit_score(abs_delta_pct: f64) -> f64 {
    if !abs_delta_pct.is_finite() || abs_delta_pct < PROFIT_MIN_PCT {
        return 0.0;
    }
    ((abs_delta_pct - PROFIT_MIN_PCT) / (PROFIT_TARGET_PCT - PROFIT_MIN_PCT) * 100.0).min(100.0)
}

/// Damps short vectors: 1 bar → 0, 2 → 1/3, 3 → 2/3, 4+ → 1.
pub fn bars_factor(bars: usize) -> f64 {
    (bars.saturating_sub(1) as f64 / 3.0).min(1.0)
}

/// Running pools for one scoring pass. Private to a single call.
#[derive(Debug, Default)]
struct Pools {
    slope: Vec<f64>,
    trend_frac: Vec<f64>,
    trend_area: Vec<f64>,
    cross: Vec<f64>,
    efficiency: Vec<f64>,
    shock: Vec<f64>,
    atr: Vec<f64>,
    tier: Vec<f64>,
}

/// Adds [`Scores`] to every record in place.
///
/// `entry` weighs speed, trend persistence and trend area, and rewards few
/// anchor crossings. `maintain` weighs path efficiency, calm (low shock
/// density), few crossings, and volatility close to the median seen so far.
/// The tier ranks the bars-damped tradeability among the records that pass the
/// hard guard (more than one bar and at least [`PROFIT_MIN_PCT`]).
pub fn score_records(records: &mut [FeatureRecord]) {
    let mut pools = Pools::default();

    for r in records.iter_mut() {
        let abs_d = r.abs_delta_pct();
        let profit = profit_score(abs_d);

        let slope = r.geometry.slope_pct_per_min.abs();
        let trend_frac = r.trend.trend_abs_active_frac;
        let trend_area = r.trend.in_trend_area;
        let cross = f64::from(r.anchor.rev_avwap_cross_count);
        let efficiency = r.geometry.efficiency;
        let shock = r.trend.shock_density;
        let atr = r.volatility.atr_ratio_q50;

        pools.slope.push(slope);
        pools.trend_frac.push(trend_frac);
        pools.trend_area.push(trend_area);
        pools.cross.push(cross);
        pools.efficiency.push(efficiency);
        pools.shock.push(shock);
        pools.atr.push(atr);

        let cross_inv = 100.0 - percentile_rank(&pools.cross, cross);

        let entry = 0.35 * percentile_rank(&pools.slope, slope)
            + 0.25 * percentile_rank(&pools.trend_frac, trend_frac)
            + 0.20 * percentile_rank(&pools.trend_area, trend_area)
            + 0.20 * cross_inv;

        let stability = 100.0 - 2.0 * (percentile_rank(&pools.atr, atr) - 50.0).abs();
        let maintain = 0.35 * percentile_rank(&pools.efficiency, efficiency)
            + 0.25 * (100.0 - percentile_rank(&pools.shock, shock))
            + 0.20 * cross_inv
            + 0.20 * stability;

        let tradeability = if profit.is_finite() && entry.is_finite() && maintain.is_finite() {
            0.40 * profit + 0.30 * entry + 0.30 * maintain
        } else {
            f64::NAN
        };

        let tier = if r.identity.bars <= 1 || abs_d < PROFIT_MIN_PCT || !tradeability.is_finite() {
            Tier::NonTradable
        } else {
            let adjusted = tradeability * bars_factor(r.identity.bars);
            pools.tier.push(adjusted);
            Tier::from_percentile(percentile_rank(&pools.tier, adjusted))
        };

        r.scores = Some(Scores {
            profit_score: profit,
            entry_score: entry,
            maintain_score: maintain,
            tradeability_score: tradeability,
            tier,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_rank_basics() {
        assert_eq!(percentile_rank(&[], 3.0), 50.0);
        assert_eq!(percentile_rank(&[1.0, 2.0], f64::NAN), 50.0);
        assert_eq!(percentile_rank(&[f64::NAN, f64::INFINITY], 1.0), 50.0);
        assert_eq!(percentile_rank(&[1.0, 2.0, 3.0, 4.0], 2.0), 50.0);
        assert_eq!(percentile_rank(&[1.0, 2.0, f64::NAN, 4.0], 4.0), 100.0);
        assert_eq!(percentile_rank(&[1.0, 2.0], 0.5), 0.0);
    }

    #[test]
    fn profit_score_scale() {
        assert_eq!(profit_score(1.0), 0.0);
        assert_eq!(profit_score(1.4), 0.0);
        assert!((profit_score(3.2) - 50.0).abs() < 1e-9);
        assert_eq!(profit_score(5.0), 100.0);
        assert_eq!(profit_score(8.0), 100.0);
        assert_eq!(profit_score(f64::NAN), 0.0);
    }

    #[test]
    fn bars_factor_steps() {
        assert_eq!(bars_factor(0), 0.0);
        assert_eq!(bars_factor(1), 0.0);
        assert!((bars_factor(2) - 1.0 / 3.0).abs() < 1e-12);
        assert!((bars_factor(3) - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(bars_factor(4), 1.0);
        assert_eq!(bars_factor(40), 1.0);
    }

    use crate::models::record::{
        AnchorStructure, Geometry, Identity, TrendShock, Volatility, WindowRef,
    };

    /// The record fields the scoring pass reads.
    #[derive(Clone, Copy)]
    struct Inputs {
        bars: usize,
        delta: f64,
        slope: f64,
        trend_frac: f64,
        trend_area: f64,
        cross: u32,
        eff: f64,
        shock: f64,
        atr: f64,
    }

    const FLAT: Inputs = Inputs {
        bars: 4,
        delta: 0.0,
        slope: 0.1,
        trend_frac: 0.5,
        trend_area: 10.0,
        cross: 1,
        eff: 0.5,
        shock: 0.2,
        atr: 1.0,
    };

    fn record(i: Inputs) -> FeatureRecord {
        FeatureRecord {
            identity: Identity {
                window: WindowRef::Prefix {
                    closing_bar_index: i.bars.saturating_sub(1),
                    segment_id: "X_260222_5_0930_1000".into(),
                },
                ticker: "X".into(),
                tf: "5".into(),
                date: "260222".into(),
                start_time: String::new(),
                duration_min: 5.0,
                bars: i.bars,
            },
            geometry: Geometry {
                delta_pct: i.delta,
                slope_pct_per_min: i.slope,
                efficiency: i.eff,
                ..Default::default()
            },
            volume: Default::default(),
            volatility: Volatility {
                atr_ratio_q50: i.atr,
                ..Default::default()
            },
            trend: TrendShock {
                shock_density: i.shock,
                trend_abs_active_frac: i.trend_frac,
                in_trend_area: i.trend_area,
                ..Default::default()
            },
            anchor: AnchorStructure {
                rev_avwap_cross_count: i.cross,
                ..Default::default()
            },
            scores: None,
            next: None,
        }
    }

    fn scored(inputs: &[Inputs]) -> Vec<Scores> {
        let mut records: Vec<FeatureRecord> = inputs.iter().copied().map(record).collect();
        score_records(&mut records);
        records.into_iter().map(|r| r.scores.unwrap()).collect()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn sub_scores_on_hand_computed_sequence() {
        let s = scored(&[
            Inputs {
                delta: 3.2,
                slope: 0.2,
                trend_frac: 0.5,
                trend_area: 10.0,
                cross: 1,
                eff: 0.6,
                shock: 0.2,
                atr: 1.0,
                ..FLAT
            },
            Inputs {
                delta: -5.0,
                slope: -0.4,
                trend_frac: 0.25,
                trend_area: 20.0,
                cross: 0,
                eff: 0.8,
                shock: 0.1,
                atr: 2.0,
                ..FLAT
            },
        ]);

        // alone in every pool: all ranks are 100, crossings invert to 0
        assert!(close(s[0].profit_score, 50.0));
        assert!(close(s[0].entry_score, 80.0));
        assert!(close(s[0].maintain_score, 35.0));
        assert!(close(s[0].tradeability_score, 54.5));
        assert_eq!(s[0].tier, Tier::Elite);

        // slope 100, trend frac 50, trend area 100, crossings 50 -> inverted 50
        assert!(close(s[1].entry_score, 0.35 * 100.0 + 0.25 * 50.0 + 0.20 * 100.0 + 0.20 * 50.0));
        // efficiency 100, shock 50 -> 50, crossings 50, atr rank 100 -> stability 0
        assert!(close(s[1].maintain_score, 0.35 * 100.0 + 0.25 * 50.0 + 0.20 * 50.0));
        assert!(close(s[1].profit_score, 100.0));
        assert!(close(s[1].tradeability_score, 0.40 * 100.0 + 0.30 * 77.5 + 0.30 * 57.5));
        assert_eq!(s[1].tier, Tier::Elite);
    }

    #[test]
    fn small_move_is_non_tradable_regardless_of_quality() {
        let s = scored(&[
            Inputs { bars: 3, delta: 1.0, ..FLAT },
            Inputs { bars: 3, delta: -1.0, ..FLAT },
            Inputs { bars: 3, delta: 1.4, ..FLAT },
        ]);
        assert_eq!(s[0].tier, Tier::NonTradable);
        assert_eq!(s[1].tier, Tier::NonTradable);
        assert!(s[0].tradeability_score.is_finite());
        assert_eq!(s[2].tier, Tier::Elite);
    }

    #[test]
    fn guarded_records_stay_out_of_the_tier_pool() {
        // identical features everywhere: entry 80, maintain 35, so
        // tradeability is 0.4 * profit + 34.5
        let s = scored(&[
            Inputs { delta: 5.0, ..FLAT },
            Inputs { delta: 1.0, ..FLAT },
            Inputs { delta: 3.2, ..FLAT },
        ]);
        assert!(close(s[1].tradeability_score, 34.5));
        assert_eq!(s[1].tier, Tier::NonTradable);
        // pool {74.5, 54.5} ranks 54.5 at 50; with 34.5 in it, 66.7 would be tradable
        assert!(close(s[2].tradeability_score, 54.5));
        assert_eq!(s[2].tier, Tier::Difficult);
    }

    #[test]
    fn short_vectors_are_damped_before_tiering() {
        let s = scored(&[
            Inputs { bars: 4, delta: 3.2, ..FLAT },
            Inputs { bars: 2, delta: 5.0, ..FLAT },
        ]);
        // 74.5 / 3 ranks below 54.5
        assert!(close(s[1].tradeability_score, 74.5));
        assert_eq!(s[1].tier, Tier::Difficult);
    }
}

