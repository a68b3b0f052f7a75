//! Feature engine: one flat [`FeatureRecord`] per bar window.
//!
//! A window is either a whole segment ([`compute_vector_features`]) or each
//! prefix `[0..=k]` of one ([`compute_prefix_records`]). Prefix record `k` is
//! computed from `&bars[..=k]` only, so it can never see later bars.
//!
//! Every group tolerates absent source fields and falls back to the neutral
//! defaults of its record struct (NaN for peaks and means, 0 for fractions,
//! sums and counts).

pub mod anchor;
pub mod geometry;
pub mod stats;
pub mod trend;
pub mod volatility;
pub mod volume;

use crate::models::record::{FeatureRecord, Identity, WindowRef};
use crate::models::{Bar, SegmentName, VectorKey};

/// Where a segment came from, for prefix records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentContext {
    /// Segment file stem, e.g. `SPY_260222_5_0930_0940`.
    pub segment_id: String,
    pub ticker: String,
    pub tf: String,
    pub date: String,
}

impl SegmentContext {
    pub fn new(segment_id: impl Into<String>, name: &SegmentName) -> Self {
        Self {
            segment_id: segment_id.into(),
            ticker: name.ticker.clone(),
            tf: name.tf.clone(),
            date: name.date.clone(),
        }
    }
}

/// Minutes between the first and last parsed timestamps, NaN if either is missing.
pub fn duration_min(bars: &[Bar]) -> f64 {
    match (bars.first(), bars.last()) {
        (Some(first), Some(last)) => match (first.timestamp, last.timestamp) {
            (Some(t0), Some(t1)) => (t1 - t0).num_seconds() as f64 / 60.0,
            _ => f64::NAN,
        },
        _ => f64::NAN,
    }
}

fn build(bars: &[Bar], window: WindowRef, ticker: &str, tf: &str, date: &str) -> FeatureRecord {
    let duration_min = duration_min(bars);
    FeatureRecord {
        identity: Identity {
            window,
            ticker: ticker.to_string(),
            tf: tf.to_string(),
            date: date.to_string(),
            start_time: bars[0].time_str().unwrap_or_default().to_string(),
            duration_min,
            bars: bars.len(),
        },
        geometry: geometry::compute(bars, duration_min),
        volume: volume::compute(bars),
        volatility: volatility::compute(bars),
        trend: trend::compute(bars),
        anchor: anchor::compute(bars),
        scores: None,
        next: None,
    }
}

/// Features of a whole segment; `None` for an empty one.
pub fn compute_vector_features(bars: &[Bar], key: &VectorKey) -> Option<FeatureRecord> {
    if bars.is_empty() {
        return None;
    }
    let window = WindowRef::Vector {
        vector_id: key.vector_id(),
        ordinal: key.ordinal,
    };
    Some(build(bars, window, &key.ticker, &key.tf, &key.date))
}

/// One record per closing bar `k`, each over the expanding window `[0..=k]`.
pub fn compute_prefix_records(bars: &[Bar], ctx: &SegmentContext) -> Vec<FeatureRecord> {
    (0..bars.len())
        .map(|k| {
            let window = WindowRef::Prefix {
                closing_bar_index: k,
                segment_id: ctx.segment_id.clone(),
            };
            build(&bars[..=k], window, &ctx.ticker, &ctx.tf, &ctx.date)
        })
        .collect()
}
