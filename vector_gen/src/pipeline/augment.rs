//! Cross-segment pass: annotate each vector with the final scores of the
//! vector that follows it on the same `(ticker, date, tf)`.
//!
//! Runs only after every segment of a group has been scored.

use indexmap::IndexMap;

use crate::models::FeatureRecord;
use crate::models::SegmentName;
use crate::models::vector_key::GroupKey;

/// A scored segment waiting to be written.
#[derive(Debug, Clone)]
pub struct ScoredSegment {
    /// Output stem (the raw segment stem).
    pub stem: String,
    pub name: SegmentName,
    pub records: Vec<FeatureRecord>,
}

/// Buckets segments by group, keeping first-seen group order.
pub fn group_segments(
    segments: impl IntoIterator<Item = ScoredSegment>,
) -> IndexMap<GroupKey, Vec<ScoredSegment>> {
    let mut groups: IndexMap<GroupKey, Vec<ScoredSegment>> = IndexMap::new();
    for s in segments {
        groups.entry(s.name.group()).or_default().push(s);
    }
    groups
}

/// Orders one group by start `HHMM` and copies the last record's scores of
/// segment `i + 1` into every record of segment `i` as `next_*`. The last
/// segment gets nothing.
pub fn attach_next_vector(group: &mut [ScoredSegment]) {
    group.sort_by(|a, b| a.name.start_hhmm.cmp(&b.name.start_hhmm));
    for i in 0..group.len().saturating_sub(1) {
        let Some(next) = group[i + 1].records.last().and_then(FeatureRecord::next_snapshot) else {
            continue;
        };
        for r in &mut group[i].records {
            r.next = Some(next.clone());
        }
    }
}
