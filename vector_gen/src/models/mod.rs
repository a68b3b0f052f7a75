//! Canonical in-memory types: bars, segment identity and per-window records.

pub mod bar;
pub mod record;
pub mod vector_key;

pub use bar::Bar;
pub use record::{FeatureRecord, Tier};
pub use vector_key::{SegmentName, VectorKey};
