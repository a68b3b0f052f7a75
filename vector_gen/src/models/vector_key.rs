//! Segment identity: the filename grammar and the per-day ordinal key.
//!
//! Segment files are named `TICKER_YYMMDD_TF_STARTHHMM_ENDHHMM` (five parts).
//! A four-part name without the timeframe means a daily chart and reads as
//! timeframe [`DAILY_TF`]. Any other shape is a [`NamingError`] that the caller
//! decides to skip or surface.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use indexmap::IndexMap;
use thiserror::Error;

/// Timeframe label implied by a four-part segment name.
pub const DAILY_TF: &str = "D";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NamingError {
    #[error("segment name must have 4 or 5 underscore-separated parts (ticker_date[_tf]_start_end), got {parts}: {name}")]
    PartCount { name: String, parts: usize },

    #[error("segment path has no usable file stem: {0}")]
    NoStem(PathBuf),
}

/// Parsed segment filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SegmentName {
    pub ticker: String,
    pub date: String,
    pub tf: String,
    pub start_hhmm: String,
    pub end_hhmm: String,
}

impl SegmentName {
    /// Parses the stem of `path` (extension ignored).
    pub fn from_path(path: &Path) -> Result<Self, NamingError> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| NamingError::NoStem(path.to_path_buf()))?;
        stem.parse()
    }

    /// `(ticker, date, tf)` this segment belongs to.
    pub fn group(&self) -> GroupKey {
        GroupKey {
            ticker: self.ticker.clone(),
            date: self.date.clone(),
            tf: self.tf.clone(),
        }
    }
}

impl FromStr for SegmentName {
    type Err = NamingError;

    fn from_str(stem: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = stem.split('_').collect();
        let (ticker, date, tf, start, end) = match parts.as_slice() {
            [ticker, date, tf, start, end] => (*ticker, *date, *tf, *start, *end),
            [ticker, date, start, end] => (*ticker, *date, DAILY_TF, *start, *end),
            _ => {
                return Err(NamingError::PartCount {
                    name: stem.to_string(),
                    parts: parts.len(),
                });
            }
        };
        Ok(Self {
            ticker: ticker.to_string(),
            date: date.to_string(),
            tf: tf.to_string(),
            start_hhmm: start.to_string(),
            end_hhmm: end.to_string(),
        })
    }
}

/// A `(ticker, date, tf)` group: the unit inside which ordinals are assigned
/// and the next vector is looked up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey {
    pub ticker: String,
    pub date: String,
    pub tf: String,
}

/// Identity of one vector within its day.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VectorKey {
    pub ticker: String,
    pub tf: String,
    /// `YYMMDD`
    pub date: String,
    /// 1-based, by start time within the group.
    pub ordinal: u32,
}

impl VectorKey {
    /// `ticker_tf_date_ordinal`, lowercased.
    pub fn vector_id(&self) -> String {
        self.to_string().to_lowercase()
    }
}

impl fmt::Display for VectorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}_{}", self.ticker, self.tf, self.date, self.ordinal)
    }
}

/// Assigns ordinals per `(ticker, date, tf)` by sorting members on start `HHMM`.
///
/// Groups come out in first-seen order. The first unparsable name aborts the
/// whole call; callers that want skip-and-continue filter names beforehand.
pub fn build_vector_keys<I, P>(paths: I) -> Result<Vec<(PathBuf, VectorKey)>, NamingError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut groups: IndexMap<GroupKey, Vec<(PathBuf, String)>> = IndexMap::new();
    for p in paths {
        let p = p.as_ref();
        let name = SegmentName::from_path(p)?;
        groups
            .entry(name.group())
            .or_default()
            .push((p.to_path_buf(), name.start_hhmm));
    }

    let mut out = Vec::new();
    for (group, mut items) in groups {
        items.sort_by(|a, b| a.1.cmp(&b.1));
        for (i, (path, _)) in items.into_iter().enumerate() {
            let key = VectorKey {
                ticker: group.ticker.clone(),
                tf: group.tf.clone(),
                date: group.date.clone(),
                ordinal: i as u32 + 1,
            };
            out.push((path, key));
        }
    }
    Ok(out)
}
