//! File-level runs that drive the core over directories.
//!
//! - [`split`]: alerts files → one raw segment file per vector
//! - [`classify`]: raw segment files → scored feature records
//! - [`augment`]: the cross-segment next-vector pass that runs after scoring
//! - [`manifest`]: asset/date/timeframe index of a classified directory

pub mod augment;
pub mod classify;
pub mod manifest;
pub mod split;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::errors::{Error, Result};

/// An input file that produced no output, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub path: PathBuf,
    pub reason: String,
}

pub(crate) fn skip(skipped: &mut Vec<Skipped>, path: &Path, reason: String) {
    warn!(file = %path.display(), %reason, "skipping input file");
    skipped.push(Skipped {
        path: path.to_path_buf(),
        reason,
    });
}

/// Regular files in `dir` whose extension is one of `exts` (case-insensitive),
/// sorted by path.
pub fn list_files(dir: &Path, exts: &[&str]) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| exts.iter().any(|x| x.eq_ignore_ascii_case(e)));
        if path.is_file() && matches {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Sibling directory of `dir` named `name` (`/data/alerts` → `/data/raw_vectors`).
pub fn sibling_dir(dir: &Path, name: &str) -> PathBuf {
    dir.parent().unwrap_or_else(|| Path::new(".")).join(name)
}

/// Whether a segment stem belongs to day `date` (`YYMMDD`).
pub fn stem_matches_date(stem: &str, date: &str) -> bool {
    stem.contains(&format!("_{date}_")) || stem.ends_with(&format!("_{date}"))
}
