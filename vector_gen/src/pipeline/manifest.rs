//! Index of what a classified directory holds: the distinct tickers, dates
//! and timeframes found in its segment file names, for the chart viewer.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{Error, Result};
use crate::io::sink::JsonlDirSink;
use crate::models::SegmentName;
use crate::pipeline::list_files;

/// File written next to the classified records.
pub const MANIFEST_FILE: &str = "classified-manifest.json";

/// Sorted, de-duplicated name parts. Four-part names count as daily (`D`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub assets: Vec<String>,
    pub dates: Vec<String>,
    pub tf: Vec<String>,
}

/// Scans `*.jsonl` stems in `dir`. Names outside the segment grammar are ignored.
pub fn build_manifest(dir: &Path) -> Result<Manifest> {
    let (mut assets, mut dates, mut tf) = (BTreeSet::new(), BTreeSet::new(), BTreeSet::new());
    for path in list_files(dir, &[JsonlDirSink::EXTENSION])? {
        match SegmentName::from_path(&path) {
            Ok(name) => {
                assets.insert(name.ticker);
                dates.insert(name.date);
                tf.insert(name.tf);
            }
            Err(e) => debug!(file = %path.display(), error = %e, "not a segment file"),
        }
    }
    Ok(Manifest {
        assets: assets.into_iter().collect(),
        dates: dates.into_iter().collect(),
        tf: tf.into_iter().collect(),
    })
}

/// Builds the manifest for `dir` and writes it to `dir/classified-manifest.json`.
pub fn write_manifest(dir: &Path) -> Result<(PathBuf, Manifest)> {
    let manifest = build_manifest(dir)?;
    let path = dir.join(MANIFEST_FILE);
    let text = serde_json::to_string_pretty(&manifest)?;
    fs::write(&path, text).map_err(|e| Error::io(&path, e))?;
    Ok((path, manifest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "{}\n").unwrap();
    }

    #[test]
    fn collects_sorted_unique_parts() {
        let dir = TempDir::new().expect("tempdir");
        touch(dir.path(), "SPY_260222_5_0930_0940.jsonl");
        touch(dir.path(), "SPY_260223_5_0930_0940.jsonl");
        touch(dir.path(), "AAPL_260222_15_1000_1100.jsonl");
        touch(dir.path(), "QQQ_260221_0000_0000.jsonl");
        touch(dir.path(), "garbage.jsonl");
        touch(dir.path(), "SPY_260301_5_0930_0940.txt");

        let m = build_manifest(dir.path()).unwrap();
        assert_eq!(m.assets, vec!["AAPL", "QQQ", "SPY"]);
        assert_eq!(m.dates, vec!["260221", "260222", "260223"]);
        assert_eq!(m.tf, vec!["15", "5", "D"]);
    }

    #[test]
    fn writes_pretty_json_into_the_directory() {
        let dir = TempDir::new().expect("tempdir");
        touch(dir.path(), "SPY_260222_5_0930_0940.jsonl");

        let (path, written) = write_manifest(dir.path()).unwrap();
        assert_eq!(path, dir.path().join(MANIFEST_FILE));
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"assets\""));
        let back: Manifest = serde_json::from_str(&text).unwrap();
        assert_eq!(back, written);
        assert_eq!(back.tf, vec!["5"]);
    }

    #[test]
    fn empty_directory_gives_empty_manifest() {
        let dir = TempDir::new().expect("tempdir");
        assert_eq!(build_manifest(dir.path()).unwrap(), Manifest::default());
    }
}
