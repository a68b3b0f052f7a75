//! Cross-check a raw directory against its classified counterpart.
//!
//! In expanding mode every raw segment file has a classified file with the
//! same stem and one record per bar, so stems and non-blank line counts must
//! agree. Whole-mode output is one line per file and will report mismatches.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::errors::{Error, Result};
use crate::io::sink::JsonlDirSink;
use crate::pipeline::list_files;

/// Largest number of entries listed per section when displayed.
const DISPLAY_LIMIT: usize = 25;

/// Non-blank line count per stem; `None` when the file could not be read.
pub type LineCounts = BTreeMap<String, Option<usize>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountMismatch {
    pub stem: String,
    pub raw: Option<usize>,
    pub classified: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsistencyReport {
    pub raw_files: usize,
    pub classified_files: usize,
    pub in_raw_only: Vec<String>,
    pub in_classified_only: Vec<String>,
    pub count_mismatch: Vec<CountMismatch>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.in_raw_only.is_empty() && self.in_classified_only.is_empty() && self.count_mismatch.is_empty()
    }

    fn from_counts(raw: &LineCounts, classified: &LineCounts) -> Self {
        let mut report = ConsistencyReport {
            raw_files: raw.len(),
            classified_files: classified.len(),
            ..Default::default()
        };
        for (stem, &n) in raw {
            match classified.get(stem) {
                None => report.in_raw_only.push(stem.clone()),
                // unreadable on either side never compares equal
                Some(&m) if n.is_none() || m.is_none() || n != m => report.count_mismatch.push(CountMismatch {
                    stem: stem.clone(),
                    raw: n,
                    classified: m,
                }),
                Some(_) => {}
            }
        }
        report.in_classified_only = classified
            .keys()
            .filter(|k| !raw.contains_key(*k))
            .cloned()
            .collect();
        report
    }
}

fn fmt_count(n: Option<usize>) -> String {
    n.map_or_else(|| "unreadable".to_string(), |n| n.to_string())
}

impl fmt::Display for ConsistencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "raw files:        {}", self.raw_files)?;
        writeln!(f, "classified files: {}", self.classified_files)?;
        if self.is_consistent() {
            return write!(f, "OK: stems and line counts match");
        }
        let sections: [(&str, Vec<String>); 3] = [
            ("missing in classified", self.in_raw_only.clone()),
            ("missing in raw", self.in_classified_only.clone()),
            (
                "line count mismatch",
                self.count_mismatch
                    .iter()
                    .map(|m| format!("{} raw={} classified={}", m.stem, fmt_count(m.raw), fmt_count(m.classified)))
                    .collect(),
            ),
        ];
        for (title, items) in sections.iter().filter(|(_, items)| !items.is_empty()) {
            writeln!(f, "{title}: {}", items.len())?;
            for item in items.iter().take(DISPLAY_LIMIT) {
                writeln!(f, "  {item}")?;
            }
            if items.len() > DISPLAY_LIMIT {
                writeln!(f, "  ... {} more", items.len() - DISPLAY_LIMIT)?;
            }
        }
        Ok(())
    }
}

/// Counts non-blank lines of every `*.jsonl` file in `dir`.
pub fn jsonl_line_counts(dir: &Path) -> Result<LineCounts> {
    if !dir.is_dir() {
        return Err(Error::io(
            dir,
            std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        ));
    }
    let mut counts = LineCounts::new();
    for path in list_files(dir, &[JsonlDirSink::EXTENSION])? {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let n = fs::read_to_string(&path)
            .ok()
            .map(|text| text.lines().filter(|l| !l.trim().is_empty()).count());
        counts.insert(stem.to_string(), n);
    }
    Ok(counts)
}

/// Compares stems and line counts of two directories.
pub fn compare_dirs(raw_dir: &Path, classified_dir: &Path) -> Result<ConsistencyReport> {
    let raw = jsonl_line_counts(raw_dir)?;
    let classified = jsonl_line_counts(classified_dir)?;
    Ok(ConsistencyReport::from_counts(&raw, &classified))
}
