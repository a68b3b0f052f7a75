//! Alerts file → raw segment files.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::Result;
use crate::io::sink::{JsonlDirSink, RecordSink, encode_lines};
use crate::loader::load_path;
use crate::models::Bar;
use crate::pipeline::{Skipped, list_files, skip};
use crate::sanity::log_segment_violations;
use crate::segment::split_segments;

/// Outcome of splitting one alerts file.
#[derive(Debug)]
pub struct FileSplit<O> {
    pub written: Vec<O>,
    pub sanity_violations: usize,
}

/// Totals of a directory split.
#[derive(Debug, Default)]
pub struct SplitReport {
    pub files: usize,
    pub vectors: usize,
    pub sanity_violations: usize,
    pub written: Vec<PathBuf>,
    pub skipped: Vec<Skipped>,
}

/// Segments already-loaded bars and writes one record set per segment;
/// stems are `{parent}_{startHHMM}_{endHHMM}`.
pub fn split_bars<S: RecordSink>(bars: &[Bar], sink: &S, parent: &str) -> Result<FileSplit<S::Output>> {
    let mut out = FileSplit {
        written: Vec::new(),
        sanity_violations: 0,
    };
    for seg in split_segments(bars) {
        let label = seg.label(parent);
        out.sanity_violations += log_segment_violations(&seg, &label);
        let lines = encode_lines(seg.bars())?;
        out.written.push(sink.write(&label, &lines)?);
    }
    Ok(out)
}

/// Loads and splits one alerts file.
pub fn split_file<S: RecordSink>(path: &Path, sink: &S, parent: &str) -> Result<FileSplit<S::Output>> {
    let bars = load_path(path)?;
    split_bars(&bars, sink, parent)
}

/// Clears `raw_dir`, then splits every `*.json` / `*.jsonl` file in `alerts_dir`.
///
/// An alerts file that cannot be read is skipped with a warning; the run goes
/// on with the remaining files. Write failures abort the run.
pub fn run_split(alerts_dir: &Path, raw_dir: &Path) -> Result<SplitReport> {
    let sink = JsonlDirSink::create(raw_dir)?;
    sink.clear()?;

    let mut report = SplitReport::default();
    for path in list_files(alerts_dir, &["json", "jsonl"])? {
        let parent = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let bars = match load_path(&path) {
            Ok(bars) => bars,
            Err(e) => {
                skip(&mut report.skipped, &path, e.to_string());
                continue;
            }
        };
        let split = split_bars(&bars, &sink, &parent)?;
        report.files += 1;
        if !split.written.is_empty() {
            info!(file = %path.display(), vectors = split.written.len(), "split");
        }
        report.vectors += split.written.len();
        report.sanity_violations += split.sanity_violations;
        report.written.extend(split.written);
    }
    Ok(report)
}
