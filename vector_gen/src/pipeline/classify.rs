//! Raw segment files → scored, next-vector-annotated feature records.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use indexmap::IndexMap;
use tracing::info;

use crate::errors::Result;
use crate::features::{SegmentContext, compute_prefix_records, compute_vector_features};
use crate::io::output::{OutputConfig, encode_record};
use crate::io::sink::{JsonlDirSink, RecordSink};
use crate::loader::load_path;
use crate::models::vector_key::{GroupKey, build_vector_keys};
use crate::models::{Bar, FeatureRecord, SegmentName, VectorKey};
use crate::pipeline::augment::{ScoredSegment, attach_next_vector, group_segments};
use crate::pipeline::{Skipped, list_files, skip, stem_matches_date};
use crate::scoring::score_records;

/// What one output record describes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// One record per closing bar of each segment, scored within the segment.
    #[default]
    Expanding,
    /// One record per segment, scored across the segments of its group.
    Whole,
}

#[derive(Debug, Clone, Default)]
pub struct ClassifyOptions {
    pub mode: RunMode,
    /// Restrict the run to one `YYMMDD` day and keep other output files.
    pub date: Option<String>,
    pub output: OutputConfig,
}

#[derive(Debug, Default)]
pub struct ClassifyReport {
    pub files_in: usize,
    pub files_out: usize,
    pub records: usize,
    pub skipped: Vec<Skipped>,
}

struct Input {
    path: PathBuf,
    stem: String,
    name: SegmentName,
    bars: Vec<Bar>,
}

/// Classifies every `*.jsonl` file in `raw_dir` into `classified_dir`.
///
/// Without a date filter the output directory is cleared first. Badly named
/// or unreadable files are skipped with a warning. Nothing is written until
/// every group has been scored and annotated.
pub fn run_classify(raw_dir: &Path, classified_dir: &Path, opts: &ClassifyOptions) -> Result<ClassifyReport> {
    let sink = JsonlDirSink::create(classified_dir)?;
    if opts.date.is_none() {
        let removed = sink.clear()?;
        if removed > 0 {
            info!(removed, dir = %classified_dir.display(), "cleared output directory");
        }
    }

    let mut report = ClassifyReport::default();
    let inputs = read_inputs(raw_dir, opts.date.as_deref(), &mut report)?;
    let segments = match opts.mode {
        RunMode::Expanding => classify_expanding(inputs, &mut report),
        RunMode::Whole => classify_whole(inputs, &mut report)?,
    };

    for (group, mut members) in group_segments(segments) {
        attach_next_vector(&mut members);
        for seg in members {
            let lines = seg
                .records
                .iter()
                .map(|r| encode_record(r, &opts.output))
                .collect::<serde_json::Result<Vec<_>>>()?;
            sink.write(&seg.stem, &lines)?;
            report.files_out += 1;
            report.records += lines.len();
        }
        info!(ticker = %group.ticker, date = %group.date, tf = %group.tf, "group classified");
    }
    Ok(report)
}

fn read_inputs(raw_dir: &Path, date: Option<&str>, report: &mut ClassifyReport) -> Result<Vec<Input>> {
    let mut inputs = Vec::new();
    for path in list_files(raw_dir, &[JsonlDirSink::EXTENSION])? {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        if date.is_some_and(|d| !stem_matches_date(&stem, d)) {
            continue;
        }
        report.files_in += 1;
        let name = match SegmentName::from_path(&path) {
            Ok(n) => n,
            Err(e) => {
                skip(&mut report.skipped, &path, e.to_string());
                continue;
            }
        };
        let bars = match load_path(&path) {
            Ok(b) => b,
            Err(e) => {
                skip(&mut report.skipped, &path, e.to_string());
                continue;
            }
        };
        inputs.push(Input { path, stem, name, bars });
    }
    Ok(inputs)
}

fn classify_expanding(inputs: Vec<Input>, report: &mut ClassifyReport) -> Vec<ScoredSegment> {
    let mut out = Vec::with_capacity(inputs.len());
    for input in inputs {
        let ctx = SegmentContext::new(input.stem.clone(), &input.name);
        let mut records = compute_prefix_records(&input.bars, &ctx);
        if records.is_empty() {
            skip(&mut report.skipped, &input.path, "no bars".to_string());
            continue;
        }
        score_records(&mut records);
        out.push(ScoredSegment {
            stem: input.stem,
            name: input.name,
            records,
        });
    }
    out
}

fn classify_whole(inputs: Vec<Input>, report: &mut ClassifyReport) -> Result<Vec<ScoredSegment>> {
    // Names were validated while reading, so this cannot fail on naming.
    let mut keys: HashMap<PathBuf, VectorKey> = build_vector_keys(inputs.iter().map(|i| &i.path))?
        .into_iter()
        .collect();

    let mut groups: IndexMap<GroupKey, Vec<(VectorKey, ScoredSegment)>> = IndexMap::new();
    for input in inputs {
        let Some(key) = keys.remove(&input.path) else {
            continue;
        };
        let Some(record) = compute_vector_features(&input.bars, &key) else {
            skip(&mut report.skipped, &input.path, "no bars".to_string());
            continue;
        };
        groups.entry(input.name.group()).or_default().push((
            key,
            ScoredSegment {
                stem: input.stem,
                name: input.name,
                records: vec![record],
            },
        ));
    }

    let mut out = Vec::new();
    for (_, mut members) in groups {
        members.sort_by_key(|(key, _)| key.ordinal);
        let mut records: Vec<FeatureRecord> = members
            .iter_mut()
            .filter_map(|(_, seg)| seg.records.pop())
            .collect();
        score_records(&mut records);
        for ((_, mut seg), record) in members.into_iter().zip(records) {
            seg.records.push(record);
            out.push(seg);
        }
    }
    Ok(out)
}
