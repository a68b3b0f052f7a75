#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Scratch data tree: `<tmp>/alerts`, `<tmp>/raw_vectors`, `<tmp>/classified`.
pub struct DataDir {
    _dir: TempDir, // keep alive for the life of the test
    pub root: PathBuf,
}

impl DataDir {
    pub fn alerts(&self) -> PathBuf {
        self.root.join("alerts")
    }

    pub fn raw(&self) -> PathBuf {
        self.root.join("raw_vectors")
    }

    pub fn classified(&self) -> PathBuf {
        self.root.join("classified")
    }
}

pub fn setup_data_dir() -> DataDir {
    let dir = TempDir::new().expect("tempdir");
    let root = dir.path().to_path_buf();
    for sub in ["alerts", "raw_vectors", "classified"] {
        fs::create_dir_all(root.join(sub)).expect("mkdir");
    }
    DataDir { _dir: dir, root }
}

/// One bar as a JSON line. `rev_dir` 0 means "no edge".
pub fn bar_line(time: &str, close: f64, rev_dir: i64, rev_avwap: f64) -> String {
    json!({
        "time": format!("{time} UTC"),
        "close": close,
        "high": close + 0.5,
        "low": close - 0.5,
        "volume": 1000,
        "revDir": rev_dir,
        "REV_avwap": rev_avwap,
        "atrRatio": 1.0,
        "tTrendAbs": 60.0,
    })
    .to_string()
}

pub fn write_lines(path: &Path, lines: &[String]) {
    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(path, text).expect("write fixture");
}

pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .expect("read output")
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect()
}

pub fn read_objects(path: &Path) -> Vec<serde_json::Map<String, Value>> {
    read_lines(path)
        .iter()
        .map(|l| match serde_json::from_str(l).expect("json line") {
            Value::Object(m) => m,
            other => panic!("expected object, got {other}"),
        })
        .collect()
}

pub fn jsonl_stems(dir: &Path) -> Vec<String> {
    let mut stems: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|x| x == "jsonl"))
        .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
        .collect();
    stems.sort();
    stems
}

/// Two consecutive segments of `SPY` on 2026-02-22, 5-minute bars: an up move
/// 100 → 103 and a down move 103 → 100.
pub fn write_spy_day(raw: &Path) {
    write_lines(
        &raw.join("SPY_260222_5_0930_0940.jsonl"),
        &[
            bar_line("2026-02-22 09:30:00", 100.0, 1, 100.0),
            bar_line("2026-02-22 09:35:00", 101.0, 0, 100.5),
            bar_line("2026-02-22 09:40:00", 103.0, -1, 101.0),
        ],
    );
    write_lines(
        &raw.join("SPY_260222_5_0940_0950.jsonl"),
        &[
            bar_line("2026-02-22 09:40:00", 103.0, -1, 101.0),
            bar_line("2026-02-22 09:45:00", 102.0, 0, 100.5),
            bar_line("2026-02-22 09:50:00", 100.0, 1, 100.0),
        ],
    );
}
