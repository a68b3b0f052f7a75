//! Bar loader: JSON Lines in, time-ordered [`Bar`]s out.
//!
//! Blank lines and lines that are not a JSON object are skipped one by one;
//! only an unreadable source fails the whole load.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::errors::{Error, Result};
use crate::models::Bar;

/// Parses candidate lines into bars and returns them in canonical order.
pub fn load_lines<I, S>(lines: I) -> Vec<Bar>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut bars = Vec::new();
    for (lineno, line) in lines.into_iter().enumerate() {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(Value::Object(fields)) => bars.push(Bar::from_fields(fields)),
            Ok(_) => debug!(line = lineno + 1, "skipping non-object line"),
            Err(e) => debug!(line = lineno + 1, error = %e, "skipping malformed line"),
        }
    }
    sort_bars(&mut bars);
    bars
}

/// Reads a JSON Lines file and returns its bars in canonical order.
///
/// Lines that are not valid UTF-8 are skipped like malformed JSON; only
/// failing to open or read the file is an error.
pub fn load_path(path: &Path) -> Result<Vec<Bar>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut lines = Vec::new();
    let mut buf = Vec::new();
    let mut lineno = 0usize;
    loop {
        buf.clear();
        let n = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| Error::io(path, e))?;
        if n == 0 {
            break;
        }
        lineno += 1;
        match std::str::from_utf8(&buf) {
            Ok(line) => lines.push(line.to_string()),
            Err(e) => debug!(line = lineno, error = %e, "skipping non-UTF-8 line"),
        }
    }
    Ok(load_lines(lines))
}

/// Stable sort by `(timestamp, bar_index)`; unparsable timestamps come first.
pub fn sort_bars(bars: &mut [Bar]) {
    bars.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then(a.bar_index.cmp(&b.bar_index))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_by_time_then_bar_index() {
        let bars = load_lines([
            r#"{"time":"2026-02-22 09:35:00 UTC","bar_index":2}"#,
            r#"{"time":"2026-02-22 09:30:00 UTC","bar_index":1}"#,
            r#"{"time":"2026-02-22 09:30:00 UTC","bar_index":0}"#,
        ]);
        let idx: Vec<i64> = bars.iter().map(|b| b.bar_index).collect();
        assert_eq!(idx, vec![0, 1, 2]);
    }

    #[test]
    fn skips_blank_and_malformed_lines() {
        let bars = load_lines([
            "",
            "   ",
            "{not json",
            "[1,2,3]",
            r#"{"time":"2026-02-22 09:30:00 UTC","close":1.0}"#,
        ]);
        assert_eq!(bars.len(), 1);
    }

    #[test]
    fn unparsable_time_sorts_first() {
        let bars = load_lines([
            r#"{"time":"2026-02-22 09:30:00 UTC","bar_index":1}"#,
            r#"{"time":"garbage","bar_index":5}"#,
            r#"{"bar_index":3}"#,
        ]);
        let idx: Vec<i64> = bars.iter().map(|b| b.bar_index).collect();
        assert_eq!(idx, vec![3, 5, 1]);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(load_lines(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn invalid_utf8_line_is_skipped() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("X_260222_5.jsonl");
        let mut bytes = br#"{"time":"2026-02-22 09:30:00 UTC","close":1.0}"#.to_vec();
        bytes.extend_from_slice(b"\n{\"note\":\"\xff\xfe\"}\n");
        bytes.extend_from_slice(br#"{"time":"2026-02-22 09:35:00 UTC","close":2.0}"#);
        std::fs::write(&path, bytes).unwrap();

        let bars = load_path(&path).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[1].number("close"), Some(2.0));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_path(Path::new("/definitely/not/here.jsonl")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
