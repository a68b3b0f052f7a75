use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use snafu::{Backtrace, ResultExt, Snafu};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SinkError {
    /// An error occurred while trying to write the data.
    #[snafu(display("Failed to write data: {message}"))]
    WriteError {
        message: String,
        backtrace: Backtrace,
    },

    /// A record could not be turned into an output line.
    #[snafu(display("Data conversion error: {message}"))]
    ConversionError {
        message: String,
        backtrace: Backtrace,
    },

    /// A filesystem operation on `path` failed.
    #[snafu(display("I/O error on {}: {source}", path.display()))]
    Io {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },
}

/// Destination for one named batch of already-encoded JSON lines.
pub trait RecordSink {
    /// The type of output returned after a successful write.
    ///
    /// A directory sink returns the path it wrote; a counting sink might
    /// return the number of lines.
    type Output;

    /// Writes `lines` (no trailing newlines) under `stem`, replacing any
    /// previous content for that stem.
    fn write(&self, stem: &str, lines: &[String]) -> Result<Self::Output, SinkError>;
}

/// Encodes each item as one compact JSON line.
pub fn encode_lines<T: Serialize>(items: &[T]) -> Result<Vec<String>, SinkError> {
    items
        .iter()
        .map(|item| {
            serde_json::to_string(item).map_err(|e| {
                ConversionSnafu {
                    message: e.to_string(),
                }
                .build()
            })
        })
        .collect()
}

/// Writes `{dir}/{stem}.jsonl`, one line per record.
#[derive(Debug, Clone)]
pub struct JsonlDirSink {
    dir: PathBuf,
}

impl JsonlDirSink {
    pub const EXTENSION: &'static str = "jsonl";

    /// Creates the directory if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).context(IoSnafu { path: dir.clone() })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, stem: &str) -> PathBuf {
        self.dir.join(format!("{stem}.{}", Self::EXTENSION))
    }

    /// Removes every regular file in the directory (subdirectories are left
    /// alone). Returns how many were removed.
    pub fn clear(&self) -> Result<usize, SinkError> {
        let mut removed = 0;
        let entries = fs::read_dir(&self.dir).context(IoSnafu {
            path: self.dir.clone(),
        })?;
        for entry in entries {
            let path = entry
                .context(IoSnafu {
                    path: self.dir.clone(),
                })?
                .path();
            if path.is_file() {
                fs::remove_file(&path).context(IoSnafu { path: path.clone() })?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

impl RecordSink for JsonlDirSink {
    type Output = PathBuf;

    fn write(&self, stem: &str, lines: &[String]) -> Result<PathBuf, SinkError> {
        if stem.is_empty() || stem.contains(['/', '\\']) {
            return WriteSnafu {
                message: format!("invalid output stem {stem:?}"),
            }
            .fail();
        }
        let path = self.path_for(stem);
        let file = fs::File::create(&path).context(IoSnafu { path: path.clone() })?;
        let mut w = BufWriter::new(file);
        for line in lines {
            w.write_all(line.as_bytes())
                .and_then(|_| w.write_all(b"\n"))
                .context(IoSnafu { path: path.clone() })?;
        }
        w.flush().context(IoSnafu { path: path.clone() })?;
        Ok(path)
    }
}
