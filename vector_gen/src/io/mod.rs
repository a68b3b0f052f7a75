//! Output side: record encoding rules and the JSON Lines directory sink.

pub mod output;
pub mod sink;

pub use output::{OutputConfig, encode_record, parse_output_line};
pub use sink::{JsonlDirSink, RecordSink, SinkError};
