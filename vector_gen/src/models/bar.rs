//! Canonical in-memory representation of one alert bar.
//!
//! Alert files carry a variable set of indicator columns, so a [`Bar`] keeps the
//! raw JSON object and exposes typed, optional lookups on top of it. Every
//! lookup has a documented "absent" answer instead of failing.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Source field names read by the loader, segmenter and feature engine.
pub mod field {
    pub const TIME: &str = "time";
    pub const BAR_INDEX: &str = "bar_index";
    pub const REV_DIR: &str = "revDir";
    pub const CLOSE: &str = "close";
    pub const HIGH: &str = "high";
    pub const LOW: &str = "low";
    pub const VOLUME: &str = "volume";
    pub const ATR_RATIO: &str = "atrRatio";
    pub const SHOCK_TOTAL: &str = "tShockScoreTot";
    pub const TREND_ABS: &str = "tTrendAbs";
    pub const IN_TREND_SCORE: &str = "inTrendScore";
    pub const REGIME_ABS: &str = "tRegimeAbs";
    pub const SMA_CROSS_SCORE: &str = "smaCrossScoreInd";
    pub const REV_AVWAP: &str = "REV_avwap";
    pub const HTF_VWAP: &str = "htfVwap";
}

/// Timestamp layout of the `time` field; anything after the first 19 chars
/// (usually a zone name like `EST`) is ignored.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses `YYYY-MM-DD HH:MM:SS[ anything]`. Returns `None` when the prefix
/// does not match.
pub fn parse_bar_time(s: &str) -> Option<NaiveDateTime> {
    let head = s.trim().get(..19)?;
    NaiveDateTime::parse_from_str(head, TIME_FORMAT).ok()
}

/// Direction of a reversal edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `revDir > 0`
    Up,
    /// `revDir < 0`
    Down,
}

impl Direction {
    pub fn as_i8(self) -> i8 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

/// A single bar: the original JSON object plus its parsed ordering key.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Parsed `time`; `None` sorts before every real timestamp.
    pub timestamp: Option<NaiveDateTime>,

    /// Intra-timestamp sequence number (`bar_index`), 0 when absent or not an integer.
    pub bar_index: i64,

    fields: Map<String, Value>,
}

impl Bar {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        let timestamp = fields
            .get(field::TIME)
            .and_then(Value::as_str)
            .and_then(parse_bar_time);
        let bar_index = fields
            .get(field::BAR_INDEX)
            .and_then(Value::as_i64)
            .unwrap_or(0);
        Self {
            timestamp,
            bar_index,
            fields,
        }
    }

    /// Raw JSON object as loaded.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Whether the source object carries `name` at all (even as `null`).
    pub fn has(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Numeric value of `name`. JSON numbers and numeric strings are accepted;
    /// anything else (absent, `null`, bool, garbage text) is `None`.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.fields.get(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Like [`Bar::number`] but absent values read as NaN, which every
    /// aggregate in the feature engine skips.
    pub fn value(&self, name: &str) -> f64 {
        self.number(name).unwrap_or(f64::NAN)
    }

    /// Same as [`Bar::number`], restricted to finite values.
    pub fn finite(&self, name: &str) -> Option<f64> {
        self.number(name).filter(|v| v.is_finite())
    }

    /// Raw `time` text, if present.
    pub fn time_str(&self) -> Option<&str> {
        self.fields.get(field::TIME).and_then(Value::as_str)
    }

    /// Integer value of `revDir`: integers, integral strings, and floats
    /// truncated toward zero. `None` when missing or non-numeric.
    fn rev_dir_value(&self) -> Option<i64> {
        match self.fields.get(field::REV_DIR)? {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(i),
                None => {
                    let f = n.as_f64()?;
                    f.is_finite().then(|| f.trunc() as i64)
                }
            },
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Reversal direction: only `1` and `-1` carry one.
    pub fn rev_dir(&self) -> Option<Direction> {
        match self.rev_dir_value()? {
            1 => Some(Direction::Up),
            -1 => Some(Direction::Down),
            _ => None,
        }
    }

    /// A bar is a reversal edge iff its `revDir` value is nonzero. Values
    /// outside `±1` are edges without a direction.
    pub fn is_edge(&self) -> bool {
        self.rev_dir_value().is_some_and(|v| v != 0)
    }

    /// Anchor price (`REV_avwap`), finite values only.
    pub fn anchor_price(&self) -> Option<f64> {
        self.finite(field::REV_AVWAP)
    }

    /// `HHMM` of the parsed timestamp, or `"0000"` when it is missing.
    pub fn hhmm(&self) -> String {
        self.timestamp
            .map(|t| t.format("%H%M").to_string())
            .unwrap_or_else(|| "0000".to_string())
    }
}

impl From<Map<String, Value>> for Bar {
    fn from(fields: Map<String, Value>) -> Self {
        Bar::from_fields(fields)
    }
}

impl Serialize for Bar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}
