//! Shape of persisted records as a pure function of `(record, OutputConfig)`.
//!
//! Encoding serializes the record, drops configured fields, applies renames in
//! place (field order is kept) and rounds floats. NaN is written as `null` and
//! never rounded; integers are never touched.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::models::FeatureRecord;

/// Intermediate or raw fields stripped before persisting (table version 1).
pub const STANDARD_DROP_FIELDS: &[&str] = &[
    "slope_pctPerMin",
    "atrNow",
    "atrBase",
    "shockScore",
    "shockDir",
    "tShockScoreTot",
    "tShockDirTot",
    "tTrendAbs",
    "trendDir",
    "inTrendScore",
    "smaCrossDirInd",
    "smaCrossDirHTF",
    "htfSmaFastDir",
    "REV_avwap",
    "TRADE_avwap",
    "open",
    "high",
    "low",
    "hlc3",
    "ohlc4",
    "FSM_State",
    "prev_state",
    "new_state",
    "noneDir",
    "noneScore",
    "tPreDir",
    "tPreCAbs",
    "tPeakDir",
    "htf",
    "htf2",
];

pub const OUTPUT_TABLE_VERSION: u32 = 1;
pub const DEFAULT_ROUND_DIGITS: u32 = 3;

/// Versioned drop/rename/rounding tables applied when persisting records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub version: u32,
    pub round_digits: u32,
    pub drop_fields: Vec<String>,
    /// Old name → new name, applied after dropping.
    pub rename: IndexMap<String, String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            version: OUTPUT_TABLE_VERSION,
            round_digits: DEFAULT_ROUND_DIGITS,
            drop_fields: STANDARD_DROP_FIELDS.iter().map(|s| s.to_string()).collect(),
            rename: IndexMap::new(),
        }
    }
}

impl OutputConfig {
    /// Keeps every field; only rounding applies.
    pub fn keep_all() -> Self {
        Self {
            drop_fields: Vec::new(),
            ..Self::default()
        }
    }
}

/// Rounds half to even. Non-finite input comes back unchanged.
pub fn round_f64(x: f64, digits: u32) -> f64 {
    if !x.is_finite() {
        return x;
    }
    let scale = 10f64.powi(digits as i32);
    let r = (x * scale).round_ties_even() / scale;
    if r.is_finite() { r } else { x }
}

/// Rounds every float inside `value`, recursing into arrays and objects.
pub fn round_floats(value: Value, digits: u32) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => n
            .as_f64()
            .and_then(|f| Number::from_f64(round_f64(f, digits)))
            .map_or(Value::Null, Value::Number),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|v| round_floats(v, digits))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, round_floats(v, digits)))
                .collect(),
        ),
        other => other,
    }
}

/// Applies drop list, renames and rounding to an already-serialized object.
pub fn shape_object(map: Map<String, Value>, cfg: &OutputConfig) -> Map<String, Value> {
    map.into_iter()
        .filter(|(k, _)| !cfg.drop_fields.iter().any(|d| d == k))
        .map(|(k, v)| {
            let k = cfg.rename.get(&k).cloned().unwrap_or(k);
            (k, round_floats(v, cfg.round_digits))
        })
        .collect()
}

/// One output line (without trailing newline) for `record`.
pub fn encode_record(record: &FeatureRecord, cfg: &OutputConfig) -> serde_json::Result<String> {
    match serde_json::to_value(record)? {
        Value::Object(map) => serde_json::to_string(&Value::Object(shape_object(map, cfg))),
        other => serde_json::to_string(&other),
    }
}

/// Decodes a line written by [`encode_record`] with the same config. Renames
/// are reversed; dropped fields come back as their neutral defaults.
pub fn parse_output_line(line: &str, cfg: &OutputConfig) -> serde_json::Result<FeatureRecord> {
    let value: Value = serde_json::from_str(line)?;
    let value = match value {
        Value::Object(map) if !cfg.rename.is_empty() => Value::Object(
            map.into_iter()
                .map(|(k, v)| {
                    let original = cfg
                        .rename
                        .iter()
                        .find(|(_, new)| **new == k)
                        .map(|(old, _)| old.clone());
                    (original.unwrap_or(k), v)
                })
                .collect(),
        ),
        other => other,
    };
    serde_json::from_value(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ties_round_to_even() {
        assert_eq!(round_f64(0.125, 2), 0.12);
        assert_eq!(round_f64(0.375, 2), 0.38);
        assert_eq!(round_f64(-2.5, 0), -2.0);
    }

    #[test]
    fn rounds_floats_only() {
        assert_eq!(round_f64(1.23456, 3), 1.235);
        assert_eq!(round_f64(-0.1234, 3), -0.123);
        assert!(round_f64(f64::NAN, 3).is_nan());
        let v = round_floats(json!({"a": 1.2356, "b": 2.0, "n": 7, "l": [0.12345]}), 3);
        assert_eq!(v, json!({"a": 1.236, "b": 2.0, "n": 7, "l": [0.123]}));
    }

    #[test]
    fn shape_drops_and_renames_in_place() {
        let map = match json!({"a": 1, "slope_pctPerMin": 0.5, "b": 2.22222, "c": 3}) {
            Value::Object(m) => m,
            _ => unreachable!(),
        };
        let mut cfg = OutputConfig::default();
        cfg.rename.insert("b".into(), "beta".into());
        let shaped = shape_object(map, &cfg);
        let keys: Vec<&str> = shaped.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "beta", "c"]);
        assert_eq!(shaped["beta"], json!(2.222));
    }

    #[test]
    fn default_table_is_version_one() {
        let cfg = OutputConfig::default();
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.round_digits, 3);
        assert!(cfg.drop_fields.iter().any(|f| f == "slope_pctPerMin"));
        assert!(OutputConfig::keep_all().drop_fields.is_empty());
    }
}
