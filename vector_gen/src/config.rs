//! Settings file (`vector_gen.toml`): parsing and validation.
//!
//! Everything is optional; an empty file equals the built-in defaults.
//!
//! ```toml
//! [output]
//! version = 1
//! round_digits = 3
//! drop_fields = ["slope_pctPerMin", "high", "low"]
//!
//! [output.rename]
//! tShock_time_to_peak = "shock_time_to_peak"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::io::output::{OUTPUT_TABLE_VERSION, OutputConfig};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub output: OutputConfig,
}

impl Settings {
    fn validate(&self) -> Result<()> {
        let out = &self.output;
        if out.version != OUTPUT_TABLE_VERSION {
            return Err(Error::Config(format!(
                "unsupported output table version {} (expected {OUTPUT_TABLE_VERSION})",
                out.version
            )));
        }
        if out.round_digits > 12 {
            return Err(Error::Config(format!(
                "round_digits must be <= 12, got {}",
                out.round_digits
            )));
        }
        for (old, new) in &out.rename {
            if new.trim().is_empty() {
                return Err(Error::Config(format!("rename target for {old:?} is empty")));
            }
        }
        Ok(())
    }
}

/// Parses and validates settings from a TOML string.
pub fn load_settings_str(toml_str: &str) -> Result<Settings> {
    let settings: Settings =
        toml::from_str(toml_str).map_err(|e| Error::Config(format!("invalid settings TOML: {e}")))?;
    settings.validate()?;
    Ok(settings)
}

/// Reads a settings file from disk, or returns defaults when `path` is `None`.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        None => Ok(Settings::default()),
        Some(p) => {
            let text = std::fs::read_to_string(p).map_err(|e| Error::io(p, e))?;
            load_settings_str(&text)
        }
    }
}
