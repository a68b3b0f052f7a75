use std::path::PathBuf;

use thiserror::Error;

/// An environment variable required by the application is not set (or is blank).
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads an environment variable, returning a structured error if it's missing.
///
/// Blank values are treated the same as unset ones, so `FOO= cmd` does not
/// silently resolve to an empty path.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(MissingEnvVarError(name.to_string())),
    }
}

/// Resolves a directory from an explicit CLI value, falling back to an
/// environment variable.
pub fn dir_from_arg_or_env(
    arg: Option<PathBuf>,
    name: &str,
) -> Result<PathBuf, MissingEnvVarError> {
    match arg {
        Some(p) => Ok(p),
        None => get_env_var(name).map(PathBuf::from),
    }
}
