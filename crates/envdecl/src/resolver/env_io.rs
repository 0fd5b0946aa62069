//! Environment sources: process env, `.env` files, and `.env` text.
//!
//! File and string parsing is delegated to `dotenvy`. File entries never
//! override variables already present in the process environment, matching
//! dotenv convention; string sources stand alone.

use super::{EnvMap, LoadOptions};
use crate::error::ConfigError;
use log::debug;
use std::io::Cursor;
use std::path::Path;

/// Build the environment mapping selected by the options.
pub(super) fn materialize(options: &LoadOptions) -> Result<EnvMap, ConfigError> {
    if let Some(path) = &options.use_file {
        from_env_file(path)
    } else if let Some(text) = &options.use_string {
        from_env_string(text)
    } else {
        debug!("using live process environment");
        Ok(process_env())
    }
}

/// Snapshot of the live process environment.
fn process_env() -> EnvMap {
    std::env::vars().collect()
}

/// Process environment plus the entries of a `.env`-format file; existing
/// process variables win.
fn from_env_file(path: &Path) -> Result<EnvMap, ConfigError> {
    debug!("loading env file (path={})", path.display());
    let mut env = process_env();
    for item in dotenvy::from_path_iter(path)? {
        let (key, value) = item?;
        env.entry(key).or_insert(value);
    }
    Ok(env)
}

/// Only the entries parsed from `.env`-format text.
fn from_env_string(text: &str) -> Result<EnvMap, ConfigError> {
    debug!("parsing env text (len={})", text.len());
    let mut env = EnvMap::new();
    for item in dotenvy::from_read_iter(Cursor::new(text.as_bytes())) {
        let (key, value) = item?;
        env.insert(key, value);
    }
    Ok(env)
}
