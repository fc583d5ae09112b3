//! Environment snapshot, `.env` files and the client environment
//!
//! The process environment is read once into an [`EnvVars`] snapshot; nothing
//! in the engine consults `std::env` afterwards and nothing writes to it.

use std::collections::BTreeMap;

use camino::Utf8Path;
use serde::Serialize;
use serde_json::{Map, Value};
use ssb_core::error::SsbError;
use ssb_core::types::Mode;
use tracing::debug;

use crate::paths::ProjectPaths;
use crate::ConfigResult;

/// Snapshot of environment variables
pub type EnvVars = BTreeMap<String, String>;

/// Variables exposed to the bundled app, before stringification
pub type RawEnv = BTreeMap<String, Value>;

/// Variables with this prefix are forwarded to the bundled app
pub const APP_ENV_PREFIX: &str = "SSB_APP_";

#[cfg(windows)]
const PATH_DELIMITER: char = ';';
#[cfg(not(windows))]
const PATH_DELIMITER: char = ':';

/// Capture the current process environment
pub fn snapshot() -> EnvVars {
    std::env::vars().collect()
}

/// Mode requested through `NODE_ENV`, then `BABEL_ENV`
pub fn detect_mode(env: &EnvVars) -> Option<Mode> {
    ["NODE_ENV", "BABEL_ENV"]
        .iter()
        .filter_map(|key| env.get(*key))
        .find_map(|value| value.parse().ok())
}

/// Extra module resolution roots from `NODE_PATH`, empty segments dropped
pub fn node_path(env: &EnvVars) -> Vec<String> {
    env.get("NODE_PATH")
        .map(|value| {
            value
                .split(PATH_DELIMITER)
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Whether build warnings must fail the build: `CI` is set to anything but
/// an empty string or `false` (case-insensitive).
pub fn ci_treats_warnings_as_errors(env: &EnvVars) -> bool {
    env.get("CI")
        .map(|value| !value.is_empty() && !value.eq_ignore_ascii_case("false"))
        .unwrap_or(false)
}

/// `.env` files for `mode`, highest priority first
pub fn dotenv_files(paths: &ProjectPaths, mode: Mode) -> Vec<camino::Utf8PathBuf> {
    let base = paths.dotenv.as_str();
    vec![
        format!("{}.{}.local", base, mode).into(),
        format!("{}.local", base).into(),
        format!("{}.{}", base, mode).into(),
        paths.dotenv.clone(),
    ]
}

/// Layer `.env` files under the process snapshot.
///
/// Process variables always win; among files, the first listed by
/// [`dotenv_files`] wins. Missing files are skipped.
pub fn with_dotenv(mut env: EnvVars, paths: &ProjectPaths, mode: Mode) -> ConfigResult<EnvVars> {
    for file in dotenv_files(paths, mode) {
        for (key, value) in read_dotenv(&file)? {
            env.entry(key).or_insert(value);
        }
    }
    Ok(env)
}

fn read_dotenv(path: &Utf8Path) -> ConfigResult<Vec<(String, String)>> {
    if !path.is_file() {
        return Ok(Vec::new());
    }
    debug!("loading {}", path);

    let parse_error = |e: dotenvy::Error| SsbError::ConfigParse {
        file: path.to_string(),
        message: e.to_string(),
    };

    dotenvy::from_path_iter(path)
        .map_err(parse_error)?
        .map(|item| item.map_err(parse_error))
        .collect()
}

/// Environment injected into the bundle as `process.env`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientEnv {
    pub raw: RawEnv,
}

impl ClientEnv {
    /// `NODE_ENV`, `PUBLIC_URL` and every `SSB_APP_*` variable
    pub fn from_env(env: &EnvVars, mode: Mode, public_url: &str) -> Self {
        let mut raw: RawEnv = env
            .iter()
            .filter(|(key, _)| key.starts_with(APP_ENV_PREFIX))
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();

        raw.insert("NODE_ENV".to_string(), Value::String(mode.to_string()));
        raw.insert("PUBLIC_URL".to_string(), Value::String(public_url.to_string()));

        Self { raw }
    }

    /// Overlay extra variables; existing keys are replaced
    pub fn overlay(&mut self, extra: &Map<String, Value>) {
        for (key, value) in extra {
            self.raw.insert(key.clone(), value.clone());
        }
    }

    /// Definitions for the bundler: every value re-encoded as a JSON literal
    pub fn stringified(&self) -> Value {
        let definitions: Map<String, Value> = self
            .raw
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.to_string())))
            .collect();

        let mut wrapper = Map::new();
        wrapper.insert("process.env".to_string(), Value::Object(definitions));
        Value::Object(wrapper)
    }
}
