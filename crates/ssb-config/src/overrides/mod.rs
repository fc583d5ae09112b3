//! Project override loading and mode selection
//!
//! An override is either a static mapping, read from
//! `static-site-builder.config.json` / `.toml`, or a computed one supplied by
//! a Rust caller. Static mappings may split their settings by mode under
//! `dev`/`development` and `prod`/`production`.

use std::fmt;
use std::sync::Arc;

use camino::Utf8Path;
use serde::Serialize;
use serde_json::{Map, Value};
use ssb_core::error::SsbError;
use ssb_core::types::Mode;
use tracing::{debug, warn};

use crate::env::RawEnv;
use crate::paths::ProjectPaths;
use crate::ConfigResult;

/// Signature of a computed override
pub type ComputeFn = dyn Fn(&RawEnv, Mode, &OverrideContext) -> Value + Send + Sync;

/// Where the project override comes from
#[derive(Clone)]
pub enum OverrideSource {
    /// A mapping, possibly split by mode
    Static(Map<String, Value>),
    /// A function producing the mapping for a given env and mode
    Computed(Arc<ComputeFn>),
}

impl OverrideSource {
    /// Wrap a closure as a computed override
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&RawEnv, Mode, &OverrideContext) -> Value + Send + Sync + 'static,
    {
        OverrideSource::Computed(Arc::new(f))
    }

    /// Load the override file at `path`; `None` if it does not exist
    pub fn load(path: &Utf8Path) -> ConfigResult<Option<Self>> {
        if !path.is_file() {
            debug!("no override file at {}", path);
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| SsbError::io(format!("Failed to read {}", path), e))?;

        let parse_error = |message: String| SsbError::ConfigParse {
            file: path.to_string(),
            message,
        };

        let value: Value = match path.extension() {
            Some("toml") => toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
            _ => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
        };

        match value {
            Value::Object(map) => Ok(Some(OverrideSource::Static(map))),
            other => {
                if is_truthy(&other) {
                    warn!(
                        "ignoring {}: expected an object at the top level, found {}",
                        path,
                        json_type_name(&other)
                    );
                }
                Ok(None)
            },
        }
    }
}

/// JSON truthiness: everything but null, false, 0 and ""
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl fmt::Debug for OverrideSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideSource::Static(map) => f.debug_tuple("Static").field(map).finish(),
            OverrideSource::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Context handed to computed overrides: the public URL and every project path
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideContext {
    pub public_url: String,
    #[serde(flatten)]
    pub paths: ProjectPaths,
}

/// The override mapping that applies to the current mode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectedOverride(Map<String, Value>);

impl SelectedOverride {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Pick the override payload for `mode`.
///
/// A computed source is called and its result used verbatim. A static source
/// uses the `dev`/`prod` sub-mapping, then `development`/`production`, and
/// otherwise the whole mapping. Anything that is not an object becomes `{}`.
pub fn select(
    raw: Option<&OverrideSource>,
    env_raw: &RawEnv,
    mode: Mode,
    ctx: &OverrideContext,
) -> SelectedOverride {
    let selected = match raw {
        None => Value::Null,
        Some(OverrideSource::Computed(compute)) => compute(env_raw, mode, ctx),
        Some(OverrideSource::Static(map)) => [mode.short_name(), mode.as_str()]
            .iter()
            .find_map(|key| map.get(*key))
            .cloned()
            .unwrap_or_else(|| Value::Object(map.clone())),
    };

    match selected {
        Value::Object(map) => SelectedOverride(map),
        _ => SelectedOverride::default(),
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
