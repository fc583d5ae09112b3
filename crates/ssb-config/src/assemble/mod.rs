//! Effective configuration assembly
//!
//! Built-in defaults are derived from the [`ProjectContext`] and the selected
//! override, then the override's raw `webpack` passthrough is deep-merged on
//! top. The derived plugin list, rule chain and performance budget are put
//! back after that merge, so the passthrough cannot replace them.
//!
//! Assembly never fails. Recognized keys with the wrong shape are skipped and
//! reported as [`Advisory`] values next to the configuration.

mod plugins;
mod rules;

use std::fmt;

use camino::Utf8PathBuf;
use serde::Serialize;
use serde_json::{json, Map, Value};
use ssb_core::types::Mode;
use ssb_core::utils::parse_size;
use tracing::{debug, warn};

use crate::context::{check_required_files, ProjectContext};
use crate::env::{self, ClientEnv, RawEnv};
use crate::merge::{deep_merge, ConfigLayering};
use crate::overrides::{self, json_type_name, OverrideSource, SelectedOverride};
use crate::ConfigResult;

/// Keys of the final tree owned by the assembler
const DERIVED_KEYS: &[&str] = &["plugins", "performance"];

/// A non-fatal problem found while assembling
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    /// The override key the problem concerns
    pub key: String,
    pub message: String,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

/// The configuration plus everything that was ignored on the way
#[derive(Debug, Clone, PartialEq)]
pub struct Assembly {
    pub config: EffectiveConfig,
    pub advisories: Vec<Advisory>,
}

/// The fully resolved configuration handed to the bundler
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfig {
    pub mode: Mode,
    pub served_path: String,
    pub public_url: String,
    pub src_paths: Vec<Utf8PathBuf>,
    pub use_yarn: bool,
    pub app_template: Utf8PathBuf,
    pub app_index: Utf8PathBuf,
    /// Raw client environment, before stringification
    pub env: RawEnv,
    pub webpack: Value,
}

impl EffectiveConfig {
    /// Fail if the template or entry module is missing
    pub fn check_required_files(&self) -> ConfigResult<()> {
        check_required_files(&[&self.app_template, &self.app_index])
    }

    /// Deterministic pretty JSON
    pub fn to_json_pretty(&self) -> String {
        // Serializing plain strings, paths and JSON values cannot fail
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// Select the override for the context's mode and assemble
pub fn assemble(ctx: &ProjectContext, raw: Option<&OverrideSource>) -> Assembly {
    let client_env = ClientEnv::from_env(&ctx.env, ctx.mode, &ctx.public_url);
    let selected = overrides::select(raw, &client_env.raw, ctx.mode, &ctx.override_context());
    assemble_selected(ctx, &selected)
}

/// Assemble from an already selected override
pub fn assemble_selected(ctx: &ProjectContext, selected: &SelectedOverride) -> Assembly {
    let mut advisories = Advisories::default();
    let mode = ctx.mode;
    let options = ConfigLayering::builder_options(ctx.manifest.as_ref(), selected);
    let selected_map = selected.as_map();

    let mut client_env = ClientEnv::from_env(&ctx.env, mode, &ctx.public_url);
    if let Some(extra) = advisories.object(selected_map, "env") {
        client_env.overlay(extra);
    }

    let ts_config = existing_override(ctx, selected_map, "tsConfigPath", &mut advisories)
        .unwrap_or_else(|| ctx.paths.ts_config.clone());
    let app_index = existing_override(ctx, selected_map, "appIndex", &mut advisories)
        .unwrap_or_else(|| ctx.paths.app_index.clone());
    let output_dir = match mode {
        Mode::Development => ctx.paths.app_build.clone(),
        Mode::Production => ctx.paths.app_dist.clone(),
    };

    let plugins = plugins::plugin_list(
        &plugins::PluginInputs {
            ctx,
            selected,
            options: &options,
            client_env: &client_env,
            template: &ctx.paths.app_template,
            output_dir: &output_dir,
        },
        &mut advisories,
    );

    let extra_loaders = advisories.array(selected_map, "extraLoaders").to_vec();
    let postcss_options = advisories.object(selected_map, "postcssOptions");
    let module_rules = rules::module_rules(mode, &ts_config, &extra_loaders, postcss_options);
    let performance = performance(mode, &options, &mut advisories);

    let modules: Vec<String> = std::iter::once("node_modules".to_string())
        .chain(env::node_path(&ctx.env))
        .collect();

    let defaults = json!({
        "mode": mode.as_str(),
        "entry": { "index": app_index },
        "devtool": "source-map",
        "output": {
            "pathinfo": true,
            "path": output_dir,
            "publicPath": ctx.served_path,
        },
        "resolve": {
            "modules": modules,
            "extensions": [".js", ".ts", ".json"],
        },
        "module": {
            "strictExportPresence": true,
            "rules": module_rules,
        },
        "plugins": plugins,
        "performance": performance,
    });

    let webpack = match advisories.object(selected_map, "webpack") {
        Some(passthrough) => {
            let merged = deep_merge(defaults.clone(), Value::Object(passthrough.clone()));
            reassert_derived(merged, &defaults, &mut advisories)
        },
        None => defaults,
    };

    debug!("assembled {} configuration with {} advisories", mode, advisories.len());

    Assembly {
        config: EffectiveConfig {
            mode,
            served_path: ctx.served_path.clone(),
            public_url: ctx.public_url.clone(),
            src_paths: ctx.src_paths.clone(),
            use_yarn: ctx.use_yarn,
            app_template: ctx.paths.app_template.clone(),
            app_index,
            env: client_env.raw,
            webpack,
        },
        advisories: advisories.into_vec(),
    }
}

/// Put the derived plugin list, rule chain and performance budget back
fn reassert_derived(mut merged: Value, defaults: &Value, advisories: &mut Advisories) -> Value {
    let Some(tree) = merged.as_object_mut() else {
        return defaults.clone();
    };

    for key in DERIVED_KEYS {
        if tree.get(*key) != defaults.get(*key) {
            advisories.push(
                format!("webpack.{}", key),
                "is derived by the builder; the passthrough value was ignored",
            );
            tree.insert(key.to_string(), defaults[*key].clone());
        }
    }

    let rules = defaults["module"]["rules"].clone();
    match tree.get_mut("module").and_then(Value::as_object_mut) {
        Some(module) => {
            if module.get("rules") != Some(&rules) {
                advisories.push(
                    "webpack.module.rules",
                    "is derived by the builder; use `extraLoaders` to add rules",
                );
                module.insert("rules".to_string(), rules);
            }
        },
        None => {
            advisories.push("webpack.module", "expected an object; using the defaults");
            tree.insert("module".to_string(), defaults["module"].clone());
        },
    }

    merged
}

/// A path override that only applies when the file exists
fn existing_override(
    ctx: &ProjectContext,
    selected: &Map<String, Value>,
    key: &str,
    advisories: &mut Advisories,
) -> Option<Utf8PathBuf> {
    let relative = advisories.string(selected, key)?;
    let resolved = ctx.resolver.resolve(relative);
    if resolved.exists() {
        Some(resolved)
    } else {
        advisories.push(key, format!("{} does not exist; keeping the default", resolved));
        None
    }
}

fn performance(mode: Mode, options: &Map<String, Value>, advisories: &mut Advisories) -> Value {
    let mut performance = Map::new();
    if mode == Mode::Development {
        performance.insert("hints".to_string(), Value::Bool(false));
    }

    match options.get("sizeHints") {
        None | Some(Value::Null) => {},
        Some(Value::Bool(false)) => {
            performance.insert("hints".to_string(), Value::Bool(false));
        },
        Some(Value::String(s)) if s == "warning" || s == "error" => {
            performance.insert("hints".to_string(), Value::String(s.clone()));
        },
        Some(other) => advisories.push(
            "sizeHints",
            format!("expected false, \"warning\" or \"error\", found {}", other),
        ),
    }

    for key in ["maxEntrypointSize", "maxAssetSize"] {
        let Some(value) = options.get(key) else { continue };
        match parse_size(value) {
            Some(bytes) if bytes > 0 => {
                performance.insert(key.to_string(), json!(bytes));
            },
            Some(_) => {},
            None if matches!(value, Value::Null | Value::Bool(false)) => {},
            None => advisories.push(key, format!("cannot parse size {}; no limit applied", value)),
        }
    }

    Value::Object(performance)
}

/// Ordered list built by appending, optionally conditionally
#[derive(Debug)]
pub(crate) struct OrderedList<T>(Vec<T>);

impl<T> OrderedList<T> {
    pub(crate) fn new() -> Self {
        Self(Vec::new())
    }

    pub(crate) fn append(mut self, item: T) -> Self {
        self.0.push(item);
        self
    }

    pub(crate) fn append_if(self, condition: bool, item: impl FnOnce() -> T) -> Self {
        if condition {
            self.append(item())
        } else {
            self
        }
    }

    pub(crate) fn extend(mut self, items: impl IntoIterator<Item = T>) -> Self {
        self.0.extend(items);
        self
    }

    pub(crate) fn into_vec(self) -> Vec<T> {
        self.0
    }
}

/// Collects advisories and reads recognized keys leniently
#[derive(Debug, Default)]
pub(crate) struct Advisories(Vec<Advisory>);

impl Advisories {
    pub(crate) fn push(&mut self, key: impl Into<String>, message: impl Into<String>) {
        let advisory = Advisory {
            key: key.into(),
            message: message.into(),
        };
        warn!("{}", advisory);
        self.0.push(advisory);
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn into_vec(self) -> Vec<Advisory> {
        self.0
    }

    /// `map[key]` as an array; absent, null or malformed reads as empty
    pub(crate) fn array<'a>(&mut self, map: &'a Map<String, Value>, key: &str) -> &'a [Value] {
        self.array_opt(map, key).unwrap_or(&[])
    }

    pub(crate) fn array_opt<'a>(
        &mut self,
        map: &'a Map<String, Value>,
        key: &str,
    ) -> Option<&'a [Value]> {
        match map.get(key)? {
            Value::Array(items) => Some(items),
            other => self.mismatch(key, "an array", other),
        }
    }

    pub(crate) fn object<'a>(
        &mut self,
        map: &'a Map<String, Value>,
        key: &str,
    ) -> Option<&'a Map<String, Value>> {
        match map.get(key)? {
            Value::Object(inner) => Some(inner),
            other => self.mismatch(key, "an object", other),
        }
    }

    pub(crate) fn string<'a>(&mut self, map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
        match map.get(key)? {
            Value::String(s) => Some(s),
            other => self.mismatch(key, "a string", other),
        }
    }

    fn mismatch<T>(&mut self, key: &str, expected: &str, found: &Value) -> Option<T> {
        if !found.is_null() {
            self.push(
                key,
                format!("expected {}, found {}; ignored", expected, json_type_name(found)),
            );
        }
        None
    }
}

#[cfg(test)]
mod tests;
