//! Bundler plugin descriptors
//!
//! Each plugin is described as `{ "plugin": <name>, "options": {...} }`; the
//! bundler collaborator maps names to implementations.

use camino::Utf8Path;
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};
use ssb_core::types::Mode;
use tracing::warn;
use walkdir::WalkDir;

use super::{Advisories, OrderedList};
use crate::context::ProjectContext;
use crate::env::ClientEnv;
use crate::merge::deep_merge;
use crate::overrides::SelectedOverride;

/// Files in the public dir that the service worker must not precache
const PRECACHE_SKIP: &[&str] = &["asset-manifest.json", "service-worker.js"];

pub(crate) fn descriptor(name: &str, options: Value) -> Value {
    json!({ "plugin": name, "options": options })
}

/// Inputs the plugin list depends on
pub(crate) struct PluginInputs<'a> {
    pub ctx: &'a ProjectContext,
    pub selected: &'a SelectedOverride,
    pub options: &'a Map<String, Value>,
    pub client_env: &'a ClientEnv,
    pub template: &'a Utf8Path,
    pub output_dir: &'a Utf8Path,
}

/// The ordered plugin list
pub(crate) fn plugin_list(inputs: &PluginInputs<'_>, advisories: &mut Advisories) -> Vec<Value> {
    let ctx = inputs.ctx;
    let production = ctx.mode == Mode::Production;
    let sw_disabled = matches!(inputs.selected.get("disableSW"), Some(Value::Bool(true)));

    let moment = moment_locales(inputs.options, advisories);
    let user_plugins = advisories.array(inputs.selected.as_map(), "plugins").to_vec();
    let copy_patterns = copy_patterns(inputs, advisories);

    OrderedList::new()
        .append(descriptor("DefinePlugin", inputs.client_env.stringified()))
        .append(html_plugin(inputs, advisories))
        .append(descriptor("CaseSensitivePathsPlugin", json!({})))
        .append(descriptor(
            "ManifestPlugin",
            json!({ "fileName": "asset-manifest.json", "publicPath": ctx.served_path }),
        ))
        .append_if(production, || {
            descriptor("MiniCssExtractPlugin", json!({ "filename": "[name].css" }))
        })
        .append_if(!sw_disabled, || service_worker_plugin(inputs, advisories))
        .append_if(moment.is_some(), || {
            descriptor("MomentLocalesPlugin", moment.unwrap_or_default())
        })
        .extend(user_plugins)
        .append_if(!copy_patterns.is_empty(), || {
            descriptor("CopyPlugin", json!({ "patterns": copy_patterns }))
        })
        .into_vec()
}

fn html_plugin(inputs: &PluginInputs<'_>, advisories: &mut Advisories) -> Value {
    let mut options = json!({
        "filename": "index.html",
        "template": inputs.template,
        "inject": "head",
        "minify": { "collapseWhitespace": true },
    });
    if let Some(extra) = advisories.object(inputs.selected.as_map(), "htmlWebpackPluginOptions") {
        options = deep_merge(options, Value::Object(extra.clone()));
    }
    descriptor("HtmlWebpackPlugin", options)
}

fn service_worker_plugin(inputs: &PluginInputs<'_>, advisories: &mut Advisories) -> Value {
    let ctx = inputs.ctx;
    let mut options = json!({
        "exclude": ["\\.map$", "asset-manifest\\.json$"],
        "navigateFallback": format!("{}/index.html", ctx.public_url),
        "navigateFallbackDenylist": ["^/_"],
    });

    let mut entries = precache_entries(&ctx.paths.public_dir, &ctx.public_url);
    entries.extend(
        advisories
            .array(inputs.selected.as_map(), "additionalManifestEntries")
            .iter()
            .cloned(),
    );
    if !entries.is_empty() {
        options["additionalManifestEntries"] = Value::Array(entries);
    }

    if let Some(caching) = advisories.array_opt(inputs.selected.as_map(), "runtimeCaching") {
        options["runtimeCaching"] = Value::Array(caching.to_vec());
    }

    descriptor("GenerateSW", options)
}

/// `{url, revision}` for every file under the public dir, sorted by path
fn precache_entries(public_dir: &Utf8Path, public_url: &str) -> Vec<Value> {
    if !public_dir.is_dir() {
        return Vec::new();
    }

    WalkDir::new(public_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(public_dir).ok()?;
            let relative = relative.to_str()?.replace('\\', "/");
            if PRECACHE_SKIP.contains(&relative.as_str()) {
                return None;
            }
            let content = match std::fs::read(entry.path()) {
                Ok(content) => content,
                Err(e) => {
                    warn!("not precaching {}: {}", entry.path().display(), e);
                    return None;
                },
            };
            Some(json!({
                "url": format!("{}/{}", public_url, relative),
                "revision": hex::encode(Sha256::digest(&content)),
            }))
        })
        .collect()
}

/// `None` when no locale filter is configured; `""` keeps no locales
fn moment_locales(options: &Map<String, Value>, advisories: &mut Advisories) -> Option<Value> {
    let raw = advisories.string(options, "momentLocales")?;
    if raw.is_empty() {
        return Some(json!({}));
    }

    let locales: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|locale| !locale.is_empty())
        .collect();
    Some(json!({ "localesToKeep": locales }))
}

fn copy_patterns(inputs: &PluginInputs<'_>, advisories: &mut Advisories) -> Vec<Value> {
    let public_dir = &inputs.ctx.paths.public_dir;

    OrderedList::new()
        .append_if(public_dir.is_dir(), || {
            json!({ "from": public_dir, "to": inputs.output_dir })
        })
        .extend(advisories.array(inputs.selected.as_map(), "copyPatterns").iter().cloned())
        .into_vec()
}
