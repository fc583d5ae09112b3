//! Module rule chain
//!
//! The bundler tries `oneOf` rules in order and stops at the first match, so
//! project loaders go first and the file-loader catch-all goes last.

use camino::Utf8Path;
use serde_json::{json, Map, Value};
use ssb_core::types::Mode;

use super::OrderedList;
use crate::merge::deep_merge;

const NODE_MODULES: &str = "[/\\\\]node_modules[/\\\\]";

/// Full `module.rules` value: the parser rule followed by the `oneOf` chain
pub(crate) fn module_rules(
    mode: Mode,
    ts_config: &Utf8Path,
    extra_loaders: &[Value],
    postcss_options: Option<&Map<String, Value>>,
) -> Value {
    json!([
        { "parser": { "requireEnsure": false } },
        { "oneOf": one_of(mode, ts_config, extra_loaders, postcss_options) },
    ])
}

pub(crate) fn one_of(
    mode: Mode,
    ts_config: &Utf8Path,
    extra_loaders: &[Value],
    postcss_options: Option<&Map<String, Value>>,
) -> Vec<Value> {
    OrderedList::new()
        .extend(extra_loaders.iter().cloned())
        .append(ts_rule(ts_config))
        .append(js_rule(mode, true))
        .append(js_rule(mode, false))
        .append(css_rule(mode))
        .append(scss_rule(mode, postcss_options))
        .append(file_rule())
        .into_vec()
}

fn ts_rule(ts_config: &Utf8Path) -> Value {
    json!({
        "test": "\\.ts$",
        "exclude": [NODE_MODULES],
        "use": [
            "thread-loader",
            { "loader": "ts-loader", "options": { "configFile": ts_config } },
        ],
    })
}

/// Babel for first-party code (`exclude_vendor`) or, permissively, anything
fn js_rule(mode: Mode, exclude_vendor: bool) -> Value {
    let mut options = json!({ "babelrc": false, "highlightCode": true });
    if exclude_vendor && mode.is_production() {
        options["compact"] = json!(true);
    } else {
        options["compact"] = json!(false);
        options["cacheDirectory"] = json!(true);
    }

    let mut rule = json!({
        "test": "\\.js$",
        "use": ["thread-loader", { "loader": "babel-loader", "options": options }],
    });
    if exclude_vendor {
        rule["exclude"] = json!([NODE_MODULES]);
    }
    rule
}

fn css_rule(mode: Mode) -> Value {
    let uses = match mode {
        Mode::Development => json!(["style-loader", "css-loader"]),
        Mode::Production => json!([
            "mini-css-extract-plugin/loader",
            { "loader": "css-loader", "options": { "sourceMap": true } },
        ]),
    };
    json!({ "test": "\\.css$", "use": uses })
}

fn scss_rule(mode: Mode, postcss_options: Option<&Map<String, Value>>) -> Value {
    let postcss = |defaults: Value| {
        let options = match postcss_options {
            Some(extra) => deep_merge(defaults, Value::Object(extra.clone())),
            None => defaults,
        };
        json!({ "loader": "postcss-loader", "options": options })
    };

    let uses = match mode {
        Mode::Development => OrderedList::new()
            .append(json!("style-loader"))
            .append(json!("css-loader"))
            .append_if(postcss_options.is_some(), || postcss(json!({ "ident": "postcss" })))
            .append(json!("sass-loader"))
            .into_vec(),
        Mode::Production => OrderedList::new()
            .append(json!("mini-css-extract-plugin/loader"))
            .append(json!({
                "loader": "css-loader",
                "options": { "importLoaders": 1, "sourceMap": true },
            }))
            .append(postcss(json!({
                "ident": "postcss",
                "plugins": ["postcss-preset-env"],
                "sourceMap": true,
            })))
            .append(json!({
                "loader": "sass-loader",
                "options": {
                    "sassOptions": { "outputStyle": "compressed" },
                    "sourceMap": true,
                },
            }))
            .into_vec(),
    };

    json!({ "test": "\\.scss$", "use": uses })
}

fn file_rule() -> Value {
    json!({
        "loader": "file-loader",
        "exclude": ["\\.js$", "\\.ts$", "\\.html$", "\\.ejs$", "\\.hbs$", "\\.json$"],
        "options": { "name": "[name].[ext]" },
    })
}
