//! Unit tests for configuration assembly

use super::*;
use crate::env::EnvVars;
use std::fs;
use tempfile::TempDir;

struct Project {
    _temp: TempDir,
    root: Utf8PathBuf,
}

impl Project {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp.path().canonicalize().unwrap()).unwrap();
        fs::create_dir(root.join("src")).unwrap();
        fs::write(root.join("src/index.html"), "<html></html>").unwrap();
        fs::write(root.join("src/index.js"), "console.log(1)").unwrap();
        fs::write(root.join("package.json"), r#"{"homepage": "https://x.test/app"}"#).unwrap();
        Self { _temp: temp, root }
    }

    fn write(&self, relative: &str, content: &str) {
        let path = self.root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn context(&self, mode: Mode) -> ProjectContext {
        ProjectContext::load(&self.root, EnvVars::new(), mode).unwrap()
    }
}

fn selected(value: Value) -> SelectedOverride {
    SelectedOverride::new(value.as_object().unwrap().clone())
}

fn plugin_names(config: &EffectiveConfig) -> Vec<String> {
    config.webpack["plugins"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["plugin"].as_str().unwrap_or("<user>").to_string())
        .collect()
}

fn find_plugin<'a>(config: &'a EffectiveConfig, name: &str) -> Option<&'a Value> {
    config.webpack["plugins"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["plugin"] == name)
}

#[test]
fn test_defaults_without_override() {
    let project = Project::new();
    let ctx = project.context(Mode::Development);

    let assembly = assemble(&ctx, None);
    let webpack = &assembly.config.webpack;

    assert!(assembly.advisories.is_empty());
    assert_eq!(webpack["mode"], "development");
    assert_eq!(webpack["devtool"], "source-map");
    assert_eq!(webpack["entry"]["index"], project.root.join("src/index.js").as_str());
    assert_eq!(webpack["output"]["path"], project.root.join("build").as_str());
    assert_eq!(webpack["output"]["publicPath"], "/app/");
    assert_eq!(webpack["resolve"]["modules"], json!(["node_modules"]));
    assert_eq!(webpack["performance"], json!({"hints": false}));
    assert_eq!(assembly.config.public_url, "/app");
    assert_eq!(assembly.config.env["PUBLIC_URL"], "/app");
}

#[test]
fn test_assembly_is_idempotent() {
    let project = Project::new();
    project.write("public/robots.txt", "User-agent: *");
    let ctx = project.context(Mode::Production);
    let source = OverrideSource::Static(
        json!({"prod": {"plugins": [{"plugin": "Banner"}], "webpack": {"devtool": false}}})
            .as_object()
            .unwrap()
            .clone(),
    );

    let first = assemble(&ctx, Some(&source));
    let second = assemble(&ctx, Some(&source));
    assert_eq!(first, second);
    assert_eq!(first.config.to_json_pretty(), second.config.to_json_pretty());
}

#[test]
fn test_webpack_passthrough_deep_merges() {
    let project = Project::new();
    let ctx = project.context(Mode::Production);
    let sel = selected(json!({
        "webpack": {
            "devtool": "hidden-source-map",
            "output": {"filename": "[name].[contenthash].js"},
            "resolve": {"extensions": [".mjs"]},
        }
    }));

    let assembly = assemble_selected(&ctx, &sel);
    let webpack = &assembly.config.webpack;

    assert_eq!(webpack["devtool"], "hidden-source-map");
    assert_eq!(webpack["output"]["filename"], "[name].[contenthash].js");
    // siblings of overridden keys survive
    assert_eq!(webpack["output"]["path"], project.root.join("dist").as_str());
    assert_eq!(webpack["output"]["publicPath"], "/app/");
    assert_eq!(webpack["resolve"]["modules"], json!(["node_modules"]));
    assert_eq!(webpack["resolve"]["extensions"], json!([".mjs"]));
    assert!(assembly.advisories.is_empty());
}

#[test]
fn test_passthrough_cannot_replace_derived_keys() {
    let project = Project::new();
    let ctx = project.context(Mode::Development);
    let sel = selected(json!({
        "webpack": {
            "plugins": [],
            "performance": {"hints": "error"},
            "module": {"rules": [], "noParse": "jquery"},
        }
    }));

    let assembly = assemble_selected(&ctx, &sel);
    let webpack = &assembly.config.webpack;

    assert!(!webpack["plugins"].as_array().unwrap().is_empty());
    assert_eq!(webpack["performance"], json!({"hints": false}));
    assert_eq!(webpack["module"]["rules"].as_array().unwrap().len(), 2);
    assert_eq!(webpack["module"]["noParse"], "jquery");

    let keys: Vec<&str> = assembly.advisories.iter().map(|a| a.key.as_str()).collect();
    assert_eq!(
        keys,
        vec!["webpack.plugins", "webpack.performance", "webpack.module.rules"]
    );
}

#[test]
fn test_development_plugin_order() {
    let project = Project::new();
    let ctx = project.context(Mode::Development);

    let assembly = assemble_selected(&ctx, &SelectedOverride::default());
    assert_eq!(
        plugin_names(&assembly.config),
        vec![
            "DefinePlugin",
            "HtmlWebpackPlugin",
            "CaseSensitivePathsPlugin",
            "ManifestPlugin",
            "GenerateSW",
        ]
    );
}

#[test]
fn test_html_plugin_options() {
    let project = Project::new();
    let ctx = project.context(Mode::Development);

    let assembly = assemble_selected(
        &ctx,
        &selected(json!({"htmlWebpackPluginOptions": {"title": "Docs", "minify": {"removeComments": true}}})),
    );
    let html = find_plugin(&assembly.config, "HtmlWebpackPlugin").unwrap();
    assert_eq!(html["options"]["template"], project.root.join("src/index.html").as_str());
    assert_eq!(html["options"]["inject"], "head");
    assert_eq!(html["options"]["title"], "Docs");
    assert_eq!(
        html["options"]["minify"],
        json!({"collapseWhitespace": true, "removeComments": true})
    );
}

#[test]
fn test_production_plugin_order_with_extensions() {
    let project = Project::new();
    project.write("public/favicon.ico", "ico");
    let mut ctx = project.context(Mode::Production);
    ctx.manifest = Some(crate::json::parse_package_json(
        r#"{"staticSiteBuilderConfig": {"momentLocales": "en,de"}}"#,
    ).unwrap());
    let sel = selected(json!({
        "plugins": [{"plugin": "First"}, {"plugin": "Second"}],
        "copyPatterns": [{"from": "assets", "to": "assets"}],
    }));

    let assembly = assemble_selected(&ctx, &sel);
    let config = &assembly.config;
    assert_eq!(
        plugin_names(config),
        vec![
            "DefinePlugin",
            "HtmlWebpackPlugin",
            "CaseSensitivePathsPlugin",
            "ManifestPlugin",
            "MiniCssExtractPlugin",
            "GenerateSW",
            "MomentLocalesPlugin",
            "First",
            "Second",
            "CopyPlugin",
        ]
    );

    let copy = find_plugin(config, "CopyPlugin").unwrap();
    assert_eq!(
        copy["options"]["patterns"],
        json!([
            {"from": project.root.join("public").as_str(), "to": project.root.join("dist").as_str()},
            {"from": "assets", "to": "assets"},
        ])
    );

    let moment = find_plugin(config, "MomentLocalesPlugin").unwrap();
    assert_eq!(moment["options"]["localesToKeep"], json!(["en", "de"]));

    let sw = find_plugin(config, "GenerateSW").unwrap();
    assert_eq!(sw["options"]["navigateFallback"], "/app/index.html");
    assert_eq!(
        sw["options"]["additionalManifestEntries"][0]["url"],
        "/app/favicon.ico"
    );

    let html = find_plugin(config, "HtmlWebpackPlugin").unwrap();
    assert_eq!(html["options"]["minify"]["collapseWhitespace"], true);
}

#[test]
fn test_copy_plugin_only_for_patterns_or_public_dir() {
    let project = Project::new();
    let ctx = project.context(Mode::Development);

    let without = assemble_selected(&ctx, &SelectedOverride::default());
    assert!(find_plugin(&without.config, "CopyPlugin").is_none());

    let with_patterns = assemble_selected(&ctx, &selected(json!({"copyPatterns": [{"from": "a"}]})));
    let copy = find_plugin(&with_patterns.config, "CopyPlugin").unwrap();
    assert_eq!(copy["options"]["patterns"], json!([{"from": "a"}]));
}

#[test]
fn test_disable_service_worker() {
    let project = Project::new();
    let ctx = project.context(Mode::Production);

    let assembly = assemble_selected(
        &ctx,
        &selected(json!({"disableSW": true, "runtimeCaching": [{"urlPattern": "^/api"}]})),
    );
    assert!(find_plugin(&assembly.config, "GenerateSW").is_none());

    let assembly = assemble_selected(
        &ctx,
        &selected(json!({"runtimeCaching": [{"urlPattern": "^/api"}]})),
    );
    let sw = find_plugin(&assembly.config, "GenerateSW").unwrap();
    assert_eq!(sw["options"]["runtimeCaching"][0]["urlPattern"], "^/api");
}

#[test]
fn test_env_overlay_is_stringified() {
    let project = Project::new();
    let ctx = project.context(Mode::Production);

    let assembly = assemble_selected(
        &ctx,
        &selected(json!({"env": {"SSB_APP_FLAG": true, "NODE_ENV": "staging"}})),
    );
    assert_eq!(assembly.config.env["SSB_APP_FLAG"], true);
    assert_eq!(assembly.config.env["NODE_ENV"], "staging");

    let define = find_plugin(&assembly.config, "DefinePlugin").unwrap();
    assert_eq!(define["options"]["process.env"]["SSB_APP_FLAG"], "true");
    assert_eq!(define["options"]["process.env"]["NODE_ENV"], "\"staging\"");
}

#[test]
fn test_malformed_extension_keys_are_ignored() {
    let project = Project::new();
    let ctx = project.context(Mode::Development);
    let sel = selected(json!({
        "plugins": {"not": "a list"},
        "copyPatterns": "public",
        "env": ["A"],
        "extraLoaders": 3,
        "webpack": "nope",
        "htmlWebpackPluginOptions": null,
    }));

    let assembly = assemble_selected(&ctx, &sel);
    let baseline = assemble_selected(&ctx, &SelectedOverride::default());
    assert_eq!(assembly.config, baseline.config);

    let mut keys: Vec<&str> = assembly.advisories.iter().map(|a| a.key.as_str()).collect();
    keys.sort();
    assert_eq!(keys, vec!["copyPatterns", "env", "extraLoaders", "plugins", "webpack"]);
}

#[test]
fn test_extra_loaders_come_first() {
    let project = Project::new();
    let ctx = project.context(Mode::Development);
    let sel = selected(json!({"extraLoaders": [{"test": "\\.md$", "use": "raw-loader"}]}));

    let assembly = assemble_selected(&ctx, &sel);
    let chain = &assembly.config.webpack["module"]["rules"][1]["oneOf"];
    assert_eq!(chain[0]["test"], "\\.md$");
    assert_eq!(chain[1]["test"], "\\.ts$");
    assert_eq!(chain.as_array().unwrap().len(), 7);
}

#[test]
fn test_ts_config_and_app_index_overrides() {
    let project = Project::new();
    project.write("tsconfig.build.json", "{}");
    project.write("src/main.ts", "export {}");
    let ctx = project.context(Mode::Development);

    let assembly = assemble_selected(
        &ctx,
        &selected(json!({"tsConfigPath": "tsconfig.build.json", "appIndex": "src/main.ts"})),
    );
    let webpack = &assembly.config.webpack;
    assert_eq!(
        webpack["module"]["rules"][1]["oneOf"][0]["use"][1]["options"]["configFile"],
        project.root.join("tsconfig.build.json").as_str()
    );
    assert_eq!(webpack["entry"]["index"], project.root.join("src/main.ts").as_str());
    assert_eq!(assembly.config.app_index, project.root.join("src/main.ts"));

    let missing = assemble_selected(&ctx, &selected(json!({"appIndex": "src/nope.ts"})));
    assert_eq!(missing.config.app_index, project.root.join("src/index.js"));
    assert_eq!(missing.advisories[0].key, "appIndex");
}

#[test]
fn test_performance_thresholds() {
    let project = Project::new();
    let ctx = project.context(Mode::Production);

    let assembly = assemble_selected(
        &ctx,
        &selected(json!({"sizeHints": "error", "maxEntrypointSize": "1.5m", "maxAssetSize": 2048})),
    );
    assert_eq!(
        assembly.config.webpack["performance"],
        json!({"hints": "error", "maxEntrypointSize": 1_572_864, "maxAssetSize": 2048})
    );

    let assembly = assemble_selected(
        &ctx,
        &selected(json!({"sizeHints": "loud", "maxEntrypointSize": "bogus", "maxAssetSize": false})),
    );
    assert_eq!(assembly.config.webpack["performance"], json!({}));
    let keys: Vec<&str> = assembly.advisories.iter().map(|a| a.key.as_str()).collect();
    assert_eq!(keys, vec!["sizeHints", "maxEntrypointSize"]);
}

#[test]
fn test_size_hints_false_in_production() {
    let project = Project::new();
    let ctx = project.context(Mode::Production);

    let assembly = assemble_selected(&ctx, &selected(json!({"sizeHints": false})));
    assert_eq!(assembly.config.webpack["performance"], json!({"hints": false}));
}

#[test]
fn test_mode_selection_end_to_end() {
    let project = Project::new();
    project.write(
        "static-site-builder.config.json",
        r#"{"dev": {"webpack": {"devtool": "eval"}}, "prod": {"webpack": {"devtool": false}}, "disableSW": true}"#,
    );

    let dev_ctx = project.context(Mode::Development);
    let source = dev_ctx.load_override().unwrap();
    let dev = assemble(&dev_ctx, source.as_ref());
    assert_eq!(dev.config.webpack["devtool"], "eval");
    // the top-level sibling is discarded once a split key matches
    assert!(find_plugin(&dev.config, "GenerateSW").is_some());

    let prod_ctx = project.context(Mode::Production);
    let prod = assemble(&prod_ctx, source.as_ref());
    assert_eq!(prod.config.webpack["devtool"], false);
}

#[test]
fn test_computed_override_sees_context() {
    let project = Project::new();
    let ctx = project.context(Mode::Production);
    let source = OverrideSource::computed(|_env, mode, ctx| {
        json!({
            "webpack": {
                "output": {"path": format!("{}/{}", ctx.paths.app_path, mode.short_name())}
            }
        })
    });

    let assembly = assemble(&ctx, Some(&source));
    assert_eq!(
        assembly.config.webpack["output"]["path"],
        format!("{}/prod", project.root)
    );
}

#[test]
fn test_node_path_extends_modules() {
    let project = Project::new();
    let sep = if cfg!(windows) { ";" } else { ":" };
    let env = EnvVars::from([("NODE_PATH".to_string(), format!("lib{sep}{sep}shared"))]);
    let ctx = ProjectContext::load(&project.root, env, Mode::Development).unwrap();

    let assembly = assemble(&ctx, None);
    assert_eq!(
        assembly.config.webpack["resolve"]["modules"],
        json!(["node_modules", "lib", "shared"])
    );
}

#[test]
fn test_required_files() {
    let project = Project::new();
    let ctx = project.context(Mode::Development);
    assert!(assemble(&ctx, None).config.check_required_files().is_ok());

    fs::remove_file(project.root.join("src/index.html")).unwrap();
    let ctx = project.context(Mode::Development);
    let err = assemble(&ctx, None).config.check_required_files().unwrap_err();
    assert!(err.is_missing_file());
}
