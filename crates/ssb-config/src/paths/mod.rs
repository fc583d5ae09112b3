//! Project path resolution and served-path derivation
//!
//! Every path is resolved against one canonical app directory: the real
//! (symlink-free) working directory captured when the resolver is built.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use serde_json::{Map, Value};
use ssb_core::utils::{normalize_path, real_path};
use tracing::debug;

/// Candidates for the HTML template, in priority order
pub const TEMPLATE_CANDIDATES: &[&str] = &["src/index.html", "src/index.ejs", "src/index.hbs"];

/// Candidates for the entry module, in priority order
pub const INDEX_CANDIDATES: &[&str] = &["src/index.js", "src/index.ts"];

/// Candidates for the project override file, in priority order
pub const OVERRIDE_CANDIDATES: &[&str] = &[
    "static-site-builder.config.json",
    "static-site-builder.config.toml",
];

/// Resolves project-relative paths against the canonical app directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    app_directory: Utf8PathBuf,
}

impl PathResolver {
    /// Create a resolver rooted at the real path of `cwd`
    pub fn new(cwd: &Utf8Path) -> Self {
        Self {
            app_directory: real_path(cwd),
        }
    }

    /// The canonical root every other path is derived from
    pub fn app_directory(&self) -> &Utf8Path {
        &self.app_directory
    }

    /// Resolve a path relative to the app directory
    pub fn resolve(&self, relative: impl AsRef<Utf8Path>) -> Utf8PathBuf {
        normalize_path(&self.app_directory.join(relative.as_ref()))
    }

    /// Resolve the first candidate that exists on disk.
    ///
    /// Falls back to the first candidate when none exist; callers decide
    /// whether a missing file is fatal.
    pub fn resolve_first_existing(&self, candidates: &[&str]) -> Utf8PathBuf {
        let found = candidates
            .iter()
            .map(|candidate| self.resolve(candidate))
            .find(|resolved| resolved.exists());

        match found {
            Some(path) => path,
            None => {
                debug!("none of {:?} exist, using the first", candidates);
                self.resolve(candidates.first().copied().unwrap_or("."))
            },
        }
    }
}

/// Absolute paths of everything the builder reads or writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPaths {
    pub dotenv: Utf8PathBuf,
    pub ssb_config: Utf8PathBuf,
    pub public_dir: Utf8PathBuf,
    pub ts_config: Utf8PathBuf,
    pub app_path: Utf8PathBuf,
    pub app_build: Utf8PathBuf,
    pub app_dist: Utf8PathBuf,
    pub app_template: Utf8PathBuf,
    pub app_index: Utf8PathBuf,
    pub app_package_json: Utf8PathBuf,
    pub app_src: Utf8PathBuf,
    pub tests_setup: Utf8PathBuf,
    pub app_node_modules: Utf8PathBuf,
}

impl ProjectPaths {
    pub fn resolve(resolver: &PathResolver) -> Self {
        Self {
            dotenv: resolver.resolve(".env"),
            ssb_config: resolver.resolve_first_existing(OVERRIDE_CANDIDATES),
            public_dir: resolver.resolve("public"),
            ts_config: resolver.resolve("tsconfig.json"),
            app_path: resolver.resolve("."),
            app_build: resolver.resolve("build"),
            app_dist: resolver.resolve("dist"),
            app_template: resolver.resolve_first_existing(TEMPLATE_CANDIDATES),
            app_index: resolver.resolve_first_existing(INDEX_CANDIDATES),
            app_package_json: resolver.resolve("package.json"),
            app_src: resolver.resolve("src"),
            tests_setup: resolver.resolve("src/setupTests.js"),
            app_node_modules: resolver.resolve("node_modules"),
        }
    }

    /// The paths as a JSON object keyed by their camelCase names
    pub fn to_map(&self) -> Map<String, Value> {
        let entries = [
            ("dotenv", &self.dotenv),
            ("ssbConfig", &self.ssb_config),
            ("publicDir", &self.public_dir),
            ("tsConfig", &self.ts_config),
            ("appPath", &self.app_path),
            ("appBuild", &self.app_build),
            ("appDist", &self.app_dist),
            ("appTemplate", &self.app_template),
            ("appIndex", &self.app_index),
            ("appPackageJson", &self.app_package_json),
            ("appSrc", &self.app_src),
            ("testsSetup", &self.tests_setup),
            ("appNodeModules", &self.app_node_modules),
        ];

        entries
            .into_iter()
            .map(|(name, path)| (name.to_string(), Value::String(path.to_string())))
            .collect()
    }
}

/// Add or remove a single trailing slash
pub fn ensure_slash(path: &str, needs_slash: bool) -> String {
    let has_slash = path.ends_with('/');
    if has_slash && !needs_slash {
        path[..path.len() - 1].to_string()
    } else if !has_slash && needs_slash {
        format!("{}/", path)
    } else {
        path.to_string()
    }
}

/// Derive the URL path prefix the app is served under.
///
/// `PUBLIC_URL` wins verbatim; otherwise the path component of `homepage`;
/// otherwise `/`. The result always ends with a slash.
pub fn served_path(env_public_url: Option<&str>, homepage: Option<&str>) -> String {
    let served = match env_public_url.filter(|url| !url.is_empty()) {
        Some(url) => url.to_string(),
        None => homepage
            .filter(|home| !home.is_empty())
            .map(homepage_path)
            .unwrap_or_else(|| "/".to_string()),
    };
    ensure_slash(&served, true)
}

/// The served path without its trailing slash, as exposed to the app
pub fn public_url(served_path: &str) -> String {
    ensure_slash(served_path, false)
}

fn homepage_path(homepage: &str) -> String {
    match url::Url::parse(homepage) {
        Ok(url) => url.path().to_string(),
        // relative homepages such as "." or "/app" are already a path
        Err(_) => homepage
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}
