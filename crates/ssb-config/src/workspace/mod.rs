//! Monorepo detection
//!
//! When the app lives inside a yarn/lerna style workspace, the sibling
//! packages declared by the enclosing manifest are treated as first-party
//! source. Nothing here is fatal: an unreadable or odd ancestor manifest just
//! means no monorepo.

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use ssb_core::utils::{normalize_path, real_path};
use tracing::{debug, warn};

use crate::json;

const MANIFEST: &str = "package.json";

/// What the enclosing workspace, if any, says about the app
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceInfo {
    /// The app itself matches one of the workspace patterns
    pub is_app_included: bool,
    /// The ancestor manifest declares workspace patterns
    pub is_yarn_workspace: bool,
    /// Real paths of the other workspace packages, in discovery order
    pub sibling_package_dirs: Vec<Utf8PathBuf>,
}

impl WorkspaceInfo {
    /// Source roots the toolchain should compile as first-party code
    pub fn source_roots(&self, app_src: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut roots = vec![app_src.to_path_buf()];
        if self.is_app_included {
            roots.extend(self.sibling_package_dirs.iter().cloned());
        }
        roots
    }
}

/// Find the nearest manifest at or above `start`
pub fn find_enclosing_manifest(start: &Utf8Path) -> Option<Utf8PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let candidate = dir.join(MANIFEST);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = dir.parent();
    }

    None
}

/// Detect the workspace the app at `app_dir` belongs to
pub fn detect(app_dir: &Utf8Path) -> WorkspaceInfo {
    let app_dir = real_path(app_dir);

    let Some(manifest_path) = app_dir.parent().and_then(find_enclosing_manifest) else {
        debug!("no manifest above {}, not a monorepo", app_dir);
        return WorkspaceInfo::default();
    };

    let manifest = match json::load_from_file(&manifest_path) {
        Ok(manifest) => manifest,
        Err(e) => {
            warn!("ignoring unreadable workspace manifest: {}", e);
            return WorkspaceInfo::default();
        },
    };

    let Some(patterns) = manifest.workspaces.as_ref().and_then(|ws| ws.patterns()) else {
        debug!("{} declares no workspaces", manifest_path);
        return WorkspaceInfo::default();
    };

    let root = manifest_path.parent().unwrap_or(Utf8Path::new("/"));
    let all_packages = find_packages(root, patterns);
    let is_app_included = all_packages.contains(&app_dir);

    debug!(
        "workspace at {} has {} packages (app included: {})",
        root,
        all_packages.len(),
        is_app_included
    );

    WorkspaceInfo {
        is_app_included,
        is_yarn_workspace: true,
        sibling_package_dirs: all_packages
            .into_iter()
            .filter(|dir| *dir != app_dir)
            .collect(),
    }
}

/// Directories matching `<pattern>/package.json` under `root`, real-path
/// normalized and de-duplicated. Patterns starting with `!` remove matches.
fn find_packages(root: &Utf8Path, patterns: &[String]) -> Vec<Utf8PathBuf> {
    let mut packages: Vec<Utf8PathBuf> = Vec::new();
    let mut excluded: Vec<Utf8PathBuf> = Vec::new();

    for pattern in patterns {
        let (target, pattern) = match pattern.strip_prefix('!') {
            Some(negated) => (&mut excluded, negated),
            None => (&mut packages, pattern.as_str()),
        };

        for dir in glob_package_dirs(root, pattern) {
            if !target.contains(&dir) {
                target.push(dir);
            }
        }
    }

    packages.retain(|dir| !excluded.contains(dir));
    packages
}

fn glob_package_dirs(root: &Utf8Path, pattern: &str) -> Vec<Utf8PathBuf> {
    let full = format!(
        "{}/{}/{}",
        glob::Pattern::escape(root.as_str()),
        pattern.trim_end_matches('/'),
        MANIFEST
    );

    let options = glob::MatchOptions {
        require_literal_leading_dot: true,
        ..glob::MatchOptions::new()
    };

    let entries = match glob::glob_with(&full, options) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("skipping invalid workspace pattern '{}': {}", pattern, e);
            return Vec::new();
        },
    };

    entries
        .filter_map(Result::ok)
        .filter_map(|path| Utf8PathBuf::from_path_buf(path).ok())
        .filter_map(|manifest| {
            let normalized = normalize_path(&manifest);
            normalized.parent().map(real_path)
        })
        .collect()
}
