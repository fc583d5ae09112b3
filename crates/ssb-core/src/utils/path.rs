//! Path utilities for resolving project-relative paths.
//!
//! Provides lexical normalization and symlink resolution with a lexical
//! fallback for paths that do not exist yet.

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Normalize a path by resolving . and .. components
pub fn normalize_path(path: &Utf8Path) -> Utf8PathBuf {
    let mut components: Vec<Utf8Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Utf8Component::CurDir => {
                // Skip current directory
            },
            Utf8Component::ParentDir => match components.last() {
                Some(Utf8Component::Normal(_)) => {
                    components.pop();
                },
                // `/..` stays at the root
                Some(Utf8Component::RootDir) | Some(Utf8Component::Prefix(_)) => {},
                _ => components.push(component),
            },
            other => {
                components.push(other);
            },
        }
    }

    if components.is_empty() {
        return Utf8PathBuf::from(".");
    }

    components.iter().collect()
}

/// Resolve symlinks in `path`, falling back to its lexical normal form when
/// the path does not exist or is not valid UTF-8 after resolution.
pub fn real_path(path: &Utf8Path) -> Utf8PathBuf {
    path.canonicalize_utf8()
        .unwrap_or_else(|_| normalize_path(path))
}
