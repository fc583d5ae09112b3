//! Effective build configuration for the static site builder
//!
//! This crate resolves, once per build or watch invocation, the configuration
//! handed to the bundler: project paths, monorepo topology, the mode-specific
//! project override and the built-in defaults are layered into one
//! deterministic tree.

pub mod assemble;
pub mod context;
pub mod env;
pub mod json;
pub mod merge;
pub mod overrides;
pub mod paths;
pub mod workspace;

// Re-export main types
pub use assemble::{assemble, assemble_selected, Advisory, Assembly, EffectiveConfig};
pub use context::ProjectContext;
pub use env::{ClientEnv, EnvVars, RawEnv};
pub use json::PackageJson;
pub use merge::{deep_merge, ConfigLayering};
pub use overrides::{OverrideContext, OverrideSource, SelectedOverride};
pub use paths::{PathResolver, ProjectPaths};
pub use workspace::WorkspaceInfo;

use ssb_core::error::SsbError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, SsbError>;
