//! Per-invocation project context
//!
//! Built once when a build or watch starts and passed by reference to every
//! component. Holds no interior mutability; a new invocation builds a new
//! context.

use camino::{Utf8Path, Utf8PathBuf};
use ssb_core::error::SsbError;
use ssb_core::types::Mode;
use tracing::{debug, info};

use crate::env::{self, EnvVars};
use crate::json::{self, PackageJson};
use crate::overrides::{OverrideContext, OverrideSource};
use crate::paths::{self, PathResolver, ProjectPaths};
use crate::workspace::{self, WorkspaceInfo};
use crate::ConfigResult;

/// Everything resolved about the project before assembly
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub mode: Mode,
    pub resolver: PathResolver,
    pub paths: ProjectPaths,
    /// Process variables layered over `.env` files
    pub env: EnvVars,
    pub manifest: Option<PackageJson>,
    pub served_path: String,
    pub public_url: String,
    pub workspace: WorkspaceInfo,
    /// Directories compiled as first-party source
    pub src_paths: Vec<Utf8PathBuf>,
    pub use_yarn: bool,
}

impl ProjectContext {
    /// Build the context from the process working directory and environment.
    ///
    /// `mode` falls back to `NODE_ENV`/`BABEL_ENV`, then development.
    pub fn from_process(mode: Option<Mode>) -> ConfigResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| SsbError::io("Failed to get current directory".to_string(), e))?;
        let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(|path| SsbError::ConfigValidation {
            field: "cwd".to_string(),
            reason: format!("{} is not valid UTF-8", path.display()),
        })?;

        let env = env::snapshot();
        let mode = mode.or_else(|| env::detect_mode(&env)).unwrap_or_default();
        Self::load(&cwd, env, mode)
    }

    /// Build the context for the project at `cwd` with an explicit environment
    pub fn load(cwd: &Utf8Path, env: EnvVars, mode: Mode) -> ConfigResult<Self> {
        let resolver = PathResolver::new(cwd);
        let paths = ProjectPaths::resolve(&resolver);
        info!("Resolving {} configuration for {}", mode, resolver.app_directory());

        let env = env::with_dotenv(env, &paths, mode)?;
        let manifest = json::load_optional(&paths.app_package_json)?;
        if manifest.is_none() {
            debug!("no package.json at {}", paths.app_package_json);
        }

        let served_path = paths::served_path(
            env.get("PUBLIC_URL").map(String::as_str),
            manifest.as_ref().and_then(|pkg| pkg.homepage.as_deref()),
        );
        let public_url = paths::public_url(&served_path);

        let workspace = workspace::detect(resolver.app_directory());
        let src_paths = workspace.source_roots(&paths.app_src);
        let use_yarn = resolver.resolve("yarn.lock").exists() || workspace.is_yarn_workspace;

        Ok(Self {
            mode,
            resolver,
            paths,
            env,
            manifest,
            served_path,
            public_url,
            workspace,
            src_paths,
            use_yarn,
        })
    }

    /// Load the project override file, if any
    pub fn load_override(&self) -> ConfigResult<Option<OverrideSource>> {
        OverrideSource::load(&self.paths.ssb_config)
    }

    /// Context handed to computed overrides
    pub fn override_context(&self) -> OverrideContext {
        OverrideContext {
            public_url: self.public_url.clone(),
            paths: self.paths.clone(),
        }
    }

    /// Whether `CI` asks for warnings to fail the build
    pub fn ci_treats_warnings_as_errors(&self) -> bool {
        env::ci_treats_warnings_as_errors(&self.env)
    }
}

/// Fail with the first file in `files` that does not exist
pub fn check_required_files<P: AsRef<Utf8Path>>(files: &[P]) -> ConfigResult<()> {
    for file in files {
        let file = file.as_ref();
        if !file.is_file() {
            return Err(SsbError::missing_file(file));
        }
    }
    Ok(())
}
