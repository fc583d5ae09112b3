//! Command implementations and dispatch logic.
//!
//! Every command builds a fresh [`ProjectContext`] from the command context and
//! prints its result to stdout; diagnostics go to stderr.

use camino::Utf8PathBuf;
use ssb_config::{assemble, Advisory, Assembly, ProjectContext};
use ssb_core::error::{SsbError, SsbResult};
use ssb_core::types::Mode;
use std::path::PathBuf;
use tracing::{debug, info};

pub mod check;
pub mod config;
pub mod paths;
pub mod workspace;


use crate::{output::OutputHandler, Commands};

const COMMANDS: &[&str] = &["config", "paths", "workspace", "check", "version", "help"];

/// Shared context for all commands
pub struct CommandContext {
    /// Explicit project directory; `None` means the process working directory
    pub cwd: Option<Utf8PathBuf>,
    /// Explicit mode; `None` falls back to the environment
    pub mode: Option<Mode>,
    pub output: OutputHandler,
}

impl CommandContext {
    /// Create a new command context
    pub fn new(cwd: Option<PathBuf>, mode: Option<Mode>) -> SsbResult<Self> {
        let cwd = cwd
            .map(|dir| {
                Utf8PathBuf::from_path_buf(dir).map_err(|dir| SsbError::ConfigValidation {
                    field: "cwd".to_string(),
                    reason: format!("{} is not valid UTF-8", dir.display()),
                })
            })
            .transpose()?;

        Ok(Self {
            cwd,
            mode,
            output: OutputHandler::new(),
        })
    }

    /// Resolve the project this invocation targets
    pub fn project(&self) -> SsbResult<ProjectContext> {
        match &self.cwd {
            Some(cwd) => {
                let env = ssb_config::env::snapshot();
                let mode = self
                    .mode
                    .or_else(|| ssb_config::env::detect_mode(&env))
                    .unwrap_or_default();
                ProjectContext::load(cwd, env, mode)
            },
            None => ProjectContext::from_process(self.mode),
        }
    }

    /// Load the override file and assemble the effective configuration
    pub fn assemble(&self, project: &ProjectContext) -> SsbResult<Assembly> {
        let source = project.load_override()?;
        if source.is_none() {
            debug!("assembling without an override file");
        }
        Ok(assemble(project, source.as_ref()))
    }

    /// Print advisories; under `CI` they fail the command
    pub fn report_advisories(
        &self,
        project: &ProjectContext,
        advisories: &[Advisory],
    ) -> SsbResult<()> {
        for advisory in advisories {
            self.output.warn(&advisory.to_string());
        }

        if !advisories.is_empty() && project.ci_treats_warnings_as_errors() {
            return Err(SsbError::ConfigValidation {
                field: "override".to_string(),
                reason: format!(
                    "{} advisories treated as errors because CI is set",
                    advisories.len()
                ),
            });
        }
        Ok(())
    }
}

/// Dispatch a command to its handler
pub fn dispatch_command(command: Commands, ctx: &CommandContext) -> SsbResult<()> {
    match command {
        Commands::Config { webpack_only } => {
            info!("Printing effective configuration (webpack only: {})", webpack_only);
            config::execute(webpack_only, ctx)
        },
        Commands::Paths => {
            info!("Printing project paths");
            paths::execute(ctx)
        },
        Commands::Workspace => {
            info!("Printing workspace information");
            workspace::execute(ctx)
        },
        Commands::Check => {
            info!("Checking configuration");
            check::execute(ctx)
        },
        Commands::Version => {
            info!("Showing version information");
            show_version(ctx)
        },
        Commands::Unknown(args) => unknown_command(&args, ctx),
    }
}

fn unknown_command(args: &[String], ctx: &CommandContext) -> SsbResult<()> {
    let name = args.first().map(String::as_str).unwrap_or_default();

    ctx.output.error(&format!("Unknown command '{}'", name));
    if let Some(suggestion) = suggest_similar_command(name) {
        ctx.output.info(&format!("Did you mean '{}'?", suggestion));
    }
    ctx.output.info("Run 'ssb help' to see available commands.");

    Err(SsbError::ConfigValidation {
        field: "command".to_string(),
        reason: format!("Unknown command: {}", name),
    })
}

fn show_version(ctx: &CommandContext) -> SsbResult<()> {
    let target = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);

    ctx.output.print(&format!("ssb v{}", env!("CARGO_PKG_VERSION")));
    ctx.output.print(&format!("Built: {}", env!("BUILD_DATE")));
    ctx.output.print(&format!("Target: {}", target));
    ctx.output.print(&format!("Rust: {}", env!("RUSTC_VERSION")));

    Ok(())
}

/// Suggest similar commands based on edit distance
pub fn suggest_similar_command(input: &str) -> Option<String> {
    let mut best_match = None;
    let mut best_distance = usize::MAX;

    for &command in COMMANDS {
        let distance = edit_distance(input, command);
        if distance < best_distance && distance <= 2 {
            best_distance = distance;
            best_match = Some(command);
        }
    }

    best_match.map(|s| s.to_string())
}

/// Levenshtein distance between two strings
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut current = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        previous = current;
    }

    previous[b.len()]
}
