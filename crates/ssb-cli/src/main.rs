//! # ssb-cli
//!
//! Command line front end for the static site builder's configuration engine.
//!
//! Parses arguments, sets up logging and error handling, and dispatches to the
//! command handlers. It prints resolved configuration; it never runs a bundler.

use clap::{Parser, Subcommand};
use ssb_core::error::SsbResult;
use ssb_core::types::Mode;
use std::path::PathBuf;
use tracing::{error, info};

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Resolve the effective build configuration of a static site project
#[derive(Parser)]
#[command(name = "ssb", version, about = "Static site builder configuration resolver")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Build mode (dev, development, prod, production); defaults to NODE_ENV
    #[arg(short, long, global = true, env = "SSB_MODE")]
    pub mode: Option<Mode>,

    /// Project directory; defaults to the current directory
    #[arg(long, global = true, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the effective configuration as JSON
    Config {
        /// Print only the bundler tree
        #[arg(long)]
        webpack_only: bool,
    },
    /// Print the resolved project paths
    Paths,
    /// Print monorepo workspace information
    Workspace,
    /// Check required files and report configuration advisories
    Check,
    /// Show version information
    Version,
    #[command(external_subcommand)]
    Unknown(Vec<String>),
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose);
    setup_panic_handler();

    info!("Starting ssb v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_cli(cli) {
        error!("{}", e);
        eprintln!("{}", ErrorFormatter::new().format_error(&e));
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> SsbResult<()> {
    let ctx = CommandContext::new(cli.cwd, cli.mode)?;
    commands::dispatch_command(cli.command, &ctx)
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "error" };

    tracing_subscriber::fmt()
        .with_env_filter(format!("ssb={0},ssb_config={0},ssb_core={0}", level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("ssb encountered an unexpected error: {}", panic_info);
        eprintln!("ssb crashed! This is a bug.");
        eprintln!("Please report this at: https://github.com/static-site-builder/ssb/issues");
        eprintln!("Error: {}", panic_info);
    }));
}
