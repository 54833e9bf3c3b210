//! vidlens - command-line client for a video analysis service.
//!
//! Submits video URLs to the analysis service and renders the returned
//! report in the terminal, as HTML, or as JSON.

use std::io::IsTerminal;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vidlens_cmd::factory::Factory;
use vidlens_core::cmdutil::is_user_cancellation;

mod exit_codes {
    pub const OK: i32 = 0;
    pub const ERROR: i32 = 1;
    pub const CANCEL: i32 = 2;
}

/// vidlens - understand why a video works.
#[derive(Debug, Parser)]
#[command(
    name = "vidlens",
    version,
    about = "Analyze videos from the command line",
    long_about = "Send a video URL to the analysis service and read the report."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze a video.
    Analyze(vidlens_cmd::analyze::AnalyzeArgs),
    /// Convert analysis markup to HTML.
    Render(vidlens_cmd::render::RenderArgs),
    /// Manage configuration for vidlens.
    #[command(subcommand)]
    Config(vidlens_cmd::config::ConfigCommand),
    /// Show version information.
    Version(vidlens_cmd::version::VersionArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("VIDLENS_DEBUG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();

    let factory = Factory::new(env!("CARGO_PKG_VERSION").to_string());

    let exit_code = if let Some(cmd) = cli.command {
        exit_code(run_command(cmd, &factory).await)
    } else {
        use clap::CommandFactory;
        Cli::command().print_help().ok();
        println!();
        exit_codes::OK
    };

    std::process::exit(exit_code);
}

/// Map a command outcome to the process exit code, logging failures.
fn exit_code(result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => exit_codes::OK,
        Err(e) if is_user_cancellation(&e) => exit_codes::CANCEL,
        Err(e) => {
            tracing::error!("{e:#}");
            exit_codes::ERROR
        }
    }
}

async fn run_command(cmd: Commands, factory: &Factory) -> anyhow::Result<()> {
    match cmd {
        Commands::Analyze(args) => args.run(factory).await,
        Commands::Render(args) => args.run(factory).await,
        Commands::Config(sub) => sub.run(factory),
        Commands::Version(args) => {
            args.run(&factory.io, env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
