//! elm-workspace CLI - Elm project discovery and tooling

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use elm_workspace::core::workspace::AttachError;
use elm_workspace::ops::{ExternalToolError, ReviewError};
use elm_workspace::util::diagnostic::{emit, suggestions, Diagnostic};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        emit(&describe(&e), std::io::stderr().is_terminal());
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("elm_workspace=debug")
    } else {
        EnvFilter::new("elm_workspace=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let session = commands::Session::new(cli.root, cli.verbose)?;
    match cli.command {
        Commands::Discover => commands::discover::execute(&session),
        Commands::Attach(args) => commands::attach::execute(&session, args),
        Commands::Detach(args) => commands::detach::execute(&session, args),
        Commands::Projects(args) => commands::projects::execute(&session, args),
        Commands::Which(args) => commands::which::execute(&session, args),
        Commands::Review(args) => commands::review::execute(&session, args),
        Commands::Toolchain(args) => commands::toolchain::execute(&session, args),
        Commands::State => commands::state::execute(&session),
        Commands::Completions(_) => Ok(()),
    }
}

/// Turn a command failure into the diagnostic shown to the user.
fn describe(err: &anyhow::Error) -> Diagnostic {
    if let Some(e) = err.downcast_ref::<AttachError>() {
        return Diagnostic::from_diagnostic(e);
    }
    if let Some(e) = err.downcast_ref::<ReviewError>() {
        let diag = Diagnostic::from_diagnostic(e);
        return match e {
            ReviewError::NoProject { .. } => diag.with_suggestion(suggestions::NO_PROJECT),
            ReviewError::Tool(_) => diag,
        };
    }
    if let Some(e) = err.downcast_ref::<ExternalToolError>() {
        return Diagnostic::from_diagnostic(e);
    }
    Diagnostic::from_error(err.as_ref())
}
