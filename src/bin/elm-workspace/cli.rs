//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// elm-workspace - find, inspect and review the Elm projects in a directory
#[derive(Parser)]
#[command(name = "elm-workspace")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Workspace root (defaults to the current directory)
    #[arg(long, global = true, env = "ELM_WORKSPACE_ROOT")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan the workspace for Elm projects, replacing the attached set
    Discover,

    /// Attach a project by its manifest or directory
    Attach(AttachArgs),

    /// Detach a project
    Detach(DetachArgs),

    /// List attached projects
    Projects(ProjectsArgs),

    /// Show which project owns a file
    Which(WhichArgs),

    /// Run elm-review on the project that owns a file
    Review(ReviewArgs),

    /// Toolchain management
    Toolchain(ToolchainArgs),

    /// Print the persisted workspace state
    State,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct AttachArgs {
    /// Path to elm.json, elm-package.json, or a directory containing one
    pub path: PathBuf,
}

#[derive(Args)]
pub struct DetachArgs {
    /// Manifest path of the project to detach
    pub path: PathBuf,
}

#[derive(Args)]
pub struct ProjectsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct WhichArgs {
    /// Source or test file
    pub file: PathBuf,
}

#[derive(Args)]
pub struct ReviewArgs {
    /// Any file of the project to review
    pub file: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ToolchainArgs {
    #[command(subcommand)]
    pub command: ToolchainCommands,
}

#[derive(Subcommand)]
pub enum ToolchainCommands {
    /// Show configured tools and their versions
    Show,

    /// Look up unset tools on PATH and remember them
    Suggest,

    /// Set tool paths for this workspace
    Set(ToolchainSetArgs),
}

#[derive(Args)]
pub struct ToolchainSetArgs {
    /// Compiler path
    #[arg(long)]
    pub elm: Option<PathBuf>,

    /// elm-format path
    #[arg(long)]
    pub elm_format: Option<PathBuf>,

    /// elm-test path
    #[arg(long)]
    pub elm_test: Option<PathBuf>,

    /// elm-review path
    #[arg(long)]
    pub elm_review: Option<PathBuf>,

    /// Run elm-format on save
    #[arg(long)]
    pub format_on_save: Option<bool>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,

    /// Write the script to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
