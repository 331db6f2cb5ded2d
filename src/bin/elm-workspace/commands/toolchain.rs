//! `elm-workspace toolchain` command

use anyhow::Result;

use super::Session;
use crate::cli::{ToolchainArgs, ToolchainCommands, ToolchainSetArgs};
use elm_workspace::ops::{format_report, ToolKind};
use elm_workspace::util::process::ProcessInvoker;
use elm_workspace::{ElmToolchain, Workspace};

pub fn execute(session: &Session, args: ToolchainArgs) -> Result<()> {
    let workspace = session.open()?;
    match args.command {
        ToolchainCommands::Show => show_toolchain(&workspace),
        ToolchainCommands::Suggest => suggest_toolchain(session, &workspace),
        ToolchainCommands::Set(set_args) => set_toolchain(session, &workspace, set_args),
    }
}

fn show_toolchain(workspace: &Workspace) -> Result<()> {
    let settings = workspace.settings();
    let toolchain = ElmToolchain::from_settings(&settings);

    println!("Toolchain:");
    println!();
    print!("{}", format_report(&toolchain.report(&ProcessInvoker)));
    println!();
    println!(
        "Format on save: {}",
        if settings.is_elm_format_on_save_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );
    Ok(())
}

fn suggest_toolchain(session: &Session, workspace: &Workspace) -> Result<()> {
    let mut toolchain = ElmToolchain::from_settings(&workspace.settings());
    let found = toolchain.suggest();

    if found.is_empty() {
        println!("No new tools found on PATH");
        return Ok(());
    }

    workspace.update_settings(|settings| toolchain.apply_to(settings));
    session.save(workspace)?;

    for tool in found {
        if let Some(path) = toolchain.path(tool) {
            println!("Found {} at {}", tool, path.display());
        }
    }
    Ok(())
}

fn set_toolchain(session: &Session, workspace: &Workspace, args: ToolchainSetArgs) -> Result<()> {
    let mut toolchain = ElmToolchain::from_settings(&workspace.settings());
    for (tool, path) in [
        (ToolKind::Compiler, args.elm),
        (ToolKind::Formatter, args.elm_format),
        (ToolKind::TestRunner, args.elm_test),
        (ToolKind::Reviewer, args.elm_review),
    ] {
        if let Some(path) = path {
            println!("Set {} to {}", tool, path.display());
            toolchain.set_path(tool, Some(path));
        }
    }

    workspace.update_settings(|settings| {
        toolchain.apply_to(settings);
        if let Some(enabled) = args.format_on_save {
            settings.is_elm_format_on_save_enabled = enabled;
        }
    });
    session.save(workspace)?;
    Ok(())
}
