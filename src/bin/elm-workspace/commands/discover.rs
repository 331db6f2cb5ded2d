//! `elm-workspace discover` command

use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use super::{print_project_line, Session};
use elm_workspace::core::state::{state_path, WorkspaceState};
use elm_workspace::sources::PackageCache;
use elm_workspace::{ManifestParser, Workspace};

pub fn execute(session: &Session) -> Result<()> {
    // Saved settings survive a rescan; only the project list is replaced.
    let settings = match WorkspaceState::load_if_exists(&state_path(&session.root))? {
        Some(state) => state.settings,
        None => session.config.to_settings(),
    };
    let workspace = Workspace::with_settings(ManifestParser::new(PackageCache::from_env()), settings);

    let spinner = if session.verbose {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.set_message(format!("Scanning {}", session.root.display()));
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    };

    let task = workspace.spawn_discover_and_refresh(&session.root)?;
    let projects = task.join()?;
    spinner.finish_and_clear();

    session.save(&workspace)?;

    println!(
        "Discovered {} Elm project{} in {}",
        projects.len(),
        if projects.len() == 1 { "" } else { "s" },
        session.root.display()
    );
    for project in &projects {
        print_project_line(session, project);
    }

    Ok(())
}
