//! `elm-workspace which` command

use anyhow::{bail, Result};

use super::{kind_label, Session};
use crate::cli::WhichArgs;

pub fn execute(session: &Session, args: WhichArgs) -> Result<()> {
    let workspace = session.open()?;
    let file = session.resolve(&args.file);

    let Some(project) = workspace.find_project_for_file(&file) else {
        bail!(
            "{} does not belong to any attached Elm project",
            session.display(&file)
        );
    };

    println!(
        "{} ({}, {})",
        project.presentable_name(),
        kind_label(&project),
        session.display(project.manifest_path())
    );
    Ok(())
}
