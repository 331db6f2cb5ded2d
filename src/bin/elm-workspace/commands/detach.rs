//! `elm-workspace detach` command

use anyhow::{bail, Result};

use super::Session;
use crate::cli::DetachArgs;

pub fn execute(session: &Session, args: DetachArgs) -> Result<()> {
    let workspace = session.open()?;
    let path = session.resolve(&args.path);

    // Accept the project directory as well as the manifest itself.
    let manifest = workspace
        .all_projects()
        .into_iter()
        .find(|p| p.manifest_path() == path || p.project_dir() == path)
        .map(|p| p.manifest_path().to_path_buf())
        .unwrap_or(path);

    if !workspace.detach_project(&manifest) {
        bail!("{} is not attached", session.display(&manifest));
    }
    session.save(&workspace)?;

    println!("Detached {}", session.display(&manifest));
    Ok(())
}
