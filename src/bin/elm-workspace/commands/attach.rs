//! `elm-workspace attach` command

use anyhow::Result;

use super::{kind_label, Session};
use crate::cli::AttachArgs;

pub fn execute(session: &Session, args: AttachArgs) -> Result<()> {
    let workspace = session.open()?;
    let project = workspace.attach_project(&session.resolve(&args.path))?;
    session.save(&workspace)?;

    println!(
        "Attached {} {} ({})",
        kind_label(&project),
        project.presentable_name(),
        session.display(project.manifest_path())
    );
    Ok(())
}
