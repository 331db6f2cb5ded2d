//! `elm-workspace state` command

use anyhow::Result;

use super::Session;

pub fn execute(session: &Session) -> Result<()> {
    let workspace = session.open()?;
    print!("{}", workspace.state().to_toml_string()?);
    Ok(())
}
