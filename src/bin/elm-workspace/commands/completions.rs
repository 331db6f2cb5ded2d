//! `elm-workspace completions` command

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::generate;

use elm_workspace::util::fs::write_string;

use crate::cli::{Cli, CompletionsArgs};

const BIN_NAME: &str = "elm-workspace";

pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut script = Vec::new();
    generate(args.shell, &mut Cli::command(), BIN_NAME, &mut script);
    let script = String::from_utf8(script).context("completion script is not UTF-8")?;

    match args.output {
        Some(path) => {
            write_string(&path, &script)?;
            eprintln!("Wrote {} completions to {}", args.shell, path.display());
        }
        None => print!("{script}"),
    }
    Ok(())
}
