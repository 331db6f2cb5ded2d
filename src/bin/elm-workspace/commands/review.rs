//! `elm-workspace review` command

use anyhow::Result;
use serde_json::json;

use super::Session;
use crate::cli::ReviewArgs;
use elm_workspace::ops::{run_review, ReviewMessage};
use elm_workspace::util::process::ProcessInvoker;
use elm_workspace::ElmToolchain;

pub fn execute(session: &Session, args: ReviewArgs) -> Result<()> {
    let workspace = session.open()?;
    let toolchain = ElmToolchain::from_settings(&workspace.settings());
    let file = session.resolve(&args.file);

    let messages = run_review(&workspace, &toolchain, &ProcessInvoker, &file)?;

    if args.json {
        let list: Vec<_> = messages.iter().map(message_json).collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!("No problems found");
        return Ok(());
    }

    for message in &messages {
        println!(
            "{}:{}:{}: [{}] {}",
            message.path,
            message.region.start.line,
            message.region.start.column,
            message.rule,
            message.message
        );
        for detail in &message.details {
            println!("    {}", detail);
        }
    }
    println!();
    println!("{} problem(s) found", messages.len());
    Ok(())
}

fn message_json(message: &ReviewMessage) -> serde_json::Value {
    json!({
        "path": message.path,
        "rule": message.rule,
        "message": message.message,
        "details": message.details,
        "region": {
            "start": { "line": message.region.start.line, "column": message.region.start.column },
            "end": { "line": message.region.end.line, "column": message.region.end.column },
        },
    })
}
