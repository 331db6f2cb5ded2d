//! `elm-workspace projects` command

use anyhow::Result;
use serde_json::{json, Value};

use super::{kind_label, print_project_line, Session};
use crate::cli::ProjectsArgs;
use elm_workspace::core::dependency::Dependencies;
use elm_workspace::core::project::ElmProject;
use elm_workspace::util::fs::to_slash_string;

pub fn execute(session: &Session, args: ProjectsArgs) -> Result<()> {
    let workspace = session.open()?;
    let projects = workspace.all_projects();

    if args.json {
        let list: Vec<Value> = projects.iter().map(|p| project_json(p)).collect();
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!("No Elm projects attached");
        return Ok(());
    }

    println!("{} Elm project(s) in {}", projects.len(), session.root.display());
    for project in &projects {
        print_project_line(session, project);
    }
    Ok(())
}

fn dependencies_json(deps: &Dependencies) -> Value {
    let versions = |list: &[elm_workspace::core::Dependency]| -> serde_json::Map<String, Value> {
        list.iter()
            .map(|d| (d.name.clone(), Value::String(d.version.to_string())))
            .collect()
    };
    json!({
        "direct": versions(deps.direct.as_slice()),
        "indirect": versions(deps.indirect.as_slice()),
    })
}

fn project_json(project: &ElmProject) -> Value {
    json!({
        "name": project.presentable_name(),
        "kind": kind_label(project),
        "manifest": to_slash_string(project.manifest_path()),
        "elmVersion": project.elm_version_display(),
        "sourceDirectories": project
            .absolute_source_directories()
            .map(|d| to_slash_string(&d))
            .collect::<Vec<_>>(),
        "testsDirectory": to_slash_string(&project.tests_dir()),
        "exposedModules": project.exposed_modules(),
        "dependencies": dependencies_json(project.dependencies()),
        "testDependencies": dependencies_json(project.test_dependencies()),
    })
}
