//! Command implementations

pub mod attach;
pub mod completions;
pub mod detach;
pub mod discover;
pub mod projects;
pub mod review;
pub mod state;
pub mod toolchain;
pub mod which;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use elm_workspace::core::project::{ElmProject, ProjectKind};
use elm_workspace::ops::{open_workspace, persist_workspace};
use elm_workspace::util::config::load_workspace_config;
use elm_workspace::util::fs::{absolutize, relative_path, to_slash_string};
use elm_workspace::{Config, Workspace};

/// Everything a command needs to know about where it runs.
pub struct Session {
    pub root: PathBuf,
    pub cwd: PathBuf,
    pub config: Config,
    pub verbose: bool,
}

impl Session {
    pub fn new(root: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to determine current directory")?;
        let root = absolutize(root.as_deref().unwrap_or(&cwd), &cwd);
        if !root.is_dir() {
            bail!("workspace root {} is not a directory", root.display());
        }

        let config = load_workspace_config(&root);
        Ok(Session {
            root,
            cwd,
            config,
            verbose,
        })
    }

    /// The workspace as last saved, or freshly discovered.
    pub fn open(&self) -> Result<Workspace> {
        open_workspace(&self.root, &self.config)
    }

    pub fn save(&self, workspace: &Workspace) -> Result<()> {
        persist_workspace(&self.root, workspace)
    }

    /// Resolve a user-supplied path against the current directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        absolutize(path, &self.cwd)
    }

    /// A path as shown to the user: relative to the root when below it.
    pub fn display(&self, path: &Path) -> String {
        if path.starts_with(&self.root) {
            to_slash_string(&relative_path(&self.root, path))
        } else {
            to_slash_string(path)
        }
    }
}

pub fn kind_label(project: &ElmProject) -> &'static str {
    match project.kind() {
        ProjectKind::Application { .. } => "application",
        ProjectKind::Package { .. } => "package",
    }
}

/// One line per project: name, kind, compiler version and manifest.
pub fn print_project_line(session: &Session, project: &ElmProject) {
    println!(
        "  {:<24} {:<11} {:<18} {}",
        project.presentable_name(),
        kind_label(project),
        project.elm_version_display(),
        session.display(project.manifest_path())
    );
}
