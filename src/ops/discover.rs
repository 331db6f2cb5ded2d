//! Opening and saving a workspace rooted at a directory.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::manifest::ManifestParser;
use crate::core::state::{state_path, WorkspaceState};
use crate::core::workspace::Workspace;
use crate::sources::PackageCache;
use crate::util::config::Config;

/// Build the workspace for `root`.
///
/// Settings come from `config`. If a state file was saved under `root`
/// it is restored (its settings win over the config); otherwise `root` is
/// scanned for projects.
pub fn open_workspace(root: &Path, config: &Config) -> Result<Workspace> {
    let parser = ManifestParser::new(PackageCache::from_env());
    open_workspace_with(root, config, parser)
}

pub fn open_workspace_with(root: &Path, config: &Config, parser: ManifestParser) -> Result<Workspace> {
    let workspace = Workspace::with_settings(parser, config.to_settings());

    let path = state_path(root);
    match WorkspaceState::load_if_exists(&path)? {
        Some(mut state) => {
            tracing::debug!("restoring workspace from {}", path.display());
            fill_unset_settings(&mut state, config);
            workspace.load_state(&state);
        }
        None => {
            workspace.discover_and_refresh(root);
        }
    }

    Ok(workspace)
}

/// Write the workspace's state file under `root`.
pub fn persist_workspace(root: &Path, workspace: &Workspace) -> Result<()> {
    let path = state_path(root);
    workspace
        .state()
        .save(&path)
        .with_context(|| format!("failed to save workspace state to {}", path.display()))?;
    tracing::debug!("saved workspace state to {}", path.display());
    Ok(())
}

/// Tools that the saved state leaves unconfigured fall back to the config.
fn fill_unset_settings(state: &mut WorkspaceState, config: &Config) {
    let configured = config.to_settings();
    let settings = &mut state.settings;
    for (slot, fallback) in [
        (&mut settings.elm_compiler_path, configured.elm_compiler_path),
        (&mut settings.elm_format_path, configured.elm_format_path),
        (&mut settings.elm_test_path, configured.elm_test_path),
        (&mut settings.elm_review_path, configured.elm_review_path),
    ] {
        if slot.is_empty() {
            *slot = fallback;
        }
    }
}
