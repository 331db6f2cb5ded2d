//! Persisted workspace state.
//!
//! `.elm-workspace/state.toml` records which manifests are attached and the
//! toolchain settings, so a workspace can be rebuilt on the next start by
//! re-reading every listed manifest.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::project::ElmProject;
use crate::core::workspace::ToolchainSettings;
use crate::util::config::WORKSPACE_DIR_NAME;
use crate::util::fs::{normalize_lexically, to_slash_string, write_string};

/// File name of the persisted state inside the workspace directory.
pub const STATE_FILE_NAME: &str = "state.toml";

const HEADER: &str = "# This file is automatically generated by elm-workspace.\n\
                      # It is not intended for manual editing.\n\n";

/// Serializable snapshot of a workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceState {
    /// Attached manifests, in attach order
    #[serde(default)]
    pub elm_projects: Vec<ProjectEntry>,

    #[serde(default)]
    pub settings: ToolchainSettings,
}

/// One attached manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    /// Absolute manifest path with `/` separators
    pub path: String,
}

impl ProjectEntry {
    pub fn new(manifest_path: &Path) -> Self {
        ProjectEntry {
            path: to_slash_string(manifest_path),
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }
}

impl WorkspaceState {
    /// Build a state from projects (in order) and settings.
    pub fn new<'a>(
        projects: impl IntoIterator<Item = &'a ElmProject>,
        settings: ToolchainSettings,
    ) -> Self {
        WorkspaceState {
            elm_projects: projects
                .into_iter()
                .map(|p| ProjectEntry::new(p.manifest_path()))
                .collect(),
            settings,
        }
    }

    /// Render as TOML. Identical states render identically.
    pub fn to_toml_string(&self) -> Result<String> {
        let body = toml::to_string_pretty(self).context("failed to serialize workspace state")?;
        Ok(format!("{HEADER}{body}"))
    }

    /// Parse a state. Entry paths are normalized and duplicates collapse onto
    /// their last occurrence, matching how a workspace attaches them.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut state: WorkspaceState =
            toml::from_str(content).context("failed to parse workspace state")?;
        state.normalize_entries();
        Ok(state)
    }

    fn normalize_entries(&mut self) {
        let mut entries: Vec<ProjectEntry> = Vec::with_capacity(self.elm_projects.len());
        for entry in self.elm_projects.drain(..) {
            let entry = ProjectEntry::new(&normalize_lexically(&entry.manifest_path()));
            entries.retain(|e| e.path != entry.path);
            entries.push(entry);
        }
        self.elm_projects = entries;
    }

    /// Load a state file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read state file: {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("invalid state file: {}", path.display()))
    }

    /// Load a state file if it exists.
    pub fn load_if_exists(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::load(path).map(Some)
    }

    /// Save the state, replacing the file atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_string(path, &self.to_toml_string()?)
    }
}

/// Default state file location for a workspace rooted at `root`.
pub fn state_path(root: &Path) -> PathBuf {
    root.join(WORKSPACE_DIR_NAME).join(STATE_FILE_NAME)
}
