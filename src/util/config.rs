//! Configuration file support.
//!
//! Two configuration file locations are read:
//! - Global: `~/.elm-workspace/config.toml` - User-wide defaults
//! - Project: `.elm-workspace/config.toml` - Workspace-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::workspace::ToolchainSettings;

/// Directory holding per-workspace files (config, persisted state).
pub const WORKSPACE_DIR_NAME: &str = ".elm-workspace";

/// Workspace configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Paths to the external Elm tools
    pub toolchain: ToolchainConfig,

    /// Editor behavior
    pub editor: EditorConfig,
}

/// Tool binary overrides. Unset tools are looked up on `PATH`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ToolchainConfig {
    /// The compiler (`elm`)
    pub elm: Option<PathBuf>,

    pub elm_format: Option<PathBuf>,

    pub elm_test: Option<PathBuf>,

    pub elm_review: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EditorConfig {
    /// Run elm-format whenever a file is saved
    pub format_on_save: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory: {}", parent.display())
            })?;
        }

        let contents =
            toml::to_string_pretty(self).with_context(|| "failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.toolchain.elm.is_some() {
            self.toolchain.elm = other.toolchain.elm;
        }
        if other.toolchain.elm_format.is_some() {
            self.toolchain.elm_format = other.toolchain.elm_format;
        }
        if other.toolchain.elm_test.is_some() {
            self.toolchain.elm_test = other.toolchain.elm_test;
        }
        if other.toolchain.elm_review.is_some() {
            self.toolchain.elm_review = other.toolchain.elm_review;
        }

        if other.editor.format_on_save.is_some() {
            self.editor.format_on_save = other.editor.format_on_save;
        }
    }

    /// Check if any tool path is configured.
    pub fn has_overrides(&self) -> bool {
        self.toolchain.elm.is_some()
            || self.toolchain.elm_format.is_some()
            || self.toolchain.elm_test.is_some()
            || self.toolchain.elm_review.is_some()
    }

    /// Workspace settings seeded from this config.
    ///
    /// Unconfigured tools become empty strings.
    pub fn to_settings(&self) -> ToolchainSettings {
        let path_string = |path: &Option<PathBuf>| {
            path.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };

        ToolchainSettings {
            elm_compiler_path: path_string(&self.toolchain.elm),
            elm_format_path: path_string(&self.toolchain.elm_format),
            elm_test_path: path_string(&self.toolchain.elm_test),
            elm_review_path: path_string(&self.toolchain.elm_review),
            is_elm_format_on_save_enabled: self.editor.format_on_save.unwrap_or(false),
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.elm-workspace/config.toml)
/// 2. Global config (~/.elm-workspace/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    // Project config overrides global
    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Load the merged config for a workspace rooted at `root`.
pub fn load_workspace_config(root: &Path) -> Config {
    let project_path = project_config_path(root);
    match global_config_path() {
        Some(global_path) => load_config(&global_path, &project_path),
        None => Config::load_or_default(&project_path),
    }
}

/// Get the global config directory (~/.elm-workspace).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(WORKSPACE_DIR_NAME))
}

/// Get the global config path (~/.elm-workspace/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.elm-workspace/config.toml).
pub fn project_config_path(root: &Path) -> PathBuf {
    root.join(WORKSPACE_DIR_NAME).join("config.toml")
}
