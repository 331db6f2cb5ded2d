//! Installed package cache.
//!
//! The Elm compiler keeps every downloaded package under
//! `$ELM_HOME/<compiler-version>/packages/<author>/<project>/<version>/`.
//! Package manifests only carry version constraints, so their dependencies
//! are pinned to whatever is installed there.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::constraint::Constraint;
use crate::core::version::Version;

/// Compiler versions whose package directories are consulted, newest first.
const COMPILER_DIRS: &[&str] = &["0.19.1", "0.19.0"];

/// Read-only view of the compiler's installed packages.
#[derive(Debug, Clone, Default)]
pub struct PackageCache {
    /// `ELM_HOME`, or `None` when it could not be determined
    elm_home: Option<PathBuf>,
}

impl PackageCache {
    /// Create a cache rooted at an explicit `ELM_HOME`.
    pub fn new(elm_home: impl Into<PathBuf>) -> Self {
        PackageCache {
            elm_home: Some(elm_home.into()),
        }
    }

    /// A cache that never finds anything.
    pub fn empty() -> Self {
        PackageCache { elm_home: None }
    }

    /// Locate `ELM_HOME` the way the compiler does: the env var, else `~/.elm`.
    pub fn from_env() -> Self {
        let elm_home = std::env::var_os("ELM_HOME")
            .map(PathBuf::from)
            .or_else(|| directories::BaseDirs::new().map(|b| b.home_dir().join(".elm")));
        PackageCache { elm_home }
    }

    /// The `ELM_HOME` directory, if known.
    pub fn elm_home(&self) -> Option<&Path> {
        self.elm_home.as_deref()
    }

    /// All installed versions of a package, across compiler directories.
    pub fn installed_versions(&self, name: &str) -> Vec<Version> {
        let Some(home) = &self.elm_home else {
            return Vec::new();
        };
        let Some((author, project)) = name.split_once('/') else {
            return Vec::new();
        };

        let mut versions = Vec::new();
        for compiler in COMPILER_DIRS {
            let dir = home
                .join(compiler)
                .join("packages")
                .join(author)
                .join(project);
            let Ok(entries) = fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.flatten() {
                if !entry.path().is_dir() {
                    continue;
                }
                if let Some(version) = entry
                    .file_name()
                    .to_str()
                    .and_then(|s| Version::parse(s).ok())
                {
                    versions.push(version);
                }
            }
        }

        versions.sort();
        versions.dedup();
        versions
    }

    /// Pin `constraint` to the newest installed version that satisfies it.
    ///
    /// Falls back to the lowest version the constraint admits when nothing
    /// suitable is installed. `None` when the constraint admits no version.
    pub fn resolve(&self, name: &str, constraint: &Constraint) -> Option<Version> {
        let best = self
            .installed_versions(name)
            .into_iter()
            .filter(|v| constraint.satisfies(v))
            .max();

        match best {
            Some(version) => Some(version),
            None => {
                tracing::debug!(
                    "no installed version of `{}` satisfies `{}`, using lower bound",
                    name,
                    constraint
                );
                constraint.min_version()
            }
        }
    }
}
