//! Pinned package dependencies.
//!
//! Every dependency of an attached project is pinned to one exact version,
//! whether it came straight from an application manifest or was resolved
//! from a package manifest's constraint.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::core::version::Version;

/// A package name paired with the version the project uses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    /// Package name, `author/project`
    pub name: String,

    /// Resolved version
    pub version: Version,
}

impl Dependency {
    /// Create a new dependency.
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Dependency {
            name: name.into(),
            version,
        }
    }

    /// The `author` half of the package name.
    pub fn author(&self) -> &str {
        self.name.split_once('/').map(|(a, _)| a).unwrap_or("")
    }

    /// The `project` half of the package name.
    pub fn project(&self) -> &str {
        self.name.split_once('/').map(|(_, p)| p).unwrap_or(&self.name)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

/// Check that `name` looks like `author/project`.
pub fn is_valid_package_name(name: &str) -> bool {
    match name.split_once('/') {
        Some((author, project)) => {
            !author.is_empty() && !project.is_empty() && !project.contains('/')
        }
        None => false,
    }
}

/// Direct and indirect dependencies of a project.
///
/// Both lists are sorted by name and never share a package name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    pub direct: Vec<Dependency>,
    pub indirect: Vec<Dependency>,
}

impl Dependencies {
    /// Build from name -> version maps, rejecting names listed in both.
    pub fn new(
        direct: BTreeMap<String, Version>,
        indirect: BTreeMap<String, Version>,
    ) -> Result<Self, String> {
        let mut seen = HashSet::new();
        for name in direct.keys().chain(indirect.keys()) {
            if !is_valid_package_name(name) {
                return Err(format!("invalid package name `{}`", name));
            }
            if !seen.insert(name.as_str()) {
                return Err(format!(
                    "package `{}` is listed as both a direct and an indirect dependency",
                    name
                ));
            }
        }

        let into_vec = |map: BTreeMap<String, Version>| {
            map.into_iter()
                .map(|(name, version)| Dependency::new(name, version))
                .collect::<Vec<_>>()
        };

        Ok(Dependencies {
            direct: into_vec(direct),
            indirect: into_vec(indirect),
        })
    }

    /// Iterate over direct then indirect dependencies.
    pub fn all(&self) -> impl Iterator<Item = &Dependency> {
        self.direct.iter().chain(self.indirect.iter())
    }

    /// Find a dependency by package name.
    pub fn get(&self, name: &str) -> Option<&Dependency> {
        self.all().find(|d| d.name == name)
    }

    /// Check whether there are no dependencies at all.
    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.indirect.is_empty()
    }

    /// Total number of dependencies.
    pub fn len(&self) -> usize {
        self.direct.len() + self.indirect.len()
    }
}
