//! Elm package versions.
//!
//! Elm versions are always a plain `MAJOR.MINOR.PATCH` triple. Pre-release
//! and build metadata do not exist in the Elm ecosystem, so they are rejected
//! even though the underlying `semver` parser would accept them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::constraint::ConstraintError;

/// An exact Elm version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Create a new version.
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a `MAJOR.MINOR.PATCH` string.
    pub fn parse(s: &str) -> Result<Self, ConstraintError> {
        let malformed = || ConstraintError::MalformedVersion(s.to_string());

        let parsed = semver::Version::parse(s.trim()).map_err(|_| malformed())?;
        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(malformed());
        }

        Ok(Version::from(parsed))
    }

    /// The next patch release, or `None` when the patch number is exhausted.
    pub fn bump_patch(&self) -> Option<Self> {
        let patch = self.patch.checked_add(1)?;
        Some(Version::new(self.major, self.minor, patch))
    }
}

impl FromStr for Version {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl From<semver::Version> for Version {
    fn from(v: semver::Version) -> Self {
        Version::new(v.major, v.minor, v.patch)
    }
}

impl From<Version> for semver::Version {
    fn from(v: Version) -> Self {
        semver::Version::new(v.major, v.minor, v.patch)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Version::parse(&s).map_err(serde::de::Error::custom)
    }
}
