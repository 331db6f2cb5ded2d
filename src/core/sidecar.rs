//! `elm.intellij.json` sidecar manifest.
//!
//! Lives next to `elm.json` and overrides defaults the Elm manifest has no
//! field for. The only recognized option is `test-directory`.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::util::fs::split_portable;

/// File name of the sidecar manifest.
pub const SIDECAR_MANIFEST_NAME: &str = "elm.intellij.json";

/// Default tests directory, relative to the project root.
pub const DEFAULT_TESTS_DIR: &str = "tests";

/// Error produced while reading a sidecar manifest.
#[derive(Debug, Error)]
pub enum SidecarError {
    #[error("invalid elm.intellij.json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid test-directory `{value}` in elm.intellij.json: {reason}")]
    InvalidTestDirectory { value: String, reason: &'static str },
}

#[derive(Debug, Deserialize)]
struct RawSidecar {
    #[serde(rename = "test-directory")]
    test_directory: String,
}

/// Parsed and normalized sidecar options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarManifest {
    /// Tests directory relative to the project root, normalized
    pub test_directory: PathBuf,
}

impl SidecarManifest {
    /// Parse sidecar content.
    pub fn parse(bytes: &[u8]) -> Result<Self, SidecarError> {
        let raw: RawSidecar = serde_json::from_slice(bytes)?;
        let test_directory = normalize_test_directory(&raw.test_directory)?;
        Ok(SidecarManifest { test_directory })
    }

    /// Whether the tests directory differs from the default.
    pub fn is_custom_tests_dir(&self) -> bool {
        self.test_directory != PathBuf::from(DEFAULT_TESTS_DIR)
    }
}

/// Normalize a `test-directory` value.
///
/// `.` segments and repeated separators disappear, `..` is resolved against
/// the preceding segment. The result must stay inside the project.
fn normalize_test_directory(value: &str) -> Result<PathBuf, SidecarError> {
    let invalid = |reason| SidecarError::InvalidTestDirectory {
        value: value.to_string(),
        reason,
    };

    let trimmed = value.trim();
    if trimmed.starts_with(['/', '\\']) || trimmed.get(1..2) == Some(":") {
        return Err(invalid("path must be relative to the project directory"));
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in split_portable(trimmed) {
        match segment {
            "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(invalid("path must not leave the project directory"));
                }
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return Err(invalid("path must name a directory below the project"));
    }

    Ok(segments.iter().collect())
}
