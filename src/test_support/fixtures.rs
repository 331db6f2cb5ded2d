//! Test fixtures for common test scenarios.
//!
//! Manifest documents used across the workspace tests, plus a small
//! builder for laying out project trees on disk.

use std::path::{Path, PathBuf};

/// A minimal application manifest with no dependencies.
pub const BASIC_APPLICATION_MANIFEST: &str = r#"{
  "type": "application",
  "source-directories": [ "src" ],
  "elm-version": "0.19.1",
  "dependencies": {
    "direct": {},
    "indirect": {}
  },
  "test-dependencies": {
    "direct": {},
    "indirect": {}
  }
}"#;

/// A minimal package manifest with no dependencies.
pub const BASIC_PACKAGE_MANIFEST: &str = r#"{
  "type": "package",
  "name": "test",
  "summary": "Test",
  "license": "Test",
  "version": "1.2.3",
  "exposed-modules": [],
  "elm-version": "0.19.0 <= v < 0.20.0",
  "dependencies": { },
  "test-dependencies": { }
}"#;

/// An application with two source directories and every dependency group.
pub const FULL_APPLICATION_MANIFEST: &str = r#"{
    "type": "application",
    "source-directories": [ "src", "vendor" ],
    "elm-version": "0.19.1",
    "dependencies": {
        "direct": {
            "elm/core": "1.0.0",
            "elm/html": "1.0.0"
        },
        "indirect": {
            "elm/virtual-dom": "1.0.2"
        }
    },
    "test-dependencies": {
        "direct": {
            "elm-explorations/test": "1.0.0"
        },
        "indirect": {
            "elm/random": "1.0.0"
        }
    }
}"#;

/// The `elm/json` package.
pub const JSON_PACKAGE_MANIFEST: &str = r#"{
    "type": "package",
    "name": "elm/json",
    "summary": "Encode and decode JSON values",
    "license": "BSD-3-Clause",
    "version": "1.2.3",
    "exposed-modules": [
        "Json.Decode",
        "Json.Encode"
    ],
    "elm-version": "0.19.0 <= v < 0.20.0",
    "dependencies": {
        "elm/core": "1.0.0 <= v < 2.0.0"
    },
    "test-dependencies": {
        "elm-explorations/test": "1.0.0 <= v < 2.0.0"
    }
}"#;

/// An Elm 0.18 application; needs [`LEGACY_EXACT_DEPENDENCIES`].
pub const LEGACY_APPLICATION_MANIFEST: &str = r#"{
  "version": "1.0.0",
  "summary": "blah",
  "repository": "https://github.com/user/project.git",
  "license": "BSD3",
  "source-directories": [
    "./src"
  ],
  "exposed-modules": [],
  "dependencies": {
    "elm-lang/core": "5.0.0 <= v < 6.0.0"
  },
  "elm-version": "0.18.0 <= v < 0.19.0"
}"#;

/// An Elm 0.18 package.
pub const LEGACY_PACKAGE_MANIFEST: &str = r#"{
  "version": "1.2.3",
  "summary": "blah",
  "repository": "https://github.com/user/project.git",
  "license": "BSD3",
  "source-directories": [
    "."
  ],
  "exposed-modules": ["Foo", "Bar"],
  "native-modules": false,
  "dependencies": {
    "elm-lang/core": "5.0.0 <= v < 6.0.0"
  },
  "elm-version": "0.18.0 <= v < 0.19.0"
}"#;

/// `elm-stuff/exact-dependencies.json` matching the legacy manifests.
pub const LEGACY_EXACT_DEPENDENCIES: &str = r#"{
    "elm-lang/core": "5.1.1",
    "elm-lang/virtual-dom": "2.0.4"
}"#;

/// An `elm.intellij.json` document pointing at `test_dir`.
pub fn sidecar_manifest(test_dir: &str) -> String {
    format!(
        r#"{{ "test-directory": "{}" }}"#,
        test_dir.replace('\\', "\\\\")
    )
}

/// Builder for a directory tree of project files.
///
/// ```rust,ignore
/// let root = FileTree::new()
///     .file("a/elm.json", BASIC_APPLICATION_MANIFEST)
///     .file("a/src/Main.elm", "")
///     .write_to(tmp.path())?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileTree {
    files: Vec<(PathBuf, String)>,
    dirs: Vec<PathBuf>,
}

impl FileTree {
    pub fn new() -> Self {
        FileTree::default()
    }

    /// Add a file (path relative to the tree root).
    pub fn file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    /// Add an empty directory.
    pub fn dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.dirs.push(path.into());
        self
    }

    /// An application project at `dir` with `src/Main.elm`.
    pub fn application(self, dir: &str) -> Self {
        self.file(format!("{dir}/elm.json"), BASIC_APPLICATION_MANIFEST)
            .file(format!("{dir}/src/Main.elm"), "module Main exposing (..)\n")
    }

    /// Write everything below `base_path`, returning it.
    pub fn write_to(&self, base_path: &Path) -> std::io::Result<PathBuf> {
        for dir in &self.dirs {
            std::fs::create_dir_all(base_path.join(dir))?;
        }
        for (path, content) in &self.files {
            let full = base_path.join(path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(full, content)?;
        }
        Ok(base_path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_tree_write() {
        let tmp = TempDir::new().unwrap();
        FileTree::new()
            .application("a")
            .dir("empty")
            .write_to(tmp.path())
            .unwrap();

        assert!(tmp.path().join("a/elm.json").is_file());
        assert!(tmp.path().join("a/src/Main.elm").is_file());
        assert!(tmp.path().join("empty").is_dir());
    }

    #[test]
    fn test_sidecar_escapes_backslashes() {
        assert_eq!(
            sidecar_manifest(r"custom\tests"),
            r#"{ "test-directory": "custom\\tests" }"#
        );
    }
}
