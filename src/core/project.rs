//! Attached Elm projects.
//!
//! An [`ElmProject`] is built once from its manifest and never changes
//! afterwards; the workspace shares it behind an `Arc` and replaces it
//! wholesale when the manifest is re-read.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::constraint::Constraint;
use crate::core::dependency::Dependencies;
use crate::core::sidecar::DEFAULT_TESTS_DIR;
use crate::core::version::Version;
use crate::util::fs::normalize_lexically;

/// What kind of project a manifest describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectKind {
    /// An application, compiled with exactly one compiler version.
    Application { elm_version: Version },

    /// A publishable package.
    Package {
        /// `author/project`
        name: String,
        /// The package's own version
        version: Version,
        /// Compiler versions the package supports
        elm_version: Constraint,
        /// Modules exposed to dependents, in manifest order
        exposed_modules: Vec<String>,
    },
}

/// Which manifest format a project was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestSchema {
    /// `elm.json` (Elm 0.19+)
    Current,
    /// `elm-package.json` (Elm 0.18)
    Legacy,
}

/// One attached project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElmProject {
    manifest_path: PathBuf,
    schema: ManifestSchema,
    kind: ProjectKind,
    source_directories: Vec<PathBuf>,
    dependencies: Dependencies,
    test_dependencies: Dependencies,
    tests_relative_dir: PathBuf,
    is_custom_tests_dir: bool,
}

impl ElmProject {
    /// Assemble a project from already-validated parts.
    ///
    /// `tests_override` only takes effect for applications; packages always
    /// keep their tests in the default location.
    pub(crate) fn new(
        manifest_path: PathBuf,
        schema: ManifestSchema,
        kind: ProjectKind,
        source_directories: Vec<PathBuf>,
        dependencies: Dependencies,
        test_dependencies: Dependencies,
        tests_override: Option<PathBuf>,
    ) -> Self {
        let default_dir = PathBuf::from(DEFAULT_TESTS_DIR);
        let tests_relative_dir = match (&kind, tests_override) {
            (ProjectKind::Application { .. }, Some(dir)) => dir,
            _ => default_dir.clone(),
        };
        let is_custom_tests_dir = tests_relative_dir != default_dir;

        ElmProject {
            manifest_path,
            schema,
            kind,
            source_directories,
            dependencies,
            test_dependencies,
            tests_relative_dir,
            is_custom_tests_dir,
        }
    }

    /// Absolute path of the manifest; identifies the project.
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// The manifest format this project was read from.
    pub fn schema(&self) -> ManifestSchema {
        self.schema
    }

    /// Application or package details.
    pub fn kind(&self) -> &ProjectKind {
        &self.kind
    }

    pub fn is_application(&self) -> bool {
        matches!(self.kind, ProjectKind::Application { .. })
    }

    pub fn is_package(&self) -> bool {
        matches!(self.kind, ProjectKind::Package { .. })
    }

    /// The directory containing the manifest.
    pub fn project_dir(&self) -> &Path {
        self.manifest_path.parent().unwrap_or(Path::new("."))
    }

    /// Source directories, relative to the project directory.
    pub fn source_directories(&self) -> &[PathBuf] {
        &self.source_directories
    }

    /// Source directories as absolute paths.
    pub fn absolute_source_directories(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.source_directories
            .iter()
            .map(|dir| normalize_lexically(&self.project_dir().join(dir)))
    }

    pub fn dependencies(&self) -> &Dependencies {
        &self.dependencies
    }

    pub fn test_dependencies(&self) -> &Dependencies {
        &self.test_dependencies
    }

    /// Tests directory relative to the project directory.
    pub fn tests_relative_dir(&self) -> &Path {
        &self.tests_relative_dir
    }

    /// Absolute tests directory.
    pub fn tests_dir(&self) -> PathBuf {
        normalize_lexically(&self.project_dir().join(&self.tests_relative_dir))
    }

    /// Whether the sidecar manifest moved the tests directory.
    pub fn is_custom_tests_dir(&self) -> bool {
        self.is_custom_tests_dir
    }

    /// Exposed modules (empty for applications).
    pub fn exposed_modules(&self) -> &[String] {
        match &self.kind {
            ProjectKind::Package {
                exposed_modules, ..
            } => exposed_modules,
            ProjectKind::Application { .. } => &[],
        }
    }

    /// The compiler version requirement, as written in the manifest.
    pub fn elm_version_display(&self) -> String {
        match &self.kind {
            ProjectKind::Application { elm_version } => elm_version.to_string(),
            ProjectKind::Package { elm_version, .. } => elm_version.to_string(),
        }
    }

    /// A short human-readable name.
    ///
    /// Packages use their published name; applications use the name of the
    /// directory holding the manifest.
    pub fn presentable_name(&self) -> String {
        match &self.kind {
            ProjectKind::Package { name, .. } => name.clone(),
            ProjectKind::Application { .. } => self
                .project_dir()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.project_dir().display().to_string()),
        }
    }

    /// Number of path components of the project directory; deeper is more
    /// specific when projects nest.
    pub(crate) fn depth(&self) -> usize {
        self.project_dir().components().count()
    }

    /// Check whether `file` (absolute, normalized) belongs to this project:
    /// it must sit below one of the source directories or the tests directory.
    /// Source directories may point outside the project directory.
    pub fn contains_file(&self, file: &Path) -> bool {
        self.absolute_source_directories()
            .any(|dir| file.starts_with(&dir))
            || file.starts_with(self.tests_dir())
    }
}

impl fmt::Display for ElmProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ProjectKind::Application { .. } => "application",
            ProjectKind::Package { .. } => "package",
        };
        write!(
            f,
            "{} ({}, {})",
            self.presentable_name(),
            kind,
            self.manifest_path.display()
        )
    }
}
