//! `elm.json` and `elm-package.json` manifest parsing.
//!
//! Two schema families are understood:
//! - `elm.json` (Elm 0.19), with a `type` of `application` or `package`
//! - `elm-package.json` (Elm 0.18), one flat format for both kinds
//!
//! Parsing produces a fully validated [`ElmProject`]. Companion files are
//! read from disk next to the manifest: the `elm.intellij.json` sidecar for
//! current manifests and `elm-stuff/exact-dependencies.json` for legacy ones.

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::core::constraint::Constraint;
use crate::core::dependency::{is_valid_package_name, Dependencies};
use crate::core::project::{ElmProject, ManifestSchema, ProjectKind};
use crate::core::sidecar::{SidecarError, SidecarManifest, SIDECAR_MANIFEST_NAME};
use crate::core::version::Version;
use crate::sources::PackageCache;
use crate::util::fs::normalize_lexically;

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "elm.json";

/// Elm 0.18 manifest file name.
pub const LEGACY_MANIFEST_NAME: &str = "elm-package.json";

/// Elm 0.18 lock data, relative to the project directory.
pub const EXACT_DEPENDENCIES_PATH: &str = "elm-stuff/exact-dependencies.json";

/// Error produced while turning a manifest into an [`ElmProject`].
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid manifest {}: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },

    #[error("invalid elm.intellij.json in {}", .dir.display())]
    Sidecar {
        dir: PathBuf,
        #[source]
        source: SidecarError,
    },

    #[error("failed to read {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ManifestError {
    fn invalid(path: &Path, reason: impl fmt::Display) -> Self {
        ManifestError::Invalid {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

impl ManifestSchema {
    /// Pick the schema from a manifest's file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.file_name()?.to_str()? {
            MANIFEST_NAME => Some(ManifestSchema::Current),
            LEGACY_MANIFEST_NAME => Some(ManifestSchema::Legacy),
            _ => None,
        }
    }

    /// The file name used by this schema.
    pub fn file_name(self) -> &'static str {
        match self {
            ManifestSchema::Current => MANIFEST_NAME,
            ManifestSchema::Legacy => LEGACY_MANIFEST_NAME,
        }
    }
}

/// Raw `elm.json`, discriminated by its `type` field.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RawManifest {
    Application(RawApplication),
    Package(RawPackage),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawApplication {
    source_directories: Vec<String>,
    elm_version: Version,
    dependencies: RawPinnedDeps,
    test_dependencies: RawPinnedDeps,
}

#[derive(Debug, Deserialize)]
struct RawPinnedDeps {
    direct: BTreeMap<String, Version>,
    indirect: BTreeMap<String, Version>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawPackage {
    name: String,
    summary: String,
    license: String,
    version: Version,
    exposed_modules: ExposedModules,
    elm_version: Constraint,
    dependencies: BTreeMap<String, Constraint>,
    test_dependencies: BTreeMap<String, Constraint>,
}

/// Raw `elm-package.json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawLegacyManifest {
    version: Version,
    summary: String,
    repository: String,
    license: String,
    source_directories: Vec<String>,
    exposed_modules: Vec<String>,
    #[serde(default)]
    native_modules: bool,
    dependencies: BTreeMap<String, Constraint>,
    elm_version: Constraint,
}

/// `exposed-modules` is either a flat list or a map of category -> modules.
///
/// Category order matters for presentation, so the map form is read with
/// its entries in document order.
#[derive(Debug, Default)]
struct ExposedModules(Vec<String>);

impl<'de> Deserialize<'de> for ExposedModules {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ExposedVisitor;

        impl<'de> Visitor<'de> for ExposedVisitor {
            type Value = ExposedModules;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list of module names or a map of category to module names")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut modules = Vec::new();
                while let Some(module) = seq.next_element::<String>()? {
                    modules.push(module);
                }
                Ok(ExposedModules(modules))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut modules = Vec::new();
                while let Some((_category, group)) = map.next_entry::<String, Vec<String>>()? {
                    modules.extend(group);
                }
                Ok(ExposedModules(modules))
            }
        }

        deserializer.deserialize_any(ExposedVisitor)
    }
}

/// Turns manifest bytes into validated projects.
#[derive(Debug, Clone, Default)]
pub struct ManifestParser {
    cache: PackageCache,
}

impl ManifestParser {
    /// Create a parser that pins package constraints against `cache`.
    pub fn new(cache: PackageCache) -> Self {
        ManifestParser { cache }
    }

    /// Read and parse the manifest at `manifest_path`.
    pub fn load(&self, manifest_path: &Path) -> Result<ElmProject, ManifestError> {
        let bytes = std::fs::read(manifest_path).map_err(|source| ManifestError::Io {
            path: manifest_path.to_path_buf(),
            source,
        })?;
        self.parse_manifest(&bytes, manifest_path)
    }

    /// Parse manifest content; the schema follows from the file name.
    pub fn parse_manifest(
        &self,
        bytes: &[u8],
        manifest_path: &Path,
    ) -> Result<ElmProject, ManifestError> {
        let schema = ManifestSchema::from_path(manifest_path).ok_or_else(|| {
            ManifestError::invalid(
                manifest_path,
                format!("expected {} or {}", MANIFEST_NAME, LEGACY_MANIFEST_NAME),
            )
        })?;
        self.parse_with_schema(bytes, manifest_path, schema)
    }

    /// Parse manifest content with an explicit schema.
    pub fn parse_with_schema(
        &self,
        bytes: &[u8],
        manifest_path: &Path,
        schema: ManifestSchema,
    ) -> Result<ElmProject, ManifestError> {
        match schema {
            ManifestSchema::Current => self.parse_current(bytes, manifest_path),
            ManifestSchema::Legacy => self.parse_legacy(bytes, manifest_path),
        }
    }

    fn parse_current(&self, bytes: &[u8], path: &Path) -> Result<ElmProject, ManifestError> {
        let raw: RawManifest =
            serde_json::from_slice(bytes).map_err(|e| ManifestError::invalid(path, e))?;
        let project_dir = project_dir(path);
        let sidecar = load_sidecar(project_dir)?;
        let tests_override = sidecar.map(|s| s.test_directory);

        match raw {
            RawManifest::Application(app) => {
                let source_directories = normalize_source_dirs(path, &app.source_directories)?;
                let dependencies =
                    Dependencies::new(app.dependencies.direct, app.dependencies.indirect)
                        .map_err(|e| ManifestError::invalid(path, e))?;
                let test_dependencies = Dependencies::new(
                    app.test_dependencies.direct,
                    app.test_dependencies.indirect,
                )
                .map_err(|e| ManifestError::invalid(path, e))?;

                Ok(ElmProject::new(
                    path.to_path_buf(),
                    ManifestSchema::Current,
                    ProjectKind::Application {
                        elm_version: app.elm_version,
                    },
                    source_directories,
                    dependencies,
                    test_dependencies,
                    tests_override,
                ))
            }
            RawManifest::Package(pkg) => {
                if !is_valid_package_name(&pkg.name) {
                    tracing::warn!(
                        "package name `{}` in {} is not of the form author/project",
                        pkg.name,
                        path.display()
                    );
                }
                tracing::debug!(
                    "package {} {} ({}): {}",
                    pkg.name,
                    pkg.version,
                    pkg.license,
                    pkg.summary
                );

                let dependencies = self.resolve_constraints(path, &pkg.dependencies, None)?;
                let test_dependencies =
                    self.resolve_constraints(path, &pkg.test_dependencies, None)?;

                // Elm 0.19 packages always keep their modules in `src`.
                Ok(ElmProject::new(
                    path.to_path_buf(),
                    ManifestSchema::Current,
                    ProjectKind::Package {
                        name: pkg.name,
                        version: pkg.version,
                        elm_version: pkg.elm_version,
                        exposed_modules: pkg.exposed_modules.0,
                    },
                    vec![PathBuf::from("src")],
                    dependencies,
                    test_dependencies,
                    tests_override,
                ))
            }
        }
    }

    fn parse_legacy(&self, bytes: &[u8], path: &Path) -> Result<ElmProject, ManifestError> {
        let raw: RawLegacyManifest =
            serde_json::from_slice(bytes).map_err(|e| ManifestError::invalid(path, e))?;
        let source_directories = normalize_source_dirs(path, &raw.source_directories)?;
        let exact = load_exact_dependencies(project_dir(path))?;

        tracing::debug!(
            "legacy manifest {} ({}, native modules: {}): {}",
            path.display(),
            raw.license,
            raw.native_modules,
            raw.summary
        );

        // Elm 0.18 applications conventionally expose nothing.
        if raw.exposed_modules.is_empty() {
            let Some(exact) = exact else {
                return Err(ManifestError::invalid(
                    path,
                    format!(
                        "{} is required to resolve application dependencies",
                        EXACT_DEPENDENCIES_PATH
                    ),
                ));
            };

            let mut direct = BTreeMap::new();
            for name in raw.dependencies.keys() {
                let version = exact.get(name).ok_or_else(|| {
                    ManifestError::invalid(
                        path,
                        format!("`{}` is missing from {}", name, EXACT_DEPENDENCIES_PATH),
                    )
                })?;
                direct.insert(name.clone(), *version);
            }
            let indirect = exact
                .into_iter()
                .filter(|(name, _)| !direct.contains_key(name))
                .collect();
            let dependencies =
                Dependencies::new(direct, indirect).map_err(|e| ManifestError::invalid(path, e))?;

            return Ok(ElmProject::new(
                path.to_path_buf(),
                ManifestSchema::Legacy,
                ProjectKind::Application {
                    elm_version: raw.elm_version.low,
                },
                source_directories,
                dependencies,
                Dependencies::default(),
                None,
            ));
        }

        let name = package_name_from_repository(&raw.repository).ok_or_else(|| {
            ManifestError::invalid(
                path,
                format!("cannot derive a package name from `{}`", raw.repository),
            )
        })?;
        let dependencies = self.resolve_constraints(path, &raw.dependencies, exact.as_ref())?;

        Ok(ElmProject::new(
            path.to_path_buf(),
            ManifestSchema::Legacy,
            ProjectKind::Package {
                name,
                version: raw.version,
                elm_version: raw.elm_version,
                exposed_modules: raw.exposed_modules,
            },
            source_directories,
            dependencies,
            Dependencies::default(),
            None,
        ))
    }

    /// Pin constraint-style dependencies, all classified as direct.
    fn resolve_constraints(
        &self,
        path: &Path,
        constraints: &BTreeMap<String, Constraint>,
        exact: Option<&BTreeMap<String, Version>>,
    ) -> Result<Dependencies, ManifestError> {
        let direct = constraints
            .iter()
            .map(|(name, constraint)| {
                let pinned = exact.and_then(|e| e.get(name)).copied();
                let version = pinned
                    .or_else(|| self.cache.resolve(name, constraint))
                    .ok_or_else(|| {
                        ManifestError::invalid(
                            path,
                            format!("`{name}` constraint `{constraint}` admits no version"),
                        )
                    })?;
                Ok((name.clone(), version))
            })
            .collect::<Result<BTreeMap<_, _>, ManifestError>>()?;

        Dependencies::new(direct, BTreeMap::new()).map_err(|e| ManifestError::invalid(path, e))
    }
}

fn project_dir(manifest_path: &Path) -> &Path {
    manifest_path.parent().unwrap_or(Path::new("."))
}

fn normalize_source_dirs(path: &Path, dirs: &[String]) -> Result<Vec<PathBuf>, ManifestError> {
    if dirs.is_empty() {
        return Err(ManifestError::invalid(
            path,
            "`source-directories` must not be empty",
        ));
    }

    let mut normalized: Vec<PathBuf> = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let dir = normalize_lexically(Path::new(dir));
        if !normalized.contains(&dir) {
            normalized.push(dir);
        }
    }
    Ok(normalized)
}

fn load_sidecar(project_dir: &Path) -> Result<Option<SidecarManifest>, ManifestError> {
    let sidecar_path = project_dir.join(SIDECAR_MANIFEST_NAME);
    let bytes = match std::fs::read(&sidecar_path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ManifestError::Io {
                path: sidecar_path,
                source,
            })
        }
    };

    SidecarManifest::parse(&bytes)
        .map(Some)
        .map_err(|source| ManifestError::Sidecar {
            dir: project_dir.to_path_buf(),
            source,
        })
}

fn load_exact_dependencies(
    project_dir: &Path,
) -> Result<Option<BTreeMap<String, Version>>, ManifestError> {
    let lock_path = project_dir.join(EXACT_DEPENDENCIES_PATH);
    let bytes = match std::fs::read(&lock_path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ManifestError::Io {
                path: lock_path,
                source,
            })
        }
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| ManifestError::invalid(&lock_path, e))
}

/// `https://github.com/user/project.git` -> `user/project`
fn package_name_from_repository(repository: &str) -> Option<String> {
    let trimmed = repository.trim_end_matches('/').trim_end_matches(".git");
    let mut parts = trimmed.rsplit('/');
    let project = parts.next().filter(|s| !s.is_empty())?;
    let author = parts.next().filter(|s| !s.is_empty() && !s.contains(':'))?;
    Some(format!("{}/{}", author, project))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dependency::Dependency;
    use crate::test_support::fixtures::*;
    use tempfile::TempDir;

    fn parse_in(tmp: &TempDir, file: &str, content: &str) -> Result<ElmProject, ManifestError> {
        let path = tmp.path().join(file);
        std::fs::write(&path, content).unwrap();
        ManifestParser::default().load(&path)
    }

    fn deps(list: &[Dependency]) -> Vec<(&str, Version)> {
        list.iter().map(|d| (d.name.as_str(), d.version)).collect()
    }

    #[test]
    fn test_parse_application() {
        let tmp = TempDir::new().unwrap();
        let project = parse_in(&tmp, "elm.json", FULL_APPLICATION_MANIFEST).unwrap();

        assert_eq!(
            project.kind(),
            &ProjectKind::Application {
                elm_version: Version::new(0, 19, 1)
            }
        );
        assert_eq!(
            project.source_directories(),
            &[PathBuf::from("src"), PathBuf::from("vendor")]
        );
        assert_eq!(
            deps(&project.dependencies().direct),
            vec![
                ("elm/core", Version::new(1, 0, 0)),
                ("elm/html", Version::new(1, 0, 0))
            ]
        );
        assert_eq!(
            deps(&project.dependencies().indirect),
            vec![("elm/virtual-dom", Version::new(1, 0, 2))]
        );
        assert_eq!(
            deps(&project.test_dependencies().direct),
            vec![("elm-explorations/test", Version::new(1, 0, 0))]
        );
        assert_eq!(
            deps(&project.test_dependencies().indirect),
            vec![("elm/random", Version::new(1, 0, 0))]
        );
    }

    #[test]
    fn test_parse_package() {
        let tmp = TempDir::new().unwrap();
        let project = parse_in(&tmp, "elm.json", JSON_PACKAGE_MANIFEST).unwrap();

        let ProjectKind::Package {
            name,
            version,
            elm_version,
            exposed_modules,
        } = project.kind()
        else {
            panic!("expected a package, got {}", project);
        };
        assert_eq!(name, "elm/json");
        assert_eq!(*version, Version::new(1, 2, 3));
        assert_eq!(
            *elm_version,
            Constraint::range(Version::new(0, 19, 0), Version::new(0, 20, 0))
        );
        assert!(elm_version.satisfies(&Version::new(0, 19, 1)));
        assert!(!elm_version.satisfies(&Version::new(0, 20, 0)));
        assert_eq!(exposed_modules, &["Json.Decode", "Json.Encode"]);

        assert_eq!(project.source_directories(), &[PathBuf::from("src")]);
        assert_eq!(
            deps(&project.dependencies().direct),
            vec![("elm/core", Version::new(1, 0, 0))]
        );
        assert!(project.dependencies().indirect.is_empty());
        assert_eq!(
            deps(&project.test_dependencies().direct),
            vec![("elm-explorations/test", Version::new(1, 0, 0))]
        );
    }

    #[test]
    fn test_package_dependencies_pinned_from_cache() {
        let tmp = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();
        std::fs::create_dir_all(home.path().join("0.19.1/packages/elm/core/1.0.5")).unwrap();

        let path = tmp.path().join("elm.json");
        std::fs::write(&path, JSON_PACKAGE_MANIFEST).unwrap();
        let project = ManifestParser::new(PackageCache::new(home.path()))
            .load(&path)
            .unwrap();

        assert_eq!(
            project.dependencies().get("elm/core").unwrap().version,
            Version::new(1, 0, 5)
        );
    }

    #[test]
    fn test_package_dependency_admitting_no_version_is_invalid() {
        let tmp = TempDir::new().unwrap();
        let manifest = JSON_PACKAGE_MANIFEST.replace(
            r#""elm/core": "1.0.0 <= v < 2.0.0""#,
            r#""elm/core": "1.0.18446744073709551615 < v < 2.0.0""#,
        );
        let err = parse_in(&tmp, "elm.json", &manifest).unwrap_err();
        assert!(matches!(err, ManifestError::Invalid { .. }));
        assert!(err.to_string().contains("elm/core"));
    }

    #[test]
    fn test_package_categorized_exposed_modules() {
        let tmp = TempDir::new().unwrap();
        let manifest = JSON_PACKAGE_MANIFEST.replace(
            r#""exposed-modules": [
        "Json.Decode",
        "Json.Encode"
    ],"#,
            r#""exposed-modules": {
        "Encoding": ["Json.Encode"],
        "Decoding": ["Json.Decode", "Json.Decode.Extra"]
    },"#,
        );
        let project = parse_in(&tmp, "elm.json", &manifest).unwrap();
        assert_eq!(
            project.exposed_modules(),
            &["Json.Encode", "Json.Decode", "Json.Decode.Extra"]
        );
    }

    #[test]
    fn test_package_ignores_declared_source_directories() {
        let tmp = TempDir::new().unwrap();
        let manifest = BASIC_PACKAGE_MANIFEST.replacen(
            "{",
            r#"{ "source-directories": ["lib", "other"],"#,
            1,
        );
        let project = parse_in(&tmp, "elm.json", &manifest).unwrap();
        assert_eq!(project.source_directories(), &[PathBuf::from("src")]);
    }

    #[test]
    fn test_invalid_manifests() {
        let tmp = TempDir::new().unwrap();
        let cases = [
            r#" { "BOGUS": "INVALID ELM.JSON" } "#,
            r#"{ "type": "library" }"#,
            "not json at all",
            r#"{ "type": "application", "source-directories": "src" }"#,
        ];
        for content in cases {
            assert!(
                matches!(
                    parse_in(&tmp, "elm.json", content),
                    Err(ManifestError::Invalid { .. })
                ),
                "expected {content:?} to be invalid"
            );
        }
    }

    #[test]
    fn test_application_requires_exact_versions() {
        let tmp = TempDir::new().unwrap();
        let manifest = BASIC_APPLICATION_MANIFEST.replace("\"0.19.1\"", "\"0.19.0 <= v < 0.20.0\"");
        assert!(matches!(
            parse_in(&tmp, "elm.json", &manifest),
            Err(ManifestError::Invalid { .. })
        ));
    }

    #[test]
    fn test_empty_source_directories_is_invalid() {
        let tmp = TempDir::new().unwrap();
        let manifest = BASIC_APPLICATION_MANIFEST.replace(r#"[ "src" ]"#, "[]");
        let err = parse_in(&tmp, "elm.json", &manifest).unwrap_err();
        assert!(err.to_string().contains("source-directories"));
    }

    #[test]
    fn test_source_directories_normalized() {
        let tmp = TempDir::new().unwrap();
        let manifest =
            BASIC_APPLICATION_MANIFEST.replace(r#"[ "src" ]"#, r#"[ "./src", "src/", "../shared" ]"#);
        let project = parse_in(&tmp, "elm.json", &manifest).unwrap();
        assert_eq!(
            project.source_directories(),
            &[PathBuf::from("src"), PathBuf::from("../shared")]
        );
    }

    #[test]
    fn test_unknown_file_name_is_invalid() {
        let tmp = TempDir::new().unwrap();
        let err = parse_in(&tmp, "package.json", BASIC_APPLICATION_MANIFEST).unwrap_err();
        assert!(matches!(err, ManifestError::Invalid { .. }));
    }

    #[test]
    fn test_sidecar_applies_to_application() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(SIDECAR_MANIFEST_NAME),
            sidecar_manifest("custom-tests"),
        )
        .unwrap();
        let project = parse_in(&tmp, "elm.json", BASIC_APPLICATION_MANIFEST).unwrap();
        assert!(project.is_custom_tests_dir());
        assert_eq!(project.tests_dir(), tmp.path().join("custom-tests"));
    }

    #[test]
    fn test_bad_sidecar_fails_parse() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join(SIDECAR_MANIFEST_NAME),
            r#" { "BOGUS": "INVALID ELM.INTELLIJ.JSON" } "#,
        )
        .unwrap();
        assert!(matches!(
            parse_in(&tmp, "elm.json", BASIC_APPLICATION_MANIFEST),
            Err(ManifestError::Sidecar { .. })
        ));
    }

    #[test]
    fn test_legacy_application() {
        let tmp = TempDir::new().unwrap();
        let stuff = tmp.path().join("elm-stuff");
        std::fs::create_dir_all(&stuff).unwrap();
        std::fs::write(stuff.join("exact-dependencies.json"), LEGACY_EXACT_DEPENDENCIES).unwrap();

        let project = parse_in(&tmp, "elm-package.json", LEGACY_APPLICATION_MANIFEST).unwrap();
        assert_eq!(project.schema(), ManifestSchema::Legacy);
        assert_eq!(
            project.kind(),
            &ProjectKind::Application {
                elm_version: Version::new(0, 18, 0)
            }
        );
        assert_eq!(
            deps(&project.dependencies().direct),
            vec![("elm-lang/core", Version::new(5, 1, 1))]
        );
        assert_eq!(
            deps(&project.dependencies().indirect),
            vec![("elm-lang/virtual-dom", Version::new(2, 0, 4))]
        );
        assert_eq!(project.source_directories(), &[PathBuf::from("src")]);
    }

    #[test]
    fn test_legacy_application_requires_exact_dependencies() {
        let tmp = TempDir::new().unwrap();
        let err = parse_in(&tmp, "elm-package.json", LEGACY_APPLICATION_MANIFEST).unwrap_err();
        assert!(err.to_string().contains("exact-dependencies.json"));
    }

    #[test]
    fn test_legacy_package() {
        let tmp = TempDir::new().unwrap();
        let stuff = tmp.path().join("elm-stuff");
        std::fs::create_dir_all(&stuff).unwrap();
        std::fs::write(stuff.join("exact-dependencies.json"), LEGACY_EXACT_DEPENDENCIES).unwrap();

        let project = parse_in(&tmp, "elm-package.json", LEGACY_PACKAGE_MANIFEST).unwrap();
        let ProjectKind::Package {
            name,
            version,
            elm_version,
            exposed_modules,
        } = project.kind()
        else {
            panic!("expected a package, got {}", project);
        };
        assert_eq!(name, "user/project");
        assert_eq!(*version, Version::new(1, 2, 3));
        assert_eq!(
            *elm_version,
            Constraint::range(Version::new(0, 18, 0), Version::new(0, 19, 0))
        );
        assert_eq!(exposed_modules, &["Foo", "Bar"]);
        // Elm 0.18 packages may choose their source directory.
        assert_eq!(project.source_directories(), &[PathBuf::from(".")]);
        assert_eq!(
            deps(&project.dependencies().direct),
            vec![("elm-lang/core", Version::new(5, 1, 1))]
        );
    }

    #[test]
    fn test_legacy_package_without_lock_uses_constraints() {
        let tmp = TempDir::new().unwrap();
        let project = parse_in(&tmp, "elm-package.json", LEGACY_PACKAGE_MANIFEST).unwrap();
        assert_eq!(
            project.dependencies().get("elm-lang/core").unwrap().version,
            Version::new(5, 0, 0)
        );
    }

    #[test]
    fn test_legacy_manifest_ignores_sidecar() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(SIDECAR_MANIFEST_NAME), "garbage").unwrap();
        assert!(parse_in(&tmp, "elm-package.json", LEGACY_PACKAGE_MANIFEST).is_ok());
    }

    #[test]
    fn test_package_name_from_repository() {
        assert_eq!(
            package_name_from_repository("https://github.com/user/project.git"),
            Some("user/project".to_string())
        );
        assert_eq!(
            package_name_from_repository("http://github.com/elm-lang/core.git"),
            Some("elm-lang/core".to_string())
        );
        assert_eq!(package_name_from_repository("nonsense"), None);
    }

    #[test]
    fn test_schema_from_path() {
        assert_eq!(
            ManifestSchema::from_path(Path::new("/a/elm.json")),
            Some(ManifestSchema::Current)
        );
        assert_eq!(
            ManifestSchema::from_path(Path::new("/a/elm-package.json")),
            Some(ManifestSchema::Legacy)
        );
        assert_eq!(ManifestSchema::from_path(Path::new("/a/Cargo.toml")), None);
    }
}
