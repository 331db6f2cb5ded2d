//! Core data structures.
//!
//! This module contains the workspace model:
//! - Versions, constraints and dependencies
//! - Manifest and sidecar parsing
//! - Projects and the workspace registry
//! - Persisted workspace state

pub mod constraint;
pub mod dependency;
pub mod manifest;
pub mod project;
pub mod sidecar;
pub mod state;
pub mod version;
pub mod workspace;

pub use constraint::{Constraint, ConstraintError};
pub use dependency::{Dependencies, Dependency};
pub use manifest::{ManifestError, ManifestParser, LEGACY_MANIFEST_NAME, MANIFEST_NAME};
pub use project::{ElmProject, ManifestSchema, ProjectKind};
pub use sidecar::{SidecarError, SidecarManifest};
pub use state::WorkspaceState;
pub use version::Version;
pub use workspace::{AttachError, ToolchainSettings, Workspace};
