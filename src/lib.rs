//! elm-workspace - project discovery and manifest parsing for Elm workspaces
//!
//! This crate finds the Elm projects under a directory, parses their
//! `elm.json` / `elm-package.json` manifests, answers which project owns a
//! given file and persists the set of attached projects between sessions.
//! It also drives the external Elm tools (`elm`, `elm-review`, ...).

pub mod core;
pub mod ops;
pub mod sources;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// Only compiled for tests. Provides manifest fixtures, an on-disk file
/// tree builder and a scripted tool invoker.
#[cfg(test)]
pub mod test_support;

pub use core::{
    manifest::ManifestParser, project::ElmProject, state::WorkspaceState, workspace::Workspace,
};

pub use ops::toolchain::ElmToolchain;
pub use util::Config;
