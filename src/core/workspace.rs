//! Workspace - the registry of attached Elm projects.
//!
//! A [`Workspace`] is a cheaply clonable handle onto shared state. All
//! mutations (attach, detach, discovery, state loading) are serialized
//! through a single gate; readers work on immutable snapshots that are
//! swapped in wholesale, so they never observe a half-applied change.
//!
//! Every mutation takes a ticket when it is requested. Wholesale
//! replacements (discovery and state loading) scan without holding the gate,
//! so they are ordered by ticket when they commit: a replacement requested
//! before one that already committed is discarded, and attaches or detaches
//! requested after a pending replacement are replayed on top of it.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use miette::Diagnostic;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use crate::core::manifest::{ManifestError, ManifestParser};
use crate::core::project::{ElmProject, ManifestSchema};
use crate::core::state::WorkspaceState;
use crate::util::fs::absolutize;
use crate::util::task::Task;

/// Directories never searched for manifests.
const SKIPPED_DIRS: &[&str] = &["elm-stuff", "node_modules"];

/// Paths to the external tools plus editor flags.
///
/// Tool paths are kept as the literal strings the user configured; an empty
/// string means "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolchainSettings {
    pub elm_compiler_path: String,
    pub elm_format_path: String,
    pub elm_test_path: String,
    pub elm_review_path: String,
    pub is_elm_format_on_save_enabled: bool,
}

/// Error returned when a manifest cannot be attached.
#[derive(Debug, Error, Diagnostic)]
pub enum AttachError {
    #[error("no Elm manifest found at {}", .path.display())]
    #[diagnostic(
        code(elm_workspace::attach::not_found),
        help("point at an elm.json or elm-package.json file, or the directory containing one")
    )]
    NotFound { path: PathBuf },

    #[error("failed to access {}", .path.display())]
    #[diagnostic(code(elm_workspace::attach::io))]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    #[diagnostic(
        code(elm_workspace::attach::invalid_manifest),
        help("fix the manifest and attach it again")
    )]
    Manifest(#[from] ManifestError),
}

/// Readable workspace contents.
#[derive(Debug, Clone, Default)]
struct Registry {
    /// Unique by manifest path, in attach order
    projects: Vec<Arc<ElmProject>>,
    settings: ToolchainSettings,
}

impl Registry {
    fn insert(&mut self, project: Arc<ElmProject>) {
        self.projects
            .retain(|p| p.manifest_path() != project.manifest_path());
        self.projects.push(project);
    }

    fn remove(&mut self, manifest_path: &Path) {
        self.projects.retain(|p| p.manifest_path() != manifest_path);
    }

    fn apply(&mut self, change: &Change) {
        match change {
            Change::Attached(project) => self.insert(Arc::clone(project)),
            Change::Detached(path) => self.remove(path),
        }
    }
}

/// An attach or detach that a pending replacement must not lose.
#[derive(Debug, Clone)]
enum Change {
    Attached(Arc<ElmProject>),
    Detached(PathBuf),
}

/// State guarded by the mutation gate.
#[derive(Debug, Default)]
struct Ledger {
    /// Ticket of the last committed replacement
    committed: u64,

    /// Committed attaches and detaches newer than some pending replacement
    journal: Vec<(u64, Change)>,
}

#[derive(Debug)]
struct Shared {
    parser: ManifestParser,

    gate: Mutex<Ledger>,

    snapshot: RwLock<Arc<Registry>>,

    /// Last ticket handed out
    requested: AtomicU64,

    /// Replacements requested but not yet committed or discarded
    pending: Mutex<BTreeSet<u64>>,
}

/// Handle to a set of attached Elm projects.
#[derive(Debug, Clone)]
pub struct Workspace {
    shared: Arc<Shared>,
}

impl Default for Workspace {
    fn default() -> Self {
        Workspace::new(ManifestParser::default())
    }
}

impl Workspace {
    /// Create an empty workspace that parses manifests with `parser`.
    pub fn new(parser: ManifestParser) -> Self {
        Workspace {
            shared: Arc::new(Shared {
                parser,
                gate: Mutex::new(Ledger::default()),
                snapshot: RwLock::new(Arc::new(Registry::default())),
                requested: AtomicU64::new(0),
                pending: Mutex::new(BTreeSet::new()),
            }),
        }
    }

    /// Create an empty workspace with the given settings.
    pub fn with_settings(parser: ManifestParser, settings: ToolchainSettings) -> Self {
        let workspace = Workspace::new(parser);
        workspace.update_settings(|s| *s = settings);
        workspace
    }

    /// Attach (or re-read) the manifest at `manifest_path`.
    ///
    /// A directory is accepted too; its `elm.json` (or `elm-package.json`)
    /// is attached. Re-attaching a manifest replaces the previous entry.
    pub fn attach_project(&self, manifest_path: &Path) -> Result<Arc<ElmProject>, AttachError> {
        let ticket = self.request_ticket(false);
        self.attach_with_ticket(manifest_path, ticket)
    }

    fn attach_with_ticket(
        &self,
        manifest_path: &Path,
        ticket: u64,
    ) -> Result<Arc<ElmProject>, AttachError> {
        let path = resolve_manifest_path(&absolute(manifest_path))?;

        let mut gate = self.lock_gate();
        let project = Arc::new(self.shared.parser.load(&path)?);
        self.commit_change(&mut gate, ticket, Change::Attached(Arc::clone(&project)));

        tracing::info!("attached {}", project);
        Ok(project)
    }

    /// [`attach_project`](Self::attach_project) on a background thread.
    pub fn spawn_attach_project(
        &self,
        manifest_path: impl Into<PathBuf>,
    ) -> anyhow::Result<Task<Result<Arc<ElmProject>, AttachError>>> {
        let ticket = self.request_ticket(false);
        let workspace = self.clone();
        let path = manifest_path.into();
        Task::spawn("attach-project", move || {
            workspace.attach_with_ticket(&path, ticket)
        })
    }

    /// Remove the project with this manifest. Returns whether one was removed.
    pub fn detach_project(&self, manifest_path: &Path) -> bool {
        let ticket = self.request_ticket(false);
        let path = absolute(manifest_path);

        let mut gate = self.lock_gate();
        if !self
            .snapshot()
            .projects
            .iter()
            .any(|p| p.manifest_path() == path)
        {
            return false;
        }
        self.commit_change(&mut gate, ticket, Change::Detached(path.clone()));

        tracing::info!("detached {}", path.display());
        true
    }

    /// Find every manifest below `root` and make exactly those the attached
    /// projects. Manifests that fail to parse are skipped.
    ///
    /// Returns the discovered projects ordered by manifest path. If a newer
    /// replacement committed while this scan ran, the scan is discarded and
    /// the current projects are returned instead.
    pub fn discover_and_refresh(&self, root: &Path) -> Vec<Arc<ElmProject>> {
        let ticket = self.request_ticket(true);
        self.discover_with_ticket(root, ticket)
    }

    /// [`discover_and_refresh`](Self::discover_and_refresh) on a background
    /// thread. The scan's place in line is fixed when this is called.
    pub fn spawn_discover_and_refresh(
        &self,
        root: impl Into<PathBuf>,
    ) -> anyhow::Result<Task<Vec<Arc<ElmProject>>>> {
        let ticket = self.request_ticket(true);
        let workspace = self.clone();
        let root = root.into();
        Task::spawn("discover-projects", move || {
            workspace.discover_with_ticket(&root, ticket)
        })
    }

    fn discover_with_ticket(&self, root: &Path, ticket: u64) -> Vec<Arc<ElmProject>> {
        let root = absolute(root);
        let candidates = find_manifest_candidates(&root);
        tracing::debug!(
            "found {} manifest candidates below {}",
            candidates.len(),
            root.display()
        );

        let projects: Vec<Arc<ElmProject>> = candidates
            .par_iter()
            .filter_map(|path| match self.shared.parser.load(path) {
                Ok(project) => Some(Arc::new(project)),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), error_chain(&e));
                    None
                }
            })
            .collect();
        let skipped = candidates.len() - projects.len();

        let replaced = self.commit_replacement(ticket, |registry| {
            registry.projects = projects.clone();
        });
        if !replaced {
            tracing::debug!("discovery of {} superseded", root.display());
            return self.all_projects();
        }

        tracing::info!(
            "discovered {} Elm projects in {} ({} skipped)",
            projects.len(),
            root.display(),
            skipped
        );
        projects
    }

    /// The attached project that owns `file`, if any.
    ///
    /// A file belongs to a project when it lies below one of the project's
    /// source directories or its tests directory. When projects nest, the
    /// one with the deepest root wins.
    pub fn find_project_for_file(&self, file: &Path) -> Option<Arc<ElmProject>> {
        let file = absolute(file);
        self.snapshot()
            .projects
            .iter()
            .filter(|p| p.contains_file(&file))
            .max_by_key(|p| p.depth())
            .cloned()
    }

    /// The project attached under exactly this manifest path.
    pub fn project(&self, manifest_path: &Path) -> Option<Arc<ElmProject>> {
        let path = absolute(manifest_path);
        self.snapshot()
            .projects
            .iter()
            .find(|p| p.manifest_path() == path)
            .cloned()
    }

    /// All attached projects, in attach order.
    pub fn all_projects(&self) -> Vec<Arc<ElmProject>> {
        self.snapshot().projects.clone()
    }

    pub fn settings(&self) -> ToolchainSettings {
        self.snapshot().settings.clone()
    }

    /// Change the settings in place.
    pub fn update_settings(&self, f: impl FnOnce(&mut ToolchainSettings)) {
        let _gate = self.lock_gate();
        self.commit(|registry| f(&mut registry.settings));
    }

    /// Serializable snapshot of the attached projects and settings.
    pub fn state(&self) -> WorkspaceState {
        let snapshot = self.snapshot();
        WorkspaceState::new(
            snapshot.projects.iter().map(|p| p.as_ref()),
            snapshot.settings.clone(),
        )
    }

    /// Replace the whole workspace with a persisted state.
    ///
    /// Every listed manifest is re-read from disk; entries that no longer
    /// exist or no longer parse are dropped with a warning.
    pub fn load_state(&self, state: &WorkspaceState) -> Vec<Arc<ElmProject>> {
        let ticket = self.request_ticket(true);
        self.load_state_with_ticket(state, ticket)
    }

    /// [`load_state`](Self::load_state) on a background thread.
    pub fn spawn_load_state(
        &self,
        state: WorkspaceState,
    ) -> anyhow::Result<Task<Vec<Arc<ElmProject>>>> {
        let ticket = self.request_ticket(true);
        let workspace = self.clone();
        Task::spawn("load-state", move || {
            workspace.load_state_with_ticket(&state, ticket)
        })
    }

    fn load_state_with_ticket(&self, state: &WorkspaceState, ticket: u64) -> Vec<Arc<ElmProject>> {
        let mut registry = Registry {
            projects: Vec::with_capacity(state.elm_projects.len()),
            settings: state.settings.clone(),
        };
        for entry in &state.elm_projects {
            let path = absolute(&entry.manifest_path());
            match self.shared.parser.load(&path) {
                Ok(project) => registry.insert(Arc::new(project)),
                Err(e) => {
                    tracing::warn!("dropping {} from state: {}", entry.path, error_chain(&e))
                }
            }
        }

        let projects = registry.projects.clone();
        if !self.commit_replacement(ticket, |current| *current = registry) {
            tracing::debug!("state load superseded");
            return self.all_projects();
        }

        tracing::info!(
            "restored {} of {} Elm projects",
            projects.len(),
            state.elm_projects.len()
        );
        projects
    }

    /// Hand out the next ticket. Replacement tickets stay pending until the
    /// replacement commits or is discarded.
    fn request_ticket(&self, replacement: bool) -> u64 {
        let mut pending = self.lock_pending();
        let ticket = self.shared.requested.fetch_add(1, Ordering::SeqCst) + 1;
        if replacement {
            pending.insert(ticket);
        }
        ticket
    }

    fn lock_gate(&self) -> MutexGuard<'_, Ledger> {
        self.shared
            .gate
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_pending(&self) -> MutexGuard<'_, BTreeSet<u64>> {
        self.shared
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish an attach or detach, journaling it while an older replacement
    /// is still pending.
    fn commit_change(&self, ledger: &mut Ledger, ticket: u64, change: Change) {
        let outstanding = self.lock_pending().first().is_some_and(|&p| p < ticket);
        self.commit(|registry| registry.apply(&change));
        if outstanding {
            ledger.journal.push((ticket, change));
        }
    }

    /// Commit a wholesale replacement requested under `ticket`, then replay
    /// the attaches and detaches requested after it. Returns `false` when a
    /// newer replacement already committed.
    fn commit_replacement(&self, ticket: u64, replace: impl FnOnce(&mut Registry)) -> bool {
        let mut ledger = self.lock_gate();
        let fresh = ticket >= ledger.committed;
        if fresh {
            ledger.committed = ticket;
            let mut newer: Vec<&(u64, Change)> =
                ledger.journal.iter().filter(|(t, _)| *t > ticket).collect();
            newer.sort_by_key(|(t, _)| *t);
            self.commit(|registry| {
                replace(registry);
                for (_, change) in newer {
                    registry.apply(change);
                }
            });
        }

        let mut pending = self.lock_pending();
        pending.remove(&ticket);
        match pending.first().copied() {
            Some(oldest) => ledger.journal.retain(|(t, _)| *t > oldest),
            None => ledger.journal.clear(),
        }
        fresh
    }

    fn snapshot(&self) -> Arc<Registry> {
        let guard = self
            .shared
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    /// Publish a modified copy of the registry. Callers hold the gate.
    fn commit(&self, f: impl FnOnce(&mut Registry)) {
        let mut next = (*self.snapshot()).clone();
        f(&mut next);
        let mut guard = self
            .shared
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(next);
    }
}

fn absolute(path: &Path) -> PathBuf {
    match std::env::current_dir() {
        Ok(cwd) => absolutize(path, &cwd),
        Err(_) => absolutize(path, Path::new("/")),
    }
}

/// Map a user-supplied path onto the manifest file it names.
fn resolve_manifest_path(path: &Path) -> Result<PathBuf, AttachError> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(AttachError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Err(source) => {
            return Err(AttachError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    if metadata.is_file() {
        return Ok(path.to_path_buf());
    }

    [ManifestSchema::Current, ManifestSchema::Legacy]
        .iter()
        .map(|schema| path.join(schema.file_name()))
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| AttachError::NotFound {
            path: path.to_path_buf(),
        })
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())
}

/// Every manifest below `root`, at most one per directory, sorted by path.
///
/// `elm.json` wins over `elm-package.json` in the same directory.
fn find_manifest_candidates(root: &Path) -> Vec<PathBuf> {
    let mut by_dir: BTreeMap<PathBuf, (ManifestSchema, PathBuf)> = BTreeMap::new();

    for entry in WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e))
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(schema) = ManifestSchema::from_path(entry.path()) else {
            continue;
        };
        let Some(dir) = entry.path().parent() else {
            continue;
        };

        match by_dir.entry(dir.to_path_buf()) {
            Entry::Vacant(slot) => {
                slot.insert((schema, entry.into_path()));
            }
            Entry::Occupied(mut slot) => {
                if schema == ManifestSchema::Current {
                    slot.insert((schema, entry.into_path()));
                }
            }
        }
    }

    let mut candidates: Vec<PathBuf> = by_dir.into_values().map(|(_, path)| path).collect();
    candidates.sort();
    candidates
}

/// `outer: inner: innermost` for log lines.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
