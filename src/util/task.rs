//! Background work handles.

use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Result};

/// Handle to work running on a background thread.
///
/// Callers either [`join`](Task::join) to wait for the result or poll
/// [`is_finished`](Task::is_finished) and collect it later.
#[derive(Debug)]
pub struct Task<T> {
    name: String,
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> Task<T> {
    /// Run `f` on a new named thread.
    pub fn spawn<F>(name: impl Into<String>, f: F) -> Result<Self>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let name = name.into();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(f)
            .map_err(|e| anyhow!("failed to spawn `{}`: {}", name, e))?;
        Ok(Task { name, handle })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the work has completed.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the result. A panic in the task becomes an error.
    pub fn join(self) -> Result<T> {
        self.handle
            .join()
            .map_err(|_| anyhow!("background task `{}` panicked", self.name))
    }
}
