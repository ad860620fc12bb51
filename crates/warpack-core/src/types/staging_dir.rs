//! Scoped staging directory for archive merging.

use crate::PackError;
use crate::Result;
use crate::error::Phase;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use super::EntryPath;

/// Name prefix of every staging directory.
pub const STAGING_PREFIX: &str = "warpack-";

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// An exclusively owned, uniquely named merge workspace.
///
/// The directory is created when the guard is built and removed recursively
/// when it is dropped, whether the merge succeeded or not. Use
/// [`StagingDir::close`] to observe removal errors instead of only logging
/// them.
///
/// Names combine a nanosecond timestamp, the process id and a process-wide
/// sequence number, so concurrent merges never share a directory. Creation
/// is not retried: if the generated name already exists the merge fails.
///
/// # Examples
///
/// ```no_run
/// use warpack_core::StagingDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let staging = StagingDir::create()?;
/// let path = staging.path().to_path_buf();
/// drop(staging);
/// assert!(!path.exists());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct StagingDir {
    path: PathBuf,
    removed: bool,
}

impl StagingDir {
    /// Creates a staging directory under the system temporary directory.
    pub fn create() -> Result<Self> {
        Self::create_in(&std::env::temp_dir())
    }

    /// Creates a staging directory under `root`.
    ///
    /// # Errors
    ///
    /// - `PackError::StagingCollision` if the generated name exists
    /// - `PackError::Io` (phase `Staging`) for any other creation failure
    pub fn create_in(root: &Path) -> Result<Self> {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos())
            .unwrap_or_default();
        let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let name = format!(
            "{STAGING_PREFIX}{nanos}-{}-{sequence}",
            std::process::id()
        );
        Self::create_at(root.join(name))
    }

    /// Creates the staging directory at an exact path.
    ///
    /// The parent must exist; the path itself must not.
    pub fn create_at(path: PathBuf) -> Result<Self> {
        match fs::create_dir(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(PackError::StagingCollision { path });
            }
            Err(e) => return Err(PackError::io(Phase::Staging, path, e)),
        }

        tracing::debug!(path = %path.display(), "created staging directory");
        Ok(Self {
            path,
            removed: false,
        })
    }

    /// Returns the staging root.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Joins a validated entry path onto the staging root.
    #[inline]
    #[must_use]
    pub fn join(&self, entry: &EntryPath) -> PathBuf {
        self.path.join(entry.as_path())
    }

    /// Removes the staging directory and reports failures.
    ///
    /// # Errors
    ///
    /// Returns `PackError::Io` (phase `Cleanup`) if removal fails.
    pub fn close(mut self) -> Result<()> {
        self.removed = true;
        remove(&self.path).map_err(|e| PackError::io(Phase::Cleanup, &self.path, e))
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        if let Err(e) = remove(&self.path) {
            tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to remove staging directory"
            );
        }
    }
}

fn remove(path: &Path) -> std::io::Result<()> {
    match fs::remove_dir_all(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "removed staging directory");
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
