//! Instance home and work directory preparation.

use crate::error::LaunchError;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

/// Name of the scratch directory under the instance home.
pub const WORK_DIR_NAME: &str = "work";

/// Resolves the instance home directory.
///
/// An explicit override wins; otherwise the home is `.<app_name>` under the
/// user's home directory.
///
/// # Errors
///
/// Returns `LaunchError::NoHomeDirectory` if there is no override and the
/// user's home directory cannot be determined.
pub fn resolve_home(
    override_home: Option<&Path>,
    app_name: &str,
) -> Result<PathBuf, LaunchError> {
    if let Some(home) = override_home {
        return Ok(home.to_path_buf());
    }
    dirs::home_dir()
        .map(|home| home.join(format!(".{app_name}")))
        .ok_or(LaunchError::NoHomeDirectory)
}

/// Creates `<home>/work` if needed and removes everything inside it.
///
/// Returns the work directory path.
///
/// # Errors
///
/// Returns `LaunchError::Environment` if the directory cannot be created or
/// emptied.
pub fn prepare_work_dir(home: &Path) -> Result<PathBuf, LaunchError> {
    let work = home.join(WORK_DIR_NAME);
    let env_err = |path: &Path, source| LaunchError::Environment {
        path: path.to_path_buf(),
        source,
    };

    fs::create_dir_all(&work).map_err(|e| env_err(&work, e))?;

    for entry in fs::read_dir(&work).map_err(|e| env_err(&work, e))? {
        let entry = entry.map_err(|e| env_err(&work, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| env_err(&path, e))?;

        // Symlinks are removed, never followed
        let removed = if file_type.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.map_err(|e| env_err(&path, e))?;
    }

    tracing::debug!(work = %work.display(), "work directory prepared");
    Ok(work)
}
