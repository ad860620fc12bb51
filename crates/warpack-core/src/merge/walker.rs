//! Staging tree traversal.

use crate::PackError;
use crate::Result;
use crate::error::Phase;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// A regular file found in the staging tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Full filesystem path of the staged file.
    pub path: PathBuf,

    /// Archive entry name: the path relative to the staging root with `/`
    /// separators.
    pub entry_name: String,

    /// Size in bytes.
    pub size: u64,
}

/// Collects every regular file below `root`, depth first.
///
/// Directories are traversed but not returned; the output archive only
/// carries file entries. Symlinks are not followed. Siblings are visited in
/// file-name order so repeated merges produce the same entry order.
///
/// # Errors
///
/// Returns `PackError::Io` (phase `WriteOutput`) if the tree cannot be read
/// or a file name is not valid UTF-8.
pub fn collect_files(root: &Path) -> Result<Vec<StagedFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            PackError::io(Phase::WriteOutput, path, e.into())
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path().to_path_buf();
        let metadata = entry
            .metadata()
            .map_err(|e| PackError::io(Phase::WriteOutput, &path, e.into()))?;
        let relative = path
            .strip_prefix(root)
            .map_err(|e| PackError::io(Phase::WriteOutput, &path, std::io::Error::other(e)))?;
        let entry_name = entry_name(relative)
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("path is not valid UTF-8: {}", relative.display()),
                )
            })
            .map_err(|e| PackError::io(Phase::WriteOutput, &path, e))?;

        files.push(StagedFile {
            path,
            entry_name,
            size: metadata.len(),
        });
    }

    Ok(files)
}

/// Converts a staging-relative path into a ZIP entry name.
///
/// ZIP entry names always use `/`, whatever the platform separator.
fn entry_name(relative: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(parts.join("/"))
}
