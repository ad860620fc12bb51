//! Overlay extraction of one source archive into the staging tree.

use crate::PackError;
use crate::Result;
use crate::error::Phase;
use crate::merge::COPY_BUFFER_SIZE;
use crate::merge::copy_with_buffer;
use crate::types::EntryPath;
use crate::types::SkipSet;
use crate::types::StagingDir;
use std::fs;
use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use zip::ZipArchive;
use zip::result::ZipError;

/// Which input an extraction pass reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The server launcher archive (first overlay).
    Launcher,
    /// The web application archive (second overlay).
    Application,
}

impl Source {
    /// Packaging phase reported for failures of this pass.
    #[must_use]
    pub const fn phase(self) -> Phase {
        match self {
            Self::Launcher => Phase::ExtractLauncher,
            Self::Application => Phase::ExtractApplication,
        }
    }
}

/// Statistics of a single extraction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    /// File entries written into staging.
    pub files: usize,
    /// Directory entries created.
    pub directories: usize,
    /// Staged files replaced by an entry of the same name.
    pub overwritten: usize,
    /// Entries excluded by the skip set.
    pub skipped: usize,
    /// Decompressed bytes written.
    pub bytes: u64,
}

/// Extracts every entry of `archive_path` onto the staging tree.
///
/// Entries named in `skip` are ignored. Directory entries create
/// directories; file entries are written with their full decompressed
/// content, replacing whatever an earlier pass (or an earlier duplicate
/// entry) left at the same path.
///
/// # Errors
///
/// - `PackError::InvalidArchive` if the file is not a readable ZIP container
/// - `PackError::UnsafeEntry` if an entry name escapes the staging root
/// - `PackError::Io` tagged with `source.phase()` on I/O failures
pub fn extract_into(
    archive_path: &Path,
    source: Source,
    staging: &StagingDir,
    skip: &SkipSet,
) -> Result<ExtractStats> {
    let phase = source.phase();
    let file = File::open(archive_path).map_err(|e| PackError::io(phase, archive_path, e))?;
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|e| zip_error(phase, archive_path, e))?;

    let mut stats = ExtractStats::default();
    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| zip_error(phase, archive_path, e))?;
        let name = entry.name().to_string();

        let entry_path = EntryPath::parse(&name).ok_or_else(|| PackError::UnsafeEntry {
            archive: archive_path.to_path_buf(),
            entry: name.clone(),
        })?;

        // Match the name the entry will be staged under, not the raw one
        if skip.contains(&entry_path.entry_name()) {
            tracing::debug!(entry = %name, ?source, "skipping entry");
            stats.skipped += 1;
            continue;
        }

        let target = staging.join(&entry_path);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| PackError::io(phase, &target, e))?;
            stats.directories += 1;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| PackError::io(phase, parent, e))?;
        }
        if target.is_file() {
            tracing::debug!(entry = %name, ?source, "overwriting staged file");
            stats.overwritten += 1;
        }

        let output = File::create(&target).map_err(|e| PackError::io(phase, &target, e))?;
        let mut writer = BufWriter::with_capacity(COPY_BUFFER_SIZE, output);
        let bytes = copy_with_buffer(&mut entry, &mut writer, &mut buffer, |_| {})
            .and_then(|bytes| writer.flush().map(|()| bytes))
            .map_err(|e| PackError::io(phase, &target, e))?;

        stats.files += 1;
        stats.bytes += bytes;
    }

    tracing::debug!(
        archive = %archive_path.display(),
        ?source,
        files = stats.files,
        directories = stats.directories,
        overwritten = stats.overwritten,
        skipped = stats.skipped,
        "extracted archive into staging"
    );

    Ok(stats)
}

fn zip_error(phase: Phase, archive_path: &Path, err: ZipError) -> PackError {
    match err {
        ZipError::Io(e) => PackError::io(phase, archive_path, e),
        other => PackError::InvalidArchive {
            path: archive_path.to_path_buf(),
            reason: other.to_string(),
        },
    }
}
