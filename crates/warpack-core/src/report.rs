//! Packaging operation reporting.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

/// Report of a packaging run.
///
/// Contains statistics about both extraction passes and the output archive.
#[derive(Debug, Clone, Default)]
pub struct PackReport {
    /// Path of the merged archive.
    pub output_path: PathBuf,

    /// Files staged from the launcher archive.
    pub launcher_files: usize,

    /// Files staged from the application archive.
    pub application_files: usize,

    /// Launcher files replaced by an application file of the same name.
    pub files_overwritten: usize,

    /// Entries excluded by a skip set.
    pub entries_skipped: usize,

    /// File entries written to the output archive.
    pub entries_written: usize,

    /// Uncompressed bytes written to the output archive.
    pub bytes_written: u64,

    /// Duration of the whole run.
    pub duration: Duration,

    /// Warnings generated while packaging.
    pub warnings: Vec<String>,
}

impl PackReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a warning message to the report.
    pub fn add_warning(&mut self, message: String) {
        self.warnings.push(message);
    }

    /// Returns whether any warnings were generated.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Callback trait for progress reporting while the output archive is written.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use warpack_core::ProgressCallback;
///
/// struct Printer;
///
/// impl ProgressCallback for Printer {
///     fn on_entry_start(&mut self, path: &Path, total: usize, current: usize) {
///         println!("[{current}/{total}] {}", path.display());
///     }
///
///     fn on_bytes_written(&mut self, _bytes: u64) {}
///
///     fn on_entry_complete(&mut self, _path: &Path) {}
///
///     fn on_complete(&mut self) {}
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called before an entry is added to the output archive.
    fn on_entry_start(&mut self, path: &Path, total: usize, current: usize);

    /// Called for each chunk of entry data written.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called after an entry has been fully written.
    fn on_entry_complete(&mut self, path: &Path);

    /// Called once after the output archive is finished.
    fn on_complete(&mut self);
}

/// Progress callback that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &Path, _total: usize, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_warnings() {
        let mut report = PackReport::new();
        assert!(!report.has_warnings());

        report.add_warning("duplicate entry".to_string());
        assert!(report.has_warnings());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_report_default_is_empty() {
        let report = PackReport::default();
        assert_eq!(report.entries_written, 0);
        assert_eq!(report.bytes_written, 0);
        assert!(report.output_path.as_os_str().is_empty());
    }
}
