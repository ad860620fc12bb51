//! Standalone archive assembly.

use crate::PackReport;
use crate::PackagingConfig;
use crate::ProgressCallback;
use crate::Result;
use crate::merge::Source;
use crate::merge::collect_files;
use crate::merge::extract_into;
use crate::merge::write_archive;
use crate::report::NoopProgress;
use crate::types::SkipSet;
use crate::types::StagingDir;
use std::path::PathBuf;
use std::time::Instant;

/// Manifest entry that always comes from the launcher archive.
pub const MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";

/// Merges a launcher archive and an application archive.
///
/// The launcher is extracted first, then the application is overlaid on top
/// of it with its manifest skipped, so:
/// - application files win every name collision
/// - the launcher's manifest (and therefore its entry point) is preserved
///
/// The staging directory is removed on every exit path.
///
/// # Examples
///
/// ```no_run
/// use warpack_core::PackagingConfig;
/// use warpack_core::Packager;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = PackagingConfig::new("launcher.jar", "app.war", "out/", false)?;
/// let report = Packager::new().pack_with_report(&config)?;
/// println!(
///     "{} entries written to {}",
///     report.entries_written,
///     report.output_path.display()
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Packager {
    staging_root: PathBuf,
}

impl Default for Packager {
    fn default() -> Self {
        Self {
            staging_root: std::env::temp_dir(),
        }
    }
}

impl Packager {
    /// Creates a packager staging under the system temporary directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory under which staging directories are created.
    #[must_use]
    pub fn with_staging_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.staging_root = root.into();
        self
    }

    /// Builds the standalone archive and returns its path.
    ///
    /// # Errors
    ///
    /// Returns an error if staging cannot be created, a source archive is
    /// unreadable or unsafe, or the output archive cannot be written.
    pub fn pack(&self, config: &PackagingConfig) -> Result<PathBuf> {
        self.pack_with_report(config).map(|report| report.output_path)
    }

    /// Builds the standalone archive and returns run statistics.
    pub fn pack_with_report(&self, config: &PackagingConfig) -> Result<PackReport> {
        self.pack_with_progress(config, &mut NoopProgress)
    }

    /// Builds the standalone archive, reporting output progress.
    pub fn pack_with_progress(
        &self,
        config: &PackagingConfig,
        progress: &mut dyn ProgressCallback,
    ) -> Result<PackReport> {
        let start = Instant::now();
        let staging = StagingDir::create_in(&self.staging_root)?;
        let mut report = PackReport::new();

        let launcher = extract_into(
            config.launcher_archive(),
            Source::Launcher,
            &staging,
            &SkipSet::empty(),
        )?;
        report.launcher_files = launcher.files;

        let application = extract_into(
            config.application_archive(),
            Source::Application,
            &staging,
            &SkipSet::from_names([MANIFEST_ENTRY]),
        )?;
        report.application_files = application.files;
        report.files_overwritten = launcher.overwritten + application.overwritten;
        report.entries_skipped = application.skipped;

        if launcher.overwritten > 0 {
            report.add_warning(format!(
                "launcher archive contains {} duplicate entries",
                launcher.overwritten
            ));
        }

        let files = collect_files(staging.path())?;
        report.bytes_written = write_archive(
            config.output_path(),
            &files,
            config.use_compression(),
            progress,
        )?;
        report.entries_written = files.len();

        staging.close()?;

        report.output_path = config.output_path().to_path_buf();
        report.duration = start.elapsed();

        tracing::info!(
            output = %report.output_path.display(),
            entries = report.entries_written,
            overwritten = report.files_overwritten,
            "standalone archive created"
        );

        Ok(report)
    }
}
