//! Validated packaging configuration.

use crate::PackError;
use crate::Result;
use crate::error::InputRole;
use crate::error::Phase;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

/// Suffix appended to the application name when the output file name is
/// derived from a directory destination.
pub const STANDALONE_SUFFIX: &str = "-standalone";

/// Extension of derived output file names.
pub const OUTPUT_EXTENSION: &str = ".jar";

/// Extension stripped from the application archive name before deriving the
/// output name.
const APPLICATION_EXTENSION: &str = ".war";

/// Resolved inputs of a single packaging run.
///
/// A `PackagingConfig` can only be obtained through [`PackagingConfig::new`],
/// which guarantees that:
/// - both source archives are absolute, symlink-resolved paths to existing
///   regular files
/// - the output path is absolute and never names a directory
///
/// The configuration is immutable once built.
///
/// # Examples
///
/// ```no_run
/// use warpack_core::PackagingConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// // Directory destination: file name is derived from the application
/// let config = PackagingConfig::new("launcher.jar", "Shop.WAR", "dist/", false)?;
/// assert!(config.output_path().ends_with("shop-standalone.jar"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagingConfig {
    launcher_archive: PathBuf,
    application_archive: PathBuf,
    output_path: PathBuf,
    use_compression: bool,
}

impl PackagingConfig {
    /// Validates the user-supplied paths and builds a configuration.
    ///
    /// Source archives are checked before the output destination is looked
    /// at, so a bad source never leaves directories behind.
    ///
    /// The output is treated as a directory when it ends with a path
    /// separator and does not exist yet, or when it is an existing
    /// directory. In that case the directory tree is created and the file
    /// name is derived with [`standalone_file_name`]. Any other output is
    /// used verbatim and its parent directories are not created.
    ///
    /// # Errors
    ///
    /// - `PackError::MissingInput` if any path is empty
    /// - `PackError::NotAFile` if a source does not resolve to a regular file
    /// - `PackError::Io` (phase `Validate`) if the output directory cannot be
    ///   created
    pub fn new(
        launcher_archive: impl AsRef<Path>,
        application_archive: impl AsRef<Path>,
        output: impl AsRef<Path>,
        use_compression: bool,
    ) -> Result<Self> {
        let launcher_archive =
            resolve_source(launcher_archive.as_ref(), InputRole::LauncherArchive)?;
        let application_archive =
            resolve_source(application_archive.as_ref(), InputRole::ApplicationArchive)?;
        let output_path = resolve_output(output.as_ref(), &application_archive)?;

        tracing::debug!(
            launcher = %launcher_archive.display(),
            application = %application_archive.display(),
            output = %output_path.display(),
            use_compression,
            "resolved packaging configuration"
        );

        Ok(Self {
            launcher_archive,
            application_archive,
            output_path,
            use_compression,
        })
    }

    /// Server launcher archive, extracted first.
    #[must_use]
    pub fn launcher_archive(&self) -> &Path {
        &self.launcher_archive
    }

    /// Application archive, overlaid on top of the launcher.
    #[must_use]
    pub fn application_archive(&self) -> &Path {
        &self.application_archive
    }

    /// Output archive file.
    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Whether entries of the output archive are deflated.
    #[must_use]
    pub fn use_compression(&self) -> bool {
        self.use_compression
    }
}

/// Derives the standalone archive name from an application archive path.
///
/// The file name is lowercased, a trailing `.war` is removed and
/// `-standalone.jar` is appended.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use warpack_core::config::standalone_file_name;
///
/// assert_eq!(standalone_file_name(Path::new("/srv/Shop.WAR")), "shop-standalone.jar");
/// assert_eq!(standalone_file_name(Path::new("site.zip")), "site.zip-standalone.jar");
/// ```
#[must_use]
pub fn standalone_file_name(application_archive: &Path) -> String {
    let name = application_archive
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let stem = name.strip_suffix(APPLICATION_EXTENSION).unwrap_or(&name);
    format!("{stem}{STANDALONE_SUFFIX}{OUTPUT_EXTENSION}")
}

fn resolve_source(path: &Path, role: InputRole) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(PackError::MissingInput { role });
    }

    // canonicalize() follows symlinks and fails for missing paths
    let canonical = path.canonicalize().map_err(|_| PackError::NotAFile {
        role,
        path: std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
    })?;

    if !canonical.is_file() {
        return Err(PackError::NotAFile {
            role,
            path: canonical,
        });
    }

    Ok(canonical)
}

fn resolve_output(output: &Path, application_archive: &Path) -> Result<PathBuf> {
    if output.as_os_str().is_empty() {
        return Err(PackError::MissingInput {
            role: InputRole::Output,
        });
    }

    let absolute =
        std::path::absolute(output).map_err(|e| PackError::io(Phase::Validate, output, e))?;

    let names_directory =
        (!absolute.exists() && has_trailing_separator(output)) || absolute.is_dir();
    if !names_directory {
        return Ok(absolute);
    }

    fs::create_dir_all(&absolute).map_err(|e| PackError::io(Phase::Validate, &absolute, e))?;
    Ok(absolute.join(standalone_file_name(application_archive)))
}

fn has_trailing_separator(path: &Path) -> bool {
    path.as_os_str()
        .as_encoded_bytes()
        .last()
        .is_some_and(|&byte| std::path::is_separator(char::from(byte)))
}
