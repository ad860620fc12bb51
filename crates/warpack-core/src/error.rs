//! Error types for packaging, launching and control-channel operations.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `PackError`.
pub type Result<T> = std::result::Result<T, PackError>;

/// Identifies which user-supplied input failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRole {
    /// The server launcher archive.
    LauncherArchive,
    /// The web application archive.
    ApplicationArchive,
    /// The output file or directory.
    Output,
}

impl fmt::Display for InputRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LauncherArchive => write!(f, "server launcher archive"),
            Self::ApplicationArchive => write!(f, "application archive"),
            Self::Output => write!(f, "output file"),
        }
    }
}

/// Packaging phase in which an I/O failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Resolving inputs and preparing the output location.
    Validate,
    /// Creating the staging directory.
    Staging,
    /// Extracting the launcher archive into staging.
    ExtractLauncher,
    /// Extracting the application archive into staging.
    ExtractApplication,
    /// Writing the merged output archive.
    WriteOutput,
    /// Removing the staging directory.
    Cleanup,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validate => "validating inputs",
            Self::Staging => "creating staging directory",
            Self::ExtractLauncher => "extracting launcher archive",
            Self::ExtractApplication => "extracting application archive",
            Self::WriteOutput => "writing output archive",
            Self::Cleanup => "removing staging directory",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while validating inputs or merging archives.
#[derive(Error, Debug)]
pub enum PackError {
    /// A required path was not supplied.
    #[error("{role} must be specified")]
    MissingInput {
        /// Which input is missing.
        role: InputRole,
    },

    /// A source path does not resolve to an existing regular file.
    #[error("file {path} cannot be used as {role}")]
    NotAFile {
        /// Which input was rejected.
        role: InputRole,
        /// The offending path, as given or as far as it resolved.
        path: PathBuf,
    },

    /// I/O operation failed during a packaging phase.
    #[error("I/O error while {phase} ({path}): {source}")]
    Io {
        /// The phase that failed.
        phase: Phase,
        /// The file or directory being processed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A source archive is not a readable ZIP container.
    #[error("invalid archive {path}: {reason}")]
    InvalidArchive {
        /// The archive path.
        path: PathBuf,
        /// Reason reported by the archive reader.
        reason: String,
    },

    /// An archive entry name would escape the staging directory.
    #[error("unsafe entry name '{entry}' in {archive}")]
    UnsafeEntry {
        /// The archive containing the entry.
        archive: PathBuf,
        /// The raw entry name.
        entry: String,
    },

    /// The freshly generated staging directory name already exists.
    #[error("staging directory already exists: {path}")]
    StagingCollision {
        /// The colliding path.
        path: PathBuf,
    },
}

impl PackError {
    /// Creates an I/O error bound to a phase and path.
    pub fn io(phase: Phase, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            phase,
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if this error was raised by input validation.
    ///
    /// Validation errors are reported before any archive is opened and are
    /// never worth retrying.
    ///
    /// # Examples
    ///
    /// ```
    /// use warpack_core::PackError;
    /// use warpack_core::error::InputRole;
    ///
    /// let err = PackError::MissingInput {
    ///     role: InputRole::Output,
    /// };
    /// assert!(err.is_invalid_input());
    /// ```
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::MissingInput { .. } | Self::NotAFile { .. })
    }

    /// Returns the packaging phase an error belongs to, if known.
    #[must_use]
    pub const fn phase(&self) -> Option<Phase> {
        match self {
            Self::Io { phase, .. } => Some(*phase),
            Self::StagingCollision { .. } => Some(Phase::Staging),
            Self::MissingInput { .. } | Self::NotAFile { .. } => Some(Phase::Validate),
            Self::InvalidArchive { .. } | Self::UnsafeEntry { .. } => None,
        }
    }
}

/// Errors raised by the control channel listener and sender.
#[derive(Error, Debug)]
pub enum ControlError {
    /// The listener could not bind its port.
    #[error("failed to bind control channel on {host}:{port}: {source}")]
    Bind {
        /// Requested host.
        host: String,
        /// Requested port.
        port: u16,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The target host name could not be resolved.
    #[error("failed to resolve control host {host}: {source}")]
    Resolve {
        /// Host that failed to resolve.
        host: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No resolved address accepted the connection.
    #[error("failed to connect to control channel at {addr}: {source}")]
    Connect {
        /// Last address tried.
        addr: SocketAddr,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// I/O failure on an established connection.
    #[error("control channel I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while starting or running a launched instance.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// No home directory could be determined for the instance.
    #[error("cannot determine home directory; set WARPACK_HOME or pass --home")]
    NoHomeDirectory,

    /// Preparing the work directory failed.
    #[error("failed to prepare work directory {path}: {source}")]
    Environment {
        /// Directory being prepared.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The embedded server failed to start or stop.
    #[error("embedded server error: {0}")]
    Server(String),

    /// The control channel could not be started.
    #[error(transparent)]
    Control(#[from] ControlError),

    /// The browser could not be opened.
    #[error("failed to open browser for {url}: {reason}")]
    Browser {
        /// URL that was requested.
        url: String,
        /// Why no browser could be launched.
        reason: String,
    },
}

/// Errors raised while resolving build artifacts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No artifact matched.
    #[error("no {description} found among the resolved artifacts")]
    NotFound {
        /// What was being looked for.
        description: String,
    },

    /// More than one artifact matched.
    #[error("multiple {description} candidates found: {}", .candidates.join(", "))]
    Ambiguous {
        /// What was being looked for.
        description: String,
        /// Coordinates of every matching artifact.
        candidates: Vec<String>,
    },
}
