//! Standalone archive packaging with a local process control channel.
//!
//! `warpack-core` merges a pre-built server launcher archive and a web
//! application archive into one self-contained, runnable archive. The
//! launcher's manifest is kept, application entries win every other name
//! collision, and entries that would escape the staging area are rejected.
//!
//! It also provides the tiny line-based control protocol used to query or
//! stop a running launched instance.
//!
//! # Examples
//!
//! ```no_run
//! use warpack_core::PackagingConfig;
//! use warpack_core::Packager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PackagingConfig::new(
//!     "jwarpack-es-jetty6.jar",
//!     "shop.war",
//!     "target/",
//!     true,
//! )?;
//! let output = Packager::new().pack(&config)?;
//! println!("Created {}", output.display());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod control;
pub mod error;
pub mod launcher;
pub mod merge;
pub mod packer;
pub mod report;
pub mod resolve;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export main API types
pub use config::PackagingConfig;
pub use control::ControlClient;
pub use control::ControlHandle;
pub use control::ControlListener;
pub use control::ControlRequest;
pub use error::ControlError;
pub use error::LaunchError;
pub use error::PackError;
pub use error::Phase;
pub use error::ResolveError;
pub use error::Result;
pub use launcher::EmbeddedServer;
pub use launcher::LaunchOptions;
pub use launcher::Launcher;
pub use packer::MANIFEST_ENTRY;
pub use packer::Packager;
pub use report::PackReport;
pub use report::ProgressCallback;

// Re-export types module for easier access
pub use types::EntryPath;
pub use types::SkipSet;
pub use types::StagingDir;
