//! Core types for staging and validated entry names.

mod entry_path;
mod skip_set;
mod staging_dir;

pub use entry_path::EntryPath;
pub use skip_set::SkipSet;
pub use staging_dir::STAGING_PREFIX;
pub use staging_dir::StagingDir;
