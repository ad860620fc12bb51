//! Output formatter trait for CLI results.

use anyhow::Result;
use warpack_core::PackReport;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format a finished packaging run
    fn format_pack_result(&self, report: &PackReport) -> Result<()>;

    /// Format the outcome of a status query
    fn format_status(&self, target: &str, reply: Option<&str>) -> Result<()>;

    /// Format success message
    fn format_success(&self, message: &str);

    /// Format warning message
    fn format_warning(&self, message: &str);
}
