//! `stop` target implementation.

use crate::cli::LauncherCli;
use crate::output::OutputFormatter;
use anyhow::Result;
use warpack_core::ControlClient;

/// Sends a stop request. An unreachable instance is reported, not fatal.
pub fn execute(args: &LauncherCli, formatter: &dyn OutputFormatter) -> Result<()> {
    let Some(port) = args.control_port() else {
        formatter.format_warning("control channel disabled; nothing to stop");
        return Ok(());
    };

    match ControlClient::new(args.host.clone(), port).stop(&args.control_key) {
        Ok(_) => formatter.format_success(&format!("Stop request sent to {}:{port}", args.host)),
        Err(e) => {
            tracing::debug!(error = ?e, "stop request failed");
            formatter.format_warning(&format!("no running instance reachable: {e}"));
        }
    }

    Ok(())
}
