//! `status` target implementation.

use crate::cli::LauncherCli;
use crate::output::OutputFormatter;
use anyhow::Result;
use warpack_core::ControlClient;

/// Queries a running instance. An unreachable instance is reported, not fatal.
pub fn execute(args: &LauncherCli, formatter: &dyn OutputFormatter) -> Result<()> {
    let Some(port) = args.control_port() else {
        formatter.format_warning("control channel disabled; status unavailable");
        return Ok(());
    };

    let target = format!("{}:{port}", args.host);
    match ControlClient::new(args.host.clone(), port).status() {
        Ok(reply) => formatter.format_status(&target, reply.as_deref())?,
        Err(e) => {
            tracing::debug!(error = ?e, "status request failed");
            formatter.format_warning(&format!("no running instance reachable: {e}"));
        }
    }

    Ok(())
}
