//! `start` target implementation.

use crate::cli::LauncherCli;
use crate::error::convert_launch_error;
use crate::output::OutputFormatter;
use crate::standby::StandbyServer;
use anyhow::Result;
use warpack_core::EmbeddedServer;
use warpack_core::LaunchOptions;
use warpack_core::Launcher;

/// Builds launch options from the command line.
pub fn launch_options(args: &LauncherCli) -> LaunchOptions {
    let mut options = LaunchOptions::new(args.app_name.clone());
    options.home.clone_from(&args.home);
    options.host.clone_from(&args.host);
    options.port = args.port;
    options.context.clone_from(&args.context);
    options.config.clone_from(&args.config);
    options.control_port = args.control_port();
    options.control_key.clone_from(&args.control_key);
    options.open_browser = args.browser;
    options.browser_url.clone_from(&args.browser_url);
    options
}

/// Starts the instance and blocks until it is stopped.
pub fn execute(args: &LauncherCli, formatter: &dyn OutputFormatter) -> Result<()> {
    let options = launch_options(args);
    let instance = Launcher::new(options)
        .start(StandbyServer::new())
        .map_err(convert_launch_error)?;

    formatter.format_success(&format!("Instance started at {}", instance.server().url()));
    match instance.control() {
        Some(control) => formatter.format_success(&format!(
            "Control channel listening on {}",
            control.local_addr()
        )),
        None => formatter.format_warning(
            "control channel disabled; the instance can only be stopped externally",
        ),
    }

    instance.wait().map_err(convert_launch_error)
}
