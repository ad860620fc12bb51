//! Warpack launcher - starts a standalone instance or controls a running
//! one.

use clap::Parser;
use std::process::ExitCode;
use warpack_cli::cli::LauncherCli;
use warpack_cli::cli::Target;
use warpack_cli::commands;
use warpack_cli::error::report_error;
use warpack_cli::logging;
use warpack_cli::output;

fn main() -> ExitCode {
    let cli = LauncherCli::parse();
    logging::init(cli.verbose);

    let formatter = output::create_formatter(cli.verbose, cli.quiet);

    let result = match cli.target {
        Target::Start => commands::start::execute(&cli, &*formatter),
        Target::Stop => commands::stop::execute(&cli, &*formatter),
        Target::Status => commands::status::execute(&cli, &*formatter),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(&err),
    }
}
