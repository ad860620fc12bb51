//! Warpack CLI - merges a server launcher archive and a web application
//! archive into one standalone archive.

use clap::Parser;
use std::process::ExitCode;
use warpack_cli::cli::PackCli;
use warpack_cli::commands;
use warpack_cli::error::report_error;
use warpack_cli::logging;
use warpack_cli::output;

fn main() -> ExitCode {
    let cli = PackCli::parse();
    logging::init(cli.verbose);

    let formatter = output::create_formatter(cli.verbose, cli.quiet);
    match commands::pack::execute(&cli, &*formatter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(&err),
    }
}
