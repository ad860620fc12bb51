//! Packaging command implementation.

use crate::cli::PackCli;
use crate::error::convert_pack_error;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use warpack_core::Packager;
use warpack_core::PackagingConfig;

/// Builds the standalone archive described by the arguments.
pub fn execute(args: &PackCli, formatter: &dyn OutputFormatter) -> Result<()> {
    let (use_compression, ignored) = args.compression();
    if let Some(ignored) = ignored {
        formatter.format_warning(&format!("ignoring unrecognized argument '{ignored}'"));
    }

    let config = PackagingConfig::new(
        &args.launcher,
        &args.application,
        &args.output,
        use_compression,
    )
    .map_err(convert_pack_error)?;

    let packager = Packager::new();
    let report = if !args.quiet && CliProgress::should_show() {
        let mut progress = CliProgress::new("Packing");
        packager.pack_with_progress(&config, &mut progress)
    } else {
        packager.pack_with_report(&config)
    }
    .map_err(convert_pack_error)?;

    formatter.format_pack_result(&report)?;

    Ok(())
}
