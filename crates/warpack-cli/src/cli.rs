//! CLI argument parsing using clap.

use clap::Parser;
use clap::ValueEnum;
use std::ffi::OsString;
use std::path::PathBuf;
use warpack_core::control::DEFAULT_CONTROL_KEY;
use warpack_core::control::DEFAULT_CONTROL_PORT;
use warpack_core::launcher::DEFAULT_CONTEXT;
use warpack_core::launcher::DEFAULT_HOST;
use warpack_core::launcher::DEFAULT_HTTP_PORT;

/// Flag accepted, in any letter case, as the optional fourth argument.
pub const COMPRESS_FLAG: &str = "--compress";

/// Application name used for the default instance home.
pub const DEFAULT_APP_NAME: &str = "warpack";

/// Arguments of the `warpack` packaging binary.
#[derive(Parser, Debug)]
#[command(name = "warpack")]
#[command(author, version, long_about = None)]
#[command(
    about = "Merges a server launcher archive and a web application archive into one standalone archive"
)]
#[command(after_help = "Adding --compress as the last argument enables archive compression.")]
pub struct PackCli {
    /// Server launcher archive
    #[arg(value_name = "LAUNCHER", value_parser = clap::value_parser!(OsString))]
    pub launcher: OsString,

    /// Web application archive
    #[arg(value_name = "APPLICATION", value_parser = clap::value_parser!(OsString))]
    pub application: OsString,

    /// Output file, or a directory (existing, or ending with a separator)
    #[arg(value_name = "OUTPUT", value_parser = clap::value_parser!(OsString))]
    pub output: OsString,

    /// Pass --compress to deflate every entry
    #[arg(value_name = "--compress", allow_hyphen_values = true)]
    pub compress: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl PackCli {
    /// Returns whether compression was requested, and the ignored fourth
    /// argument if it was something else.
    pub fn compression(&self) -> (bool, Option<&str>) {
        match self.compress.as_deref() {
            None => (false, None),
            Some(flag) if flag.eq_ignore_ascii_case(COMPRESS_FLAG) => (true, None),
            Some(other) => (false, Some(other)),
        }
    }
}

/// Launcher targets.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// Start the instance and block until stopped
    Start,
    /// Ask a running instance to stop
    Stop,
    /// Query whether an instance is running
    Status,
}

/// Arguments of the `warpack-launcher` binary.
#[derive(Parser, Debug)]
#[command(name = "warpack-launcher")]
#[command(author, version, long_about = None)]
#[command(about = "Starts, stops or queries a standalone web application instance")]
pub struct LauncherCli {
    /// Target to run
    #[arg(value_enum, value_name = "TARGET")]
    pub target: Target,

    /// Host name or address the instance binds to
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// HTTP port
    #[arg(short, long, default_value_t = DEFAULT_HTTP_PORT)]
    pub port: u16,

    /// Control port (a negative value disables the control channel)
    #[arg(
        short = 'm',
        long,
        default_value_t = i32::from(DEFAULT_CONTROL_PORT),
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i32).range(..=i64::from(u16::MAX))
    )]
    pub control_port: i32,

    /// Shared key expected in stop requests
    #[arg(long, default_value = DEFAULT_CONTROL_KEY)]
    pub control_key: String,

    /// Custom server configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Open a browser once the instance is up
    #[arg(short, long)]
    pub browser: bool,

    /// URL to open instead of the application URL (with --browser)
    #[arg(short = 'u', long, value_name = "URL")]
    pub browser_url: Option<String>,

    /// Context path of the application
    #[arg(long, default_value = DEFAULT_CONTEXT)]
    pub context: String,

    /// Application name, used for the default home directory
    #[arg(long, default_value = DEFAULT_APP_NAME)]
    pub app_name: String,

    /// Instance home directory (default: ~/.<APP_NAME>)
    #[arg(long, env = "WARPACK_HOME", value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl LauncherCli {
    /// Control port, or `None` when the channel is disabled.
    pub fn control_port(&self) -> Option<u16> {
        u16::try_from(self.control_port).ok()
    }
}
