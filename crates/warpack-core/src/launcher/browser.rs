//! Best-effort browser opener.

use crate::error::LaunchError;
use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Stdio;
use std::thread;
use std::thread::JoinHandle;

const REAPER_THREAD_NAME: &str = "warpack-browser";

/// Programs tried in order on Unix systems other than macOS.
pub const UNIX_BROWSERS: &[&str] = &[
    "xdg-open",
    "google-chrome",
    "firefox",
    "opera",
    "konqueror",
    "epiphany",
    "mozilla",
    "netscape",
];

/// Opens `url` in the platform's browser without waiting for it.
///
/// # Errors
///
/// Returns `LaunchError::Browser` if no browser could be found or spawned.
pub fn open(url: &str) -> Result<(), LaunchError> {
    let _reaper = spawn_detached(opener_command(url)?).map_err(|e| LaunchError::Browser {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    tracing::info!(url, "opened browser");
    Ok(())
}

/// Spawns `command` with null stdio. A background thread waits on the
/// child; dropping the returned handle detaches it.
fn spawn_detached(mut command: Command) -> io::Result<JoinHandle<()>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    thread::Builder::new()
        .name(REAPER_THREAD_NAME.to_string())
        .spawn(move || match child.wait() {
            Ok(status) => tracing::debug!(%status, "browser process exited"),
            Err(e) => tracing::warn!(error = %e, "failed to wait for browser process"),
        })
}

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> Result<Command, LaunchError> {
    let mut command = Command::new("open");
    command.arg(url);
    Ok(command)
}

#[cfg(windows)]
fn opener_command(url: &str) -> Result<Command, LaunchError> {
    let mut command = Command::new("rundll32");
    command.args(["url.dll,FileProtocolHandler", url]);
    Ok(command)
}

#[cfg(not(any(target_os = "macos", windows)))]
fn opener_command(url: &str) -> Result<Command, LaunchError> {
    let path_var = std::env::var_os("PATH").unwrap_or_default();
    let program = UNIX_BROWSERS
        .iter()
        .find_map(|name| find_program(name, &path_var))
        .ok_or_else(|| LaunchError::Browser {
            url: url.to_string(),
            reason: "failed to locate a browser".to_string(),
        })?;

    let mut command = Command::new(program);
    command.arg(url);
    Ok(command)
}

/// Finds `name` as a regular file in one of the `PATH`-style directories.
pub fn find_program(name: &str, path_var: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Allow unwrap in tests for brevity
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn make_executable(path: &Path) {
        use std::os::unix::fs::PermissionsExt;

        fs::write(path, b"#!/bin/sh\n").unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_find_program_searches_in_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        make_executable(&second.path().join("firefox"));
        let path_var = std::env::join_paths([first.path(), second.path()]).unwrap();

        let found = find_program("firefox", &path_var).unwrap();
        assert_eq!(found, second.path().join("firefox"));
    }

    #[cfg(unix)]
    #[test]
    fn test_find_program_skips_non_executable() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("opera"), b"not runnable").unwrap();
        let path_var = OsString::from(dir.path());

        assert_eq!(find_program("opera", &path_var), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_spawn_detached_reaps_child() {
        let mut command = Command::new("sh");
        command.args(["-c", "exit 3"]);

        let reaper = spawn_detached(command).unwrap();
        reaper.join().unwrap();
    }

    #[test]
    fn test_spawn_detached_missing_program() {
        let command = Command::new("warpack-no-such-browser");
        assert!(spawn_detached(command).is_err());
    }

    #[test]
    fn test_find_program_empty_path() {
        assert_eq!(find_program("firefox", OsStr::new("")), None);
    }
}
