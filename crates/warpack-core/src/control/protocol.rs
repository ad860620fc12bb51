//! Control protocol messages.
//!
//! The protocol is line based ASCII, one exchange per connection:
//!
//! | request       | effect                                         |
//! |---------------|------------------------------------------------|
//! | `status`      | listener answers `Running...`                  |
//! | `stop:<key>`  | listener shuts down if `<key>` matches         |
//!
//! Both keywords are matched case-insensitively. Anything else is ignored.

use std::fmt;

/// Reply line sent for a `status` request.
pub const STATUS_REPLY: &str = "Running...";

/// Shared key used when none is configured.
pub const DEFAULT_CONTROL_KEY: &str = "warpack";

/// Default control port of a launched instance.
pub const DEFAULT_CONTROL_PORT: u16 = 8888;

const STATUS_COMMAND: &str = "status";
const STOP_PREFIX: &str = "stop:";

/// A request line understood by the control listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlRequest {
    /// Liveness query.
    Status,
    /// Shutdown request carrying the caller's key.
    Stop(String),
}

impl ControlRequest {
    /// Parses one request line, without its line terminator.
    ///
    /// Returns `None` for lines that are not control requests.
    ///
    /// # Examples
    ///
    /// ```
    /// use warpack_core::ControlRequest;
    ///
    /// assert_eq!(ControlRequest::parse("STATUS"), Some(ControlRequest::Status));
    /// assert_eq!(
    ///     ControlRequest::parse("Stop:secret"),
    ///     Some(ControlRequest::Stop("secret".into()))
    /// );
    /// assert_eq!(ControlRequest::parse("hello"), None);
    /// ```
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.eq_ignore_ascii_case(STATUS_COMMAND) {
            return Some(Self::Status);
        }
        let prefix = line.get(..STOP_PREFIX.len())?;
        if prefix.eq_ignore_ascii_case(STOP_PREFIX) {
            return Some(Self::Stop(line[STOP_PREFIX.len()..].to_string()));
        }
        None
    }

    /// Returns `true` if this is a stop request carrying `key`.
    ///
    /// Keys compare case-insensitively, like the rest of the line.
    #[must_use]
    pub fn is_stop_with(&self, key: &str) -> bool {
        matches!(self, Self::Stop(given) if given.eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for ControlRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status => f.write_str(STATUS_COMMAND),
            Self::Stop(key) => write!(f, "{STOP_PREFIX}{key}"),
        }
    }
}
