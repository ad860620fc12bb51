//! Control sender used by the `stop` and `status` targets.

use crate::control::protocol::ControlRequest;
use crate::error::ControlError;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Write;
use std::net::Shutdown;
use std::net::TcpStream;
use std::net::ToSocketAddrs;
use std::time::Duration;

/// Default connect and read timeout of the sender.
pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Sends single control requests to a running instance.
#[derive(Debug, Clone)]
pub struct ControlClient {
    host: String,
    port: u16,
    timeout: Duration,
}

impl ControlClient {
    /// Creates a client for `host:port`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: DEFAULT_CLIENT_TIMEOUT,
        }
    }

    /// Sets the connect and read timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sends `status`; returns the reply line, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot be resolved or reached.
    pub fn status(&self) -> Result<Option<String>, ControlError> {
        self.send(&ControlRequest::Status)
    }

    /// Sends `stop:<key>`; returns the reply line, if any.
    ///
    /// A listener that accepts the key closes the connection without
    /// replying, so `Ok(None)` is the normal outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot be resolved or reached.
    pub fn stop(&self, key: &str) -> Result<Option<String>, ControlError> {
        self.send(&ControlRequest::Stop(key.to_string()))
    }

    /// Sends one request line, half-closes, and reads one optional reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot be resolved or reached, or the
    /// exchange fails.
    pub fn send(&self, request: &ControlRequest) -> Result<Option<String>, ControlError> {
        let mut stream = self.connect()?;
        stream.set_read_timeout(Some(self.timeout))?;

        stream.write_all(format!("{request}\n").as_bytes())?;
        stream.flush()?;
        stream.shutdown(Shutdown::Write)?;

        let mut reply = String::new();
        let read = BufReader::new(stream).read_line(&mut reply)?;
        if read == 0 {
            return Ok(None);
        }

        let reply = reply.trim_end_matches(['\r', '\n']).to_string();
        tracing::debug!(%request, reply = %reply, "control reply received");
        Ok(Some(reply))
    }

    fn connect(&self) -> Result<TcpStream, ControlError> {
        let resolve_err = |source| ControlError::Resolve {
            host: self.host.clone(),
            source,
        };

        let addrs: Vec<_> = (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(resolve_err)?
            .collect();

        let mut last = None;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => return Ok(stream),
                Err(source) => {
                    tracing::debug!(%addr, error = %source, "control connect attempt failed");
                    last = Some(ControlError::Connect { addr, source });
                }
            }
        }

        Err(last.unwrap_or_else(|| {
            resolve_err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "host resolved to no addresses",
            ))
        }))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Allow unwrap in tests for brevity
mod tests {
    use super::*;
    use crate::ControlListener;
    use std::net::TcpListener;

    #[test]
    fn test_status_roundtrip() {
        let handle = ControlListener::bind("127.0.0.1", 0, "warpack")
            .unwrap()
            .spawn()
            .unwrap();
        let client = ControlClient::new("127.0.0.1", handle.local_addr().port());

        assert_eq!(client.status().unwrap().as_deref(), Some("Running..."));
    }

    #[test]
    fn test_stop_roundtrip() {
        let handle = ControlListener::bind("127.0.0.1", 0, "warpack")
            .unwrap()
            .spawn()
            .unwrap();
        let client = ControlClient::new("127.0.0.1", handle.local_addr().port());

        let reply = client.stop("warpack").unwrap();
        assert_eq!(reply, None);
        assert!(handle.wait_for_shutdown_timeout(Duration::from_secs(5)));
        handle.join();

        assert!(client.status().is_err());
    }

    #[test]
    fn test_connection_refused_is_connect_error() {
        // Reserve a port, then free it so nothing listens there
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let err = ControlClient::new("127.0.0.1", port)
            .with_timeout(Duration::from_secs(1))
            .status()
            .unwrap_err();
        assert!(matches!(err, ControlError::Connect { .. }));
    }

    #[test]
    fn test_unresolvable_host_is_resolve_error() {
        let err = ControlClient::new("host.invalid", 8888)
            .with_timeout(Duration::from_millis(500))
            .status()
            .unwrap_err();
        assert!(matches!(err, ControlError::Resolve { .. }));
    }
}
