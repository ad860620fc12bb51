//! Control listener running inside a launched instance.

use crate::control::protocol::ControlRequest;
use crate::control::protocol::STATUS_REPLY;
use crate::error::ControlError;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Write;
use std::net::SocketAddr;
use std::net::TcpListener;
use std::net::TcpStream;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::mpsc;
use std::sync::mpsc::Receiver;
use std::sync::mpsc::RecvTimeoutError;
use std::sync::mpsc::Sender;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;
use std::time::Instant;

/// Default per-connection read deadline.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest accepted request line, terminator included.
pub const MAX_LINE_LENGTH: usize = 1024;

const THREAD_NAME: &str = "warpack-control";

/// A bound, not yet serving, control listener.
///
/// # Examples
///
/// ```no_run
/// use warpack_core::ControlListener;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let handle = ControlListener::bind("127.0.0.1", 8888, "warpack")?.spawn()?;
/// handle.wait_for_shutdown();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ControlListener {
    listener: TcpListener,
    key: String,
    read_timeout: Duration,
}

impl ControlListener {
    /// Binds the control port. Port `0` picks an ephemeral port.
    ///
    /// # Errors
    ///
    /// Returns `ControlError::Bind` if the address cannot be bound.
    pub fn bind(host: &str, port: u16, key: impl Into<String>) -> Result<Self, ControlError> {
        let listener = TcpListener::bind((host, port)).map_err(|source| ControlError::Bind {
            host: host.to_string(),
            port,
            source,
        })?;

        Ok(Self {
            listener,
            key: key.into(),
            read_timeout: DEFAULT_READ_TIMEOUT,
        })
    }

    /// Sets the deadline applied to every accepted connection.
    ///
    /// The deadline covers the whole connection, not a single read, so a
    /// peer trickling bytes cannot hold the serial accept loop.
    #[must_use]
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Returns the bound address.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket address cannot be queried.
    pub fn local_addr(&self) -> Result<SocketAddr, ControlError> {
        Ok(self.listener.local_addr()?)
    }

    /// Starts serving on a dedicated background thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be queried or the thread
    /// cannot be spawned.
    pub fn spawn(self) -> Result<ControlHandle, ControlError> {
        let local_addr = self.local_addr()?;
        let (sender, receiver) = mpsc::channel();

        let thread = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || self.serve(&sender))?;

        tracing::info!(addr = %local_addr, "control channel listening");

        Ok(ControlHandle {
            local_addr,
            receiver,
            requested: AtomicBool::new(false),
            thread: Some(thread),
        })
    }

    fn serve(self, shutdown: &Sender<()>) {
        for stream in self.listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to accept control connection");
                    continue;
                }
            };

            let peer = stream.peer_addr().ok();
            match self.handle_connection(stream) {
                Ok(true) => {
                    tracing::info!(?peer, "stop requested over control channel");
                    // The receiver may already be gone during teardown
                    let _ = shutdown.send(());
                    return;
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(?peer, error = %e, "control connection failed");
                }
            }
        }
    }

    /// Serves one connection. Returns `true` when a valid stop was received.
    fn handle_connection(&self, stream: TcpStream) -> io::Result<bool> {
        let deadline = Instant::now() + self.read_timeout;
        let mut writer = stream.try_clone()?;
        let mut reader = BufReader::new(stream);
        let mut line = Vec::new();

        while read_line(&mut reader, &mut line, deadline)? {
            let text = String::from_utf8_lossy(&line);
            match ControlRequest::parse(&text) {
                Some(ControlRequest::Status) => {
                    writer.write_all(STATUS_REPLY.as_bytes())?;
                    writer.write_all(b"\n")?;
                    writer.flush()?;
                }
                Some(request) if request.is_stop_with(&self.key) => return Ok(true),
                Some(ControlRequest::Stop(_)) => {
                    tracing::warn!("ignoring stop request with wrong key");
                }
                None => {
                    tracing::debug!(line = %text.trim_end(), "ignoring unknown control line");
                }
            }
        }

        Ok(false)
    }
}

/// Reads one `\n`-terminated line into `line`, raw bytes kept.
///
/// Returns `false` at end of stream. A final unterminated line is still
/// returned. Fails once `deadline` passes or the line exceeds
/// [`MAX_LINE_LENGTH`].
fn read_line(
    reader: &mut BufReader<TcpStream>,
    line: &mut Vec<u8>,
    deadline: Instant,
) -> io::Result<bool> {
    line.clear();
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(io::Error::new(
                io::ErrorKind::TimedOut,
                "control connection deadline exceeded",
            ));
        }
        reader.get_ref().set_read_timeout(Some(remaining))?;

        let available = match reader.fill_buf() {
            Ok(available) => available,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if available.is_empty() {
            return Ok(!line.is_empty());
        }

        let (used, complete) = match available.iter().position(|&byte| byte == b'\n') {
            Some(end) => (end + 1, true),
            None => (available.len(), false),
        };
        if line.len() + used > MAX_LINE_LENGTH {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "control line too long",
            ));
        }
        line.extend_from_slice(&available[..used]);
        reader.consume(used);

        if complete {
            return Ok(true);
        }
    }
}

/// Handle to a serving control listener.
#[derive(Debug)]
pub struct ControlHandle {
    local_addr: SocketAddr,
    receiver: Receiver<()>,
    requested: AtomicBool,
    thread: Option<JoinHandle<()>>,
}

impl ControlHandle {
    /// Address the listener is bound to.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Blocks until a valid stop request arrives.
    ///
    /// Also returns if the listener thread ends for any other reason.
    pub fn wait_for_shutdown(&self) {
        if self.requested.load(Ordering::Acquire) {
            return;
        }
        if self.receiver.recv().is_ok() {
            self.requested.store(true, Ordering::Release);
        }
    }

    /// Blocks for at most `timeout`; returns whether shutdown was requested.
    pub fn wait_for_shutdown_timeout(&self, timeout: Duration) -> bool {
        if self.requested.load(Ordering::Acquire) {
            return true;
        }
        match self.receiver.recv_timeout(timeout) {
            Ok(()) => {
                self.requested.store(true, Ordering::Release);
                true
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Non-blocking check for a received stop request.
    pub fn shutdown_requested(&self) -> bool {
        if self.requested.load(Ordering::Acquire) {
            return true;
        }
        if self.receiver.try_recv().is_ok() {
            self.requested.store(true, Ordering::Release);
            return true;
        }
        false
    }

    /// Waits for the listener thread to exit after a stop request.
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            tracing::warn!("control listener thread panicked");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Allow unwrap in tests for brevity
mod tests {
    use super::*;
    use std::io::Read;
    use std::net::Shutdown;

    fn spawn_listener(key: &str) -> ControlHandle {
        ControlListener::bind("127.0.0.1", 0, key)
            .unwrap()
            .with_read_timeout(Duration::from_secs(5))
            .spawn()
            .unwrap()
    }

    fn exchange(addr: SocketAddr, payload: &str) -> String {
        exchange_bytes(addr, payload.as_bytes())
    }

    fn exchange_bytes(addr: SocketAddr, payload: &[u8]) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        stream.write_all(payload).unwrap();
        stream.shutdown(Shutdown::Write).unwrap();
        let mut reply = String::new();
        stream.read_to_string(&mut reply).unwrap();
        reply
    }

    #[test]
    fn test_status_reply_keeps_listener_alive() {
        let handle = spawn_listener("warpack");

        assert_eq!(exchange(handle.local_addr(), "status\n"), "Running...\n");
        assert_eq!(exchange(handle.local_addr(), "STATUS\n"), "Running...\n");
        assert!(!handle.shutdown_requested());
    }

    #[test]
    fn test_multiple_status_lines_on_one_connection() {
        let handle = spawn_listener("warpack");

        let reply = exchange(handle.local_addr(), "status\nnoise\nstatus\n");
        assert_eq!(reply, "Running...\nRunning...\n");
    }

    #[test]
    fn test_non_utf8_line_is_ignored() {
        let handle = spawn_listener("warpack");

        let reply = exchange_bytes(handle.local_addr(), b"\xff\xfe junk\nstatus\n");
        assert_eq!(reply, "Running...\n");
    }

    #[test]
    fn test_unterminated_last_line_is_served() {
        let handle = spawn_listener("warpack");

        assert_eq!(exchange(handle.local_addr(), "status"), "Running...\n");
    }

    #[test]
    fn test_overlong_line_drops_connection() {
        let handle = spawn_listener("warpack");
        let addr = handle.local_addr();

        let mut stream = TcpStream::connect(addr).unwrap();
        let mut payload = vec![b'a'; MAX_LINE_LENGTH * 2];
        payload.extend_from_slice(b"\nstatus\n");
        // The listener may reset the connection while unread data is queued
        let _ = stream.write_all(&payload);
        let _ = stream.shutdown(Shutdown::Write);
        let mut reply = String::new();
        let _ = stream.read_to_string(&mut reply);

        assert!(!reply.contains("Running..."));
        assert_eq!(exchange(addr, "status\n"), "Running...\n");
    }

    #[test]
    fn test_slow_peer_cannot_hold_listener() {
        let handle = ControlListener::bind("127.0.0.1", 0, "warpack")
            .unwrap()
            .with_read_timeout(Duration::from_millis(300))
            .spawn()
            .unwrap();
        let addr = handle.local_addr();

        let mut slow = TcpStream::connect(addr).unwrap();
        let trickle = thread::spawn(move || {
            for _ in 0..30 {
                if slow.write_all(b"s").is_err() {
                    break;
                }
                thread::sleep(Duration::from_millis(100));
            }
        });
        thread::sleep(Duration::from_millis(50));

        let started = Instant::now();
        assert_eq!(exchange(addr, "status\n"), "Running...\n");
        assert!(
            started.elapsed() < Duration::from_secs(2),
            "status waited {:?}",
            started.elapsed()
        );

        trickle.join().unwrap();
    }

    #[test]
    fn test_wrong_key_is_ignored() {
        let handle = spawn_listener("secret");

        assert_eq!(exchange(handle.local_addr(), "stop:guess\n"), "");
        assert!(!handle.wait_for_shutdown_timeout(Duration::from_millis(200)));
        assert_eq!(exchange(handle.local_addr(), "status\n"), "Running...\n");
    }

    #[test]
    fn test_correct_key_requests_shutdown() {
        let handle = spawn_listener("secret");
        let addr = handle.local_addr();

        exchange(addr, "STOP:Secret\n");

        assert!(handle.wait_for_shutdown_timeout(Duration::from_secs(5)));
        assert!(handle.shutdown_requested());
        handle.join();
        assert!(TcpStream::connect(addr).is_err());
    }

    #[test]
    fn test_bind_conflict_is_bind_error() {
        let taken = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = taken.local_addr().unwrap().port();

        let err = ControlListener::bind("127.0.0.1", port, "k").unwrap_err();
        assert!(matches!(err, ControlError::Bind { port: p, .. } if p == port));
    }
}
