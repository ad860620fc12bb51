//! Lifecycle of a launched standalone instance.
//!
//! [`Launcher`] prepares the instance home, starts an [`EmbeddedServer`],
//! opens the control channel and then blocks until a valid stop request
//! arrives, at which point the server is stopped.

pub mod browser;
pub mod environment;

use crate::control::ControlHandle;
use crate::control::ControlListener;
use crate::control::DEFAULT_CONTROL_KEY;
use crate::control::DEFAULT_CONTROL_PORT;
use crate::error::LaunchError;
use std::path::PathBuf;
use std::thread;

/// Default address the server and control channel bind to.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default HTTP port of the embedded server.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default context path the application is served under.
pub const DEFAULT_CONTEXT: &str = "/";

/// Settings handed to an embedded server when it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// Host to bind.
    pub host: String,
    /// HTTP port to bind.
    pub port: u16,
    /// Context path of the deployed application.
    pub context: String,
    /// Optional server configuration file.
    pub config: Option<PathBuf>,
    /// Cleared scratch directory for the server.
    pub work_dir: PathBuf,
}

/// Seam between the launcher and the server hosting the application.
pub trait EmbeddedServer {
    /// Starts serving. Must return once the server is up.
    ///
    /// # Errors
    ///
    /// Returns `LaunchError::Server` if the server cannot start.
    fn start(&mut self, settings: &ServerSettings) -> Result<(), LaunchError>;

    /// Stops serving.
    ///
    /// # Errors
    ///
    /// Returns `LaunchError::Server` if the server cannot stop cleanly.
    fn stop(&mut self) -> Result<(), LaunchError>;

    /// Public URL of the deployed application.
    fn url(&self) -> String;
}

/// Options of a `start` invocation.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Application name, used for the default home directory.
    pub app_name: String,
    /// Explicit instance home.
    pub home: Option<PathBuf>,
    /// Host for the server and the control channel.
    pub host: String,
    /// HTTP port.
    pub port: u16,
    /// Context path of the application.
    pub context: String,
    /// Optional server configuration file.
    pub config: Option<PathBuf>,
    /// Control port; `None` disables the control channel.
    pub control_port: Option<u16>,
    /// Shared key expected in stop requests.
    pub control_key: String,
    /// Whether to open a browser once the server is up.
    pub open_browser: bool,
    /// URL to open instead of the server's own URL.
    pub browser_url: Option<String>,
}

impl LaunchOptions {
    /// Creates options with the default ports, host and key.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            home: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_HTTP_PORT,
            context: DEFAULT_CONTEXT.to_string(),
            config: None,
            control_port: Some(DEFAULT_CONTROL_PORT),
            control_key: DEFAULT_CONTROL_KEY.to_string(),
            open_browser: false,
            browser_url: None,
        }
    }
}

/// Starts and supervises a standalone instance.
#[derive(Debug, Clone)]
pub struct Launcher {
    options: LaunchOptions,
}

impl Launcher {
    /// Creates a launcher.
    #[must_use]
    pub const fn new(options: LaunchOptions) -> Self {
        Self { options }
    }

    /// Starts `server` and blocks until a stop request is received.
    ///
    /// Without a control channel this blocks for the life of the process.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be prepared, the server
    /// fails to start or stop, or the control port cannot be bound.
    pub fn run<S: EmbeddedServer>(&self, server: S) -> Result<(), LaunchError> {
        self.start(server)?.wait()
    }

    /// Starts `server` and returns without blocking.
    ///
    /// # Errors
    ///
    /// See [`Launcher::run`].
    pub fn start<S: EmbeddedServer>(
        &self,
        mut server: S,
    ) -> Result<RunningInstance<S>, LaunchError> {
        let options = &self.options;
        let home = environment::resolve_home(options.home.as_deref(), &options.app_name)?;
        let work_dir = environment::prepare_work_dir(&home)?;

        let settings = ServerSettings {
            host: options.host.clone(),
            port: options.port,
            context: options.context.clone(),
            config: options.config.clone(),
            work_dir,
        };
        server.start(&settings)?;
        tracing::info!(url = %server.url(), home = %home.display(), "server started");

        let control = match options.control_port {
            Some(port) => match Self::start_control(&options.host, port, &options.control_key) {
                Ok(handle) => Some(handle),
                Err(e) => {
                    if let Err(stop_err) = server.stop() {
                        tracing::warn!(error = %stop_err, "failed to stop server");
                    }
                    return Err(e);
                }
            },
            None => {
                tracing::info!("control channel disabled");
                None
            }
        };

        if options.open_browser {
            let url = options.browser_url.clone().unwrap_or_else(|| server.url());
            if let Err(e) = browser::open(&url) {
                tracing::warn!(error = %e, "failed to open browser");
            }
        }

        Ok(RunningInstance { server, control })
    }

    fn start_control(host: &str, port: u16, key: &str) -> Result<ControlHandle, LaunchError> {
        Ok(ControlListener::bind(host, port, key)?.spawn()?)
    }
}

/// A started instance waiting for its stop request.
#[derive(Debug)]
pub struct RunningInstance<S> {
    server: S,
    control: Option<ControlHandle>,
}

impl<S: EmbeddedServer> RunningInstance<S> {
    /// The started server.
    pub const fn server(&self) -> &S {
        &self.server
    }

    /// Control channel handle, if enabled.
    pub const fn control(&self) -> Option<&ControlHandle> {
        self.control.as_ref()
    }

    /// Blocks until shutdown is requested, then stops the server.
    ///
    /// # Errors
    ///
    /// Returns the server's error if it fails to stop.
    pub fn wait(mut self) -> Result<(), LaunchError> {
        match self.control.take() {
            Some(handle) => {
                handle.wait_for_shutdown();
                handle.join();
            }
            None => loop {
                thread::park();
            },
        }

        tracing::info!("stopping server");
        self.server.stop()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Allow unwrap in tests for brevity
mod tests {
    use super::*;
    use crate::ControlClient;
    use crate::error::ControlError;
    use std::net::TcpListener;
    use std::sync::Arc;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Debug, Default)]
    struct Events(Arc<Mutex<Vec<String>>>);

    #[derive(Debug)]
    struct RecordingServer {
        events: Arc<Mutex<Vec<String>>>,
        fail_start: bool,
    }

    impl RecordingServer {
        fn new(events: &Events) -> Self {
            Self {
                events: Arc::clone(&events.0),
                fail_start: false,
            }
        }
    }

    impl EmbeddedServer for RecordingServer {
        fn start(&mut self, settings: &ServerSettings) -> Result<(), LaunchError> {
            if self.fail_start {
                return Err(LaunchError::Server("port in use".into()));
            }
            assert!(settings.work_dir.is_dir());
            self.events.lock().unwrap().push("start".into());
            Ok(())
        }

        fn stop(&mut self) -> Result<(), LaunchError> {
            self.events.lock().unwrap().push("stop".into());
            Ok(())
        }

        fn url(&self) -> String {
            "http://127.0.0.1:8080/".into()
        }
    }

    fn options(home: &TempDir) -> LaunchOptions {
        let mut options = LaunchOptions::new("shop");
        options.home = Some(home.path().to_path_buf());
        options.control_port = Some(0);
        options
    }

    #[test]
    fn test_stop_request_stops_server() {
        let home = TempDir::new().unwrap();
        let events = Events::default();
        let instance = Launcher::new(options(&home))
            .start(RecordingServer::new(&events))
            .unwrap();
        let port = instance.control().unwrap().local_addr().port();

        let waiter = thread::spawn(move || instance.wait());
        let client = ControlClient::new("127.0.0.1", port);
        assert_eq!(client.status().unwrap().as_deref(), Some("Running..."));
        client.stop("warpack").unwrap();

        waiter.join().unwrap().unwrap();
        assert_eq!(*events.0.lock().unwrap(), vec!["start", "stop"]);
        assert!(home.path().join("work").is_dir());
    }

    #[test]
    fn test_run_blocks_until_stop() {
        let home = TempDir::new().unwrap();
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let mut options = options(&home);
        options.control_port = Some(port);
        let events = Events::default();
        let server = RecordingServer::new(&events);

        let runner = thread::spawn(move || Launcher::new(options).run(server));

        let client = ControlClient::new("127.0.0.1", port);
        let mut attempts = 0;
        while client.status().is_err() {
            attempts += 1;
            assert!(attempts < 100, "listener never came up");
            thread::sleep(std::time::Duration::from_millis(50));
        }
        client.stop("warpack").unwrap();

        runner.join().unwrap().unwrap();
        assert_eq!(*events.0.lock().unwrap(), vec!["start", "stop"]);
    }

    #[test]
    fn test_start_failure_propagates() {
        let home = TempDir::new().unwrap();
        let events = Events::default();
        let mut server = RecordingServer::new(&events);
        server.fail_start = true;

        let err = Launcher::new(options(&home)).start(server).unwrap_err();

        assert!(matches!(err, LaunchError::Server(_)));
        assert!(events.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_control_bind_failure_stops_server() {
        let home = TempDir::new().unwrap();
        let taken = TcpListener::bind("127.0.0.1:0").unwrap();
        let mut options = options(&home);
        options.control_port = Some(taken.local_addr().unwrap().port());
        let events = Events::default();

        let err = Launcher::new(options)
            .start(RecordingServer::new(&events))
            .unwrap_err();

        assert!(matches!(err, LaunchError::Control(ControlError::Bind { .. })));
        assert_eq!(*events.0.lock().unwrap(), vec!["start", "stop"]);
    }

    #[test]
    fn test_disabled_control_has_no_handle() {
        let home = TempDir::new().unwrap();
        let mut options = options(&home);
        options.control_port = None;
        let events = Events::default();

        let instance = Launcher::new(options)
            .start(RecordingServer::new(&events))
            .unwrap();

        assert!(instance.control().is_none());
    }

    #[test]
    fn test_default_options() {
        let options = LaunchOptions::new("shop");
        assert_eq!(options.host, "127.0.0.1");
        assert_eq!(options.port, 8080);
        assert_eq!(options.control_port, Some(8888));
        assert_eq!(options.control_key, "warpack");
        assert_eq!(options.context, "/");
    }
}
