//! Embedded server used by `warpack-launcher start`.

use warpack_core::EmbeddedServer;
use warpack_core::LaunchError;
use warpack_core::launcher::ServerSettings;

/// Server that holds the instance lifecycle without serving requests.
///
/// It records the settings it was started with so the application URL can
/// be reported, and lets the control channel drive start and stop.
#[derive(Debug, Default)]
pub struct StandbyServer {
    settings: Option<ServerSettings>,
}

impl StandbyServer {
    /// Creates a stopped server.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the server is started.
    pub const fn is_running(&self) -> bool {
        self.settings.is_some()
    }
}

impl EmbeddedServer for StandbyServer {
    fn start(&mut self, settings: &ServerSettings) -> Result<(), LaunchError> {
        if self.is_running() {
            return Err(LaunchError::Server("server is already running".into()));
        }
        tracing::debug!(work_dir = %settings.work_dir.display(), "standby server started");
        self.settings = Some(settings.clone());
        Ok(())
    }

    fn stop(&mut self) -> Result<(), LaunchError> {
        if self.settings.take().is_some() {
            tracing::debug!("standby server stopped");
        }
        Ok(())
    }

    fn url(&self) -> String {
        self.settings.as_ref().map_or_else(String::new, |settings| {
            let context = settings.context.trim_start_matches('/');
            format!("http://{}:{}/{context}", settings.host, settings.port)
        })
    }
}
