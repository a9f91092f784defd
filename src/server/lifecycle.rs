use crate::config::Config;
use crate::error::{Error, Result};
use crate::server::logs::{LogTail, tail_log};
use crate::server::monitor::{HealthProbe, HttpHealthProbe, ServerHealth};
use crate::server::pidfile::{PidFile, PidRecord};
use crate::server::probe::{OsProbe, ProcessProbe};
use crate::server::process::ServerProcess;
use std::fmt;
use std::sync::Arc;
use tokio::time::{Instant, sleep};

/// A PID file that no longer identifies a live process
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StalePid {
    /// The recorded process is gone
    Dead(u32),
    /// The file content is not a process identifier
    Invalid(String),
}

impl fmt::Display for StalePid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StalePid::Dead(pid) => write!(f, "process {} is not running", pid),
            StalePid::Invalid(content) => write!(f, "unusable PID file content '{}'", content),
        }
    }
}

/// Result of a start request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new process was launched and survived the grace period
    Started { pid: u32 },
    /// A live process was already recorded; nothing was launched
    AlreadyRunning { pid: u32 },
}

impl StartOutcome {
    pub fn pid(&self) -> u32 {
        match self {
            StartOutcome::Started { pid } | StartOutcome::AlreadyRunning { pid } => *pid,
        }
    }
}

impl fmt::Display for StartOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartOutcome::Started { pid } => write!(f, "Application started (PID {})", pid),
            StartOutcome::AlreadyRunning { pid } => {
                write!(f, "Application is already running (PID {})", pid)
            }
        }
    }
}

/// Result of a stop request. Stopping never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    /// No PID file existed
    NotRunning,
    /// The PID file was stale and has been removed
    Stale(StalePid),
    /// The process exited after the graceful signal
    Terminated { pid: u32 },
    /// The process outlived the timeout; the forceful signal was attempted
    Killed { pid: u32 },
}

impl fmt::Display for StopOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopOutcome::NotRunning => write!(f, "Application is not running"),
            StopOutcome::Stale(stale) => write!(f, "Removed stale PID file: {}", stale),
            StopOutcome::Terminated { pid } => write!(f, "Application stopped (PID {})", pid),
            StopOutcome::Killed { pid } => {
                write!(
                    f,
                    "Application did not stop gracefully; forceful signal sent (PID {})",
                    pid
                )
            }
        }
    }
}

/// Result of a restart request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartOutcome {
    pub stopped: StopOutcome,
    pub started: StartOutcome,
}

/// Result of a status query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusReport {
    /// No PID file exists
    NotRunning,
    /// The PID file was stale and has been removed
    Stale(StalePid),
    /// The recorded process is alive
    Running { pid: u32, health: ServerHealth },
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusReport::NotRunning => write!(f, "Application is not running"),
            StatusReport::Stale(stale) => {
                write!(f, "Application is not running (removed stale PID file: {})", stale)
            }
            StatusReport::Running { pid, health } => {
                write!(f, "Application is running (PID {}), health: {}", pid, health)
            }
        }
    }
}

/// What the PID file resolves to right now
enum Tracked {
    Nothing,
    Live(u32),
    Stale(StalePid),
}

/// Lifecycle manager for the single managed application.
///
/// The manager keeps no state of its own: every operation re-reads the PID
/// file and asks the [`ProcessProbe`] about liveness.
pub struct LifecycleManager<P = OsProbe, H = HttpHealthProbe> {
    config: Arc<Config>,
    pid_file: PidFile,
    process: ServerProcess,
    probe: P,
    health: H,
}

impl LifecycleManager {
    /// Create a manager backed by OS signals and the HTTP health endpoint
    pub fn new(config: Arc<Config>) -> Self {
        let health = HttpHealthProbe::from_config(&config);
        Self::with_probes(config, OsProbe, health)
    }
}

impl<P: ProcessProbe, H: HealthProbe> LifecycleManager<P, H> {
    /// Create a manager with explicit probes
    pub fn with_probes(config: Arc<Config>, probe: P, health: H) -> Self {
        Self {
            pid_file: PidFile::new(config.pid_file_path()),
            process: ServerProcess::from_config(&config),
            config,
            probe,
            health,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pid_file(&self) -> &PidFile {
        &self.pid_file
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    fn tracked(&self) -> Tracked {
        match self.pid_file.read() {
            PidRecord::Absent => Tracked::Nothing,
            PidRecord::Valid(pid) if self.probe.is_alive(pid) => Tracked::Live(pid),
            PidRecord::Valid(pid) => Tracked::Stale(StalePid::Dead(pid)),
            PidRecord::Invalid(content) => Tracked::Stale(StalePid::Invalid(content)),
        }
    }

    fn discard_pid_file(&self) {
        if let Err(e) = self.pid_file.remove() {
            tracing::warn!(
                path = %self.pid_file.path().display(),
                error = %e,
                "Failed to remove PID file"
            );
        }
    }

    /// Launch the application unless a live instance is already recorded.
    ///
    /// The artifact must already exist; building it is the caller's concern.
    #[tracing::instrument(skip(self))]
    pub async fn start(&self) -> Result<StartOutcome> {
        match self.tracked() {
            Tracked::Live(pid) => {
                tracing::warn!(pid, "Application already running");
                return Ok(StartOutcome::AlreadyRunning { pid });
            }
            Tracked::Stale(stale) => {
                tracing::warn!(%stale, "Discarding stale PID file before start");
                self.discard_pid_file();
            }
            Tracked::Nothing => {}
        }

        tracing::info!(
            command = %self.process.command(),
            args = ?self.process.args(),
            "Starting application"
        );
        let pid = self.process.spawn()?;

        if let Err(e) = self.pid_file.write(pid) {
            tracing::error!(pid, error = %e, "Failed to record PID, killing application");
            let _ = self.probe.terminate(pid, true);
            return Err(e);
        }

        sleep(self.config.timing.start_grace()).await;

        if self.probe.is_alive(pid) {
            tracing::info!(pid, "Application started successfully");
            Ok(StartOutcome::Started { pid })
        } else {
            tracing::error!(pid, "Application exited during startup");
            self.discard_pid_file();
            Err(Error::StartFailure {
                reason: format!("process {} exited during startup", pid),
                log_path: self.process.log_path().to_path_buf(),
            })
        }
    }

    /// Stop the application: graceful signal, bounded wait, forceful signal.
    ///
    /// Always succeeds; problems are logged and absorbed.
    #[tracing::instrument(skip(self))]
    pub async fn stop(&self) -> StopOutcome {
        let pid = match self.tracked() {
            Tracked::Nothing => {
                tracing::debug!("No PID file, nothing to stop");
                return StopOutcome::NotRunning;
            }
            Tracked::Stale(stale) => {
                tracing::warn!(%stale, "Removing stale PID file");
                self.discard_pid_file();
                return StopOutcome::Stale(stale);
            }
            Tracked::Live(pid) => pid,
        };

        tracing::info!(pid, "Sending graceful termination signal");
        if let Err(e) = self.probe.terminate(pid, false) {
            tracing::warn!(pid, error = %e, "Graceful termination signal failed");
        }

        let outcome = if self.wait_for_exit(pid).await {
            tracing::info!(pid, "Application stopped");
            StopOutcome::Terminated { pid }
        } else {
            tracing::warn!(
                pid,
                timeout_ms = self.config.timing.stop_timeout_ms,
                "Application did not stop in time, sending forceful signal"
            );
            if let Err(e) = self.probe.terminate(pid, true) {
                tracing::warn!(pid, error = %e, "Forceful termination signal failed");
            }
            StopOutcome::Killed { pid }
        };

        self.discard_pid_file();
        outcome
    }

    /// Polls liveness until the process is gone or the stop timeout elapses.
    async fn wait_for_exit(&self, pid: u32) -> bool {
        let timing = &self.config.timing;
        let deadline = Instant::now() + timing.stop_timeout();

        loop {
            if !self.probe.is_alive(pid) {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            sleep(timing.poll_interval()).await;
        }
    }

    /// Stop, pause, start.
    #[tracing::instrument(skip(self))]
    pub async fn restart(&self) -> Result<RestartOutcome> {
        let stopped = self.stop().await;
        sleep(self.config.timing.restart_pause()).await;
        let started = self.start().await?;

        Ok(RestartOutcome { stopped, started })
    }

    /// Report liveness plus the health endpoint's verdict.
    #[tracing::instrument(skip(self))]
    pub async fn status(&self) -> StatusReport {
        match self.tracked() {
            Tracked::Nothing => StatusReport::NotRunning,
            Tracked::Stale(stale) => {
                tracing::warn!(%stale, "Removing stale PID file");
                self.discard_pid_file();
                StatusReport::Stale(stale)
            }
            Tracked::Live(pid) => {
                let health = self.health.check().await;
                StatusReport::Running { pid, health }
            }
        }
    }

    /// The last lines of the application log.
    #[tracing::instrument(skip(self))]
    pub fn logs(&self) -> Result<LogTail> {
        let path = self.process.log_path();
        if !path.exists() {
            return Ok(LogTail::Missing(path.to_path_buf()));
        }

        Ok(LogTail::Lines(tail_log(path, self.config.log_tail_lines)?))
    }
}
