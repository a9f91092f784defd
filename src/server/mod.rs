/// Server management module for App Runner.
///
/// This module handles the lifecycle of the one application instance the
/// tool controls. Identity lives in a PID file; liveness and termination go
/// through a [`ProcessProbe`]; health goes through a [`HealthProbe`].
/// All public operations of [`LifecycleManager`] are instrumented with
/// `tracing` spans.
///
/// # Components
///
/// * `lifecycle` - Start, stop, restart, status and logs over the PID file
/// * `monitor` - HTTP health probing of the running application
/// * `pidfile` - Reading and writing the PID file
/// * `probe` - OS-backed liveness checks and termination signals
/// * `process` - Launching the application as a detached process
/// * `logs` - Tailing the application log
///
/// # Examples
///
/// Querying the managed process:
///
/// ```no_run
/// use app_runner::config::Config;
/// use app_runner::server::{LifecycleManager, StatusReport};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() {
///     let manager = LifecycleManager::new(Arc::new(Config::default()));
///
///     match manager.status().await {
///         StatusReport::Running { pid, health } => println!("PID {}: {}", pid, health),
///         other => println!("{}", other),
///     }
/// }
/// ```
///
/// Stopping it with a shorter grace period:
///
/// ```no_run
/// use app_runner::config::{Config, TimingConfig};
/// use app_runner::server::LifecycleManager;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() {
///     let config = Config {
///         timing: TimingConfig {
///             stop_timeout_ms: 5_000,
///             poll_interval_ms: 250,
///             ..TimingConfig::default()
///         },
///         ..Config::default()
///     };
///     let manager = LifecycleManager::new(Arc::new(config));
///     println!("{}", manager.stop().await);
/// }
/// ```
pub mod lifecycle;
pub mod logs;
pub mod monitor;
pub mod pidfile;
pub mod probe;
mod process;

pub use lifecycle::{
    LifecycleManager, RestartOutcome, StalePid, StartOutcome, StatusReport, StopOutcome,
};
pub use logs::{LogTail, tail_log};
pub use monitor::{HealthProbe, HttpHealthProbe, ServerHealth};
pub use pidfile::{PidFile, PidRecord};
pub use probe::{OsProbe, ProcessProbe};
pub use process::ServerProcess;
