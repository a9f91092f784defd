/*!
 # App Runner

 A Rust library and CLI for managing the local development lifecycle of a
 separately-built server application.

 ## Overview

 App Runner provides functionality to:
 - Check that the runtime and build tool are installed
 - Clean, compile, test and package the project through its build tool
 - Start the packaged application as a detached background process
 - Stop it gracefully, escalating to a forceful signal after a timeout
 - Report liveness and HTTP health, and tail the application log

 The running application is identified only by a PID file, so every
 invocation re-derives state from the file system and the OS.

 ## Basic Usage

 ```no_run
 use app_runner::{AppRunner, Result};
 use app_runner::config::Config;

 #[tokio::main]
 async fn main() -> Result<()> {
     let runner = AppRunner::new(Config::load()?)?;

     // Builds the artifact first if it is missing
     let started = runner.start().await?;
     println!("{}", started);

     println!("{}", runner.status().await);

     println!("{}", runner.stop().await);
     Ok(())
 }
 ```

 ## Features

 - **PID file tracking**: stale or malformed PID files are detected and removed
 - **Bounded shutdown**: configurable timeout and poll interval before SIGKILL
 - **Health probing**: single GET against the application's health endpoint
 - **Configuration**: JSON config file with defaults for every field
 - **Interrupt hook**: a best-effort stop when the tool itself is interrupted

 ## License

 This project is licensed under the terms in the LICENSE file.
*/

pub mod cli;
pub mod config;
pub mod error;
pub mod server;
pub mod shutdown;
pub mod toolchain;

pub use config::Config;
pub use error::{Error, Result};
pub use server::{LifecycleManager, StartOutcome, StatusReport, StopOutcome};

use server::{
    HealthProbe, HttpHealthProbe, LogTail, OsProbe, ProcessProbe, RestartOutcome,
};
use std::sync::Arc;
use toolchain::{BuildStep, PrerequisiteReport, Toolchain};

/// Build, run and monitor the configured application
///
/// This struct is the main entry point: it composes the [`Toolchain`] and the
/// [`LifecycleManager`] into the operations exposed on the command line.
/// All public methods are instrumented with `tracing` spans.
pub struct AppRunner<P = OsProbe, H = HttpHealthProbe> {
    /// Configuration
    config: Arc<Config>,
    /// Build tool and prerequisite checks
    toolchain: Toolchain,
    /// PID-file-backed process lifecycle
    manager: LifecycleManager<P, H>,
}

impl AppRunner {
    /// Create a new runner backed by OS signals and the HTTP health endpoint
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(config), fields(project_root = %config.project_root.display()))]
    pub fn new(config: Config) -> Result<Self> {
        let health = HttpHealthProbe::from_config(&config);
        Self::with_probes(config, OsProbe, health)
    }
}

impl<P: ProcessProbe, H: HealthProbe> AppRunner<P, H> {
    /// Create a new runner with explicit probes
    ///
    /// The configuration is validated first.
    pub fn with_probes(config: Config, probe: P, health: H) -> Result<Self> {
        config::validate_config(&config)?;
        tracing::info!("Creating new AppRunner");

        let config = Arc::new(config);
        Ok(Self {
            toolchain: Toolchain::new(Arc::clone(&config)),
            manager: LifecycleManager::with_probes(Arc::clone(&config), probe, health),
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    pub fn manager(&self) -> &LifecycleManager<P, H> {
        &self.manager
    }

    /// Check the working directory and the installed tools
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(self))]
    pub async fn prepare(&self) -> Result<PrerequisiteReport> {
        self.toolchain.check_directory()?;
        let report = self.toolchain.check_prerequisites().await?;
        for warning in &report.warnings {
            tracing::warn!("{}", warning);
        }
        Ok(report)
    }

    /// Remove build output
    #[tracing::instrument(skip(self))]
    pub async fn clean(&self) -> Result<()> {
        self.toolchain.run(BuildStep::Clean).await
    }

    /// Compile and package the application
    #[tracing::instrument(skip(self))]
    pub async fn build(&self) -> Result<()> {
        self.toolchain.run(BuildStep::Compile).await?;
        self.toolchain.run(BuildStep::Package).await
    }

    /// Run the test suite
    #[tracing::instrument(skip(self))]
    pub async fn test(&self) -> Result<()> {
        self.toolchain.run(BuildStep::Test).await
    }

    /// Build the artifact if it does not exist yet
    ///
    /// Returns `true` if a build ran.
    #[tracing::instrument(skip(self))]
    pub async fn ensure_artifact(&self) -> Result<bool> {
        let artifact = self.config.artifact_path();
        if artifact.is_file() {
            return Ok(false);
        }

        tracing::info!(artifact = %artifact.display(), "Artifact missing, building");
        self.build().await?;

        if artifact.is_file() {
            Ok(true)
        } else {
            Err(Error::ArtifactMissing(artifact))
        }
    }

    /// Start the application, building it first if needed
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(self))]
    pub async fn start(&self) -> Result<StartOutcome> {
        self.ensure_artifact().await?;
        self.manager.start().await
    }

    /// Stop the application
    #[tracing::instrument(skip(self))]
    pub async fn stop(&self) -> StopOutcome {
        self.manager.stop().await
    }

    /// Stop, then start again, building first if the artifact is missing
    #[tracing::instrument(skip(self))]
    pub async fn restart(&self) -> Result<RestartOutcome> {
        self.ensure_artifact().await?;
        self.manager.restart().await
    }

    /// Report liveness and health
    #[tracing::instrument(skip(self))]
    pub async fn status(&self) -> StatusReport {
        self.manager.status().await
    }

    /// Tail the application log
    pub fn logs(&self) -> Result<LogTail> {
        self.manager.logs()
    }

    /// Clean, compile, test, package, then start
    ///
    /// This method is instrumented with `tracing`.
    #[tracing::instrument(skip(self))]
    pub async fn all(&self) -> Result<StartOutcome> {
        tracing::info!("Running full pipeline");
        for step in [
            BuildStep::Clean,
            BuildStep::Compile,
            BuildStep::Test,
            BuildStep::Package,
        ] {
            self.toolchain.run(step).await?;
        }
        self.start().await
    }
}
