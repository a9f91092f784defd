// src/server/process.rs
use crate::config::Config;
use crate::error::{Error, Result};
use std::fs::{self, File};
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Launch description of the managed application.
///
/// The application runs as `<command> <args...> <artifact>` from the project
/// root, detached into its own process group so a terminal interrupt aimed at
/// the tool does not reach it directly.
#[derive(Debug, Clone)]
pub struct ServerProcess {
    /// Runtime executable
    command: String,
    /// Runtime arguments followed by the artifact
    args: Vec<String>,
    /// Working directory of the application
    working_dir: PathBuf,
    /// File receiving stdout and stderr
    log_path: PathBuf,
}

impl ServerProcess {
    /// Create a launch description from configuration
    pub fn from_config(config: &Config) -> Self {
        let mut args = config.runtime.args.clone();
        // Relative artifact paths stay relative: the child starts in the
        // project root.
        args.push(config.artifact.to_string_lossy().into_owned());

        Self {
            command: config.runtime.command.clone(),
            args,
            working_dir: config.project_root.clone(),
            log_path: config.log_file_path(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Launch the application and return its process identifier.
    ///
    /// The log file is truncated. The child handle is released immediately:
    /// the process outlives this invocation and is tracked through the PID
    /// file only.
    pub fn spawn(&self) -> Result<u32> {
        if let Some(parent) = self.log_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let stdout = File::create(&self.log_path)?;
        let stderr = stdout.try_clone()?;

        let child = Command::new(&self.command)
            .args(&self.args)
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .process_group(0)
            .spawn()
            .map_err(|e| Error::StartFailure {
                reason: format!("could not launch '{}': {}", self.command, e),
                log_path: self.log_path.clone(),
            })?;

        let pid = child.id();
        tracing::debug!(pid, command = %self.command, "Spawned application process");
        Ok(pid)
    }
}
