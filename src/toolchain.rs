//! External tooling: prerequisite checks and build tool invocations.
//!
//! The build tool and the runtime are black boxes. This module only checks
//! that they can be executed, reads the runtime's major version, and runs
//! the four fixed build command forms from the project root.

use crate::config::{BuildToolConfig, Config};
use crate::error::{Error, Result};
use std::fmt;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;

/// One of the fixed build tool invocations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    /// Remove build output
    Clean,
    /// Compile main and test sources
    Compile,
    /// Produce the artifact without running tests
    Package,
    /// Run the test suite
    Test,
}

impl BuildStep {
    pub fn name(&self) -> &'static str {
        match self {
            BuildStep::Clean => "clean",
            BuildStep::Compile => "compile",
            BuildStep::Package => "package",
            BuildStep::Test => "test",
        }
    }

    pub fn args<'a>(&self, tool: &'a BuildToolConfig) -> &'a [String] {
        match self {
            BuildStep::Clean => &tool.clean_args,
            BuildStep::Compile => &tool.compile_args,
            BuildStep::Package => &tool.package_args,
            BuildStep::Test => &tool.test_args,
        }
    }

    fn failure(&self, code: Option<i32>) -> Error {
        match self {
            BuildStep::Clean | BuildStep::Compile => Error::BuildFailure {
                step: self.name().to_string(),
                code,
            },
            BuildStep::Package => Error::PackageFailure { code },
            BuildStep::Test => Error::TestFailure { code },
        }
    }
}

impl fmt::Display for BuildStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of the prerequisite check. Warnings never abort an invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrerequisiteReport {
    /// Major version reported by the runtime, if it could be parsed
    pub runtime_major_version: Option<u32>,
    /// Human-readable warnings for the operator
    pub warnings: Vec<String>,
}

/// Runs prerequisite checks and build steps for one project.
#[derive(Debug, Clone)]
pub struct Toolchain {
    config: Arc<Config>,
}

impl Toolchain {
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Fails with [`Error::WrongDirectory`] unless the manifest exists.
    pub fn check_directory(&self) -> Result<()> {
        let manifest = self.config.manifest_path();
        if manifest.is_file() {
            Ok(())
        } else {
            Err(Error::WrongDirectory { manifest })
        }
    }

    /// Verifies the runtime and build tool can be executed.
    ///
    /// A runtime older than the configured minimum only produces a warning.
    #[tracing::instrument(skip(self))]
    pub async fn check_prerequisites(&self) -> Result<PrerequisiteReport> {
        let runtime = &self.config.runtime;
        let version_output =
            probe_tool(&runtime.command, &runtime.version_args, &runtime.install_hint).await?;

        let tool = &self.config.build_tool;
        probe_tool(&tool.command, &tool.version_args, &tool.install_hint).await?;

        let mut report = PrerequisiteReport::default();
        match parse_major_version(&version_output) {
            Some(major) => {
                tracing::debug!(major, "Detected runtime version");
                report.runtime_major_version = Some(major);
                if major < runtime.min_major_version {
                    report.warnings.push(format!(
                        "{} {} detected; version {} or newer is recommended",
                        runtime.command, major, runtime.min_major_version
                    ));
                }
            }
            None => report.warnings.push(format!(
                "Could not determine the {} version",
                runtime.command
            )),
        }

        Ok(report)
    }

    /// Runs one build step with inherited output.
    ///
    /// The child is killed if the returned future is dropped.
    #[tracing::instrument(skip(self), fields(step = %step))]
    pub async fn run(&self, step: BuildStep) -> Result<()> {
        let tool = &self.config.build_tool;
        let args = step.args(tool);
        tracing::info!(command = %tool.command, ?args, "Running build step");

        let status = Command::new(&tool.command)
            .args(args)
            .current_dir(&self.config.project_root)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to launch build tool");
                Error::PrerequisiteMissing {
                    tool: tool.command.clone(),
                    hint: tool.install_hint.clone(),
                }
            })?;

        if status.success() {
            tracing::info!("Build step finished");
            Ok(())
        } else {
            tracing::error!(code = ?status.code(), "Build step failed");
            Err(step.failure(status.code()))
        }
    }
}

/// Executes `command args...` and returns its combined output on success.
async fn probe_tool(command: &str, args: &[String], hint: &str) -> Result<String> {
    let missing = || Error::PrerequisiteMissing {
        tool: command.to_string(),
        hint: hint.to_string(),
    };

    let output = Command::new(command)
        .args(args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| {
            tracing::debug!(command, error = %e, "Tool probe could not execute");
            missing()
        })?;

    if !output.status.success() {
        tracing::debug!(command, code = ?output.status.code(), "Tool probe failed");
        return Err(missing());
    }

    // Some runtimes print their version on stderr
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    Ok(text)
}

/// Extracts the major version from runtime version output.
///
/// Understands both the modern scheme (`17.0.2`, `21`) and the legacy
/// `1.x` scheme, where the second component is the major version.
///
/// ```
/// use app_runner::toolchain::parse_major_version;
///
/// assert_eq!(parse_major_version(r#"openjdk version "17.0.2" 2022-01-18"#), Some(17));
/// assert_eq!(parse_major_version(r#"java version "1.8.0_292""#), Some(8));
/// assert_eq!(parse_major_version("no digits here"), None);
/// ```
pub fn parse_major_version(output: &str) -> Option<u32> {
    let token = output
        .split(|c: char| c.is_whitespace() || c == '"')
        .find(|token| token.starts_with(|c: char| c.is_ascii_digit()))?;

    let mut parts = token.split(|c: char| !c.is_ascii_digit());
    let first: u32 = parts.next()?.parse().ok()?;
    if first == 1 {
        parts.next()?.parse().ok()
    } else {
        Some(first)
    }
}
