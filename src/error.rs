/// Error handling module for App Runner.
///
/// This module defines the error types used throughout the library.
/// Only failures that abort an invocation are errors: stale PID files, a
/// second `start` against a live process and an unreachable health endpoint
/// are recovered locally and reported through the outcome types in
/// [`crate::server`].
///
/// # Example
///
/// ```
/// use app_runner::error::{Error, Result};
///
/// fn handle_error(result: Result<()>) {
///     match result {
///         Ok(_) => println!("Operation succeeded"),
///         Err(Error::PrerequisiteMissing { tool, hint }) => {
///             println!("'{}' is not installed ({})", tool, hint)
///         }
///         Err(Error::StartFailure { log_path, .. }) => {
///             println!("Application died, see {}", log_path.display())
///         }
///         Err(e) => println!("Other error: {}", e),
///     }
/// }
/// ```
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the app-runner library.
#[derive(Error, Debug)]
pub enum Error {
    /// A required tool (runtime or build tool) is not installed.
    ///
    /// This error occurs when:
    /// - The tool is not on `PATH`
    /// - The tool exists but its version probe exits with a failure
    #[error("Required tool '{tool}' not found. {hint}")]
    PrerequisiteMissing {
        /// Command that could not be executed
        tool: String,
        /// Installation guidance shown to the operator
        hint: String,
    },

    /// The project manifest was not found, so the tool is running from the
    /// wrong directory.
    #[error("Manifest not found at {}; run from the project root", manifest.display())]
    WrongDirectory {
        /// Expected manifest location
        manifest: PathBuf,
    },

    /// A clean or compile invocation of the build tool failed.
    #[error("Build step '{step}' failed (exit code {})", display_code(*code))]
    BuildFailure {
        /// Which build step failed
        step: String,
        /// Exit code of the build tool, if it exited normally
        code: Option<i32>,
    },

    /// The test invocation of the build tool failed.
    #[error("Tests failed (exit code {})", display_code(*code))]
    TestFailure {
        /// Exit code of the build tool, if it exited normally
        code: Option<i32>,
    },

    /// The package invocation of the build tool failed.
    #[error("Packaging failed (exit code {})", display_code(*code))]
    PackageFailure {
        /// Exit code of the build tool, if it exited normally
        code: Option<i32>,
    },

    /// The build succeeded but did not produce the expected artifact.
    #[error("Build artifact not found at {}", .0.display())]
    ArtifactMissing(PathBuf),

    /// The application could not be launched or exited during the start
    /// grace window.
    #[error("Application failed to start: {reason}. Check the logs at {}", log_path.display())]
    StartFailure {
        /// What went wrong
        reason: String,
        /// Log file holding the application's output
        log_path: PathBuf,
    },

    /// Failed to parse configuration from a file or string.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    /// Configuration parsed but contains invalid values.
    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    /// Delivering a signal to the managed process failed.
    #[error("Signal error: {0}")]
    Signal(String),

    /// Filesystem or process-spawning failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_code(code: Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

/// Result type for app-runner operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_failure_messages() {
        let err = Error::BuildFailure {
            step: "compile".to_string(),
            code: Some(2),
        };
        assert_eq!(err.to_string(), "Build step 'compile' failed (exit code 2)");

        let err = Error::TestFailure { code: None };
        assert_eq!(err.to_string(), "Tests failed (exit code none)");
    }

    #[test]
    fn test_start_failure_points_at_log() {
        let err = Error::StartFailure {
            reason: "process exited".to_string(),
            log_path: PathBuf::from("target/app.log"),
        };
        assert!(err.to_string().contains("target/app.log"));
    }
}
