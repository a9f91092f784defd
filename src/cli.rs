//! Command line surface.
//!
//! Parses the subcommand, runs it against an [`AppRunner`] under the
//! interrupt hook, and prints outcomes for the operator. Diagnostics go
//! through `tracing`; the lines printed here are the tool's actual output.

use crate::AppRunner;
use crate::error::Result;
use crate::server::{HealthProbe, LogTail, ProcessProbe, StartOutcome, StatusReport, StopOutcome};
use crate::shutdown::{self, Completion};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use std::ffi::OsString;
use std::process::ExitCode;

pub const SUCCESS_EXIT_CODE: u8 = 0;
pub const FAILURE_EXIT_CODE: u8 = 1;
/// Exit status used when SIGINT or SIGTERM interrupts a command.
pub const INTERRUPTED_EXIT_CODE: u8 = 130;

#[derive(Parser, Debug)]
#[command(name = "app-runner", version)]
#[command(about = "Build, run and monitor a local server application", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Compile and package the application
    Build,
    /// Run the test suite
    Test,
    /// Start the application in the background (builds it if needed)
    Start,
    /// Stop the application
    Stop,
    /// Stop and start the application
    Restart,
    /// Show whether the application is running and healthy
    Status,
    /// Show the last lines of the application log
    Logs,
    /// Remove build output
    Clean,
    /// Clean, build, test and start
    All,
}

impl Command {
    /// Commands that invoke the runtime or build tool
    pub fn needs_prerequisites(&self) -> bool {
        matches!(
            self,
            Command::Build
                | Command::Test
                | Command::Start
                | Command::Restart
                | Command::Clean
                | Command::All
        )
    }
}

/// Parses the command line.
///
/// Returns the exit status directly when there is nothing to run: help,
/// version and a bare invocation exit 0, any other parse error exits 1.
pub fn parse<I, T>(args: I) -> std::result::Result<Command, u8>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(Cli {
            command: Some(command),
        }) => Ok(command),
        Ok(Cli { command: None }) => {
            let _ = Cli::command().print_help();
            println!();
            Err(SUCCESS_EXIT_CODE)
        }
        Err(err) => {
            let _ = err.print();
            match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => Err(SUCCESS_EXIT_CODE),
                _ => Err(FAILURE_EXIT_CODE),
            }
        }
    }
}

/// Runs `command` until it finishes or SIGINT/SIGTERM arrives.
pub async fn run<P: ProcessProbe, H: HealthProbe>(
    runner: &AppRunner<P, H>,
    command: Command,
) -> ExitCode {
    ExitCode::from(run_until(runner, command, shutdown::interrupt_signal()).await)
}

/// Runs `command` until it finishes or `interrupt` resolves, and returns
/// the exit status.
///
/// An interrupt drops the command and makes a best-effort attempt to stop
/// the managed application before returning [`INTERRUPTED_EXIT_CODE`].
pub async fn run_until<P, H, S>(runner: &AppRunner<P, H>, command: Command, interrupt: S) -> u8
where
    P: ProcessProbe,
    H: HealthProbe,
    S: Future<Output = ()>,
{
    let completion = shutdown::run_with_hook(
        execute(runner, command),
        interrupt,
        move || async move {
            eprintln!("Interrupted, stopping application...");
            print_stop(&runner.stop().await);
        },
    )
    .await;

    match completion {
        Completion::Finished(Ok(())) => SUCCESS_EXIT_CODE,
        Completion::Finished(Err(e)) => {
            eprintln!("Error: {}", e);
            FAILURE_EXIT_CODE
        }
        Completion::Interrupted => INTERRUPTED_EXIT_CODE,
    }
}

/// Executes one command and prints its outcome.
#[tracing::instrument(skip(runner))]
pub async fn execute<P: ProcessProbe, H: HealthProbe>(
    runner: &AppRunner<P, H>,
    command: Command,
) -> Result<()> {
    if command.needs_prerequisites() {
        let report = runner.prepare().await?;
        for warning in &report.warnings {
            eprintln!("Warning: {}", warning);
        }
    }

    match command {
        Command::Build => {
            println!("Building application...");
            runner.build().await?;
            println!("Build completed successfully");
        }
        Command::Test => {
            println!("Running tests...");
            runner.test().await?;
            println!("All tests passed");
        }
        Command::Clean => {
            println!("Cleaning build output...");
            runner.clean().await?;
            println!("Clean completed");
        }
        Command::Start => {
            let outcome = runner.start().await?;
            print_start(runner, &outcome);
        }
        Command::Stop => print_stop(&runner.stop().await),
        Command::Restart => {
            let outcome = runner.restart().await?;
            print_stop(&outcome.stopped);
            print_start(runner, &outcome.started);
        }
        Command::Status => print_status(runner, &runner.status().await),
        Command::Logs => print_logs(&runner.logs()?),
        Command::All => {
            let outcome = runner.all().await?;
            print_start(runner, &outcome);
        }
    }

    Ok(())
}

fn print_start<P: ProcessProbe, H: HealthProbe>(runner: &AppRunner<P, H>, outcome: &StartOutcome) {
    match outcome {
        StartOutcome::Started { .. } => {
            let config = runner.config();
            println!("{}", outcome);
            println!("Logs:   {}", config.log_file_path().display());
            println!("Health: {}", config.health_url());
        }
        StartOutcome::AlreadyRunning { .. } => eprintln!("Warning: {}", outcome),
    }
}

fn print_stop(outcome: &StopOutcome) {
    match outcome {
        StopOutcome::Stale(_) | StopOutcome::Killed { .. } => eprintln!("Warning: {}", outcome),
        StopOutcome::NotRunning | StopOutcome::Terminated { .. } => println!("{}", outcome),
    }
}

fn print_status<P: ProcessProbe, H: HealthProbe>(runner: &AppRunner<P, H>, report: &StatusReport) {
    match report {
        StatusReport::Running { pid, health } => {
            println!("Application is running (PID {})", pid);
            println!("Health: {} ({})", health, runner.config().health_url());
        }
        StatusReport::Stale(_) => eprintln!("Warning: {}", report),
        StatusReport::NotRunning => println!("{}", report),
    }
}

fn print_logs(tail: &LogTail) {
    match tail {
        LogTail::Missing(path) => println!("No log file found at {}", path.display()),
        LogTail::Lines(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["app-runner", "restart"]).unwrap();
        assert_eq!(cli.command, Some(Command::Restart));

        let cli = Cli::try_parse_from(["app-runner"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        let err = Cli::try_parse_from(["app-runner", "deploy"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn test_help_subcommand() {
        let err = Cli::try_parse_from(["app-runner", "help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_parse_exit_statuses() {
        assert_eq!(parse(["app-runner", "stop"]), Ok(Command::Stop));
        assert_eq!(parse(["app-runner", "all"]), Ok(Command::All));
        // Bare invocation prints help
        assert_eq!(parse(["app-runner"]), Err(SUCCESS_EXIT_CODE));
        assert_eq!(parse(["app-runner", "help"]), Err(SUCCESS_EXIT_CODE));
        assert_eq!(parse(["app-runner", "--version"]), Err(SUCCESS_EXIT_CODE));
        assert_eq!(parse(["app-runner", "deploy"]), Err(FAILURE_EXIT_CODE));
        assert_eq!(parse(["app-runner", "stop", "now"]), Err(FAILURE_EXIT_CODE));
    }

    #[test]
    fn test_command_classification() {
        assert!(Command::Start.needs_prerequisites());
        assert!(Command::All.needs_prerequisites());
        assert!(!Command::Stop.needs_prerequisites());
        assert!(!Command::Status.needs_prerequisites());
        assert!(!Command::Logs.needs_prerequisites());
    }
}
