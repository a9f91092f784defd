use anyhow::Context;
use app_runner::AppRunner;
use app_runner::cli;
use app_runner::config::Config;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let command = match cli::parse(std::env::args_os()) {
        Ok(command) => command,
        Err(code) => return ExitCode::from(code),
    };

    let runner = match build_runner() {
        Ok(runner) => runner,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            return ExitCode::from(cli::FAILURE_EXIT_CODE);
        }
    };

    cli::run(&runner, command).await
}

fn build_runner() -> anyhow::Result<AppRunner> {
    let config = Config::load().context("Failed to load configuration")?;
    AppRunner::new(config).context("Invalid configuration")
}
