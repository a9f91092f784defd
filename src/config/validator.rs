use crate::config::{BuildToolConfig, Config, RuntimeConfig, TimingConfig};
use crate::error::{Error, Result};

/// Validates the build tool invocation
pub fn validate_build_tool(config: &BuildToolConfig) -> Result<()> {
    if config.command.trim().is_empty() {
        return Err(Error::ConfigInvalid("Build tool command is empty".to_string()));
    }

    Ok(())
}

/// Validates the runtime invocation
pub fn validate_runtime(config: &RuntimeConfig) -> Result<()> {
    if config.command.trim().is_empty() {
        return Err(Error::ConfigInvalid("Runtime command is empty".to_string()));
    }

    Ok(())
}

/// Validates lifecycle timings
pub fn validate_timing(config: &TimingConfig) -> Result<()> {
    if config.poll_interval_ms == 0 {
        return Err(Error::ConfigInvalid(
            "Poll interval must be greater than zero".to_string(),
        ));
    }

    if config.poll_interval_ms > config.stop_timeout_ms {
        return Err(Error::ConfigInvalid(format!(
            "Poll interval ({}ms) exceeds stop timeout ({}ms)",
            config.poll_interval_ms, config.stop_timeout_ms
        )));
    }

    Ok(())
}

/// Full configuration validation
pub fn validate_config(config: &Config) -> Result<()> {
    if config.port == 0 {
        return Err(Error::ConfigInvalid("Port must not be 0".to_string()));
    }

    if config.manifest.trim().is_empty() {
        return Err(Error::ConfigInvalid("Manifest name is empty".to_string()));
    }

    if config.log_tail_lines == 0 {
        return Err(Error::ConfigInvalid(
            "Log tail length must be greater than zero".to_string(),
        ));
    }

    validate_build_tool(&config.build_tool)?;
    validate_runtime(&config.runtime)?;
    validate_timing(&config.timing)?;

    Ok(())
}
