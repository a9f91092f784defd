//! Configuration module for App Runner.
//!
//! This module holds the paths, port, tool invocations and timings the
//! lifecycle manager and toolchain run with. Configuration is read from a
//! JSON file or built programmatically; any field left out keeps its
//! default.
//!
//! # Examples
//!
//! Loading a configuration from a file:
//!
//! ```no_run
//! use app_runner::config::Config;
//!
//! let config = Config::from_file("app-runner.json").unwrap();
//! println!("Managing {} on port {}", config.artifact.display(), config.port);
//! ```
//!
//! Creating a configuration programmatically:
//!
//! ```
//! use app_runner::{AppRunner, config::{Config, TimingConfig}};
//! use std::path::PathBuf;
//!
//! let config = Config {
//!     project_root: PathBuf::from("/tmp/my-service"),
//!     port: 9090,
//!     timing: TimingConfig {
//!         stop_timeout_ms: 5_000,
//!         ..TimingConfig::default()
//!     },
//!     ..Config::default()
//! };
//! let runner = AppRunner::new(config).unwrap();
//! ```
mod parser;
pub mod validator;

pub use parser::{
    BuildToolConfig, CONFIG_ENV_VAR, Config, DEFAULT_CONFIG_FILE, RuntimeConfig, TimingConfig,
};
pub use validator::validate_config;
