use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "APP_RUNNER_CONFIG";

/// Configuration file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "app-runner.json";

/// How to invoke the build tool.
///
/// Each field holds the arguments of one of the four fixed command forms.
///
/// # Examples
///
/// ```
/// use app_runner::config::BuildToolConfig;
///
/// let tool = BuildToolConfig::default();
/// assert_eq!(tool.command, "mvn");
/// assert_eq!(tool.package_args, vec!["package", "-DskipTests"]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildToolConfig {
    /// Executable of the build tool.
    pub command: String,
    /// Arguments used to probe that the tool is installed.
    pub version_args: Vec<String>,
    /// Arguments for the clean step.
    pub clean_args: Vec<String>,
    /// Arguments for the compile step (main and test sources).
    pub compile_args: Vec<String>,
    /// Arguments for the package step.
    pub package_args: Vec<String>,
    /// Arguments for the test step.
    pub test_args: Vec<String>,
    /// Guidance printed when the tool is missing.
    pub install_hint: String,
}

impl Default for BuildToolConfig {
    fn default() -> Self {
        Self {
            command: "mvn".to_string(),
            version_args: strings(&["--version"]),
            clean_args: strings(&["clean"]),
            compile_args: strings(&["compile", "test-compile"]),
            package_args: strings(&["package", "-DskipTests"]),
            test_args: strings(&["test"]),
            install_hint: "Install Maven from https://maven.apache.org/download.cgi".to_string(),
        }
    }
}

/// How to run the packaged artifact.
///
/// The application is launched as `<command> <args...> <artifact>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuntimeConfig {
    /// Executable of the runtime.
    pub command: String,
    /// Arguments placed before the artifact path.
    pub args: Vec<String>,
    /// Arguments that make the runtime print its version.
    pub version_args: Vec<String>,
    /// Lowest major version that does not trigger a warning.
    pub min_major_version: u32,
    /// Guidance printed when the runtime is missing.
    pub install_hint: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command: "java".to_string(),
            args: strings(&["-jar"]),
            version_args: strings(&["-version"]),
            min_major_version: 17,
            install_hint: "Install a JDK (17 or newer) and make sure 'java' is on PATH".to_string(),
        }
    }
}

/// Delays and timeouts of the lifecycle manager, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimingConfig {
    /// Pause after launching before liveness is re-checked.
    pub start_grace_ms: u64,
    /// Time granted to a graceful shutdown before escalating.
    pub stop_timeout_ms: u64,
    /// Interval between liveness polls while waiting for shutdown.
    pub poll_interval_ms: u64,
    /// Pause between stop and start during a restart.
    pub restart_pause_ms: u64,
    /// Request timeout of the health probe.
    pub health_timeout_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            start_grace_ms: 3_000,
            stop_timeout_ms: 30_000,
            poll_interval_ms: 1_000,
            restart_pause_ms: 2_000,
            health_timeout_ms: 5_000,
        }
    }
}

impl TimingConfig {
    pub fn start_grace(&self) -> Duration {
        Duration::from_millis(self.start_grace_ms)
    }

    pub fn stop_timeout(&self) -> Duration {
        Duration::from_millis(self.stop_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn restart_pause(&self) -> Duration {
        Duration::from_millis(self.restart_pause_ms)
    }

    pub fn health_timeout(&self) -> Duration {
        Duration::from_millis(self.health_timeout_ms)
    }
}

/// Main configuration for the App Runner.
///
/// Every path except `projectRoot` is resolved relative to the project root
/// unless it is absolute. Fields missing from a configuration file keep
/// their defaults.
///
/// # JSON Schema
///
/// ```json
/// {
///   "projectRoot": ".",
///   "manifest": "pom.xml",
///   "artifact": "target/app.jar",
///   "pidFile": "target/app.pid",
///   "logFile": "target/app.log",
///   "port": 8080,
///   "healthPath": "/actuator/health",
///   "logTailLines": 50,
///   "buildTool": { "command": "mvn" },
///   "runtime": { "command": "java", "args": ["-jar"], "minMajorVersion": 17 },
///   "timing": { "stopTimeoutMs": 30000, "pollIntervalMs": 1000 }
/// }
/// ```
///
/// # Examples
///
/// ```
/// use app_runner::config::Config;
///
/// let config = Config::parse_from_str(r#"{ "port": 9090 }"#).unwrap();
/// assert_eq!(config.port, 9090);
/// assert_eq!(config.health_url(), "http://localhost:9090/actuator/health");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Directory holding the project manifest.
    pub project_root: PathBuf,
    /// Manifest file name used to validate the working directory.
    pub manifest: String,
    /// Packaged artifact launched by `start`.
    pub artifact: PathBuf,
    /// File recording the identifier of the managed process.
    pub pid_file: PathBuf,
    /// File receiving the managed process's combined output.
    pub log_file: PathBuf,
    /// Port the application listens on.
    pub port: u16,
    /// Path of the health endpoint.
    pub health_path: String,
    /// Number of lines shown by `logs`.
    pub log_tail_lines: usize,
    /// Build tool invocation.
    pub build_tool: BuildToolConfig,
    /// Runtime invocation.
    pub runtime: RuntimeConfig,
    /// Delays and timeouts.
    pub timing: TimingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            manifest: "pom.xml".to_string(),
            artifact: PathBuf::from("target/app.jar"),
            pid_file: PathBuf::from("target/app.pid"),
            log_file: PathBuf::from("target/app.log"),
            port: 8080,
            health_path: "/actuator/health".to_string(),
            log_tail_lines: 50,
            build_tool: BuildToolConfig::default(),
            runtime: RuntimeConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl Config {
    /// Loads a configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The file cannot be read
    /// * The file contents are not valid JSON
    /// * The JSON does not conform to the expected schema
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigParse(format!("Failed to read config file: {}", e)))?;

        Self::parse_from_str(&content)
    }

    /// Parses a configuration from a JSON string.
    pub fn parse_from_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| Error::ConfigParse(format!("Failed to parse JSON config: {}", e)))
    }

    /// Loads the configuration the binary runs with.
    ///
    /// Resolution order:
    /// 1. The file named by `APP_RUNNER_CONFIG` (if set and non-empty)
    /// 2. `app-runner.json` in the working directory (if present)
    /// 3. Built-in defaults
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
            && !path.is_empty()
        {
            tracing::debug!(config_path = %path, "Loading configuration from environment");
            return Self::from_file(path);
        }

        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            tracing::debug!(config_path = %local.display(), "Loading local configuration");
            return Self::from_file(local);
        }

        tracing::debug!("Using default configuration");
        Ok(Self::default())
    }

    /// Resolves a configured path against the project root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.project_root.join(&self.manifest)
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.resolve(&self.artifact)
    }

    pub fn pid_file_path(&self) -> PathBuf {
        self.resolve(&self.pid_file)
    }

    pub fn log_file_path(&self) -> PathBuf {
        self.resolve(&self.log_file)
    }

    /// URL probed by `status`.
    pub fn health_url(&self) -> String {
        let path = if self.health_path.starts_with('/') {
            self.health_path.clone()
        } else {
            format!("/{}", self.health_path)
        };
        format!("http://localhost:{}{}", self.port, path)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
