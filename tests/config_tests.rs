use app_runner::config::{Config, TimingConfig, validate_config, validator};
use app_runner::error::{Error, Result};
use assert_fs::prelude::*;
use std::path::PathBuf;

#[test]
fn test_parse_config() -> Result<()> {
    let config_str = r#"{
        "projectRoot": "/srv/orders",
        "manifest": "build.gradle",
        "artifact": "build/libs/orders.jar",
        "port": 9090,
        "healthPath": "/health",
        "logTailLines": 20,
        "buildTool": {
            "command": "gradle",
            "versionArgs": ["--version"],
            "cleanArgs": ["clean"],
            "compileArgs": ["classes", "testClasses"],
            "packageArgs": ["bootJar", "-x", "test"],
            "testArgs": ["test"]
        },
        "runtime": {
            "command": "java",
            "args": ["-Xmx512m", "-jar"],
            "minMajorVersion": 21
        }
    }"#;

    let config = Config::parse_from_str(config_str)?;

    assert_eq!(config.project_root, PathBuf::from("/srv/orders"));
    assert_eq!(config.manifest_path(), PathBuf::from("/srv/orders/build.gradle"));
    assert_eq!(
        config.artifact_path(),
        PathBuf::from("/srv/orders/build/libs/orders.jar")
    );
    assert_eq!(config.health_url(), "http://localhost:9090/health");
    assert_eq!(config.log_tail_lines, 20);

    assert_eq!(config.build_tool.command, "gradle");
    assert_eq!(config.build_tool.package_args, vec!["bootJar", "-x", "test"]);
    assert_eq!(config.runtime.args, vec!["-Xmx512m", "-jar"]);
    assert_eq!(config.runtime.min_major_version, 21);

    // Untouched sections keep their defaults
    assert_eq!(config.timing.stop_timeout_ms, 30_000);
    assert_eq!(
        config.pid_file_path(),
        PathBuf::from("/srv/orders/target/app.pid")
    );

    Ok(())
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8080);
    assert_eq!(config.health_url(), "http://localhost:8080/actuator/health");
    assert_eq!(config.log_tail_lines, 50);
    assert_eq!(config.timing.poll_interval_ms, 1_000);
    assert_eq!(config.timing.stop_timeout_ms, 30_000);
    assert_eq!(config.build_tool.test_args, vec!["test"]);
    assert_eq!(config.pid_file_path(), PathBuf::from("./target/app.pid"));
    assert_eq!(config.log_file_path(), PathBuf::from("./target/app.log"));
    assert!(validate_config(&config).is_ok());
}

#[test]
fn test_pid_and_log_paths_are_configured_directly() -> Result<()> {
    let config = Config::parse_from_str(
        r#"{ "projectRoot": "/work", "pidFile": "run/app.pid", "logFile": "/var/log/app.log" }"#,
    )?;

    assert_eq!(config.pid_file_path(), PathBuf::from("/work/run/app.pid"));
    assert_eq!(config.log_file_path(), PathBuf::from("/var/log/app.log"));
    assert_eq!(config.artifact_path(), PathBuf::from("/work/target/app.jar"));

    Ok(())
}

#[test]
fn test_parse_invalid_json() {
    let result = Config::parse_from_str(r#"{ "port": "eighty" }"#);
    assert!(matches!(result, Err(Error::ConfigParse(_))));

    let result = Config::parse_from_str("not json");
    assert!(matches!(result, Err(Error::ConfigParse(_))));
}

#[test]
fn test_validate_config() {
    let config = Config {
        port: 0,
        ..Config::default()
    };
    assert!(matches!(
        validate_config(&config),
        Err(Error::ConfigInvalid(msg)) if msg.contains("Port")
    ));

    let config = Config {
        log_tail_lines: 0,
        ..Config::default()
    };
    assert!(validate_config(&config).is_err());

    let mut config = Config::default();
    config.runtime.command = "  ".to_string();
    assert!(validate_config(&config).is_err());

    let mut config = Config::default();
    config.build_tool.command = String::new();
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_validate_timing() {
    let timing = TimingConfig {
        poll_interval_ms: 0,
        ..TimingConfig::default()
    };
    assert!(validator::validate_timing(&timing).is_err());

    let timing = TimingConfig {
        poll_interval_ms: 2_000,
        stop_timeout_ms: 1_000,
        ..TimingConfig::default()
    };
    assert!(matches!(
        validator::validate_timing(&timing),
        Err(Error::ConfigInvalid(msg)) if msg.contains("exceeds")
    ));

    let timing = TimingConfig {
        poll_interval_ms: 100,
        stop_timeout_ms: 100,
        ..TimingConfig::default()
    };
    assert!(validator::validate_timing(&timing).is_ok());
}

#[test]
fn test_config_from_file() -> Result<()> {
    let dir = assert_fs::TempDir::new().unwrap();
    let file = dir.child("app-runner.json");
    file.write_str(r#"{ "port": 8181, "timing": { "startGraceMs": 500 } }"#)
        .unwrap();

    let config = Config::from_file(file.path())?;
    assert_eq!(config.port, 8181);
    assert_eq!(config.timing.start_grace_ms, 500);
    assert_eq!(config.timing.restart_pause_ms, 2_000);

    Ok(())
}

#[test]
fn test_config_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::from_file(dir.path().join("absent.json"));
    assert!(matches!(
        result,
        Err(Error::ConfigParse(msg)) if msg.contains("Failed to read")
    ));
}
