//! CLI settings and logging resolution

use std::io::Write;

use clap::Parser;
use libmoonwave::logging::LogFormat;
use moonwave_tui::cli::Cli;
use moonwave_tui::TuiError;
use serial_test::serial;
use tempfile::{NamedTempFile, TempDir};

fn settings_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

#[test]
fn test_config_flag_loads_settings() {
    let file = settings_file(
        r#"
        [app]
        frame_interval = "25ms"

        [state]
        title = "From file"
        "#,
    );
    let path = file.path().to_str().unwrap();
    let cli = Cli::try_parse_from(["moonwave-tui", "--config", path]).unwrap();

    let settings = cli.settings().unwrap();
    assert_eq!(settings.frame_interval().unwrap().as_millis(), 25);
    assert_eq!(
        settings.state.get("title").and_then(|v| v.as_str()),
        Some("From file")
    );
}

#[test]
fn test_missing_config_file_is_an_error() {
    let cli = Cli::try_parse_from(["moonwave-tui", "--config", "/nonexistent/moonwave.toml"]).unwrap();
    assert!(matches!(cli.settings(), Err(TuiError::Core(_))));
}

#[test]
fn test_no_log_file_means_no_logging() {
    let cli = Cli::try_parse_from(["moonwave-tui"]).unwrap();
    let settings = libmoonwave::Settings::default_settings();
    assert!(cli.logging(&settings).unwrap().is_none());
}

#[test]
#[serial]
fn test_log_format_flag_overrides_settings() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("moonwave.log");
    let settings = libmoonwave::Settings::from_toml_str("[logging]\nformat = \"pretty\"").unwrap();

    let cli = Cli::try_parse_from([
        "moonwave-tui",
        "--log-file",
        log_path.to_str().unwrap(),
        "--log-format",
        "json",
    ])
    .unwrap();
    let (config, _file) = cli.logging(&settings).unwrap().unwrap();
    assert_eq!(config.format, LogFormat::Json);
    assert!(log_path.exists());

    let cli = Cli::try_parse_from(["moonwave-tui", "--log-file", log_path.to_str().unwrap()]).unwrap();
    let (config, _file) = cli.logging(&settings).unwrap().unwrap();
    assert_eq!(config.format, LogFormat::Pretty);
}

#[test]
#[serial]
fn test_log_environment_variables_override_settings() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("moonwave.log");
    let settings = libmoonwave::Settings::default_settings();

    std::env::set_var("MOONWAVE_LOG_FORMAT", "json");
    std::env::set_var("MOONWAVE_LOG_LEVEL", "trace");
    let cli = Cli::try_parse_from(["moonwave-tui", "--log-file", log_path.to_str().unwrap()]);
    std::env::remove_var("MOONWAVE_LOG_FORMAT");
    std::env::remove_var("MOONWAVE_LOG_LEVEL");

    let (config, _file) = cli.unwrap().logging(&settings).unwrap().unwrap();
    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.level, "trace");
}
