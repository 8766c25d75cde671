//! Command-line interface for the demo binary

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use libmoonwave::logging::{LogFormat, LoggingConfig};
use libmoonwave::Settings;

use crate::error::Result;

#[derive(Parser, Debug)]
#[command(name = "moonwave-tui")]
#[command(version)]
#[command(about = "Terminal demo for Moonwave", long_about = None)]
pub struct Cli {
    /// Settings file (defaults to $MOONWAVE_CONFIG or the XDG config directory)
    #[arg(short, long, env = "MOONWAVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write logs to this file; nothing is logged otherwise
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log format (text, json, pretty); overrides the settings file
    #[arg(long, env = "MOONWAVE_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Log level (error, warn, info, debug, trace); overrides the settings file
    #[arg(long, env = "MOONWAVE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Settings from `--config`, or the default location
    pub fn settings(&self) -> Result<Settings> {
        let settings = match &self.config {
            Some(path) => Settings::load_from_path(path)?,
            None => Settings::load()?,
        };
        Ok(settings)
    }

    /// Logging setup, if a log file was requested
    ///
    /// The terminal owns stdout and stderr while the UI runs, so logs only go
    /// to a file.
    pub fn logging(&self, settings: &Settings) -> Result<Option<(LoggingConfig, File)>> {
        let path = match &self.log_file {
            Some(path) => path,
            None => return Ok(None),
        };

        let format = match self.log_format {
            Some(format) => format,
            None => settings.log_format()?,
        };
        let level = self
            .log_level
            .clone()
            .unwrap_or_else(|| settings.logging.level.clone());
        let config = LoggingConfig::new(format, level, self.verbose);
        let file = File::create(path)?;

        Ok(Some((config, file)))
    }

    pub fn init_logging(&self, settings: &Settings) -> Result<()> {
        if let Some((config, file)) = self.logging(settings)? {
            config.init_with_writer(Mutex::new(file));
        }
        Ok(())
    }
}
