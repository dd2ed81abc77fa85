use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::layout::Geometry;

/// Leveled, timestamped file logger. Entries never go to the terminal:
/// the panel owns the whole screen and would be torn by stray output.
#[derive(Debug, Clone)]
pub struct DebugLogger {
    enabled: bool,
    log_file: Option<PathBuf>,
    log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level `{}`", other)),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        };
        f.write_str(name)
    }
}

impl Default for DebugLogger {
    fn default() -> Self {
        Self::disabled()
    }
}

impl DebugLogger {
    pub fn new(enabled: bool, log_file: Option<PathBuf>, log_level: LogLevel) -> Self {
        Self {
            enabled,
            log_file,
            log_level,
        }
    }

    pub fn disabled() -> Self {
        Self::new(false, None, LogLevel::Error)
    }

    fn allows(&self, level: LogLevel) -> bool {
        self.enabled && self.log_file.is_some() && level <= self.log_level
    }

    pub fn log_render(&self, geometry: &Geometry, records: usize, lines: usize) -> Result<()> {
        if !self.allows(LogLevel::Debug) {
            return Ok(());
        }

        let log_entry = format!(
            "=== {} === RENDER: {}x{} content={} offset={} records={} lines={}\n",
            timestamp(),
            geometry.terminal_width,
            geometry.terminal_height,
            geometry.content_width,
            geometry.offset(),
            records,
            lines
        );

        self.write_log(&log_entry)
    }

    pub fn log_profile_change(&self, action: &str, name: &str) -> Result<()> {
        if !self.allows(LogLevel::Info) {
            return Ok(());
        }

        let log_entry = format!("=== {} === PROFILE {}: {}\n", timestamp(), action, name);
        self.write_log(&log_entry)
    }

    pub fn log_error(&self, error: &anyhow::Error) -> Result<()> {
        if !self.allows(LogLevel::Error) {
            return Ok(());
        }

        let log_entry = format!("=== {} === ERROR:\n{:?}\n\n", timestamp(), error);
        self.write_log(&log_entry)
    }

    pub fn log_step(&self, step: &str, data: Option<&Value>) -> Result<()> {
        if !self.allows(LogLevel::Info) {
            return Ok(());
        }

        let mut log_entry = format!("=== {} === STEP: {}\n", timestamp(), step);
        if let Some(data) = data {
            log_entry.push_str(&format!("DATA: {}\n", data));
        }

        self.write_log(&log_entry)
    }

    fn write_log(&self, entry: &str) -> Result<()> {
        if let Some(ref path) = self.log_file {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            file.write_all(entry.as_bytes())?;
        }
        Ok(())
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
