use anyhow::{anyhow, Context, Result};
use crossterm::style::Stylize;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::ansi::ColorToken;
use crate::logging::{DebugLogger, LogLevel};

const CONFIG_DIRNAME: &str = ".klikos-modloader";
const SETTINGS_FILENAME: &str = "settings.json";
const FASTFLAGS_FILENAME: &str = "fastflags.json";

pub const ENV_LOG_LEVEL: &str = "MODLOADER_LOG";
pub const ENV_GUTTER: &str = "MODLOADER_GUTTER";

const DEFAULT_BACKGROUND: ColorToken = ColorToken::Rgb(0x1f, 0x1f, 0x1f);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Settings {
    /// Columns kept free around the panel; content width is terminal width minus this.
    #[serde(default = "default_gutter")]
    pub gutter: usize,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub fastflags_file: Option<PathBuf>,
    /// Directory the settings were loaded from; not persisted.
    #[serde(skip)]
    pub config_dir: Option<PathBuf>,
}

fn default_gutter() -> usize { 48 }
fn default_background() -> String { "#1f1f1f".to_string() }
fn default_log_level() -> LogLevel { LogLevel::Warn }

impl Default for Settings {
    fn default() -> Self {
        Self {
            gutter: default_gutter(),
            background: default_background(),
            log_level: default_log_level(),
            log_file: None,
            fastflags_file: None,
            config_dir: None,
        }
    }
}

impl Settings {
    /// Background as a color token; an unparsable value falls back to the default.
    pub fn background_token(&self) -> ColorToken {
        self.background.parse().unwrap_or(DEFAULT_BACKGROUND)
    }

    /// Logger described by these settings, disabled when no log file is set.
    pub fn logger(&self) -> DebugLogger {
        DebugLogger::new(self.log_file.is_some(), self.log_file.clone(), self.log_level)
    }

    /// Where the FastFlag profiles live: the explicit path, else next to the settings file.
    pub fn fastflags_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.fastflags_file {
            return Ok(path.clone());
        }
        let dir = match &self.config_dir {
            Some(dir) => dir.clone(),
            None => get_config_dir()?,
        };
        Ok(dir.join(FASTFLAGS_FILENAME))
    }

    fn apply_overrides(&mut self, log_level: Option<String>, gutter: Option<String>) {
        if let Some(raw) = log_level {
            match raw.parse::<LogLevel>() {
                Ok(level) => self.log_level = level,
                Err(e) => eprintln!("{}", format!("Warning: ignoring {}: {}", ENV_LOG_LEVEL, e).yellow()),
            }
        }
        if let Some(raw) = gutter {
            match raw.trim().parse::<usize>() {
                Ok(gutter) => self.gutter = gutter,
                Err(e) => eprintln!("{}", format!("Warning: ignoring {}={}: {}", ENV_GUTTER, raw, e).yellow()),
            }
        }
    }
}

/// Loads `~/.klikos-modloader/settings.json`, creating it with defaults on
/// first run, then applies environment overrides.
pub fn load_settings() -> Result<Settings> {
    let config_dir = get_config_dir()?;
    let mut settings = load_settings_from(&config_dir)?;
    settings.apply_overrides(env::var(ENV_LOG_LEVEL).ok(), env::var(ENV_GUTTER).ok());
    Ok(settings)
}

pub fn load_settings_from(config_dir: &Path) -> Result<Settings> {
    let settings_path = config_dir.join(SETTINGS_FILENAME);

    if !config_dir.exists() {
        fs::create_dir_all(config_dir)
            .with_context(|| format!("Failed to create config directory: {}", config_dir.display()))?;
    }

    let mut settings = if settings_path.exists() {
        let content = fs::read_to_string(&settings_path)
            .with_context(|| format!("Failed to read settings from {}", settings_path.display()))?;
        serde_json::from_str::<Settings>(&content)
            .with_context(|| format!("Failed to parse settings at {}", settings_path.display()))?
    } else {
        let defaults = Settings::default();
        let json = serde_json::to_string_pretty(&defaults)
            .context("Failed to serialize default settings")?;
        fs::write(&settings_path, json)
            .with_context(|| format!("Failed to write default settings to {}", settings_path.display()))?;
        defaults
    };

    settings.config_dir = Some(config_dir.to_path_buf());
    Ok(settings)
}

pub fn get_config_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .ok_or_else(|| anyhow!("Could not determine home directory"))
        .map(|home| home.join(CONFIG_DIRNAME))
}
