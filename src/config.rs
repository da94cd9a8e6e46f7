use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::SettingsError;
use crate::session::settings::{Mode, Settings, TestType};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_test_type")]
    pub test_type: String,
    #[serde(default = "default_duration_secs")]
    pub duration_secs: u32,
    #[serde(default = "default_word_count")]
    pub word_count: u32,
    #[serde(default = "default_theme")]
    pub theme: String,
}

/// Test settings given on the command line for this run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub mode: Option<String>,
    pub test_type: Option<String>,
    pub duration_secs: Option<u32>,
    pub word_count: Option<u32>,
}

fn default_mode() -> String {
    Mode::default().as_str().to_string()
}
fn default_test_type() -> String {
    TestType::default().as_str().to_string()
}
fn default_duration_secs() -> u32 {
    Settings::default().duration_secs
}
fn default_word_count() -> u32 {
    Settings::default().word_count
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            test_type: default_test_type(),
            duration_secs: default_duration_secs(),
            word_count: default_word_count(),
            theme: default_theme(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("neotype")
            .join("config.toml")
    }

    /// Parses and validates the session settings stored in this config.
    pub fn settings(&self) -> Result<Settings, SettingsError> {
        let settings = Settings {
            mode: self.mode.parse()?,
            test_type: self.test_type.parse()?,
            duration_secs: self.duration_secs,
            word_count: self.word_count,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Settings to start with. Invalid saved values fall back to the defaults;
    /// invalid overrides are an error.
    pub fn startup_settings(
        &self,
        overrides: &SettingsOverrides,
    ) -> Result<Settings, SettingsError> {
        let base = self.settings().unwrap_or_else(|err| {
            warn!(%err, "saved settings are invalid, using defaults");
            Settings::default()
        });

        let settings = Settings {
            mode: overrides
                .mode
                .as_deref()
                .map(str::parse::<Mode>)
                .transpose()?
                .unwrap_or(base.mode),
            test_type: overrides
                .test_type
                .as_deref()
                .map(str::parse::<TestType>)
                .transpose()?
                .unwrap_or(base.test_type),
            duration_secs: overrides.duration_secs.unwrap_or(base.duration_secs),
            word_count: overrides.word_count.unwrap_or(base.word_count),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Copies session settings back so they are saved with the config.
    pub fn store_settings(&mut self, settings: &Settings) {
        self.mode = settings.mode.as_str().to_string();
        self.test_type = settings.test_type.as_str().to_string();
        self.duration_secs = settings.duration_secs;
        self.word_count = settings.word_count;
    }
}
