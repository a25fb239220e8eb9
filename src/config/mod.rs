//! Configuration management module.
//!
//! This module handles loading and saving the configuration file: where
//! issues come from, how slow the simulated fixture is, and which themes the
//! light and dark modes use.

mod error;

pub use error::ConfigError;

use crate::error::AppError;
use crate::issues::{AnySource, FixtureSource, HttpSource};
use crate::ui::Theme;
use log::*;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

const FILE_NAME: &str = "config.yml";
const STATE_FILE_NAME: &str = "state.json";
const DEFAULT_DIRECTORY_PATH: &str = ".config/issue-dash";

/// Oversees management of configuration file.
///
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub issues_file: Option<PathBuf>,
    pub issues_url: Option<String>,
    pub latency_ms: u64,
    pub detail_latency_ms: u64,
    pub light_theme: String,
    pub dark_theme: String,
    dir_path: Option<PathBuf>,
}

/// Define specification for configuration file.
///
#[derive(Serialize, Deserialize)]
struct FileSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    issues_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    issues_url: Option<String>,
    #[serde(default = "default_latency_ms")]
    latency_ms: u64,
    #[serde(default = "default_detail_latency_ms")]
    detail_latency_ms: u64,
    #[serde(default = "default_light_theme")]
    light_theme: String,
    #[serde(default = "default_dark_theme")]
    dark_theme: String,
}

fn default_latency_ms() -> u64 {
    500
}

fn default_detail_latency_ms() -> u64 {
    200
}

fn default_light_theme() -> String {
    "rose-pine-dawn".to_string()
}

fn default_dark_theme() -> String {
    "tokyo-night".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

impl Config {
    /// Return a new instance holding defaults.
    ///
    pub fn new() -> Config {
        Config {
            issues_file: None,
            issues_url: None,
            latency_ms: default_latency_ms(),
            detail_latency_ms: default_detail_latency_ms(),
            light_theme: default_light_theme(),
            dark_theme: default_dark_theme(),
            dir_path: None,
        }
    }

    /// Load the configuration from the custom directory if provided, or the
    /// default one. A missing file is created with defaults.
    ///
    pub fn load(&mut self, custom_path: Option<&str>) -> Result<(), AppError> {
        let dir_path = match custom_path {
            Some(path) => Path::new(&path).to_path_buf(),
            None => Config::default_path()?,
        };

        if !dir_path.exists() {
            fs::create_dir_all(&dir_path).map_err(|e| ConfigError::CreateDirectoryFailed {
                path: dir_path.clone(),
                source: e,
            })?;
        }
        self.dir_path = Some(dir_path);

        let file_path = self.file_path()?;
        if file_path.exists() {
            let contents = fs::read_to_string(&file_path).map_err(|e| ConfigError::LoadFailed {
                path: file_path.clone(),
                message: format!("IO error: {}", e),
            })?;
            self.apply_yaml(&contents)?;
        } else {
            info!("Writing default configuration to {}...", file_path.display());
            self.save()?;
        }
        Ok(())
    }

    fn apply_yaml(&mut self, contents: &str) -> Result<(), ConfigError> {
        let data: FileSpec = serde_yaml::from_str(contents)
            .map_err(|e| ConfigError::DeserializationFailed(e.to_string()))?;
        if data.issues_file.is_some() && data.issues_url.is_some() {
            return Err(ConfigError::ConflictingSources);
        }
        self.issues_file = data.issues_file;
        self.issues_url = data.issues_url;
        self.latency_ms = data.latency_ms;
        self.detail_latency_ms = data.detail_latency_ms;
        self.light_theme = data.light_theme;
        self.dark_theme = data.dark_theme;
        Ok(())
    }

    /// Serialize the configuration and write it to the disk.
    ///
    pub fn save(&self) -> Result<(), AppError> {
        let data = FileSpec {
            issues_file: self.issues_file.clone(),
            issues_url: self.issues_url.clone(),
            latency_ms: self.latency_ms,
            detail_latency_ms: self.detail_latency_ms,
            light_theme: self.light_theme.clone(),
            dark_theme: self.dark_theme.clone(),
        };
        let content = serde_yaml::to_string(&data)
            .map_err(|e| ConfigError::SerializationFailed(e.to_string()))?;
        let file_path = self.file_path()?;
        let mut file = fs::File::create(&file_path).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        write!(file, "{}", content).map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        file.flush().map_err(|e| ConfigError::SaveFailed {
            path: file_path.clone(),
            source: e,
        })?;
        Ok(())
    }

    fn file_path(&self) -> Result<PathBuf, ConfigError> {
        self.dir_path
            .as_ref()
            .map(|dir| dir.join(FILE_NAME))
            .ok_or(ConfigError::FilePathNotSet)
    }

    /// Path of the persisted view state.
    ///
    pub fn state_path(&self) -> Result<PathBuf, ConfigError> {
        self.dir_path
            .as_ref()
            .map(|dir| dir.join(STATE_FILE_NAME))
            .ok_or(ConfigError::FilePathNotSet)
    }

    /// Build the configured issue source. Without an explicit file or URL the
    /// bundled fixture is used.
    ///
    pub fn source(&self) -> AnySource {
        let latency = Duration::from_millis(self.latency_ms);
        let detail_latency = Duration::from_millis(self.detail_latency_ms);
        if let Some(url) = &self.issues_url {
            info!("Reading issues from {}.", url);
            return AnySource::Http(HttpSource::new(url));
        }
        let fixture = match &self.issues_file {
            Some(path) => FixtureSource::from_file(path),
            None => FixtureSource::bundled(),
        };
        AnySource::Fixture(fixture.with_latency(latency, detail_latency))
    }

    /// Resolve the light and dark themes, falling back to the defaults for
    /// unknown names.
    ///
    pub fn themes(&self) -> (Theme, Theme) {
        let resolve = |name: &str, fallback: fn() -> Theme| {
            Theme::from_name(name).unwrap_or_else(|| {
                warn!("Unknown theme '{}', using default.", name);
                fallback()
            })
        };
        (
            resolve(&self.light_theme, Theme::default),
            resolve(&self.dark_theme, Theme::tokyo_night),
        )
    }

    /// Returns the path buffer for the default configuration directory or an
    /// error if the home directory could not be found.
    ///
    fn default_path() -> Result<PathBuf, AppError> {
        match dirs::home_dir() {
            Some(home) => Ok(home.join(DEFAULT_DIRECTORY_PATH)),
            None => Err(ConfigError::HomeDirectoryNotFound.into()),
        }
    }
}
