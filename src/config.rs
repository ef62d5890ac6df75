//! Optional TOML configuration
//!
//! Looked up at `--config <path>` first, then
//! `$XDG_CONFIG_HOME/tipmanager/config.toml`, falling back to defaults.
//!
//! ```toml
//! [output]
//! file_name = "Analise_TipManager.xlsx"
//!
//! [cache]
//! capacity = 16
//!
//! [colors]
//! positive = "#C6EFCE"
//! negative = "#FFC7CE"
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cache::DEFAULT_CAPACITY;
use crate::error::{Result, TipsError};
use crate::export::{ColorHints, Rgb};
use crate::pipeline::DEFAULT_FILE_NAME;

const APP_DIR: &str = "tipmanager";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub output: OutputConfig,
    pub cache: CacheConfig,
    pub colors: ColorConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub positive: Option<String>,
    pub negative: Option<String>,
}

impl Config {
    /// Load from an explicit path, or from the default location if present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), TipsError> {
        if self.cache.capacity == 0 {
            return Err(TipsError::Validation(
                "[cache] capacity must be at least 1".to_string(),
            ));
        }
        if self.output.file_name.trim().is_empty() {
            return Err(TipsError::Validation(
                "[output] file_name must not be empty".to_string(),
            ));
        }
        self.color_hints().map(|_| ())
    }

    /// Colour overrides from `[colors]`
    pub fn color_hints(&self) -> std::result::Result<ColorHints, TipsError> {
        let parse = |value: &Option<String>| value.as_deref().map(str::parse::<Rgb>).transpose();
        Ok(ColorHints {
            positive: parse(&self.colors.positive)?,
            negative: parse(&self.colors.negative)?,
        })
    }
}

/// `$XDG_CONFIG_HOME/tipmanager/config.toml`
pub fn default_path() -> Option<PathBuf> {
    dir_spec::config_home().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}
