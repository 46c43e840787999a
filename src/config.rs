//! Form defaults read from `settings.toml` in the platform config directory.
//!
//! The file is only ever read. A missing file or one that fails to parse falls
//! back to [`Config::default`].

use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    error::Result,
    models::{OutputFormat, Unit},
};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "ImageResizeForm";

pub const DEFAULT_QUALITY: u8 = 90;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_unit: Unit,
    pub lock_aspect: bool,
    pub default_format: OutputFormat,
    pub default_quality: u8,
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_unit: Unit::Pixel,
            lock_aspect: true,
            default_format: OutputFormat::Jpeg,
            default_quality: DEFAULT_QUALITY,
            output_dir: None,
        }
    }
}

impl Config {
    pub fn quality(&self) -> u8 {
        self.default_quality.clamp(1, 100)
    }

    /// Where job manifests go when the settings name no directory.
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .or_else(|| dirs::data_local_dir().map(|path| path.join(APP_NAME).join("jobs")))
            .unwrap_or_else(|| PathBuf::from("resize-jobs"))
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Config {
    match default_config_path() {
        Some(path) if path.exists() => match load_from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring settings file");
                Config::default()
            }
        },
        _ => Config::default(),
    }
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}
