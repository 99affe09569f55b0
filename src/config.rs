use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::preprocess::ResizeFilter;

pub const DEFAULT_MODEL_PATH: &str = "lung_cancer_model.onnx";
pub const DEFAULT_IMAGE_PATH: &str = "lung_image_sets/lung_aca/lungaca1.jpeg";

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub model_path: Option<PathBuf>,
    pub image_path: Option<PathBuf>,
    pub resize_filter: Option<ResizeFilter>,
    pub model_sha256: Option<String>,
    pub labels: Option<Vec<String>>,
}

impl Config {
    pub fn model_path(&self) -> PathBuf {
        self.model_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH))
    }

    pub fn image_path(&self) -> PathBuf {
        self.image_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGE_PATH))
    }

    pub fn resize_filter(&self) -> ResizeFilter {
        self.resize_filter.unwrap_or_default()
    }

    /// Digest the model must match. A configured digest always applies; the
    /// build-time one only describes the default model.
    pub fn expected_sha256<'a>(
        &'a self,
        cli_model: bool,
        embedded: Option<&'a str>,
    ) -> Option<&'a str> {
        if let Some(hash) = self.model_sha256.as_deref() {
            return Some(hash);
        }
        if cli_model || self.model_path.is_some() {
            return None;
        }
        embedded
    }

    pub fn label(&self, class: usize) -> Option<&str> {
        self.labels.as_ref()?.get(class).map(String::as_str)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lung-predict").join("config.toml"))
}

/// Load the config from `explicit` (which must exist) or from the default
/// location (which may not).
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_config_from(path);
    }

    let Some(config_path) = default_config_path() else {
        return Ok(Config::default());
    };
    if !config_path.exists() {
        return Ok(Config::default());
    }
    load_config_from(&config_path)
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}
