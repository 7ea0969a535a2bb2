//! Application configuration, read from a TOML file.
//!
//! Every field has a default, so an empty file (or no file) is valid.

use crate::core::error::ConfigError;
use crate::core::filter::FilterKind;
use crate::core::types::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub library: LibraryConfig,
}

/// Initial editor state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionConfig {
    #[serde(default)]
    pub filter: FilterKind,

    /// Clamped into [0, 1] when the session is built
    #[serde(default = "intensity_default")]
    pub intensity: f32,
}

/// Where and how saved photos are written.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LibraryConfig {
    #[serde(default = "directory_default")]
    pub directory: PathBuf,

    #[serde(default = "format_default")]
    pub format: ImageFormat,

    /// JPEG quality, 1..=100
    #[serde(default = "quality_default")]
    pub quality: u8,

    #[serde(default = "file_prefix_default")]
    pub file_prefix: String,
}

fn intensity_default() -> f32 {
    0.5
}

fn directory_default() -> PathBuf {
    PathBuf::from("./library")
}

fn format_default() -> ImageFormat {
    ImageFormat::Png
}

fn quality_default() -> u8 {
    90
}

fn file_prefix_default() -> String {
    "instafilter".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            filter: FilterKind::default(),
            intensity: intensity_default(),
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            directory: directory_default(),
            format: format_default(),
            quality: quality_default(),
            file_prefix: file_prefix_default(),
        }
    }
}

impl AppConfig {
    /// Read and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml_str(&text)?;
        log::debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Parse and validate config text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.session.intensity.is_finite() {
            return Err(invalid("session.intensity", "must be a finite number"));
        }
        if !(1..=100).contains(&self.library.quality) {
            return Err(invalid("library.quality", "must be between 1 and 100"));
        }
        if self.library.format.to_image_format().is_none() {
            return Err(invalid("library.format", "unsupported image format"));
        }
        if self.library.file_prefix.is_empty()
            || self.library.file_prefix.contains(['/', '\\'])
        {
            return Err(invalid(
                "library.file_prefix",
                "must be a non-empty file name without path separators",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
