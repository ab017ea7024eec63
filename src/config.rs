//! Configuration file handling for sign-stream.
//!
//! Loads configuration from `~/.config/sign-stream/config.toml` or a
//! custom path; command-line flags override file values.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::Args;

/// Configuration file structure.
/// Loaded from ~/.config/sign-stream/config.toml (or custom path via --config).
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraSection,
    #[serde(default)]
    pub model: ModelSection,
    #[serde(default)]
    pub overlay: OverlaySection,
    #[serde(default)]
    pub speech: SpeechSection,
}

#[derive(Debug, Deserialize, Default)]
pub struct CameraSection {
    #[serde(default)]
    pub device: u32,
    #[serde(default)]
    pub mirror: bool,
}

#[derive(Debug, Deserialize)]
pub struct ModelSection {
    #[serde(default = "default_model_path")]
    pub path: PathBuf,
}

impl Default for ModelSection {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OverlaySection {
    #[serde(default = "default_font_path")]
    pub font_path: PathBuf,
}

impl Default for OverlaySection {
    fn default() -> Self {
        Self {
            font_path: default_font_path(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SpeechSection {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for SpeechSection {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}

fn default_model_path() -> PathBuf {
    PathBuf::from("sign_language_model.onnx")
}

#[cfg(target_os = "macos")]
fn default_font_path() -> PathBuf {
    PathBuf::from("/System/Library/Fonts/Supplemental/Arial.ttf")
}

#[cfg(not(target_os = "macos"))]
fn default_font_path() -> PathBuf {
    PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf")
}

/// The effective settings after merging the config file and CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub device_index: u32,
    pub mirror: bool,
    pub model_path: PathBuf,
    pub font_path: PathBuf,
    pub speech_enabled: bool,
}

impl Config {
    /// Load configuration from a file path.
    /// Returns default config if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
                path: path.clone(),
                source: e,
            })?;
            let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.clone(),
                source: e,
            })?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Merge with CLI flags. A flag that was given wins over the file.
    pub fn resolve(self, args: &Args) -> Settings {
        Settings {
            device_index: args.camera.unwrap_or(self.camera.device),
            mirror: args.mirror || self.camera.mirror,
            model_path: args.model.clone().unwrap_or(self.model.path),
            font_path: args.font.clone().unwrap_or(self.overlay.font_path),
            speech_enabled: self.speech.enabled && !args.no_speech,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError { path, source } => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::IoError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("sign-stream/config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/sign-stream/config.toml")
        })
}
