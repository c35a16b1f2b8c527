//! Application Configuration
//!
//! User settings stored in TOML format under the platform config directory.
//! The recognition credential is never compiled in: it is resolved from the
//! command line, the environment, or the config file, in that order.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable consulted for the recognition credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Recognition endpoint settings
    pub recognition: RecognitionSettings,
    /// Canvas and ink settings
    pub canvas: CanvasSettings,
    /// Initial window settings
    pub window: WindowSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            recognition: RecognitionSettings::default(),
            canvas: CanvasSettings::default(),
            window: WindowSettings::default(),
        }
    }
}

/// Settings for the remote recognition endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionSettings {
    /// API key for the recognition service; prefer the environment variable
    pub api_key: Option<String>,
    /// Base URL of the generateContent endpoint family
    pub base_url: String,
    /// Model name appended to the base URL
    pub model: String,
    /// Maximum tokens the service may generate per response
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RecognitionSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            model: "gemini-1.5-flash".to_string(),
            max_output_tokens: 256,
            timeout_secs: 30,
        }
    }
}

impl RecognitionSettings {
    /// Resolve the API key: CLI override, then environment, then config file.
    ///
    /// Blank values are treated as absent at every level.
    pub fn resolve_api_key(&self, cli_override: Option<&str>) -> Option<String> {
        if let Some(key) = cli_override {
            if !key.trim().is_empty() {
                return Some(key.trim().to_string());
            }
        }
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                return Some(key.trim().to_string());
            }
        }
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(String::from)
    }
}

/// Canvas and ink settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasSettings {
    /// Stroke width in pixels
    pub stroke_width: f32,
    /// Ink color (RGB)
    pub ink_color: [u8; 3],
    /// Canvas background color (RGB)
    pub background: [u8; 3],
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            stroke_width: 3.0,
            ink_color: [0, 0, 0],
            background: [255, 255, 255],
        }
    }
}

/// Initial window settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowSettings {
    /// Initial window width in logical pixels
    pub width: f32,
    /// Initial window height in logical pixels
    pub height: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}

/// Get the default configuration file path, creating the directory if needed
pub fn default_config_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "scribeboard", "Scribeboard")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir.join("config.toml"))
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
