//! TOML application configuration.

use std::path::{Path, PathBuf};

use celadon_common::ConfigError;
use celadon_window::WindowOptions;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One named content mount: `dir` served as `celadon://<name>/...`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MountConfig {
    pub name: String,
    pub dir: PathBuf,
}

/// Application settings.
///
/// Deserialized with serde defaults, so a config file only overrides what
/// it mentions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default tracing filter directive.
    pub log_filter: String,
    /// Defaults applied to windows the shell creates.
    pub window: WindowOptions,
    /// Content mounts added at startup.
    pub mounts: Vec<MountConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: "celadon=info".into(),
            window: WindowOptions::default(),
            mounts: Vec::new(),
        }
    }
}

/// Load config from a specific TOML file path.
///
/// Missing fields use defaults. A window section that fails validation is
/// replaced with defaults rather than failing the load.
pub fn load_from_path(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let mut config: AppConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = config.window.validate() {
        warn!("config window section invalid, using defaults: {e}");
        config.window = WindowOptions::default();
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform default path; a missing file just means
/// defaults.
pub fn load_default() -> Result<AppConfig, ConfigError> {
    let path = default_config_path()?;
    if !path.exists() {
        info!("no config found at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }
    load_from_path(&path)
}

/// The platform-specific default config file path.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
    Ok(config_dir.join("celadon").join("config.toml"))
}
