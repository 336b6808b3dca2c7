use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SourceConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub metalprice: Option<SourceConfig>,
    pub spotgold: Option<SourceConfig>,
    pub commodities: Option<SourceConfig>,
    pub currency: Option<SourceConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            metalprice: Some(SourceConfig {
                base_url: "https://api.metalpriceapi.com".to_string(),
            }),
            spotgold: Some(SourceConfig {
                base_url: "https://api.spotgold.io".to_string(),
            }),
            commodities: Some(SourceConfig {
                base_url: "https://api.commodities.dev".to_string(),
            }),
            currency: Some(SourceConfig {
                base_url: "https://open.er-api.com".to_string(),
            }),
        }
    }
}

fn default_base_currency() -> String {
    "USD".to_string()
}

fn default_local_currency() -> String {
    "EGP".to_string()
}

fn default_refresh_minutes() -> u64 {
    5
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Currency the upstream sources quote the metal in.
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    /// Currency prices are displayed in.
    #[serde(default = "default_local_currency")]
    pub local_currency: String,
    /// Interval between refreshes in watch mode.
    #[serde(default = "default_refresh_minutes")]
    pub refresh_minutes: u64,
    #[serde(default)]
    pub providers: ProvidersConfig,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            base_currency: default_base_currency(),
            local_currency: default_local_currency(),
            refresh_minutes: default_refresh_minutes(),
            providers: ProvidersConfig::default(),
            data_path: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "souqdev", "goldfeed")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "souqdev", "goldfeed")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
