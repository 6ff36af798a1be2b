use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

fn default_base_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}

fn default_api_key_header() -> String {
    // Demo-tier header; pro accounts use x-cg-pro-api-key.
    "x-cg-demo-api-key".to_string()
}

fn default_update_interval_secs() -> u64 {
    30
}

fn default_cache_duration_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Optional API key, sent on every request when set.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Header carrying the key; varies by CoinGecko account tier.
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: default_base_url(),
            api_key: None,
            api_key_header: default_api_key_header(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Watch-mode refresh period, seconds.
    #[serde(default = "default_update_interval_secs")]
    pub update_interval_secs: u64,
    /// How long a fetched rate stays trusted, seconds.
    #[serde(default = "default_cache_duration_secs")]
    pub cache_duration_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            provider: ProviderConfig::default(),
            update_interval_secs: default_update_interval_secs(),
            cache_duration_secs: default_cache_duration_secs(),
        }
    }
}

impl AppConfig {
    /// Loads from the default config path, falling back to defaults when no
    /// file exists. The app is fully usable without configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path() -> Result<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("io.github", "hncheang", "coinvert")
            .context("Could not determine project directories")
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs)
    }

    pub fn cache_duration(&self) -> Duration {
        Duration::from_secs(self.cache_duration_secs)
    }
}
