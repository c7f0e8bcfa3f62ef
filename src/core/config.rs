use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

fn default_sheets_base_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_rates_base_url() -> String {
    "https://www.cbr.ru".to_string()
}

fn default_telegram_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_rates_timeout_secs() -> u64 {
    3
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_retries() -> usize {
    2
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SheetConfig {
    /// JSON file holding either an `access_token` or an `api_key`.
    pub credentials_file: String,
    pub sheet_id: String,
    /// Sheet name or A1 range, e.g. `Sheet1` or `Sheet1!A1:D`.
    pub range: String,
    #[serde(default = "default_sheets_base_url")]
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retries")]
    pub retries: usize,
}

impl SheetConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RatesConfig {
    #[serde(default = "default_rates_base_url")]
    pub base_url: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_rates_timeout_secs")]
    pub timeout_secs: u64,
}

impl RatesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for RatesConfig {
    fn default() -> Self {
        RatesConfig {
            base_url: default_rates_base_url(),
            currency: default_currency(),
            timeout_secs: default_rates_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct StoreConfig {
    pub data_path: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TelegramConfig {
    #[serde(default = "default_telegram_base_url")]
    pub base_url: String,
    pub token: String,
    pub chat_id: String,
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

impl TelegramConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub sheet: SheetConfig,
    #[serde(default)]
    pub rates: RatesConfig,
    #[serde(default)]
    pub store: StoreConfig,
    pub telegram: Option<TelegramConfig>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "ordersync", "ordersync")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.store.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "ordersync", "ordersync")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().join("orders"))
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
