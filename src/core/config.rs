use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_FIXER_URL: &str = "http://data.fixer.io";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FixerProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub access_key: Option<String>,
}

impl Default for FixerProviderConfig {
    fn default() -> Self {
        FixerProviderConfig {
            base_url: DEFAULT_FIXER_URL.to_string(),
            access_key: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProvidersConfig {
    pub fixer: Option<FixerProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            fixer: Some(FixerProviderConfig::default()),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig { port: DEFAULT_PORT }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Display currency used by the storefront when none is selected.
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            currency: default_currency(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "fxc", "fxc")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Loads the config and applies `API_KEY` and `PORT` from the environment.
    pub fn resolve(config_path: Option<&str>) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => Self::load_from_path(path)?,
            None => Self::load()?,
        };
        config.apply_overrides(std::env::var("API_KEY").ok(), std::env::var("PORT").ok())?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, api_key: Option<String>, port: Option<String>) -> Result<()> {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            debug!("Using access key from environment");
            self.providers
                .fixer
                .get_or_insert_with(FixerProviderConfig::default)
                .access_key = Some(key);
        }
        if let Some(port) = port {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("Invalid PORT value: {port}"))?;
        }
        Ok(())
    }

    pub fn fixer_base_url(&self) -> &str {
        self.providers
            .fixer
            .as_ref()
            .map_or(DEFAULT_FIXER_URL, |p| &p.base_url)
    }

    pub fn access_key(&self) -> Option<&str> {
        self.providers
            .fixer
            .as_ref()
            .and_then(|p| p.access_key.as_deref())
    }
}
