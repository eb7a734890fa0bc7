use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Upstream base URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub geocode: String,
    pub onecall: String,
    pub current: String,
    pub wttr: String,
    pub countries: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocode: "https://api.openweathermap.org/geo/1.0/direct".to_string(),
            onecall: "https://api.openweathermap.org/data/3.0/onecall".to_string(),
            current: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            wttr: "https://wttr.in".to_string(),
            countries: "https://studies.cs.helsinki.fi/restcountries/api/name".to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Credential for geocoding and the keyed weather tiers.
    pub api_key: Option<String>,

    /// Upper bound for each pipeline stage, in seconds.
    pub timeout_secs: u64,

    /// Example TOML:
    /// [endpoints]
    /// wttr = "https://wttr.in"
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            endpoints: Endpoints::default(),
        }
    }
}

impl Config {
    /// Non-blank API key, if any.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn set_api_key(&mut self, api_key: String) {
        let trimmed = api_key.trim();
        self.api_key = if trimmed.is_empty() { None } else { Some(trimmed.to_string()) };
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// [`Config::load`] plus the `WEATHER_API_KEY` override.
    pub fn load_with_env() -> Result<Self> {
        let mut cfg = Self::load()?;
        cfg.apply_env_key(std::env::var(API_KEY_ENV).ok());
        Ok(cfg)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration TOML")
    }

    fn apply_env_key(&mut self, value: Option<String>) {
        if let Some(key) = value.filter(|k| !k.trim().is_empty()) {
            self.set_api_key(key);
        }
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "countries-weather", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
