use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_CITY: &str = "Chhindwara";
pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const MODEL_FILE_NAME: &str = "rainfall_model.json";

/// Furthest ahead the Open-Meteo forecast endpoint serves daily data.
pub const MAX_FORECAST_DAYS: u32 = 16;
/// Furthest back the Open-Meteo forecast endpoint serves daily data.
pub const MAX_PAST_DAYS: u32 = 92;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// default_city = "Chhindwara"
/// model_path = "/home/me/models/rainfall_model.json"
/// fallback_offsets_days = [2, 3, 4]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// City used when the user leaves the city field blank.
    pub default_city: String,

    /// Model artifact; `<config dir>/rainfall_model.json` when unset.
    pub model_path: Option<PathBuf>,

    /// Days before today to try, in order, when no date is requested.
    pub fallback_offsets_days: Vec<u32>,

    pub request_timeout_secs: u64,

    pub geocoding_url: String,
    pub forecast_url: String,

    /// How far ahead of today the forecast endpoint serves daily data.
    pub forecast_days_limit: u32,
    /// How far back the forecast endpoint serves daily data.
    pub past_days_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_city: DEFAULT_CITY.to_string(),
            model_path: None,
            fallback_offsets_days: vec![2, 3, 4],
            request_timeout_secs: 10,
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            forecast_days_limit: MAX_FORECAST_DAYS,
            past_days_limit: MAX_PAST_DAYS,
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "rainfall", "rainfall")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.fallback_offsets_days.is_empty() {
            return Err(anyhow!("`fallback_offsets_days` must list at least one day offset"));
        }
        if self.default_city.trim().is_empty() {
            return Err(anyhow!("`default_city` must not be blank"));
        }
        if self.request_timeout_secs == 0 {
            return Err(anyhow!("`request_timeout_secs` must be at least 1"));
        }
        if self.forecast_days_limit > MAX_FORECAST_DAYS {
            return Err(anyhow!(
                "`forecast_days_limit` must be at most {MAX_FORECAST_DAYS}, got {}",
                self.forecast_days_limit
            ));
        }
        if self.past_days_limit > MAX_PAST_DAYS {
            return Err(anyhow!(
                "`past_days_limit` must be at most {MAX_PAST_DAYS}, got {}",
                self.past_days_limit
            ));
        }
        if let Some(d) = self.fallback_offsets_days.iter().find(|d| **d > MAX_PAST_DAYS) {
            return Err(anyhow!(
                "`fallback_offsets_days` entries must be at most {MAX_PAST_DAYS}, got {d}"
            ));
        }
        Ok(())
    }

    /// Model path by precedence: explicit override, config, config directory.
    pub fn resolve_model_path(&self, override_path: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = override_path {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = &self.model_path {
            return Ok(path.clone());
        }
        Ok(Self::project_dirs()?.config_dir().join(MODEL_FILE_NAME))
    }

    /// The city to look up: the user's input, or the default when blank.
    pub fn city_or_default<'a>(&'a self, input: &'a str) -> &'a str {
        let trimmed = input.trim();
        if trimmed.is_empty() { self.default_city.as_str() } else { trimmed }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
