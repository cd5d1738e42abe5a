//! Configuration management for surfcast
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings.

use crate::SurfError;
use crate::ranking::{MissingParameterPolicy, SkillProfile};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Legacy variable holding the marine data API key
const WEATHER_API_KEY_VAR: &str = "WEATHER_API_KEY";
/// Legacy variable holding the maps/places API key
const GOOGLE_API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurfConfig {
    #[serde(default)]
    pub marine: MarineConfig,
    #[serde(default)]
    pub places: PlacesConfig,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Marine data API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarineConfig {
    /// Storm Glass API key
    pub api_key: Option<String>,
    #[serde(default = "default_marine_base_url")]
    pub base_url: String,
    /// Data source whose readings are used; other sources are ignored
    #[serde(default = "default_marine_source")]
    pub source: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Retries for transient failures, applied by the HTTP client middleware
    #[serde(default)]
    pub max_retries: u32,
}

/// Geocoding and nearby places settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    /// Google Maps API key
    pub api_key: Option<String>,
    #[serde(default = "default_places_base_url")]
    pub base_url: String,
    #[serde(default = "default_search_radius")]
    pub search_radius_m: u32,
    #[serde(default = "default_keyword")]
    pub keyword: String,
    /// Maximum number of candidate beaches per request
    #[serde(default = "default_max_beaches")]
    pub max_beaches: u32,
}

/// Forecasting settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Trailing history window in days
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    /// Number of hourly steps to forecast
    #[serde(default = "default_horizon")]
    pub horizon: u32,
    /// Beaches processed concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: u32,
}

/// Ranking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Policy for beaches missing a parameter forecast: "exclude" or "zero"
    #[serde(default = "default_missing_parameter")]
    pub missing_parameter: String,
    /// Skill profile used when a request does not name one
    #[serde(default = "default_skill")]
    pub default_skill: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions
fn default_marine_base_url() -> String {
    "https://api.stormglass.io/v2".to_string()
}

fn default_marine_source() -> String {
    "noaa".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_places_base_url() -> String {
    "https://maps.googleapis.com/maps/api".to_string()
}

fn default_search_radius() -> u32 {
    10_000
}

fn default_keyword() -> String {
    "beach".to_string()
}

fn default_max_beaches() -> u32 {
    5
}

fn default_window_days() -> u32 {
    10
}

fn default_horizon() -> u32 {
    5
}

fn default_concurrency() -> u32 {
    4
}

fn default_missing_parameter() -> String {
    "exclude".to_string()
}

fn default_skill() -> String {
    "intermediate".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for MarineConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_marine_base_url(),
            source: default_marine_source(),
            timeout_seconds: default_timeout(),
            max_retries: 0,
        }
    }
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_places_base_url(),
            search_radius_m: default_search_radius(),
            keyword: default_keyword(),
            max_beaches: default_max_beaches(),
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            horizon: default_horizon(),
            concurrency: default_concurrency(),
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            missing_parameter: default_missing_parameter(),
            default_skill: default_skill(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl MarineConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl RankingConfig {
    /// Parsed missing-parameter policy; validated values only
    #[must_use]
    pub fn policy(&self) -> MissingParameterPolicy {
        MissingParameterPolicy::from_label(&self.missing_parameter)
            .unwrap_or(MissingParameterPolicy::ExcludeBeach)
    }

    #[must_use]
    pub fn default_skill(&self) -> SkillProfile {
        SkillProfile::from_label(&self.default_skill)
    }
}

impl SurfConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment variable overrides, e.g. SURFCAST_MARINE__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("SURFCAST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SurfConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_legacy_env(
            std::env::var(WEATHER_API_KEY_VAR).ok(),
            std::env::var(GOOGLE_API_KEY_VAR).ok(),
        );
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("surfcast").join("config.toml"))
    }

    /// Fill API keys from the legacy environment variables when not configured
    pub fn apply_legacy_env(
        &mut self,
        weather_api_key: Option<String>,
        google_api_key: Option<String>,
    ) {
        if self.marine.api_key.is_none() {
            self.marine.api_key = weather_api_key.filter(|key| !key.is_empty());
        }
        if self.places.api_key.is_none() {
            self.places.api_key = google_api_key.filter(|key| !key.is_empty());
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.marine.base_url.is_empty() {
            self.marine.base_url = default_marine_base_url();
        }
        if self.marine.source.is_empty() {
            self.marine.source = default_marine_source();
        }
        if self.marine.timeout_seconds == 0 {
            self.marine.timeout_seconds = default_timeout();
        }
        if self.places.base_url.is_empty() {
            self.places.base_url = default_places_base_url();
        }
        if self.places.keyword.is_empty() {
            self.places.keyword = default_keyword();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the shape of any API keys that are present
    pub fn validate_api_keys(&self) -> Result<()> {
        for (name, key) in [
            ("Marine", &self.marine.api_key),
            ("Places", &self.places.api_key),
        ] {
            if let Some(api_key) = key {
                if api_key.is_empty() {
                    return Err(SurfError::config(format!(
                        "{name} API key cannot be empty if provided. Either remove it or provide a valid key."
                    ))
                    .into());
                }

                if api_key.len() < 8 {
                    return Err(SurfError::config(format!(
                        "{name} API key appears to be invalid (too short). Please check your API key."
                    ))
                    .into());
                }

                if api_key.len() > 200 {
                    return Err(SurfError::config(format!(
                        "{name} API key appears to be invalid (too long). Please check your API key."
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Commands that reach upstream services need both keys
    pub fn require_api_keys(&self) -> Result<()> {
        if self.marine.api_key.is_none() {
            return Err(SurfError::config(format!(
                "Marine API key is required. Set SURFCAST_MARINE__API_KEY or {WEATHER_API_KEY_VAR}."
            ))
            .into());
        }
        if self.places.api_key.is_none() {
            return Err(SurfError::config(format!(
                "Places API key is required. Set SURFCAST_PLACES__API_KEY or {GOOGLE_API_KEY_VAR}."
            ))
            .into());
        }
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.marine.timeout_seconds > 300 {
            return Err(SurfError::config("Marine API timeout cannot exceed 300 seconds").into());
        }

        if self.marine.max_retries > 10 {
            return Err(SurfError::config("Marine API max retries cannot exceed 10").into());
        }

        if !(1..=50_000).contains(&self.places.search_radius_m) {
            return Err(
                SurfError::config("Search radius must be between 1 and 50000 meters").into(),
            );
        }

        if !(1..=20).contains(&self.places.max_beaches) {
            return Err(SurfError::config("Maximum beaches must be between 1 and 20").into());
        }

        if !(1..=30).contains(&self.forecast.window_days) {
            return Err(SurfError::config("History window must be between 1 and 30 days").into());
        }

        if !(1..=48).contains(&self.forecast.horizon) {
            return Err(SurfError::config("Forecast horizon must be between 1 and 48 steps").into());
        }

        if !(1..=32).contains(&self.forecast.concurrency) {
            return Err(SurfError::config("Forecast concurrency must be between 1 and 32").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SurfError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SurfError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if MissingParameterPolicy::from_label(&self.ranking.missing_parameter).is_none() {
            return Err(SurfError::config(format!(
                "Invalid missing parameter policy '{}'. Must be one of: exclude, zero",
                self.ranking.missing_parameter
            ))
            .into());
        }

        for (name, url) in [
            ("Marine", &self.marine.base_url),
            ("Places", &self.places.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SurfError::config(format!(
                    "{name} API base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
