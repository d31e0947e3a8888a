use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable holding the OpenWeather credential.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

const APP_DIR: &str = "folio";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Weather proxy settings
    #[serde(default)]
    pub proxy: ProxyConfig,

    /// Weather widget settings
    #[serde(default)]
    pub widget: WidgetConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Address the proxy listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// OpenWeather current-weather endpoint
    #[serde(default = "default_provider_url")]
    pub provider_url: String,

    /// OpenWeather API key. `OPENWEATHER_API_KEY` overrides this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Upper bound on a single provider call
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8888".to_string()
}

fn default_provider_url() -> String {
    "https://api.openweathermap.org/data/2.5/weather".to_string()
}

fn default_upstream_timeout_secs() -> u64 {
    10
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            provider_url: default_provider_url(),
            api_key: None,
            upstream_timeout_secs: default_upstream_timeout_secs(),
        }
    }
}

impl ProxyConfig {
    /// Parsed listen address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr
            .parse()
            .with_context(|| format!("Invalid bind address: {}", self.bind_addr))
    }

    /// True if a non-blank API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .map(|k| !k.trim().is_empty())
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Base URL of the weather proxy (the widget appends `/weather`)
    #[serde(default = "default_proxy_base_url")]
    pub proxy_base_url: String,

    /// City queried on first start when nothing was searched before
    #[serde(default = "default_fallback_city")]
    pub fallback_city: String,

    /// Bounded wait for a location fix
    #[serde(default = "default_geolocation_timeout_ms")]
    pub geolocation_timeout_ms: u64,

    /// Lifetime of a toast notification
    #[serde(default = "default_toast_ms")]
    pub toast_ms: u64,

    /// Where preferences (units, theme, recent cities) are kept
    #[serde(default = "default_preferences_file")]
    pub preferences_file: PathBuf,
}

fn default_proxy_base_url() -> String {
    "http://127.0.0.1:8888/api".to_string()
}

fn default_fallback_city() -> String {
    "Tbilisi".to_string()
}

fn default_geolocation_timeout_ms() -> u64 {
    8000
}

fn default_toast_ms() -> u64 {
    3000
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn default_preferences_file() -> PathBuf {
    default_config_dir().join("preferences.json")
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            proxy_base_url: default_proxy_base_url(),
            fallback_city: default_fallback_city(),
            geolocation_timeout_ms: default_geolocation_timeout_ms(),
            toast_ms: default_toast_ms(),
            preferences_file: default_preferences_file(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proxy: ProxyConfig::default(),
            widget: WidgetConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the user config directory, creating a default
    /// file if none exists, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from an explicit path, creating it with defaults if
    /// missing. No environment overrides are applied.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Wrote default configuration to {}", path.display());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::Malformed(format!("{}: {}", path.display(), e)))?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        Self::load()?.ensure_valid()
    }

    /// Fail with `ConfigError::Invalid` if validation reports errors; log
    /// warnings otherwise.
    pub fn ensure_valid(self) -> Result<(Self, ValidationResult)> {
        let validation = self.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((self, validation))
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            tracing::debug!("Using API key from {}", API_KEY_ENV);
            self.proxy.api_key = Some(key);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if let Err(e) = self.proxy.socket_addr() {
            result.add_error("proxy.bind_addr", e.to_string());
        }

        self.validate_url(&self.proxy.provider_url, "proxy.provider_url", &mut result);
        self.validate_url(&self.widget.proxy_base_url, "widget.proxy_base_url", &mut result);

        if !self.proxy.has_api_key() {
            result.add_error(
                "proxy.api_key",
                format!("No API key configured; set {}", API_KEY_ENV),
            );
        }

        if self.proxy.upstream_timeout_secs == 0 {
            result.add_error(
                "proxy.upstream_timeout_secs",
                "Upstream timeout must be greater than 0",
            );
        }

        if self.widget.fallback_city.trim().is_empty() {
            result.add_error("widget.fallback_city", "Fallback city must not be empty");
        }

        if self.widget.geolocation_timeout_ms == 0 {
            result.add_warning(
                "widget.geolocation_timeout_ms",
                "Geolocation will time out immediately (0 ms)",
            );
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Missing("dirs::config_dir() returned nothing".into()))?
            .join(APP_DIR);

        Ok(config_dir.join("config.toml"))
    }
}
