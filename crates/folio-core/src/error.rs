//! Error hierarchy shared by the Folio crates.
//!
//! The proxy and the widget keep their own error enums and convert into
//! `AppError` at the binary boundary, where `user_message()` gives the text
//! printed for the person running `folio`.

use thiserror::Error;

/// Top-level error reported by the `folio` binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather error: {0}")]
    Weather(#[from] WeatherError),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Short message suitable for a terminal or status line.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            // Config loading reports through anyhow; the typed cause is kept inside.
            AppError::Other(e) => e
                .downcast_ref::<ConfigError>()
                .map(ConfigError::user_message)
                .unwrap_or("Something went wrong. Run with RUST_LOG=debug for details."),
        }
    }
}

/// Failures talking to, or listening for, HTTP peers.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Could not reach {0}")]
    Unreachable(String),

    #[error("Timed out")]
    Timeout,

    #[error("Could not listen on {0}")]
    Listen(String),

    #[error("{0}")]
    Unexpected(String),
}

impl NetworkError {
    /// Classify a reqwest failure.
    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            NetworkError::Timeout
        } else if err.is_connect() {
            NetworkError::Unreachable(err.to_string())
        } else {
            NetworkError::Unexpected(err.to_string())
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::Unreachable(_) => "The weather service could not be reached.",
            NetworkError::Timeout => "The weather service took too long to answer.",
            NetworkError::Listen(_) => "The proxy could not start. Is the port already in use?",
            NetworkError::Unexpected(_) => "Request failed",
        }
    }
}

/// Problems with `config.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No configuration directory: {0}")]
    Missing(String),

    #[error("{0}")]
    Invalid(String),

    #[error("Cannot parse {0}")]
    Malformed(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Missing(_) => "No configuration directory is available on this system.",
            ConfigError::Invalid(_) => "config.toml has invalid settings. See the log for which.",
            ConfigError::Malformed(_) => "config.toml is not valid TOML.",
        }
    }
}

/// Weather lookup errors, shared by the proxy and the widget.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Missing query")]
    MissingQuery,

    #[error("Missing OPENWEATHER_API_KEY")]
    MissingApiKey,

    #[error("Weather API answered {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Location error: {0}")]
    Location(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::MissingQuery => "Please type a city first.",
            WeatherError::MissingApiKey => "Set OPENWEATHER_API_KEY to use the weather proxy.",
            WeatherError::ApiError { .. } => "The weather provider rejected the request.",
            WeatherError::Location(_) => "Your location could not be determined.",
        }
    }
}

/// Preference store failures. The widget logs these and carries on.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read preferences: {0}")]
    Read(String),

    #[error("Failed to write preferences: {0}")]
    Write(String),

    #[error("Preferences are malformed: {0}")]
    Corrupt(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_error_conversion() {
        let app: AppError = WeatherError::MissingApiKey.into();
        assert!(matches!(app, AppError::Weather(WeatherError::MissingApiKey)));
        assert_eq!(app.user_message(), "Set OPENWEATHER_API_KEY to use the weather proxy.");
    }

    #[test]
    fn test_display_matches_proxy_bodies() {
        assert_eq!(WeatherError::MissingQuery.to_string(), "Missing query");
        assert_eq!(WeatherError::MissingApiKey.to_string(), "Missing OPENWEATHER_API_KEY");
    }

    #[test]
    fn test_config_error_found_inside_anyhow() {
        let err: anyhow::Error = ConfigError::Invalid("proxy.api_key: missing".into()).into();
        let app = AppError::from(err);
        assert_eq!(app.user_message(), ConfigError::Invalid(String::new()).user_message());
    }

    #[test]
    fn test_plain_anyhow_gets_generic_message() {
        let app = AppError::from(anyhow::anyhow!("boom"));
        assert!(app.user_message().contains("RUST_LOG"));
        assert_eq!(app.to_string(), "boom");
    }

    #[tokio::test]
    async fn test_refused_connection_is_unreachable() {
        let err = reqwest::get("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(
            NetworkError::from_reqwest(&err),
            NetworkError::Unreachable(_)
        ));
    }
}
