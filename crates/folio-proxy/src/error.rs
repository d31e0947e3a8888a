//! Proxy error types.

use folio_core::{AppError, ConfigError, NetworkError, WeatherError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Missing OPENWEATHER_API_KEY")]
    MissingApiKey,

    #[error("Missing query")]
    MissingQuery,

    #[error("Request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Invalid provider URL {url}: {message}")]
    ProviderUrl { url: String, message: String },

    #[error("Failed to bind {addr}: {message}")]
    Bind { addr: String, message: String },
}

impl ProxyError {
    /// HTTP status the proxy answers with
    pub fn status(&self) -> u16 {
        match self {
            Self::MissingQuery => 400,
            _ => 500,
        }
    }

    /// Text of the `error` field in the JSON body. Upstream details stay in
    /// the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "Missing OPENWEATHER_API_KEY",
            Self::MissingQuery => "Missing query",
            _ => "Request failed",
        }
    }

    /// `{"error": "..."}`
    pub fn body(&self) -> String {
        serde_json::json!({ "error": self.public_message() }).to_string()
    }
}

impl From<ProxyError> for AppError {
    fn from(e: ProxyError) -> Self {
        match e {
            ProxyError::MissingApiKey => AppError::Weather(WeatherError::MissingApiKey),
            ProxyError::MissingQuery => AppError::Weather(WeatherError::MissingQuery),
            ProxyError::Upstream(err) => AppError::Network(NetworkError::from_reqwest(&err)),
            ProxyError::ProviderUrl { url, message } => {
                AppError::Config(ConfigError::Invalid(format!("{}: {}", url, message)))
            }
            ProxyError::Bind { addr, message } => {
                AppError::Network(NetworkError::Listen(format!("{}: {}", addr, message)))
            }
        }
    }
}
