//! Widget error types.

use folio_core::{AppError, NetworkError, WeatherError};
use folio_weather::LocationError;
use thiserror::Error;

const GENERIC_FAILURE: &str = "Request failed";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WidgetError {
    #[error("Please type a city first.")]
    EmptyQuery,

    /// Non-2xx answer from the proxy
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// Network failure or unreadable response
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("{0}")]
    Location(#[from] LocationError),
}

impl WidgetError {
    /// Text shown in the status line and error toast
    pub fn reason(&self) -> String {
        match self {
            Self::Upstream { message, .. } => message.clone(),
            Self::Transport(_) => GENERIC_FAILURE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for WidgetError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

impl From<WidgetError> for AppError {
    fn from(e: WidgetError) -> Self {
        match e {
            WidgetError::EmptyQuery => AppError::Weather(WeatherError::MissingQuery),
            WidgetError::Upstream { status, message } => {
                AppError::Weather(WeatherError::ApiError { status, message })
            }
            WidgetError::Transport(s) => AppError::Network(NetworkError::Unexpected(s)),
            WidgetError::Location(e) => AppError::Weather(WeatherError::Location(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_prefers_upstream_message() {
        let err = WidgetError::Upstream {
            status: 404,
            message: "city not found".into(),
        };
        assert_eq!(err.reason(), "city not found");
    }

    #[test]
    fn test_transport_reason_is_generic() {
        let err = WidgetError::Transport("connection refused".into());
        assert_eq!(err.reason(), "Request failed");
    }

    #[test]
    fn test_location_reason_uses_platform_text() {
        let err: WidgetError = LocationError::Timeout.into();
        assert_eq!(err.reason(), "Location request timed out");
    }

    #[test]
    fn test_maps_to_app_error() {
        let app: AppError = WidgetError::EmptyQuery.into();
        assert_eq!(app.user_message(), "Please type a city first.");

        let app: AppError = WidgetError::Transport("tls handshake".into()).into();
        assert_eq!(app.user_message(), "Request failed");
    }
}
