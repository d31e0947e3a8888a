//! HTTP client for the weather proxy.

use std::future::Future;
use std::sync::Arc;

use folio_weather::{WeatherQuery, WeatherReading};
use reqwest::{Client, StatusCode};
use tracing::instrument;

use crate::error::WidgetError;

const GENERIC_FAILURE: &str = "Request failed";

/// Something that can answer a weather query
pub trait WeatherSource: Send + Sync {
    fn fetch(
        &self,
        query: &WeatherQuery,
    ) -> impl Future<Output = Result<WeatherReading, WidgetError>> + Send;
}

/// Talks to the proxy at `{base_url}/weather`
#[derive(Debug, Clone)]
pub struct ProxyClient {
    client: Arc<Client>,
    base_url: String,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Result<Self, WidgetError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn request_url(&self, query: &WeatherQuery) -> String {
        format!("{}/weather?{}", self.base_url, query.to_query_string())
    }
}

/// Reason for a non-2xx answer: provider `message`, then proxy `error`,
/// then the status text.
fn failure_reason(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            ["message", "error"].iter().find_map(|key| {
                json.get(key)
                    .and_then(serde_json::Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
        })
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

impl WeatherSource for ProxyClient {
    #[instrument(skip(self), level = "debug")]
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherReading, WidgetError> {
        let url = self.request_url(query);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = failure_reason(status, &body);
            tracing::debug!("Proxy answered {}: {}", status, message);
            return Err(WidgetError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body)
            .map_err(|e| WidgetError::Transport(format!("Malformed weather response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_weather::{Coordinates, Units};

    #[test]
    fn test_request_url_for_place() {
        let client = ProxyClient::new("https://example.netlify.app/api/").unwrap();
        let query = WeatherQuery::place("New York", Units::Imperial).unwrap();
        assert_eq!(
            client.request_url(&query),
            "https://example.netlify.app/api/weather?q=New%20York&units=imperial"
        );
    }

    #[test]
    fn test_request_url_for_coordinates() {
        let client = ProxyClient::new("http://localhost:8888/api").unwrap();
        let query = WeatherQuery::coordinates(Coordinates::new(-33.9, 18.4), Units::Metric);
        assert_eq!(
            client.request_url(&query),
            "http://localhost:8888/api/weather?lat=-33.9&lon=18.4&units=metric"
        );
    }

    #[test]
    fn test_failure_reason_order() {
        assert_eq!(
            failure_reason(StatusCode::NOT_FOUND, br#"{"cod":"404","message":"city not found"}"#),
            "city not found"
        );
        assert_eq!(
            failure_reason(StatusCode::BAD_REQUEST, br#"{"error":"Missing query"}"#),
            "Missing query"
        );
        assert_eq!(failure_reason(StatusCode::BAD_GATEWAY, b"<html>"), "Bad Gateway");
        assert_eq!(
            failure_reason(StatusCode::from_u16(599).unwrap(), b""),
            "Request failed"
        );
    }
}
