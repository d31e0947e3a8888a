use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::instrument;
use url::Url;

use crate::error::ProxyError;
use crate::params::{ProxyParams, ProxyTarget};

/// Stands in for the credential in logged URLs
const REDACTED: &str = "REDACTED";

/// Raw provider answer, relayed to the caller as-is
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// HTTP client for the OpenWeather current-weather endpoint
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Arc<Client>,
    provider_url: Url,
}

impl UpstreamClient {
    pub fn new(provider_url: &str, timeout: Duration) -> Result<Self, ProxyError> {
        let provider_url = Url::parse(provider_url).map_err(|e| ProxyError::ProviderUrl {
            url: provider_url.to_string(),
            message: e.to_string(),
        })?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            provider_url,
        })
    }

    /// Provider URL for a lookup, credential included. Any query already on
    /// the configured URL is kept.
    pub fn request_url(&self, params: &ProxyParams, api_key: &str) -> Url {
        let mut url = self.provider_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            match &params.target {
                ProxyTarget::Place(q) => {
                    pairs.append_pair("q", q);
                }
                ProxyTarget::Coordinates { lat, lon } => {
                    pairs.append_pair("lat", lat).append_pair("lon", lon);
                }
            }
            pairs
                .append_pair("appid", api_key)
                .append_pair("units", &params.units);
        }
        url
    }

    /// Issue a single GET. Any HTTP status is a successful relay; only
    /// transport failures are errors.
    #[instrument(
        skip(self, params, api_key),
        fields(lookup = ?params.target, units = %params.units)
    )]
    pub async fn fetch(
        &self,
        params: &ProxyParams,
        api_key: &str,
    ) -> Result<UpstreamReply, ProxyError> {
        let url = self.request_url(params, api_key);
        tracing::debug!("GET {}", self.request_url(params, REDACTED));

        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?.to_vec();

        tracing::debug!("Provider answered {} ({} bytes)", status, body.len());

        Ok(UpstreamReply {
            status,
            content_type,
            body,
        })
    }
}
