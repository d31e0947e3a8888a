//! Request handling, independent of the HTTP server.

use std::collections::HashMap;
use std::time::Duration;

use folio_core::ProxyConfig;
use warp::http::{header, HeaderValue, Method, StatusCode};
use warp::hyper::Body;

use crate::error::ProxyError;
use crate::params::ProxyParams;
use crate::upstream::{UpstreamClient, UpstreamReply};

/// Headers attached to every proxy response
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-headers", "Content-Type"),
    ("access-control-allow-methods", "GET,OPTIONS"),
];

const JSON: &str = "application/json";

/// A complete proxy answer. CORS headers are added when it becomes an HTTP
/// response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyReply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl ProxyReply {
    /// 204 answer to a CORS preflight
    pub fn preflight() -> Self {
        Self {
            status: 204,
            content_type: None,
            body: Vec::new(),
        }
    }

    pub fn from_error(err: &ProxyError) -> Self {
        Self {
            status: err.status(),
            content_type: Some(JSON.to_string()),
            body: err.body().into_bytes(),
        }
    }

    pub fn relay(reply: UpstreamReply) -> Self {
        Self {
            status: reply.status,
            content_type: reply.content_type.or_else(|| Some(JSON.to_string())),
            body: reply.body,
        }
    }
}

impl warp::Reply for ProxyReply {
    fn into_response(self) -> warp::reply::Response {
        let mut response = warp::reply::Response::new(Body::from(self.body));
        *response.status_mut() =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::BAD_GATEWAY);

        let headers = response.headers_mut();
        for (name, value) in CORS_HEADERS {
            headers.insert(name, HeaderValue::from_static(value));
        }
        if let Some(value) = self
            .content_type
            .as_deref()
            .and_then(|ct| HeaderValue::from_str(ct).ok())
        {
            headers.insert(header::CONTENT_TYPE, value);
        }

        response
    }
}

/// Stateless weather proxy. Each call makes at most one provider request.
#[derive(Debug, Clone)]
pub struct WeatherProxy {
    upstream: UpstreamClient,
    api_key: Option<String>,
}

impl WeatherProxy {
    pub fn new(upstream: UpstreamClient, api_key: Option<String>) -> Self {
        Self {
            upstream,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn from_config(config: &ProxyConfig) -> Result<Self, ProxyError> {
        let upstream = UpstreamClient::new(
            &config.provider_url,
            Duration::from_secs(config.upstream_timeout_secs),
        )?;
        Ok(Self::new(upstream, config.api_key.clone()))
    }

    /// Answer one request. Never fails: every path yields a reply.
    pub async fn handle(&self, method: &Method, query: &HashMap<String, String>) -> ProxyReply {
        if *method == Method::OPTIONS {
            return ProxyReply::preflight();
        }

        match self.forward(query).await {
            Ok(reply) => {
                tracing::info!("Relayed provider status {}", reply.status);
                ProxyReply::relay(reply)
            }
            Err(err) => {
                match &err {
                    ProxyError::Upstream(e) => tracing::warn!("Provider request failed: {}", e),
                    other => tracing::debug!("Rejected request: {}", other),
                }
                ProxyReply::from_error(&err)
            }
        }
    }

    async fn forward(&self, query: &HashMap<String, String>) -> Result<UpstreamReply, ProxyError> {
        let api_key = self.api_key.as_deref().ok_or(ProxyError::MissingApiKey)?;
        let params = ProxyParams::from_query(query)?;
        self.upstream.fetch(&params, api_key).await
    }
}
