//! OpenWeather proxy for the Folio weather widget.
//!
//! Forwards place-name or coordinate lookups to OpenWeather with a
//! server-held API key and relays the provider's answer untouched.

pub mod error;
pub mod handler;
pub mod params;
pub mod routes;
pub mod upstream;

pub use error::ProxyError;
pub use handler::{ProxyReply, WeatherProxy};
pub use params::{ProxyParams, ProxyTarget};
pub use routes::{routes, serve};
pub use upstream::{UpstreamClient, UpstreamReply};
