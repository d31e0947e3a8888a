//! warp routes for the proxy.

use std::net::SocketAddr;
use std::sync::Arc;

use warp::http::Method;
use warp::{Filter, Rejection};

use crate::error::ProxyError;
use crate::handler::{ProxyReply, WeatherProxy};
use crate::params::parse_query;

/// `/weather` and `/api/weather`, any method, any query string.
pub fn routes(
    proxy: Arc<WeatherProxy>,
) -> impl Filter<Extract = (ProxyReply,), Error = Rejection> + Clone {
    let path = warp::path!("weather")
        .or(warp::path!("api" / "weather"))
        .unify();

    // `query::raw` rejects an absent query string; treat it as empty instead.
    let raw_query = warp::query::raw()
        .or(warp::any().map(String::new))
        .unify();

    path.and(warp::method())
        .and(raw_query)
        .and(warp::any().map(move || proxy.clone()))
        .and_then(
            |method: Method, raw: String, proxy: Arc<WeatherProxy>| async move {
                let query = parse_query(&raw);
                Ok::<_, Rejection>(proxy.handle(&method, &query).await)
            },
        )
}

/// Serve the proxy until Ctrl-C.
pub async fn serve(proxy: WeatherProxy, addr: SocketAddr) -> Result<(), ProxyError> {
    let routes = routes(Arc::new(proxy)).with(warp::trace::request());

    let (bound, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(addr, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .map_err(|e| ProxyError::Bind {
            addr: addr.to_string(),
            message: e.to_string(),
        })?;

    tracing::info!("Weather proxy listening on http://{}", bound);
    server.await;
    tracing::info!("Weather proxy stopped");
    Ok(())
}
