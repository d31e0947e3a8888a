//! Integration tests for the weather proxy using wiremock as the provider.

use std::sync::Arc;
use std::time::Duration;

use folio_proxy::{routes, UpstreamClient, WeatherProxy};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CORS: [(&str, &str); 3] = [
    ("access-control-allow-origin", "*"),
    ("access-control-allow-headers", "Content-Type"),
    ("access-control-allow-methods", "GET,OPTIONS"),
];

fn paris() -> serde_json::Value {
    serde_json::json!({
        "weather": [{"description": "clear sky", "icon": "01d"}],
        "main": {"temp": 21.4, "feels_like": 20.9, "pressure": 1016, "humidity": 48},
        "wind": {"speed": 3.6},
        "sys": {"country": "FR"},
        "name": "Paris",
        "cod": 200
    })
}

fn proxy_for(server: &MockServer, api_key: Option<&str>) -> Arc<WeatherProxy> {
    let upstream = UpstreamClient::new(
        &format!("{}/data/2.5/weather", server.uri()),
        Duration::from_secs(5),
    )
    .unwrap();
    Arc::new(WeatherProxy::new(upstream, api_key.map(str::to_string)))
}

fn assert_cors(response: &warp::http::Response<warp::hyper::body::Bytes>) {
    for (name, value) in CORS {
        assert_eq!(
            response.headers().get(name).map(|v| v.to_str().unwrap()),
            Some(value),
            "header {}",
            name
        );
    }
}

#[tokio::test]
async fn test_place_query_is_forwarded_with_key() {
    let provider = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Paris"))
        .and(query_param("appid", "secret"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris()))
        .expect(1)
        .mount(&provider)
        .await;

    let filter = routes(proxy_for(&provider, Some("secret")));
    let response = warp::test::request()
        .method("GET")
        .path("/weather?q=Paris")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), 200);
    assert_cors(&response);
    let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(body, paris());
}

#[tokio::test]
async fn test_provider_url_with_query_keeps_its_parameters() {
    let provider = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lang", "de"))
        .and(query_param("q", "Sao Paulo"))
        .and(query_param("appid", "secret"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris()))
        .expect(1)
        .mount(&provider)
        .await;

    let upstream = UpstreamClient::new(
        &format!("{}/data/2.5/weather?lang=de", provider.uri()),
        Duration::from_secs(5),
    )
    .unwrap();
    let filter = routes(Arc::new(WeatherProxy::new(
        upstream,
        Some("secret".to_string()),
    )));
    let response = warp::test::request()
        .method("GET")
        .path("/api/weather?q=Sao%20Paulo")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_coordinate_query_has_no_place_parameter() {
    let provider = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "41.7"))
        .and(query_param("lon", "44.8"))
        .and(query_param("units", "imperial"))
        .and(query_param_is_missing("q"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris()))
        .expect(1)
        .mount(&provider)
        .await;

    let filter = routes(proxy_for(&provider, Some("secret")));
    let response = warp::test::request()
        .path("/api/weather?lat=41.7&lon=44.8&units=imperial")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_provider_404_is_relayed_untouched() {
    let provider = MockServer::start().await;
    let raw = r#"{"cod":"404","message":"city not found"}"#;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(raw, "application/json"))
        .mount(&provider)
        .await;

    let filter = routes(proxy_for(&provider, Some("secret")));
    let response = warp::test::request()
        .path("/weather?q=Atlantis")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), 404);
    assert_eq!(response.body().as_ref(), raw.as_bytes());
    assert_cors(&response);
}

#[tokio::test]
async fn test_options_preflight() {
    let provider = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&provider)
        .await;

    let filter = routes(proxy_for(&provider, None));
    let response = warp::test::request()
        .method("OPTIONS")
        .path("/weather")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), 204);
    assert!(response.body().is_empty());
    assert_cors(&response);
}

#[tokio::test]
async fn test_missing_query_is_400() {
    let provider = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&provider)
        .await;

    let filter = routes(proxy_for(&provider, Some("secret")));
    for uri in ["/weather", "/weather?lat=41.7", "/weather?units=imperial"] {
        let response = warp::test::request().path(uri).reply(&filter).await;
        assert_eq!(response.status(), 400, "uri {}", uri);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["error"], "Missing query");
        assert_cors(&response);
    }
}

#[tokio::test]
async fn test_missing_key_is_500_regardless_of_params() {
    let provider = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&provider)
        .await;

    let filter = routes(proxy_for(&provider, None));
    for uri in ["/weather", "/weather?q=Paris", "/weather?lat=1&lon=2"] {
        let response = warp::test::request().path(uri).reply(&filter).await;
        assert_eq!(response.status(), 500, "uri {}", uri);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["error"], "Missing OPENWEATHER_API_KEY");
    }
}

#[tokio::test]
async fn test_unknown_path_is_not_handled() {
    let provider = MockServer::start().await;
    let filter = routes(proxy_for(&provider, Some("secret")));

    let response = warp::test::request().path("/forecast?q=Paris").reply(&filter).await;
    assert_eq!(response.status(), 404);
}
