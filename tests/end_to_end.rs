//! Widget -> proxy -> provider, with wiremock as the provider and the proxy
//! served by warp on an ephemeral port.

use std::sync::Arc;
use std::time::Duration;

use folio_proxy::{routes, UpstreamClient, WeatherProxy};
use folio_weather::{Coordinates, FixedLocator, Units};
use folio_widget::service::{locate, run_ticket};
use folio_widget::{MemoryStore, ProxyClient, ViewModel, WeatherWidget, WidgetSettings};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn tbilisi() -> serde_json::Value {
    serde_json::json!({
        "weather": [{"description": "scattered clouds", "icon": "03d"}],
        "main": {"temp": 26.5, "feels_like": 26.2, "pressure": 1011, "humidity": 39},
        "wind": {"speed": 4.1},
        "sys": {"country": "GE"},
        "name": "Tbilisi",
        "cod": 200
    })
}

/// Serve a proxy backed by `provider`, returning the widget's base URL
fn spawn_proxy(provider: &MockServer, api_key: Option<&str>) -> String {
    let upstream = UpstreamClient::new(
        &format!("{}/data/2.5/weather", provider.uri()),
        Duration::from_secs(5),
    )
    .unwrap();
    let proxy = Arc::new(WeatherProxy::new(upstream, api_key.map(str::to_string)));

    let (addr, server) = warp::serve(routes(proxy)).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    format!("http://{}/api", addr)
}

fn widget() -> WeatherWidget<MemoryStore, ViewModel> {
    WeatherWidget::new(
        MemoryStore::default(),
        ViewModel::default(),
        WidgetSettings::default(),
    )
}

#[tokio::test]
async fn test_startup_renders_fallback_city() {
    let provider = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Tbilisi"))
        .and(query_param("appid", "k3y"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tbilisi()))
        .expect(1)
        .mount(&provider)
        .await;

    let source = ProxyClient::new(&spawn_proxy(&provider, Some("k3y"))).unwrap();
    let mut w = widget();
    assert!(folio_widget::service::start(&mut w, &source).await);

    let card = w.view().card.as_ref().unwrap();
    assert_eq!(card.place, "Tbilisi, GE");
    assert_eq!(card.temperature, "27°C");
    assert_eq!(card.feels_like, "Feels like 26°C");
    assert_eq!(card.humidity, "Humidity 39%");
    assert_eq!(card.wind, "Wind 4.1 m/s");
    assert_eq!(card.pressure, "Pressure 1011 hPa");
    assert_eq!(card.icon_url, "https://openweathermap.org/img/wn/03d@2x.png");
    assert_eq!(w.store().snapshot().recent_cities, vec!["Tbilisi"]);
}

#[tokio::test]
async fn test_location_flow_sends_coordinates_only() {
    let provider = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("lat", "41.71"))
        .and(query_param("lon", "44.79"))
        .and(query_param("units", "imperial"))
        .and(query_param_is_missing("q"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tbilisi()))
        .expect(1)
        .mount(&provider)
        .await;

    let source = ProxyClient::new(&spawn_proxy(&provider, Some("k3y"))).unwrap();
    let mut w = widget();
    assert!(w.set_units(Units::Imperial).is_none());

    let locator = FixedLocator(Coordinates::new(41.71, 44.79));
    assert!(locate(&mut w, &locator, &source).await);
    assert_eq!(w.view().card.as_ref().unwrap().temperature, "27°F");
}

#[tokio::test]
async fn test_provider_error_reaches_status_line() {
    let provider = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&provider)
        .await;

    let source = ProxyClient::new(&spawn_proxy(&provider, Some("k3y"))).unwrap();
    let mut w = widget();
    let ticket = w.submit("Nowhereville").unwrap();
    run_ticket(&mut w, &source, ticket).await;

    assert_eq!(w.view().status.text, "Error: city not found");
    assert!(w.view().card.is_none());
}

#[tokio::test]
async fn test_keyless_proxy_reports_missing_key() {
    let provider = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tbilisi()))
        .expect(0)
        .mount(&provider)
        .await;

    let source = ProxyClient::new(&spawn_proxy(&provider, None)).unwrap();
    let mut w = widget();
    let ticket = w.submit("Tbilisi").unwrap();
    run_ticket(&mut w, &source, ticket).await;

    assert_eq!(w.view().status.text, "Error: Missing OPENWEATHER_API_KEY");
}
