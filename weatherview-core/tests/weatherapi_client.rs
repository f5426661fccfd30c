//! Integration tests for WeatherApiClient using wiremock.
//!
//! These tests verify the request shape and error mapping against a mock HTTP server.

use std::sync::Arc;

use weatherview_core::{
    FetchError, ForecastRequest, ForecastSource, UiState, WeatherApiClient, WeatherController,
    location::{FixedPosition, LocationTracker, StaticPermissions},
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to create a forecast reply
fn forecast_body(name: &str) -> serde_json::Value {
    serde_json::json!({
        "location": { "name": name, "region": "Canarias", "country": "Spain", "lat": 28.1, "lon": -15.4 },
        "current": {
            "temp_c": 22.0,
            "is_day": 1,
            "humidity": 64,
            "condition": { "text": "Sunny", "icon": "//cdn.weatherapi.com/weather/64x64/day/113.png", "code": 1000 }
        },
        "forecast": {
            "forecastday": [{
                "date": "2024-05-01",
                "day": {
                    "maxtemp_c": 24.1,
                    "mintemp_c": 18.2,
                    "condition": { "text": "Sunny", "icon": "" }
                },
                "hour": [
                    { "time": "2024-05-01 00:00", "temp_c": 19.0, "condition": { "text": "Clear", "icon": "" } }
                ]
            }]
        }
    })
}

#[tokio::test]
async fn test_fetch_forecast_sends_expected_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .and(query_param("key", "TEST_KEY"))
        .and(query_param("q", "28.1,-15.4"))
        .and(query_param("days", "3"))
        .and(query_param("aqi", "no"))
        .and(query_param("alerts", "no"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("Las Palmas de Gran Canaria")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = WeatherApiClient::with_base_url("TEST_KEY".into(), mock_server.uri());
    let snap = client.fetch_forecast(&ForecastRequest::new("28.1,-15.4", 3)).await.unwrap();

    assert_eq!(snap.location.name, "Las Palmas de Gran Canaria");
    assert_eq!(snap.current.humidity, Some(64));
    assert_eq!(snap.today().unwrap().hour.len(), 1);
}

#[tokio::test]
async fn test_fetch_forecast_forwards_place_name_and_extras() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .and(query_param("q", "Las Palmas de Gran Canaria"))
        .and(query_param("days", "7"))
        .and(query_param("aqi", "yes"))
        .and(query_param("alerts", "yes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("Las Palmas de Gran Canaria")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = WeatherApiClient::with_base_url("KEY".into(), mock_server.uri());
    let request = ForecastRequest::new("Las Palmas de Gran Canaria", 7)
        .with_air_quality(true)
        .with_alerts(true);

    assert!(client.fetch_forecast(&request).await.is_ok());
}

#[tokio::test]
async fn test_forecast_block_is_optional() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "location": { "name": "Madrid" },
            "current": { "temp_c": 12.0, "condition": { "text": "Overcast", "icon": "" } }
        })))
        .mount(&mock_server)
        .await;

    let client = WeatherApiClient::with_base_url("KEY".into(), mock_server.uri());
    let snap = client.fetch_forecast(&ForecastRequest::new("Madrid", 3)).await.unwrap();

    assert!(snap.forecast.is_none());
}

#[tokio::test]
async fn test_api_error_status_maps_to_status_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": { "code": 1006, "message": "No matching location found." }
        })))
        .mount(&mock_server)
        .await;

    let client = WeatherApiClient::with_base_url("KEY".into(), mock_server.uri());
    let err = client.fetch_forecast(&ForecastRequest::new("Nowhere", 3)).await.unwrap_err();

    assert_eq!(
        err,
        FetchError::Status { status: 400, message: "No matching location found.".into() }
    );
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_non_json_error_body_is_kept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&mock_server)
        .await;

    let client = WeatherApiClient::with_base_url("KEY".into(), mock_server.uri());
    let err = client.fetch_forecast(&ForecastRequest::new("Madrid", 3)).await.unwrap_err();

    assert_eq!(err, FetchError::Status { status: 502, message: "Bad Gateway".into() });
}

#[tokio::test]
async fn test_missing_current_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "location": { "name": "Madrid" }
        })))
        .mount(&mock_server)
        .await;

    let client = WeatherApiClient::with_base_url("KEY".into(), mock_server.uri());
    let err = client.fetch_forecast(&ForecastRequest::new("Madrid", 3)).await.unwrap_err();

    match err {
        FetchError::Decode(msg) => assert!(msg.contains("current")),
        other => panic!("expected decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error_without_key() {
    // Bind and drop a listener so nothing answers on the port.
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let client = WeatherApiClient::with_base_url("SECRET_KEY".into(), uri);
    let err = client.fetch_forecast(&ForecastRequest::new("Madrid", 3)).await.unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)));
    assert!(!err.to_string().contains("SECRET_KEY"));
}

#[tokio::test]
async fn test_controller_end_to_end_with_fallback_place() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .and(query_param("q", "Las Palmas de Gran Canaria"))
        .and(query_param("days", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body("Las Palmas de Gran Canaria")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = WeatherApiClient::with_base_url("KEY".into(), mock_server.uri());
    let location = LocationTracker::new(StaticPermissions::default(), FixedPosition(None));
    let ctl = WeatherController::new(Arc::new(client), Arc::new(location), "Las Palmas de Gran Canaria");
    let mut rx = ctl.subscribe();

    ctl.fetch_weather_for_current_location(3);
    let state = rx.wait_for(UiState::is_terminal).await.unwrap().clone();

    let snap = state.snapshot().expect("expected success");
    assert_eq!(snap.location.name, "Las Palmas de Gran Canaria");
}

#[tokio::test]
async fn test_controller_end_to_end_error_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast.json"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": { "code": 2006, "message": "API key is invalid." }
        })))
        .mount(&mock_server)
        .await;

    let client = WeatherApiClient::with_base_url("BAD".into(), mock_server.uri());
    let location = LocationTracker::new(
        StaticPermissions { fine: true, coarse: true },
        FixedPosition(Some(weatherview_core::Coordinates::new(40.4, -3.7))),
    );
    let ctl = WeatherController::new(Arc::new(client), Arc::new(location), "Madrid");

    ctl.refresh_for_current_location(3).await;

    let state = ctl.state();
    let message = state.error_message().expect("expected error state");
    assert!(message.contains("401"));
    assert!(message.contains("API key is invalid."));
}
