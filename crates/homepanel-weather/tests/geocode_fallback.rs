//! Integration tests for CityResolver using wiremock.
//!
//! Two mock servers stand in for Open-Meteo and Nominatim so each test can
//! assert exactly which provider was consulted.

use std::time::Duration;

use homepanel_weather::{
    CityResolver, GeoPoint, GeocodeSource, NominatimGeocoder, OpenMeteoGeocoder, Resolution,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_AGENT: &str = "Homepanel-test/0.1 (local)";

fn resolver(primary: &MockServer, fallback: &MockServer) -> CityResolver {
    CityResolver::new(
        OpenMeteoGeocoder::new(&primary.uri(), Duration::from_secs(5)).unwrap(),
        NominatimGeocoder::new(&fallback.uri(), USER_AGENT, Duration::from_secs(5)).unwrap(),
    )
}

async fn mount_nominatim_unused(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_primary_hit_never_consults_fallback() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Rocklin, CA"))
        .and(query_param("count", "1"))
        .and(query_param("language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                {"name": "Rocklin", "latitude": 38.79073, "longitude": -121.23578},
                {"name": "Elsewhere", "latitude": 1.0, "longitude": 2.0}
            ]
        })))
        .expect(1)
        .mount(&primary)
        .await;
    mount_nominatim_unused(&fallback).await;

    let resolution = resolver(&primary, &fallback).resolve("Rocklin/CA").await;

    assert_eq!(
        resolution,
        Resolution::Found {
            point: GeoPoint::new(38.79073, -121.23578),
            source: GeocodeSource::OpenMeteo,
        }
    );
}

#[tokio::test]
async fn test_empty_primary_falls_back_to_nominatim() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "generationtime_ms": 0.5
        })))
        .expect(1)
        .mount(&primary)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Loomis, CA"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "1"))
        .and(query_param("addressdetails", "1"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"lat": "38.8213", "lon": "-121.1930", "display_name": "Loomis"}
        ])))
        .expect(1)
        .mount(&fallback)
        .await;

    let resolution = resolver(&primary, &fallback).resolve("  Loomis/CA ").await;

    assert_eq!(
        resolution,
        Resolution::Found {
            point: GeoPoint::new(38.8213, -121.1930),
            source: GeocodeSource::Nominatim,
        }
    );
}

#[tokio::test]
async fn test_primary_error_falls_back() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&primary)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"lat": "51.5073", "lon": "-0.1276"}
        ])))
        .expect(1)
        .mount(&fallback)
        .await;

    let resolution = resolver(&primary, &fallback).resolve("London").await;

    assert_eq!(resolution.point(), Some(GeoPoint::new(51.5073, -0.1276)));
}

#[tokio::test]
async fn test_both_failing_is_not_found() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&primary)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&fallback)
        .await;

    let resolution = resolver(&primary, &fallback).resolve("Atlantis").await;

    assert_eq!(resolution, Resolution::NotFound);
}

#[tokio::test]
async fn test_both_empty_is_not_found() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": []})))
        .mount(&primary)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&fallback)
        .await;

    let resolution = resolver(&primary, &fallback).resolve("Nowhere Town").await;

    assert_eq!(resolution, Resolution::NotFound);
}

#[tokio::test]
async fn test_blank_city_makes_no_requests() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&primary)
        .await;
    mount_nominatim_unused(&fallback).await;

    let resolution = resolver(&primary, &fallback).resolve("  \t  ").await;

    assert_eq!(resolution, Resolution::NotFound);
}

#[tokio::test]
async fn test_probe_reports_both_raw_answers() {
    let primary = MockServer::start().await;
    let fallback = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("count", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{"latitude": 38.79, "longitude": -121.23}]
        })))
        .mount(&primary)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&fallback)
        .await;

    let probe = resolver(&primary, &fallback).probe("Rocklin/CA").await;

    assert_eq!(probe.sanitized, "Rocklin, CA");
    assert_eq!(probe.open_meteo["results"][0]["latitude"], 38.79);
    assert!(probe.nominatim["error"].as_str().unwrap().contains("502"));
}
