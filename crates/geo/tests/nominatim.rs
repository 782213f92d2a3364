//! Integration tests for the Nominatim geocoder.
//!
//! Uses wiremock for HTTP mocking. Tests cover request shape, jsonv2
//! decoding, error bodies, status mapping and caching through `GeoResolver`.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tiercache_cache::{CacheConfig, CacheStore};
use tiercache_geo::{
    Coordinates, GeoConfig, GeoResolver, GeocodeError, Geocoder, NominatimConfig,
    NominatimGeocoder, ResolutionSource,
};
use tiercache_utils::{RateLimiter, RateLimiterConfig};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_geocoder(mock_server: &MockServer) -> NominatimGeocoder {
    let config = NominatimConfig::default()
        .with_base_url(mock_server.uri())
        .with_user_agent("tiercache-tests/1.0");
    NominatimGeocoder::new(config).expect("failed to create geocoder")
}

fn zocalo() -> serde_json::Value {
    json!({
        "place_id": 307563201,
        "lat": "19.4326009",
        "lon": "-99.1333416",
        "display_name": "Plaza de la Constitución, Centro, Cuauhtémoc, Ciudad de México, 06000, México",
        "address": {
            "road": "Plaza de la Constitución",
            "neighbourhood": "Centro",
            "city": "Ciudad de México",
            "state": "Ciudad de México",
            "postcode": "06000",
            "country": "México",
            "country_code": "mx"
        }
    })
}

#[tokio::test]
async fn test_reverse_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("format", "jsonv2"))
        .and(query_param("lat", "19.4326"))
        .and(query_param("lon", "-99.1332"))
        .and(query_param("addressdetails", "1"))
        .and(header("user-agent", "tiercache-tests/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(zocalo()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let geocoder = create_test_geocoder(&mock_server);
    let address = geocoder
        .reverse(Coordinates::new(19.4326, -99.1332))
        .await
        .expect("reverse failed");

    assert_eq!(address.road.as_deref(), Some("Plaza de la Constitución"));
    assert_eq!(address.city.as_deref(), Some("Ciudad de México"));
    assert_eq!(address.country_code.as_deref(), Some("mx"));
    assert!((address.coordinates.longitude - -99.1333416).abs() < 1e-9);
    assert!(!address.is_fallback());
}

#[tokio::test]
async fn test_reverse_uses_town_when_city_missing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lat": "47.2692",
            "lon": "11.4041",
            "display_name": "Hall in Tirol, Tirol, Österreich",
            "address": { "town": "Hall in Tirol", "country": "Österreich" }
        })))
        .mount(&mock_server)
        .await;

    let geocoder = create_test_geocoder(&mock_server);
    let address = geocoder
        .reverse(Coordinates::new(47.2692, 11.4041))
        .await
        .expect("reverse failed");

    assert_eq!(address.city.as_deref(), Some("Hall in Tirol"));
    assert_eq!(address.road, None);
}

#[tokio::test]
async fn test_reverse_sends_accept_language() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(header("accept-language", "es"))
        .respond_with(ResponseTemplate::new(200).set_body_json(zocalo()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = NominatimConfig::default()
        .with_base_url(format!("{}/", mock_server.uri()))
        .with_accept_language("es");
    let geocoder = NominatimGeocoder::new(config).expect("failed to create geocoder");

    geocoder
        .reverse(Coordinates::new(19.4326, -99.1332))
        .await
        .expect("reverse failed");
}

#[tokio::test]
async fn test_reverse_error_body_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "error": "Unable to geocode" })),
        )
        .mount(&mock_server)
        .await;

    let geocoder = create_test_geocoder(&mock_server);
    let err = geocoder
        .reverse(Coordinates::new(0.0, -160.0))
        .await
        .unwrap_err();

    match err {
        GeocodeError::NotFound(message) => assert_eq!(message, "Unable to geocode"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_reverse_status_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .mount(&mock_server)
        .await;

    let geocoder = create_test_geocoder(&mock_server);
    let err = geocoder
        .reverse(Coordinates::new(19.4326, -99.1332))
        .await
        .unwrap_err();

    assert!(matches!(err, GeocodeError::Status { status: 429, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_reverse_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let geocoder = create_test_geocoder(&mock_server);
    let err = geocoder
        .reverse(Coordinates::new(19.4326, -99.1332))
        .await
        .unwrap_err();

    assert!(matches!(err, GeocodeError::Decode(_)));
    assert!(!err.is_transient());
}

#[test]
fn test_requires_user_agent() {
    let result = NominatimGeocoder::new(NominatimConfig::default().with_user_agent("  "));
    assert!(matches!(result, Err(GeocodeError::Configuration(_))));
}

#[tokio::test]
async fn test_resolver_caches_provider_answer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(zocalo()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resolver = GeoResolver::new(
        CacheStore::in_memory(CacheConfig::default()).expect("cache"),
        RateLimiter::new(RateLimiterConfig::default().with_min_interval(Duration::from_millis(20))),
        Arc::new(create_test_geocoder(&mock_server)),
        GeoConfig::default(),
    )
    .expect("resolver");

    let point = Coordinates::new(19.4326, -99.1332);
    let first = resolver.resolve(point).await;
    let second = resolver.resolve(point).await;

    assert_eq!(first.source, ResolutionSource::Provider);
    assert_eq!(second.source, ResolutionSource::Cache);
    assert_eq!(second.address, first.address);
}
