//! Integration tests for `GoogleClient` using wiremock HTTP mocks.

use evrange_core::Coordinate;
use evrange_oracle::{DistanceOracle, GoogleClient, OracleError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> GoogleClient {
    GoogleClient::with_base_url("g-key", 5, "evrange-test/0.1", base_url)
        .expect("client construction should not fail")
}

fn berlin() -> Coordinate {
    Coordinate::new(52.52, 13.405).unwrap()
}

fn leipzig() -> Coordinate {
    Coordinate::new(51.3397, 12.3731).unwrap()
}

async fn mount_json(server: &MockServer, status: u16, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/maps/api/directions/json"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn driving_distance_reads_first_leg() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/directions/json"))
        .and(query_param("origin", "52.52,13.405"))
        .and(query_param("destination", "51.3397,12.3731"))
        .and(query_param("key", "g-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "geocoded_waypoints": [],
            "routes": [{
                "summary": "A9",
                "legs": [{
                    "distance": { "text": "190 km", "value": 190_200 },
                    "duration": { "text": "1 hour 55 mins", "value": 6_900 }
                }]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let route = test_client(&server.uri())
        .driving_distance(berlin(), leipzig())
        .await
        .expect("should parse route");
    assert!((route.distance_km - 190.2).abs() < 1e-9);
    assert!((route.duration_min - 115.0).abs() < 1e-9);
}

#[tokio::test]
async fn zero_results_maps_to_no_route() {
    let server = MockServer::start().await;
    mount_json(&server, 200, json!({ "status": "ZERO_RESULTS", "routes": [] })).await;

    let result = test_client(&server.uri())
        .driving_distance(berlin(), leipzig())
        .await;
    assert!(matches!(result, Err(OracleError::NoRoute { .. })));
}

#[tokio::test]
async fn over_query_limit_maps_to_unavailable() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        200,
        json!({ "status": "OVER_QUERY_LIMIT", "error_message": "You have exceeded your rate-limit for this API.", "routes": [] }),
    )
    .await;

    let result = test_client(&server.uri())
        .driving_distance(berlin(), leipzig())
        .await;
    assert!(matches!(result, Err(OracleError::Unavailable { .. })));
}

#[tokio::test]
async fn request_denied_maps_to_rejected() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        200,
        json!({ "status": "REQUEST_DENIED", "error_message": "The provided API key is invalid.", "routes": [] }),
    )
    .await;

    let result = test_client(&server.uri())
        .driving_distance(berlin(), leipzig())
        .await;
    assert!(matches!(result, Err(OracleError::Rejected { .. })));
}

#[tokio::test]
async fn http_500_maps_to_unavailable() {
    let server = MockServer::start().await;
    mount_json(&server, 500, json!({})).await;

    let result = test_client(&server.uri())
        .driving_distance(berlin(), leipzig())
        .await;
    assert!(matches!(result, Err(OracleError::Unavailable { .. })));
}
