//! Integration tests for the VBB client (wiremock-based)

use std::time::Duration;

use chrono::{DateTime, FixedOffset, TimeZone};
use chrono_tz::Europe::Berlin;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vbb::{
    ApiVersion, LocationKind, LocationTypes, TransitClient, TransportError, TransportModes,
    VbbClient, VbbConfig, VbbError,
};

fn client_for(server: &MockServer, api_version: ApiVersion) -> VbbClient {
    let config = VbbConfig {
        timeout_secs: 5,
        ..VbbConfig::new(server.uri(), api_version)
    };
    VbbClient::new(&config).unwrap()
}

fn reference_time() -> DateTime<FixedOffset> {
    Berlin
        .with_ymd_and_hms(2026, 10, 17, 8, 0, 0)
        .unwrap()
        .fixed_offset()
}

const fn current_locations_json() -> &'static str {
    r#"[
        {
            "type": "stop",
            "id": "900100003",
            "name": "S+U Alexanderplatz",
            "location": { "type": "location", "latitude": 52.521508, "longitude": 13.411267 }
        },
        {
            "type": "location",
            "poi": true,
            "id": "900980720",
            "name": "Berlin, Fernsehturm",
            "latitude": 52.520803,
            "longitude": 13.40945
        }
    ]"#
}

const fn current_departures_json() -> &'static str {
    r#"{
        "departures": [
            {
                "direction": "S Erkner",
                "when": "2026-10-17T08:03:00+02:00",
                "plannedWhen": "2026-10-17T08:00:00+02:00",
                "delay": 180,
                "platform": "3",
                "plannedPlatform": "3",
                "line": { "name": "S3", "product": "suburban" }
            },
            {
                "direction": "S+U Pankow",
                "when": "2026-10-17T08:04:00+02:00",
                "plannedWhen": "2026-10-17T08:04:00+02:00",
                "delay": 0,
                "platform": "U2 Gleis 1",
                "plannedPlatform": "U2 Gleis 1",
                "line": { "name": "U2", "product": "subway" }
            }
        ]
    }"#
}

#[tokio::test]
async fn test_search_locations_sends_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations"))
        .and(query_param("query", "Alexanderplatz"))
        .and(query_param("results", "5"))
        .and(query_param("stops", "true"))
        .and(query_param("addresses", "false"))
        .and(query_param("poi", "true"))
        .and(query_param("pretty", "false"))
        .and(query_param_is_missing("fuzzy"))
        .respond_with(ResponseTemplate::new(200).set_body_string(current_locations_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, ApiVersion::Current);
    let locations = client
        .search_locations("Alexanderplatz", LocationTypes::STOPS | LocationTypes::POI, 5)
        .await
        .unwrap();

    assert_eq!(locations.len(), 2);
    assert_eq!(locations[0].kind, LocationKind::Stop);
    assert_eq!(locations[0].id, "900100003");
    assert!((locations[0].latitude - 52.521508).abs() < 1e-9);
    assert_eq!(locations[1].kind, LocationKind::Poi);
}

#[tokio::test]
async fn test_search_locations_without_fuzzy() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations"))
        .and(query_param("fuzzy", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let config = VbbConfig {
        fuzzy: false,
        ..VbbConfig::new(server.uri(), ApiVersion::Current)
    };
    let client = VbbClient::new(&config).unwrap();

    let locations = client
        .search_locations("Alexanderplatz", LocationTypes::ANY, 1)
        .await
        .unwrap();
    assert!(locations.is_empty());
}

#[tokio::test]
async fn test_stops_nearby_current() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations/nearby"))
        .and(query_param("latitude", "52.521508"))
        .and(query_param("longitude", "13.411267"))
        .and(query_param("distance", "400"))
        .and(query_param("results", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[{
                "type": "stop",
                "id": "900100003",
                "name": "S+U Alexanderplatz",
                "location": { "type": "location", "latitude": 52.521508, "longitude": 13.411267 },
                "distance": 54
            }]"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, ApiVersion::Current);
    let stops = client
        .stops_nearby(52.521508, 13.411267, 400, 3)
        .await
        .unwrap();

    assert_eq!(stops.len(), 1);
    assert_eq!(stops[0].distance, Some(54));
}

#[tokio::test]
async fn test_stops_nearby_legacy() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stops/nearby"))
        .and(query_param("latitude", "52.5"))
        .and(query_param_is_missing("distance"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[{
                "type": "stop",
                "id": "900000100003",
                "name": "S+U Alexanderplatz",
                "latitude": 52.521508,
                "longitude": 13.411267,
                "distance": 2400
            }]"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, ApiVersion::Legacy);
    let stops = client.stops_nearby(52.5, 13.4, 400, 3).await.unwrap();

    assert_eq!(stops[0].name, "S+U Alexanderplatz");
    assert!((stops[0].longitude - 13.411267).abs() < 1e-9);
    assert_eq!(stops[0].distance, Some(2400));
}

#[tokio::test]
async fn test_departures_current() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stops/900100003/departures"))
        .and(query_param("when", "2026-10-17T08:00:00+0200"))
        .and(query_param("duration", "30"))
        .and(query_param("suburban", "true"))
        .and(query_param("subway", "true"))
        .and(query_param("tram", "true"))
        .and(query_param("bus", "true"))
        .and(query_param("ferry", "true"))
        .and(query_param("express", "false"))
        .and(query_param("regional", "true"))
        .and(query_param("pretty", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_string(current_departures_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, ApiVersion::Current);
    let departures = client
        .departures(
            "900100003",
            reference_time(),
            Duration::from_secs(30 * 60 + 45),
            TransportModes::URBAN,
        )
        .await
        .unwrap();

    assert_eq!(departures.len(), 2);
    assert_eq!(departures[0].direction, "S Erkner");
    assert_eq!(departures[0].delay, Some(180));
    assert_eq!(departures[0].line.name, "S3");
    assert_eq!(departures[1].platform.as_deref(), Some("U2 Gleis 1"));
}

#[tokio::test]
async fn test_departures_legacy_sends_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stops/900000100003/departures"))
        .and(query_param("when", "2026-10-17T08:00:00+0200"))
        .and(query_param("duration", "10"))
        .and(query_param("bus", "true"))
        .and(query_param("subway", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[{
                "direction": "S+U Hauptbahnhof",
                "when": "2026-10-17T08:02:00+02:00",
                "plannedWhen": "2026-10-17T08:02:00+02:00",
                "delay": 0,
                "platform": 2,
                "plannedPlatform": 2,
                "line": { "name": "TXL", "product": "bus" }
            }]"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, ApiVersion::Legacy);
    let departures = client
        .departures(
            "900000100003",
            reference_time(),
            Duration::from_secs(600),
            TransportModes::BUS,
        )
        .await
        .unwrap();

    assert_eq!(departures.len(), 1);
    assert_eq!(departures[0].platform.as_deref(), Some("2"));
    assert_eq!(departures[0].line.product, "bus");
}

#[tokio::test]
async fn test_arrivals_direction_from_provenance() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stops/900100003/arrivals"))
        .and(query_param("when", "2026-01-15T08:00:00+0100"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{
                "arrivals": [
                    { "direction": "", "provenance": "Platform 3 area", "line": { "name": "S5", "product": "suburban" } },
                    { "direction": "S Westkreuz", "provenance": "S Strausberg Nord", "line": { "name": "S5", "product": "suburban" } }
                ]
            }"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let winter = Berlin
        .with_ymd_and_hms(2026, 1, 15, 8, 0, 0)
        .unwrap()
        .fixed_offset();

    let client = client_for(&server, ApiVersion::Current);
    let arrivals = client
        .arrivals(
            "900100003",
            winter,
            Duration::from_secs(900),
            TransportModes::ALL,
        )
        .await
        .unwrap();

    assert_eq!(arrivals[0].direction, "Platform 3 area");
    assert_eq!(arrivals[1].direction, "S Westkreuz");
}

#[tokio::test]
async fn test_empty_departures() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stops/900100003/departures"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"departures":[]}"#))
        .mount(&server)
        .await;

    let client = client_for(&server, ApiVersion::Current);
    let departures = client
        .departures(
            "900100003",
            reference_time(),
            Duration::from_secs(600),
            TransportModes::ALL,
        )
        .await
        .unwrap();

    assert!(departures.is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, ApiVersion::Current);

    let err = client
        .departures(
            "900100003",
            reference_time(),
            Duration::from_secs(600),
            TransportModes::ALL,
        )
        .await
        .unwrap_err();
    match err {
        VbbError::Decode {
            operation, path, ..
        } => {
            assert_eq!(operation, "departures");
            assert_eq!(path, "/stops/900100003/departures");
        }
        other => panic!("expected decode error, got {other:?}"),
    }

    let err = client
        .arrivals(
            "900100003",
            reference_time(),
            Duration::from_secs(600),
            TransportModes::ALL,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, VbbError::Decode { .. }));

    let err = client
        .search_locations("Alexanderplatz", LocationTypes::ANY, 3)
        .await
        .unwrap_err();
    assert!(matches!(err, VbbError::Decode { .. }));
}

#[tokio::test]
async fn test_wrong_generation_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stops/900100003/departures"))
        .respond_with(ResponseTemplate::new(200).set_body_string(current_departures_json()))
        .mount(&server)
        .await;

    let client = client_for(&server, ApiVersion::Legacy);
    let result = client
        .departures(
            "900100003",
            reference_time(),
            Duration::from_secs(600),
            TransportModes::ALL,
        )
        .await;

    assert!(matches!(result, Err(VbbError::Decode { .. })));
}

#[tokio::test]
async fn test_server_error_is_request_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/stops/000/departures"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"msg":"unknown stop"}"#))
        .mount(&server)
        .await;

    let client = client_for(&server, ApiVersion::Current);
    let err = client
        .departures(
            "000",
            reference_time(),
            Duration::from_secs(600),
            TransportModes::ALL,
        )
        .await
        .unwrap_err();

    match err {
        VbbError::Request {
            operation,
            path,
            source: TransportError::Status(status),
        } => {
            assert_eq!(operation, "departures");
            assert_eq!(path, "/stops/000/departures");
            assert_eq!(status.as_u16(), 404);
        }
        other => panic!("expected request error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_is_request_error() {
    // A dropped MockServer goes back to wiremock's pool and keeps answering,
    // so take a free port from the OS and close it again
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = VbbConfig::new(format!("http://{addr}"), ApiVersion::Current);
    let client = VbbClient::new(&config).unwrap();
    let err = client
        .search_locations("Alexanderplatz", LocationTypes::STOPS, 1)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        VbbError::Request {
            source: TransportError::Http(_),
            ..
        }
    ));
    assert!(!err.is_timeout());
}

#[tokio::test]
async fn test_transport_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("[]")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = VbbConfig {
        timeout_secs: 1,
        ..VbbConfig::new(server.uri(), ApiVersion::Current)
    };
    let client = VbbClient::new(&config).unwrap();

    let err = client
        .stops_nearby(52.52, 13.41, 300, 1)
        .await
        .unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_injected_http_client() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_string(current_locations_json()))
        .expect(1)
        .mount(&server)
        .await;

    let http = reqwest::Client::new();
    let config = VbbConfig::new(server.uri(), ApiVersion::Current);
    let client = VbbClient::with_http_client(&config, http).unwrap();

    let locations = client
        .search_locations("Fernsehturm", LocationTypes::POI, 1)
        .await
        .unwrap();
    assert_eq!(locations.len(), 2);
}

#[tokio::test]
async fn test_is_healthy() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let client = client_for(&server, ApiVersion::Current);
    assert!(client.is_healthy().await);
}

#[tokio::test]
async fn test_is_unhealthy_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server, ApiVersion::Current);
    assert!(!client.is_healthy().await);
}
