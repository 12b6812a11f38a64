//! Geocoding integration tests
//!
//! Runs the geocoding client and the `/api/geocode` routes against a
//! wiremock stand-in for the provider.

#![cfg(feature = "ssr")]

mod common;

mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::common::{memory_state, TEST_ORIGIN};
    use postboard::backend::geocode::handlers::GeocodeResponse;
    use postboard::backend::geocode::{GeocodeClient, GeocodeError, Place};
    use postboard::backend::routes::create_router;
    use postboard::backend::server::config::{GeocodeConfig, ServerConfig};

    const API_KEY: &str = "test-key";

    fn geocode_config(provider: &MockServer) -> GeocodeConfig {
        GeocodeConfig {
            base_url: provider.uri(),
            api_key: Some(API_KEY.to_string()),
            ..GeocodeConfig::default()
        }
    }

    async fn mount_forward(provider: &MockServer, status: u16, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/v2/local/search/address.json"))
            .and(header("Authorization", "KakaoAK test-key"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(provider)
            .await;
    }

    #[tokio::test]
    async fn test_forward_lookup_normalises_documents() {
        let provider = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/local/search/address.json"))
            .and(query_param("query", "판교역로 235"))
            .and(header("Authorization", "KakaoAK test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "documents": [
                    {"address_name": "경기 성남시 분당구 판교역로 235", "x": "127.1100", "y": "37.4020"}
                ],
                "meta": {"total_count": 1}
            })))
            .expect(1)
            .mount(&provider)
            .await;

        let client = GeocodeClient::new(geocode_config(&provider));
        let places = client.forward("판교역로 235").await.unwrap();

        assert_eq!(
            places,
            vec![Place {
                address: "경기 성남시 분당구 판교역로 235".to_string(),
                lat: 37.402,
                lng: 127.11,
            }]
        );
    }

    #[tokio::test]
    async fn test_reverse_lookup_prefers_road_address() {
        let provider = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/local/geo/coord2address.json"))
            .and(query_param("x", "127.11"))
            .and(query_param("y", "37.402"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "documents": [{
                    "road_address": {"address_name": "경기 성남시 분당구 판교역로 235"},
                    "address": {"address_name": "경기 성남시 분당구 삼평동 681"}
                }]
            })))
            .mount(&provider)
            .await;

        let client = GeocodeClient::new(geocode_config(&provider));
        let places = client.reverse(37.402, 127.11).await.unwrap();

        assert_eq!(places.len(), 1);
        assert_eq!(places[0].address, "경기 성남시 분당구 판교역로 235");
        assert_eq!((places[0].lat, places[0].lng), (37.402, 127.11));
    }

    #[tokio::test]
    async fn test_provider_error_status() {
        let provider = MockServer::start().await;
        mount_forward(&provider, 401, json!({"errorType": "AccessDeniedError"})).await;

        let client = GeocodeClient::new(geocode_config(&provider));
        let err = client.forward("anywhere").await.unwrap_err();
        assert!(matches!(err, GeocodeError::Upstream { status: 401 }));
    }

    #[tokio::test]
    async fn test_malformed_provider_body() {
        let provider = MockServer::start().await;
        mount_forward(
            &provider,
            200,
            json!({"documents": [{"address_name": "somewhere", "x": "east", "y": "1.0"}]}),
        )
        .await;

        let client = GeocodeClient::new(geocode_config(&provider));
        assert!(matches!(
            client.forward("somewhere").await,
            Err(GeocodeError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_routes_proxy_to_provider() {
        let provider = MockServer::start().await;
        mount_forward(
            &provider,
            200,
            json!({"documents": [{"address_name": "서울 중구 세종대로 110", "x": "126.978", "y": "37.5665"}]}),
        )
        .await;

        let config = ServerConfig::builder()
            .allowed_origin(TEST_ORIGIN)
            .geocode_base_url(provider.uri())
            .geocode_api_key(API_KEY)
            .build()
            .unwrap();
        let (state, _store) = memory_state(config);
        let server = TestServer::new(create_router(state)).unwrap();

        let response = server
            .get("/api/geocode")
            .add_query_param("address", "세종대로 110")
            .await;
        response.assert_status_ok();
        let body: GeocodeResponse = response.json();
        assert!(body.success);
        assert_eq!(body.places[0].address, "서울 중구 세종대로 110");
    }

    #[tokio::test]
    async fn test_provider_failure_maps_to_bad_gateway() {
        let provider = MockServer::start().await;
        mount_forward(&provider, 500, json!({})).await;

        let config = ServerConfig::builder()
            .geocode_base_url(provider.uri())
            .geocode_api_key(API_KEY)
            .build()
            .unwrap();
        let (state, _store) = memory_state(config);
        let server = TestServer::new(create_router(state)).unwrap();

        let response = server.get("/api/geocode").add_query_param("address", "x").await;
        assert_eq!(response.status_code(), StatusCode::BAD_GATEWAY);
    }
}
