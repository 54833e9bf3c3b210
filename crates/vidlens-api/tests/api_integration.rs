//! Integration tests for the analysis client.
//!
//! Uses wiremock to play back recorded service responses.

use pretty_assertions::assert_eq;
use serde_json::Value;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vidlens_api::http::{HttpClientOptions, build_client, user_agent};
use vidlens_api::{AnalysisClient, ApiError, Metric};

/// Load a JSON fixture file from the fixtures directory.
fn load_fixture(name: &str) -> Value {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {path}: {e}"));
    serde_json::from_str(&content).unwrap_or_else(|e| panic!("failed to parse fixture {path}: {e}"))
}

fn create_client(server: &MockServer) -> AnalysisClient {
    let http = build_client(&HttpClientOptions {
        app_version: "0.1.0".to_string(),
    })
    .unwrap();
    AnalysisClient::new(http, &format!("{}/", server.uri())).unwrap()
}

async fn mount_generate(server: &MockServer, status: u16, body: Value) {
    Mock::given(method("POST"))
        .and(path("/generate"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_should_parse_recorded_analysis() {
    let server = MockServer::start().await;
    mount_generate(&server, 200, load_fixture("generate_response.json")).await;

    let result = create_client(&server)
        .generate("https://www.youtube.com/watch?v=abc")
        .await
        .unwrap();

    assert!(result.analysis.starts_with("## Résumé"));
    assert_eq!(
        result.preferred_thumbnail(),
        Some("https://i.ytimg.test/vi/abc/maxresdefault.jpg"),
    );
    let metadata = result.metadata.unwrap();
    assert_eq!(metadata.title.as_deref(), Some("Pâtes fraîches en 10 minutes"));
    assert_eq!(metadata.views, Some(Metric::from(152_340)));
    assert_eq!(metadata.channel.as_deref(), Some("Cuisine Facile"));
    assert_eq!(metadata.duration.and_then(|d| d.as_u64()), Some(634));
    assert_eq!(metadata.chapters.map(|c| c.len()), Some(2));
}

#[tokio::test]
async fn test_should_send_identifying_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate"))
        .and(header("user-agent", user_agent("0.1.0").as_str()))
        .and(header("accept", "application/json"))
        .and(body_json(serde_json::json!({ "url": "https://youtu.be/abc" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "analysis": "ok"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = create_client(&server)
        .generate("https://youtu.be/abc")
        .await
        .unwrap();
    assert_eq!(result.analysis, "ok");
}

#[tokio::test]
async fn test_should_surface_service_error_message() {
    let server = MockServer::start().await;
    mount_generate(&server, 500, load_fixture("generate_error.json")).await;

    let err = create_client(&server)
        .generate("https://www.youtube.com/watch?v=abc")
        .await
        .unwrap_err();

    assert!(err.is_service_error());
    assert_eq!(
        err.to_string(),
        "analysis service error (500): Could not retrieve a transcript for the video abc",
    );
}

#[tokio::test]
async fn test_should_tolerate_thumbnail_failure_and_null_metadata() {
    let server = MockServer::start().await;
    mount_generate(&server, 200, load_fixture("thumbnail_failure.json")).await;

    let result = create_client(&server)
        .generate("https://www.youtube.com/watch?v=abc")
        .await
        .unwrap();

    assert_eq!(result.preferred_thumbnail(), None);
    assert!(result.thumbnail_error().unwrap().contains("403"));
    let metadata = result.metadata.unwrap();
    assert!(metadata.title.is_none());
    assert!(metadata.chapters().is_empty());
}

#[tokio::test]
async fn test_should_fail_when_analysis_is_missing() {
    let server = MockServer::start().await;
    mount_generate(&server, 200, serde_json::json!({ "thumbnail": [] })).await;

    let err = create_client(&server)
        .generate("https://www.youtube.com/watch?v=abc")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::JsonParse(_)));
}

#[tokio::test]
async fn test_should_report_unreachable_service() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client =
        AnalysisClient::new(reqwest::Client::new(), &format!("http://127.0.0.1:{port}/")).unwrap();

    let err = client
        .generate("https://www.youtube.com/watch?v=abc")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Request(_)));
    assert_eq!(err.status(), None);
}
