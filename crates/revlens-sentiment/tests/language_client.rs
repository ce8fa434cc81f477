//! Integration tests for `GoogleLanguageClient` using wiremock HTTP mocks.

use std::time::Duration;

use revlens_sentiment::{GoogleLanguageClient, OracleError, SentimentOracle};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/v1/documents:analyzeSentiment";

fn test_client(server: &MockServer) -> GoogleLanguageClient {
    GoogleLanguageClient::with_base_url(
        "test-key",
        1,
        "revlens-test/0.1",
        &format!("{}/v1", server.uri()),
    )
    .expect("client construction should not fail")
}

async fn mount_status(server: &MockServer, status: u16, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn score_posts_plain_text_document_and_returns_score() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(query_param("key", "test-key"))
        .and(body_partial_json(json!({
            "document": { "type": "PLAIN_TEXT", "content": "Great coffee" },
            "encodingType": "UTF8"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documentSentiment": { "magnitude": 0.8, "score": 0.8 },
            "language": "en",
            "sentences": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let score = test_client(&server)
        .score("Great coffee")
        .await
        .expect("should score");
    assert!((score - 0.8).abs() < f32::EPSILON, "got {score}");
}

#[tokio::test]
async fn omitted_score_is_neutral() {
    let server = MockServer::start().await;
    mount_status(
        &server,
        200,
        json!({ "documentSentiment": { "magnitude": 0.1 }, "language": "en" }),
    )
    .await;

    let score = test_client(&server).score("It is a shop.").await;
    assert_eq!(score, Ok(0.0));
}

#[tokio::test]
async fn missing_document_sentiment_is_unknown() {
    let server = MockServer::start().await;
    mount_status(&server, 200, json!({ "language": "en" })).await;

    let err = test_client(&server).score("text").await.unwrap_err();
    assert!(matches!(err, OracleError::Unknown(_)), "got {err:?}");
}

#[tokio::test]
async fn bad_request_is_invalid_input() {
    let server = MockServer::start().await;
    mount_status(
        &server,
        400,
        json!({ "error": {
            "code": 400,
            "message": "The language xx is not supported for document_sentiment analysis.",
            "status": "INVALID_ARGUMENT"
        }}),
    )
    .await;

    let err = test_client(&server).score("qwzx").await.unwrap_err();
    assert_eq!(
        err,
        OracleError::InvalidInput(
            "The language xx is not supported for document_sentiment analysis.".to_string()
        )
    );
}

#[tokio::test]
async fn too_many_requests_is_quota_exceeded() {
    let server = MockServer::start().await;
    mount_status(
        &server,
        429,
        json!({ "error": { "code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED" }}),
    )
    .await;

    let err = test_client(&server).score("text").await.unwrap_err();
    assert!(matches!(err, OracleError::QuotaExceeded(_)), "got {err:?}");
}

#[tokio::test]
async fn server_error_is_unknown() {
    let server = MockServer::start().await;
    mount_status(
        &server,
        500,
        json!({ "error": { "code": 500, "message": "Internal error", "status": "INTERNAL" }}),
    )
    .await;

    let err = test_client(&server).score("text").await.unwrap_err();
    assert_eq!(err, OracleError::Unknown("HTTP 500: Internal error".to_string()));
}

#[tokio::test]
async fn slow_response_is_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "documentSentiment": { "score": 0.5 } }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = test_client(&server).score("text").await.unwrap_err();
    assert!(matches!(err, OracleError::Timeout(_)), "got {err:?}");
}

#[tokio::test]
async fn blank_text_is_rejected_without_a_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = test_client(&server).score("   \n").await.unwrap_err();
    assert_eq!(err, OracleError::InvalidInput("empty document".to_string()));
}
