//! HTTP-level tests for the generation client, using a wiremock server.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use webweaver::generate::{GeminiClient, GeminiConfig, GenerationError};

fn client_for(server: &MockServer) -> GeminiClient {
    let config = GeminiConfig {
        api_key: "test-key".to_string(),
        model: "gemini-2.5-pro".to_string(),
        api_base: server.uri(),
    };
    GeminiClient::new(config)
}

/// Wrap a model reply text in the generateContent response envelope.
fn envelope(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }] }
        }]
    })
}

#[tokio::test]
async fn generate_returns_validated_project() {
    let server = MockServer::start().await;

    let model_output = json!({
        "files": [
            { "path": "index.html", "content": "<h1>hi</h1>" },
            { "path": "README.md", "content": "# demo" }
        ],
        "suggestedRepoName": "demo-site"
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-pro:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": {
                "responseMimeType": "application/json",
                "temperature": 0.2
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(&model_output)))
        .expect(1)
        .mount(&server)
        .await;

    let project = client_for(&server)
        .generate("a demo website")
        .await
        .unwrap();

    assert_eq!(project.suggested_repo_name, "demo-site");
    assert_eq!(project.files.len(), 2);
    assert_eq!(project.files[1].path, "README.md");
}

#[tokio::test]
async fn generate_rejects_output_without_readme() {
    let server = MockServer::start().await;

    let model_output = json!({
        "files": [{ "path": "index.html", "content": "<h1>hi</h1>" }],
        "suggestedRepoName": "demo-site"
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(&model_output)))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate("a demo website")
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Schema(_)));
    assert!(err.to_string().contains("README"));
}

#[tokio::test]
async fn generate_rejects_prose_output() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-pro:generateContent"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope("Sure! Here is your project: ...")),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate("a demo website")
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Schema(_)));
}

#[tokio::test]
async fn generate_rejects_empty_candidates() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate("a demo website")
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::Schema(_)));
}

#[tokio::test]
async fn generate_surfaces_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT" }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .generate("a demo website")
        .await
        .unwrap_err();
    match err {
        GenerationError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "API key not valid");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}
