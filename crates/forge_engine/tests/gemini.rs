use std::time::Duration;

use forge_core::ScrapingRequest;
use forge_engine::{GeminiClient, GenerationClient, GenerationFailure, GenerationSettings};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/models/test-model:generateContent";

fn settings(server: &MockServer) -> GenerationSettings {
    GenerationSettings {
        base_url: server.uri(),
        model: "test-model".to_string(),
        api_key: Some("test-key".to_string()),
        ..GenerationSettings::default()
    }
}

fn shop_request(html: Option<&str>) -> ScrapingRequest {
    ScrapingRequest::new(
        "https://shop.example.com/items",
        "extract product names and prices",
        html,
    )
    .unwrap()
}

fn candidate_with_text(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
}

fn valid_answer() -> String {
    json!({
        "code": "import requests\nfrom lxml import html\n",
        "explanation": "Uses `//li[@class='item']`.",
        "libraries": ["requests", "lxml"]
    })
    .to_string()
}

async fn mount_answer(server: &MockServer, body: Value) {
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn generate_parses_structured_answer() {
    forge_logging::initialize_for_tests();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_string_contains("https://shop.example.com/items"))
        .and(body_string_contains("\"googleSearch\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_with_text(&valid_answer())))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(settings(&server));
    let code = client.generate(&shop_request(None)).await.expect("generate ok");

    assert_eq!(code.code, "import requests\nfrom lxml import html\n");
    assert_eq!(code.explanation, "Uses `//li[@class='item']`.");
    assert_eq!(code.libraries, vec!["requests", "lxml"]);
}

#[tokio::test]
async fn request_carries_schema_and_prompt() {
    let server = MockServer::start().await;
    mount_answer(&server, candidate_with_text(&valid_answer())).await;

    let client = GeminiClient::new(settings(&server));
    client
        .generate(&shop_request(Some("<ul class=\"items\"></ul>")))
        .await
        .expect("generate ok");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(
        body["generationConfig"]["responseMimeType"],
        json!("application/json")
    );
    assert_eq!(
        body["generationConfig"]["responseSchema"]["required"],
        json!(["code", "explanation", "libraries"])
    );
    assert_eq!(body["contents"][0]["role"], json!("user"));
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("<ul class=\"items\"></ul>"));
    assert!(prompt.contains("extract product names and prices"));
}

#[tokio::test]
async fn search_tool_can_be_disabled() {
    let server = MockServer::start().await;
    mount_answer(&server, candidate_with_text(&valid_answer())).await;

    let client = GeminiClient::new(GenerationSettings {
        google_search: false,
        ..settings(&server)
    });
    client.generate(&shop_request(None)).await.expect("generate ok");

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(body.get("tools").is_none());
}

#[tokio::test]
async fn regenerate_sends_previous_code_and_feedback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(body_string_contains("print(\\\"old\\\")"))
        .and(body_string_contains("selector returns empty list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(candidate_with_text(&valid_answer())))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new(settings(&server));
    let code = client
        .regenerate(
            &shop_request(None),
            "print(\"old\")",
            "selector returns empty list",
        )
        .await
        .expect("regenerate ok");
    assert_eq!(code.libraries, vec!["requests", "lxml"]);
}

#[tokio::test]
async fn missing_code_field_is_rejected() {
    let server = MockServer::start().await;
    let partial = json!({ "explanation": "x", "libraries": [] }).to_string();
    mount_answer(&server, candidate_with_text(&partial)).await;

    let client = GeminiClient::new(settings(&server));
    let err = client.generate(&shop_request(None)).await.unwrap_err();
    assert_eq!(err.kind, GenerationFailure::MalformedResponse);
    assert!(err.message.contains("`code`"), "{}", err.message);
}

#[tokio::test]
async fn non_json_text_is_rejected() {
    let server = MockServer::start().await;
    mount_answer(&server, candidate_with_text("Sure! Here is your scraper:")).await;

    let client = GeminiClient::new(settings(&server));
    let err = client.generate(&shop_request(None)).await.unwrap_err();
    assert_eq!(err.kind, GenerationFailure::MalformedResponse);
}

#[tokio::test]
async fn no_candidates_is_empty_response() {
    let server = MockServer::start().await;
    mount_answer(
        &server,
        json!({ "candidates": [], "promptFeedback": { "blockReason": "SAFETY" } }),
    )
    .await;

    let client = GeminiClient::new(settings(&server));
    let err = client.generate(&shop_request(None)).await.unwrap_err();
    assert_eq!(err.kind, GenerationFailure::EmptyResponse);
    assert_eq!(err.message, "the model returned no content (SAFETY)");
}

#[tokio::test]
async fn thought_parts_are_not_part_of_the_answer() {
    let server = MockServer::start().await;
    mount_answer(
        &server,
        json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "thinking about selectors", "thought": true },
                    { "text": valid_answer() }
                ]}
            }]
        }),
    )
    .await;

    let client = GeminiClient::new(settings(&server));
    let code = client.generate(&shop_request(None)).await.expect("generate ok");
    assert_eq!(code.libraries, vec!["requests", "lxml"]);
}

#[tokio::test]
async fn provider_error_message_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" }
        })))
        .mount(&server)
        .await;

    let client = GeminiClient::new(settings(&server));
    let err = client.generate(&shop_request(None)).await.unwrap_err();
    assert_eq!(err.kind, GenerationFailure::HttpStatus(400));
    assert_eq!(err.to_string(), "API key not valid.");
}

#[tokio::test]
async fn missing_api_key_fails_without_network() {
    let client = GeminiClient::new(GenerationSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        api_key: Some("  ".to_string()),
        ..GenerationSettings::default()
    });
    let err = client.generate(&shop_request(None)).await.unwrap_err();
    assert_eq!(err.kind, GenerationFailure::MissingApiKey);
}

#[tokio::test]
async fn slow_model_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(candidate_with_text(&valid_answer())),
        )
        .mount(&server)
        .await;

    let client = GeminiClient::new(GenerationSettings {
        request_timeout: Duration::from_millis(50),
        ..settings(&server)
    });
    let err = client
        .regenerate(&shop_request(None), "x", "y")
        .await
        .unwrap_err();
    assert_eq!(err.kind, GenerationFailure::Timeout);
    assert!(!err.message.is_empty());
}
