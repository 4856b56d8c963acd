mod harness;

use std::time::{Duration, Instant};

use harness::config::ConfigBuilder;
use harness::mock_upstream::{MockOptions, MockUpstream};
use harness::server::TestServer;
use serde_json::json;

fn user_says(text: &str) -> serde_json::Value {
    json!({
        "history": [{ "role": "user", "parts": [{ "text": text }] }]
    })
}

#[tokio::test]
async fn plain_chat_appends_one_model_turn() {
    let mock = MockUpstream::start().await.unwrap();
    let config = ConfigBuilder::new()
        .with_google(&mock.gemini_url())
        .with_weather_tool(&mock.weather_url())
        .build();
    let server = TestServer::start(config).await.unwrap();

    let (status, body) = server.chat(&user_says("Hello there")).await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({ "turns": [{ "role": "model", "parts": [{ "text": "Hello from mock Gemini" }] }] })
    );
    assert_eq!(mock.gemini_calls(), 1);
    assert_eq!(mock.weather_calls(), 0);

    // The registry rides along with the system instruction
    let request = &mock.gemini_requests()[0];
    assert_eq!(
        request["tools"][0]["functionDeclarations"][0]["name"],
        "get_weather"
    );
    assert!(request["systemInstruction"]["parts"][0]["text"].is_string());
}

#[tokio::test]
async fn generation_options_reach_the_provider() {
    let mock = MockUpstream::start().await.unwrap();
    let config = ConfigBuilder::new().with_google(&mock.gemini_url()).build();
    let server = TestServer::start(config).await.unwrap();

    let mut envelope = user_says("Hello there");
    envelope["generationOptions"] = json!({ "temperature": 0.2, "maxOutputTokens": 256 });

    let (status, _) = server.chat(&envelope).await;

    assert_eq!(status, 200);
    let request = &mock.gemini_requests()[0];
    assert_eq!(request["generationConfig"]["temperature"], 0.2);
    assert_eq!(request["generationConfig"]["maxOutputTokens"], 256);
    // No tool backend is configured
    assert!(request.get("tools").is_none());
}

#[tokio::test]
async fn perplexity_answer_carries_citations() {
    let mock = MockUpstream::start().await.unwrap();
    let config = ConfigBuilder::new()
        .with_perplexity(&mock.perplexity_url())
        .with_raw("[chat]\ndefault_model = \"sonar\"\n")
        .build();
    let server = TestServer::start(config).await.unwrap();

    let (status, body) = server.chat(&user_says("Hello there")).await;

    assert_eq!(status, 200);
    let text = body["turns"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("Hello from mock Sonar"));
    assert!(text.contains("[1] https://example.com/source"));
    assert_eq!(mock.perplexity_calls(), 1);
    assert_eq!(mock.gemini_calls(), 0);
}

#[tokio::test]
async fn title_and_chat_returns_cleaned_title() {
    let mock = MockUpstream::start().await.unwrap();
    let config = ConfigBuilder::new().with_google(&mock.gemini_url()).build();
    let server = TestServer::start(config).await.unwrap();

    let mut envelope = user_says("Tell me about cats that wear hats");
    envelope["task"] = json!("title_and_chat");

    let (status, body) = server.chat(&envelope).await;

    assert_eq!(status, 200);
    assert_eq!(body["title"], "Cats Wearing Hats");
    assert_eq!(body["turns"].as_array().unwrap().len(), 1);
    assert_eq!(mock.gemini_calls(), 2);
}

#[tokio::test]
async fn chat_task_has_no_title() {
    let mock = MockUpstream::start().await.unwrap();
    let config = ConfigBuilder::new().with_google(&mock.gemini_url()).build();
    let server = TestServer::start(config).await.unwrap();

    let (status, body) = server.chat(&user_says("Hello there")).await;

    assert_eq!(status, 200);
    assert!(body.get("title").is_none());
}

#[tokio::test]
async fn empty_history_is_rejected_without_provider_calls() {
    let mock = MockUpstream::start().await.unwrap();
    let config = ConfigBuilder::new().with_google(&mock.gemini_url()).build();
    let server = TestServer::start(config).await.unwrap();

    let (status, body) = server.chat(&json!({ "history": [] })).await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"], "history must contain at least one turn");
    assert_eq!(mock.provider_calls(), 0);
}

#[tokio::test]
async fn turn_without_parts_is_rejected() {
    let mock = MockUpstream::start().await.unwrap();
    let config = ConfigBuilder::new().with_google(&mock.gemini_url()).build();
    let server = TestServer::start(config).await.unwrap();

    let (status, body) = server
        .chat(&json!({ "history": [{ "role": "user", "parts": [] }] }))
        .await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(mock.provider_calls(), 0);
}

#[tokio::test]
async fn malformed_body_is_a_validation_error() {
    let mock = MockUpstream::start().await.unwrap();
    let config = ConfigBuilder::new().with_google(&mock.gemini_url()).build();
    let server = TestServer::start(config).await.unwrap();

    let resp = server
        .client()
        .post(server.url("/api/chat"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn other_methods_are_not_allowed() {
    let mock = MockUpstream::start().await.unwrap();
    let config = ConfigBuilder::new().with_google(&mock.gemini_url()).build();
    let server = TestServer::start(config).await.unwrap();

    let resp = server.client().get(server.url("/api/chat")).send().await.unwrap();

    assert_eq!(resp.status(), 405);
}

#[tokio::test]
async fn missing_credential_is_a_configuration_error() {
    let mock = MockUpstream::start().await.unwrap();
    let config = ConfigBuilder::new().with_google_key(&mock.gemini_url(), "").build();
    let server = TestServer::start(config).await.unwrap();

    let (status, body) = server.chat(&user_says("Hello there")).await;

    assert_eq!(status, 500);
    assert_eq!(body["error"], "configuration_error");
    assert_eq!(mock.provider_calls(), 0);
}

#[tokio::test]
async fn unknown_model_is_a_configuration_error() {
    let mock = MockUpstream::start().await.unwrap();
    let config = ConfigBuilder::new().with_google(&mock.gemini_url()).build();
    let server = TestServer::start(config).await.unwrap();

    let mut envelope = user_says("Hello there");
    envelope["model"] = json!("sonar-pro");

    let (status, body) = server.chat(&envelope).await;

    assert_eq!(status, 500);
    assert_eq!(body["error"], "configuration_error");
    assert_eq!(mock.provider_calls(), 0);
}

#[tokio::test]
async fn upstream_failure_maps_to_bad_gateway() {
    let mock = MockUpstream::start_with(MockOptions {
        gemini_failure: Some(503),
        ..MockOptions::default()
    })
    .await
    .unwrap();
    let config = ConfigBuilder::new().with_google(&mock.gemini_url()).build();
    let server = TestServer::start(config).await.unwrap();

    let (status, body) = server.chat(&user_says("Hello there")).await;

    assert_eq!(status, 502);
    assert_eq!(body["error"], "upstream_provider_error");
    let details = body["details"].as_str().unwrap();
    assert!(details.contains("503"), "{details}");
    assert!(details.contains("The model is overloaded"), "{details}");
    assert_eq!(mock.gemini_calls(), 1);
}

#[tokio::test]
async fn slow_provider_times_out_as_bad_gateway() {
    let mock = MockUpstream::start_with(MockOptions {
        gemini_delay: Some(Duration::from_secs(10)),
        ..MockOptions::default()
    })
    .await
    .unwrap();
    let config = ConfigBuilder::new()
        .with_google(&mock.gemini_url())
        .with_raw("[chat]\nprovider_timeout = \"200ms\"\n")
        .build();
    let server = TestServer::start(config).await.unwrap();

    let started = Instant::now();
    let (status, body) = server.chat(&user_says("Hello there")).await;

    assert_eq!(status, 502);
    assert_eq!(body["error"], "upstream_provider_error");
    let details = body["details"].as_str().unwrap();
    assert!(details.contains("did not respond within 200ms"), "{details}");
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(mock.gemini_calls(), 1);
}
