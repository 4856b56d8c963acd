//! Mock upstream collaborators for integration tests
//!
//! One axum server emulates Gemini `generateContent`, Perplexity chat
//! completions, `OpenWeatherMap` current weather and reCAPTCHA `siteverify`,
//! counting calls per collaborator.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Form, Path, Query, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Base64 of a PNG signature, enough to stand in for image bytes
pub const PNG_BASE64: &str = "iVBORw0KGgo=";

/// Behaviour switches for the mock
#[derive(Debug, Clone)]
pub struct MockOptions {
    /// Score returned by `siteverify`
    pub recaptcha_score: f64,
    /// Status returned by every Gemini call instead of a completion
    pub gemini_failure: Option<u16>,
    /// Delay before every Gemini answer
    pub gemini_delay: Option<Duration>,
}

impl Default for MockOptions {
    fn default() -> Self {
        Self {
            recaptcha_score: 0.9,
            gemini_failure: None,
            gemini_delay: None,
        }
    }
}

/// Mock upstream server
pub struct MockUpstream {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockState>,
}

struct MockState {
    options: MockOptions,
    gemini_calls: AtomicU32,
    perplexity_calls: AtomicU32,
    weather_calls: AtomicU32,
    recaptcha_calls: AtomicU32,
    gemini_requests: Mutex<Vec<Value>>,
}

impl MockUpstream {
    /// Start the mock with default behaviour
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with(MockOptions::default()).await
    }

    /// Start the mock with explicit behaviour
    pub async fn start_with(options: MockOptions) -> anyhow::Result<Self> {
        let state = Arc::new(MockState {
            options,
            gemini_calls: AtomicU32::new(0),
            perplexity_calls: AtomicU32::new(0),
            weather_calls: AtomicU32::new(0),
            recaptcha_calls: AtomicU32::new(0),
            gemini_requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1beta/models/{model_action}", routing::post(generate_content))
            .route("/chat/completions", routing::post(chat_completions))
            .route("/weather", routing::get(weather))
            .route("/siteverify", routing::post(siteverify))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for Google providers and the image tool
    pub fn gemini_url(&self) -> String {
        format!("http://{}/v1beta", self.addr)
    }

    /// Base URL for Perplexity providers
    pub fn perplexity_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Base URL for the weather tool
    pub fn weather_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Verification endpoint for the anti-abuse gate
    pub fn siteverify_url(&self) -> String {
        format!("http://{}/siteverify", self.addr)
    }

    pub fn gemini_calls(&self) -> u32 {
        self.state.gemini_calls.load(Ordering::SeqCst)
    }

    pub fn perplexity_calls(&self) -> u32 {
        self.state.perplexity_calls.load(Ordering::SeqCst)
    }

    pub fn weather_calls(&self) -> u32 {
        self.state.weather_calls.load(Ordering::SeqCst)
    }

    pub fn recaptcha_calls(&self) -> u32 {
        self.state.recaptcha_calls.load(Ordering::SeqCst)
    }

    /// Calls to any completion provider
    pub fn provider_calls(&self) -> u32 {
        self.gemini_calls() + self.perplexity_calls()
    }

    /// Every `generateContent` body received, in arrival order
    pub fn gemini_requests(&self) -> Vec<Value> {
        self.state.gemini_requests.lock().unwrap().clone()
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn gemini_reply(parts: Value) -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": parts },
            "finishReason": "STOP"
        }]
    })
}

/// All user-authored text in a `generateContent` body, lowercased
fn user_text(body: &Value) -> String {
    body["contents"]
        .as_array()
        .into_iter()
        .flatten()
        .filter(|content| content["role"] == "user")
        .flat_map(|content| content["parts"].as_array().into_iter().flatten())
        .filter_map(|part| part["text"].as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

async fn generate_content(
    State(state): State<Arc<MockState>>,
    Path(model_action): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !model_action.ends_with(":generateContent") {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": { "message": "unknown method" } })));
    }
    if params.get("key").map(String::as_str) != Some("test-key") {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": { "message": "API key not valid" } })),
        );
    }

    state.gemini_calls.fetch_add(1, Ordering::SeqCst);
    state.gemini_requests.lock().unwrap().push(body.clone());

    if let Some(delay) = state.options.gemini_delay {
        tokio::time::sleep(delay).await;
    }

    if let Some(status) = state.options.gemini_failure {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::SERVICE_UNAVAILABLE);
        return (status, Json(json!({ "error": { "message": "The model is overloaded" } })));
    }

    // Image synthesis
    if body["generationConfig"]["responseModalities"].is_array() {
        return (
            StatusCode::OK,
            Json(gemini_reply(json!([
                { "text": "Here is the image." },
                { "inlineData": { "mimeType": "image/png", "data": PNG_BASE64 } }
            ]))),
        );
    }

    // Title task
    let instruction = body["systemInstruction"]["parts"][0]["text"].as_str().unwrap_or_default();
    if instruction.contains("short title") {
        return (StatusCode::OK, Json(gemini_reply(json!([{ "text": "\"Cats Wearing Hats\".\n" }]))));
    }

    // Follow-up after tool results
    let last_role = body["contents"]
        .as_array()
        .and_then(|contents| contents.last())
        .and_then(|content| content["role"].as_str())
        .unwrap_or_default();
    if last_role == "function" {
        return (
            StatusCode::OK,
            Json(gemini_reply(json!([{ "text": "All done, see the result above." }]))),
        );
    }

    let has_tools = body["tools"].is_array();
    let text = user_text(&body);

    if has_tools && text.contains("draw") {
        return (
            StatusCode::OK,
            Json(gemini_reply(json!([{
                "functionCall": { "name": "generate_image", "args": { "prompt": "a cat wearing a hat" } }
            }]))),
        );
    }

    if has_tools && text.contains("weather") {
        return (
            StatusCode::OK,
            Json(gemini_reply(json!([{
                "functionCall": { "name": "get_weather", "args": { "location": "Tokyo" } }
            }]))),
        );
    }

    (StatusCode::OK, Json(gemini_reply(json!([{ "text": "Hello from mock Gemini" }]))))
}

async fn chat_completions(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Json<Value> {
    state.perplexity_calls.fetch_add(1, Ordering::SeqCst);

    let asks_weather = body["messages"]
        .as_array()
        .into_iter()
        .flatten()
        .filter(|message| message["role"] == "user")
        .filter_map(|message| message["content"].as_str())
        .any(|content| content.to_lowercase().contains("weather"));

    let content = if asks_weather {
        "I cannot see live data, but a weather service will have the current conditions."
    } else {
        "Hello from mock Sonar"
    };

    Json(json!({
        "choices": [{
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "citations": ["https://example.com/source"]
    }))
}

async fn weather(
    State(state): State<Arc<MockState>>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    state.weather_calls.fetch_add(1, Ordering::SeqCst);

    if params.get("appid").map(String::as_str) != Some("owm-key") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "cod": 401, "message": "Invalid API key" })));
    }

    match params.get("q").map(String::as_str) {
        Some("Tokyo") => (
            StatusCode::OK,
            Json(json!({
                "name": "Tokyo",
                "sys": { "country": "JP" },
                "main": { "temp": 68.5, "feels_like": 67.0, "humidity": 72, "pressure": 1012 },
                "weather": [{ "description": "light rain" }],
                "wind": { "speed": 5.8 }
            })),
        ),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "cod": "404", "message": "city not found" })),
        ),
    }
}

async fn siteverify(State(state): State<Arc<MockState>>, Form(form): Form<HashMap<String, String>>) -> Json<Value> {
    state.recaptcha_calls.fetch_add(1, Ordering::SeqCst);

    if form.get("secret").map(String::as_str) != Some("server-secret") {
        return Json(json!({ "success": false, "error-codes": ["invalid-input-secret"] }));
    }

    Json(json!({ "success": true, "score": state.options.recaptcha_score }))
}
