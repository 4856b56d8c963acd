//! `POST /api/chat`

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::{Json, Router, routing};
use parley_auth::{AbuseGate, RecaptchaVerifier};
use parley_config::Config;
use parley_llm::ModelRouter;
use parley_tools::ToolDispatcher;
use tokio::task::JoinHandle;

use crate::envelope::{ChatRequest, ChatResponse, Task};
use crate::error::ChatError;
use crate::intent::KeywordIntents;
use crate::orchestrator::{Orchestrator, OrchestratorSettings, TurnRequest};
use crate::title::TitleGenerator;

/// Shared state for the chat endpoint
#[derive(Clone)]
pub struct ChatState {
    inner: Arc<ChatStateInner>,
}

struct ChatStateInner {
    orchestrator: Orchestrator,
    titles: TitleGenerator,
    title_grace: Duration,
    gate: Option<Arc<dyn AbuseGate>>,
}

impl ChatState {
    pub fn new(
        orchestrator: Orchestrator,
        titles: TitleGenerator,
        title_grace: Duration,
        gate: Option<Arc<dyn AbuseGate>>,
    ) -> Self {
        Self {
            inner: Arc::new(ChatStateInner {
                orchestrator,
                titles,
                title_grace,
                gate,
            }),
        }
    }

    /// Build providers, tools and the anti-abuse gate from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a provider, tool backend or the gate cannot be
    /// constructed.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().build()?;

        let router = Arc::new(
            ModelRouter::new(&config.llm, &client, config.chat.provider_timeout)
                .map_err(|e| anyhow::anyhow!("failed to initialize LLM providers: {e}"))?,
        );
        let dispatcher = Arc::new(ToolDispatcher::from_config(config, &client)?);

        let orchestrator = Orchestrator::new(
            Arc::clone(&router),
            dispatcher,
            Arc::new(KeywordIntents::default()),
            OrchestratorSettings::from(&config.chat),
        );
        let titles = TitleGenerator::new(router, config.chat.title_model.clone(), config.chat.title_timeout);

        let gate: Option<Arc<dyn AbuseGate>> = match &config.anti_abuse {
            None => {
                anyhow::bail!("[anti_abuse] must be configured; set `enabled = false` to serve without verification")
            }
            Some(gate) if gate.enabled => Some(Arc::new(RecaptchaVerifier::new(gate)?)),
            Some(_) => {
                tracing::warn!("anti-abuse gate disabled by configuration, chat requests are not verified");
                None
            }
        };

        Ok(Self::new(orchestrator, titles, config.chat.title_grace, gate))
    }
}

/// Build the chat router
pub fn chat_router(state: ChatState) -> Router {
    Router::new()
        .route("/api/chat", routing::post(chat))
        .with_state(state)
}

/// Handle `POST /api/chat`
///
/// Validation and model selection fail before any network call, then the
/// gate is consulted, then the turn is orchestrated.
async fn chat(
    State(state): State<ChatState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ChatError> {
    let Json(request) = payload.map_err(|rejection| ChatError::Validation(rejection.body_text()))?;
    request.validate()?;

    let inner = &state.inner;
    let target = inner.orchestrator.select(request.model())?;

    if let Some(gate) = &inner.gate {
        gate.verify(request.anti_abuse_token.as_deref()).await?;
    }

    // The title runs alongside the turn and is only awaited briefly once the
    // answer is ready
    let title_task = (request.task == Task::TitleAndChat).then(|| {
        let state = state.clone();
        let history = request.history.clone();
        tokio::spawn(async move { state.inner.titles.generate(&history).await })
    });

    let turn = TurnRequest {
        history: request.history,
        options: request.generation_options.unwrap_or_default(),
    };

    let outcome = match inner.orchestrator.run(target, turn).await {
        Ok(outcome) => outcome,
        Err(e) => {
            if let Some(task) = title_task {
                task.abort();
            }
            return Err(e);
        }
    };

    let title = match title_task {
        Some(task) => collect_title(task, inner.title_grace).await,
        None => None,
    };

    tracing::info!(
        appended = outcome.turns.len(),
        tools = outcome.tool_results.len(),
        delegated = outcome.delegated,
        titled = title.is_some(),
        "chat turn completed"
    );

    Ok(Json(ChatResponse {
        turns: outcome.turns,
        title,
    }))
}

/// Wait at most `grace` for a pending title, abandoning it afterwards
async fn collect_title(mut task: JoinHandle<Option<String>>, grace: Duration) -> Option<String> {
    match tokio::time::timeout(grace, &mut task).await {
        Ok(Ok(title)) => title,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "title task failed");
            None
        }
        Err(_) => {
            task.abort();
            tracing::warn!(grace = ?grace, "title not ready, answering without it");
            None
        }
    }
}
