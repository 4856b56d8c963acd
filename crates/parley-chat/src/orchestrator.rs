//! Turn orchestration state machine
//!
//! `select -> primary -> [delegation] -> (done | dispatch -> follow-up ->
//! reconcile media -> done)`. Each stage produces a fresh
//! [`CompletionResponse`]; the appended turns are only ever pushed.

use std::collections::BTreeSet;
use std::sync::Arc;

use parley_config::ChatConfig;
use parley_llm::{
    CompletionRequest, CompletionResponse, FunctionCall, GenerationOptions, ModelRouter, Part, Provider,
    ResolvedModel, Role, Turn,
};
use parley_tools::{ToolCallResult, ToolDispatcher, ToolName};

use crate::error::{ChatError, Stage};
use crate::intent::IntentDetector;

/// Instruction appended when asking a function-calling model to act on a
/// text-only answer
const DELEGATION_INSTRUCTION: &str = "Act on your previous answer. If it calls for generating an image or looking up \
                                      the weather, call the matching tool now with the appropriate arguments.";

/// Orchestration settings derived from `[chat]`
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub default_model: String,
    pub delegate_model: String,
    pub system_instruction: String,
    pub max_tool_rounds: u8,
}

impl From<&ChatConfig> for OrchestratorSettings {
    fn from(config: &ChatConfig) -> Self {
        Self {
            default_model: config.default_model.clone(),
            delegate_model: config.delegate_model.clone(),
            system_instruction: config.system_instruction.clone(),
            max_tool_rounds: config.max_tool_rounds.max(1),
        }
    }
}

/// Input of one orchestration run
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub history: Vec<Turn>,
    pub options: GenerationOptions,
}

/// Result of one orchestration run
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Turns appended to the history, ending with the closing model turn
    pub turns: Vec<Turn>,
    /// Every dispatched tool result, in dispatch order
    pub tool_results: Vec<ToolCallResult>,
    /// Whether a function-calling provider acted for a text-only one
    pub delegated: bool,
}

/// Provider currently driving the conversation
struct Active {
    provider: Arc<dyn Provider>,
    model_id: String,
}

/// Coordinates providers and tools for a single conversation turn
pub struct Orchestrator {
    router: Arc<ModelRouter>,
    dispatcher: Arc<ToolDispatcher>,
    intents: Arc<dyn IntentDetector>,
    settings: OrchestratorSettings,
}

impl Orchestrator {
    pub fn new(
        router: Arc<ModelRouter>,
        dispatcher: Arc<ToolDispatcher>,
        intents: Arc<dyn IntentDetector>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            router,
            dispatcher,
            intents,
            settings,
        }
    }

    /// Pick the provider for a requested model, or the default model
    pub fn select(&self, model: Option<&str>) -> Result<ResolvedModel, ChatError> {
        let model = model.unwrap_or(&self.settings.default_model);
        self.router
            .resolve(model)
            .map_err(|e| ChatError::provider(Stage::Select, e))
    }

    /// Drive one turn against an already selected provider
    pub async fn run(&self, target: ResolvedModel, request: TurnRequest) -> Result<TurnOutcome, ChatError> {
        let TurnRequest { history, options } = request;

        let mut active = Active {
            provider: target.provider,
            model_id: target.model_id,
        };

        tracing::debug!(
            provider = %active.provider.name(),
            model = %active.model_id,
            turns = history.len(),
            "starting turn orchestration"
        );

        let primary = self.completion(&active, history.clone(), &options);
        let mut response = active
            .provider
            .complete(&primary)
            .await
            .map_err(|e| ChatError::provider(Stage::Primary, e))?;

        let mut delegated = false;
        if !active.provider.capabilities().tool_calling && !response.turn.has_function_calls() {
            let replacement = self.delegate(&history, &response, &options).await;
            if let Some((delegate, delegated_response)) = replacement {
                active = delegate;
                response = delegated_response;
                delegated = true;
            }
        }

        let mut appended: Vec<Turn> = Vec::new();
        let mut tool_results: Vec<ToolCallResult> = Vec::new();
        let mut rounds = 0;

        loop {
            let calls: Vec<FunctionCall> = response.function_calls().cloned().collect();
            if calls.is_empty() || rounds == self.settings.max_tool_rounds {
                break;
            }
            rounds += 1;

            tracing::info!(
                provider = %active.provider.name(),
                round = rounds,
                calls = ?calls.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
                "dispatching tool calls"
            );

            let results = self.dispatcher.dispatch_all(&calls).await;
            let tool_turn = Turn {
                role: Role::Tool,
                parts: results
                    .iter()
                    .map(|result| Part::FunctionResult(result.to_function_result()))
                    .collect(),
            };

            appended.push(response.turn);
            appended.push(tool_turn);
            tool_results.extend(results);

            let context = history.iter().chain(&appended).cloned().collect();
            let follow_up = self.completion(&active, context, &options);
            response = active
                .provider
                .complete(&follow_up)
                .await
                .map_err(|e| ChatError::provider(Stage::FollowUp, e))?;
        }

        if response.turn.has_function_calls() {
            tracing::warn!(
                provider = %active.provider.name(),
                rounds,
                "tool round limit reached, leaving function calls undispatched"
            );
        }

        let closing = reconcile_media(response.turn, &tool_results);
        ensure_usable(&closing)?;
        appended.push(closing);

        Ok(TurnOutcome {
            turns: appended,
            tool_results,
            delegated,
        })
    }

    /// Completion request for the active provider, with the registry
    /// attached only when the provider can call tools
    fn completion(&self, active: &Active, history: Vec<Turn>, options: &GenerationOptions) -> CompletionRequest {
        let mut request = CompletionRequest::new(&active.model_id, history);
        request.system_instruction = Some(self.settings.system_instruction.clone());
        request.options = options.clone();

        if active.provider.capabilities().tool_calling {
            request = request.with_tools(self.dispatcher.declarations());
        }

        request
    }

    /// One-shot delegation of a text-only answer to a function-calling provider
    ///
    /// Returns the replacement response only when it carries function calls.
    async fn delegate(
        &self,
        history: &[Turn],
        draft: &CompletionResponse,
        options: &GenerationOptions,
    ) -> Option<(Active, CompletionResponse)> {
        let available: BTreeSet<ToolName> = self
            .dispatcher
            .declarations()
            .iter()
            .filter_map(|declaration| declaration.name.parse().ok())
            .collect();

        let intents: BTreeSet<ToolName> = self
            .intents
            .detect(&draft.turn.text_content())
            .intersection(&available)
            .copied()
            .collect();

        if intents.is_empty() {
            return None;
        }

        let delegate = match self.router.resolve(&self.settings.delegate_model) {
            Ok(resolved) if resolved.provider.capabilities().tool_calling => Active {
                provider: resolved.provider,
                model_id: resolved.model_id,
            },
            Ok(resolved) => {
                tracing::warn!(provider = %resolved.provider.name(), "delegate model cannot call tools");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "delegate model unavailable, keeping text-only answer");
                return None;
            }
        };

        tracing::info!(
            provider = %delegate.provider.name(),
            intents = ?intents,
            "delegating text-only answer to function-calling provider"
        );

        let mut seed = history.to_vec();
        seed.push(draft.turn.clone());
        seed.push(Turn::text(Role::User, DELEGATION_INSTRUCTION));

        let request = self.completion(&delegate, seed, options);
        match delegate.provider.complete(&request).await {
            Ok(response) if response.turn.has_function_calls() => Some((delegate, response)),
            Ok(_) => {
                tracing::debug!(stage = %Stage::Delegation, "delegate emitted no function call");
                None
            }
            Err(e) => {
                tracing::warn!(stage = %Stage::Delegation, error = %e, "delegation failed, keeping text-only answer");
                None
            }
        }
    }
}

/// Splice tool-generated media onto the closing model turn
fn reconcile_media(mut turn: Turn, results: &[ToolCallResult]) -> Turn {
    turn.parts
        .extend(results.iter().filter_map(|r| r.media.clone()).map(Part::InlineMedia));
    turn
}

fn ensure_usable(turn: &Turn) -> Result<(), ChatError> {
    if turn.role != Role::Model {
        return Err(ChatError::ResponseShape("closing turn is not a model turn".to_owned()));
    }
    if !turn.has_content() {
        return Err(ChatError::ResponseShape(
            "provider returned no usable completion".to_owned(),
        ));
    }
    Ok(())
}
