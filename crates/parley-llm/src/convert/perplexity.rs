//! Conversion between turns and the Perplexity chat completions wire format

use std::fmt::Write;

use serde_json::Value;

use crate::protocol::perplexity::{PerplexityMessage, PerplexityRequest, PerplexityResponse};
use crate::types::{CompletionRequest, CompletionResponse, FinishReason, Part, Role, Turn};

/// Text used when the provider returns no usable content
pub const NO_CONTENT_TEXT: &str = "Sorry, the model did not return any content for this request.";

// -- Outbound: internal request -> Perplexity wire request --

impl From<&CompletionRequest> for PerplexityRequest {
    fn from(req: &CompletionRequest) -> Self {
        let mut messages: Vec<PerplexityMessage> = Vec::with_capacity(req.history.len() + 1);

        if let Some(instruction) = &req.system_instruction {
            messages.push(PerplexityMessage {
                role: "system".to_owned(),
                content: instruction.clone(),
            });
        }

        for turn in &req.history {
            let role = match turn.role {
                Role::Model => "assistant",
                Role::User | Role::Tool => "user",
            };

            let content = flatten_parts(turn);
            if content.is_empty() {
                continue;
            }

            // Roles must alternate, so adjacent same-role turns are merged
            match messages.last_mut() {
                Some(last) if last.role == role => {
                    last.content.push_str("\n\n");
                    last.content.push_str(&content);
                }
                _ => messages.push(PerplexityMessage {
                    role: role.to_owned(),
                    content,
                }),
            }
        }

        let options = &req.options;
        Self {
            model: req.model.clone(),
            messages,
            temperature: options.temperature,
            top_p: options.top_p,
            top_k: options.top_k,
            max_tokens: options.max_output_tokens,
            stop: options.stop_sequences.clone(),
        }
    }
}

/// Render a turn as plain text; media has no text-only representation
fn flatten_parts(turn: &Turn) -> String {
    let mut out = String::new();

    for part in &turn.parts {
        let piece = match part {
            Part::Text(text) => text.trim().to_owned(),
            Part::InlineMedia(_) => continue,
            Part::FunctionCall(call) => format!("Requested {} with {}", call.name, Value::Object(call.args.clone())),
            Part::FunctionResult(result) => {
                format!("Result of {}: {}", result.name, Value::Object(result.response.clone()))
            }
        };

        if piece.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&piece);
    }

    out
}

// -- Inbound: Perplexity wire response -> internal types --

impl From<PerplexityResponse> for CompletionResponse {
    fn from(resp: PerplexityResponse) -> Self {
        let Some(choice) = resp.choices.into_iter().next() else {
            return Self::explanation(NO_CONTENT_TEXT, FinishReason::Error);
        };

        let content = choice
            .message
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty());

        let Some(mut text) = content else {
            return Self::explanation(NO_CONTENT_TEXT, FinishReason::Error);
        };

        if !resp.citations.is_empty() {
            text.push_str("\n\nSources:");
            for (i, url) in resp.citations.iter().enumerate() {
                let _ = write!(text, "\n[{}] {url}", i + 1);
            }
        }

        let finish_reason = match choice.finish_reason.as_deref() {
            Some("stop") => FinishReason::Stop,
            _ => FinishReason::Other,
        };

        Self {
            turn: Turn::text(Role::Model, text),
            finish_reason,
        }
    }
}
