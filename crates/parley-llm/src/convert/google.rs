//! Conversion between turns and the Google Generative Language wire format

use serde_json::{Map, Value};

use crate::protocol::google::{
    GoogleContent, GoogleFunctionCall, GoogleFunctionDeclaration, GoogleFunctionResponse, GoogleGenerationConfig,
    GoogleInlineData, GooglePart, GoogleRequest, GoogleResponse, GoogleTool,
};
use crate::types::{
    CompletionRequest, CompletionResponse, FinishReason, FunctionCall, FunctionResult, InlineMedia, Part, Role, Turn,
};

/// Finish reasons that mean the candidate was refused or broken
const ERROR_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
    "MALFORMED_FUNCTION_CALL",
];

// -- Outbound: internal request -> Google wire request --

impl From<&CompletionRequest> for GoogleRequest {
    fn from(req: &CompletionRequest) -> Self {
        let system_instruction = req.system_instruction.as_ref().map(|text| GoogleContent {
            role: None,
            parts: vec![GooglePart::Text(text.clone())],
        });

        let contents = req.history.iter().map(turn_to_google).collect();

        let options = &req.options;
        let generation_config = GoogleGenerationConfig {
            temperature: options.temperature,
            top_p: options.top_p,
            top_k: options.top_k,
            max_output_tokens: options.max_output_tokens,
            stop_sequences: options.stop_sequences.clone(),
            response_modalities: req
                .image_output
                .then(|| vec!["TEXT".to_owned(), "IMAGE".to_owned()]),
        };

        let tools = req.tools.as_ref().map(|tools| {
            vec![GoogleTool {
                function_declarations: tools
                    .iter()
                    .map(|t| GoogleFunctionDeclaration {
                        name: t.name.clone(),
                        description: t.description.clone(),
                        parameters: t.parameters.clone(),
                    })
                    .collect(),
            }]
        });

        Self {
            contents,
            system_instruction,
            generation_config: Some(generation_config),
            tools,
        }
    }
}

/// Convert a turn to a Google content object
fn turn_to_google(turn: &Turn) -> GoogleContent {
    let role = match turn.role {
        Role::User => "user",
        Role::Model => "model",
        Role::Tool => "function",
    };

    let mut parts: Vec<GooglePart> = turn
        .parts
        .iter()
        .filter_map(|part| match part {
            Part::Text(text) => Some(GooglePart::Text(text.clone())),
            // Media the orchestrator spliced onto model turns was never produced by the model
            Part::InlineMedia(_) if turn.role == Role::Model => None,
            Part::InlineMedia(media) => Some(GooglePart::InlineData(GoogleInlineData {
                mime_type: media.mime_type.clone(),
                data: media.data.clone(),
            })),
            Part::FunctionCall(call) => Some(GooglePart::FunctionCall(GoogleFunctionCall {
                name: call.name.clone(),
                args: Value::Object(call.args.clone()),
            })),
            Part::FunctionResult(result) => Some(GooglePart::FunctionResponse(GoogleFunctionResponse {
                name: result.name.clone(),
                response: Value::Object(result.response.clone()),
            })),
        })
        .collect();

    // Google rejects contents without parts
    if parts.is_empty() {
        parts.push(GooglePart::Text(String::new()));
    }

    GoogleContent {
        role: Some(role.to_owned()),
        parts,
    }
}

// -- Inbound: Google wire response -> internal types --

impl From<GoogleResponse> for CompletionResponse {
    fn from(resp: GoogleResponse) -> Self {
        let blocked = resp
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.as_ref())
            .is_some();

        let Some(candidate) = resp.candidates.into_iter().next() else {
            return Self {
                turn: Turn {
                    role: Role::Model,
                    parts: Vec::new(),
                },
                finish_reason: if blocked { FinishReason::Error } else { FinishReason::Other },
            };
        };

        let parts = candidate
            .content
            .map(|content| content.parts.into_iter().map(google_part_to_internal).collect())
            .unwrap_or_default();

        Self {
            turn: Turn {
                role: Role::Model,
                parts,
            },
            finish_reason: map_finish_reason(candidate.finish_reason.as_deref()),
        }
    }
}

fn google_part_to_internal(part: GooglePart) -> Part {
    match part {
        GooglePart::Text(text) => Part::Text(text),
        GooglePart::InlineData(data) => Part::InlineMedia(InlineMedia {
            mime_type: data.mime_type,
            data: data.data,
        }),
        GooglePart::FunctionCall(call) => Part::FunctionCall(FunctionCall {
            name: call.name,
            args: into_object(call.args),
        }),
        GooglePart::FunctionResponse(response) => Part::FunctionResult(FunctionResult {
            name: response.name,
            response: into_object(response.response),
        }),
    }
}

fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("value".to_owned(), other);
            map
        }
    }
}

fn map_finish_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        Some("STOP") => FinishReason::Stop,
        Some(reason) if ERROR_FINISH_REASONS.contains(&reason) => FinishReason::Error,
        _ => FinishReason::Other,
    }
}
