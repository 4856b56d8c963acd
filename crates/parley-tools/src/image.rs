//! Image synthesis through an image-capable Gemini model

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use parley_config::ImageToolConfig;
use parley_llm::provider::google::GoogleProvider;
use parley_llm::{CompletionRequest, FunctionCall, LlmError, Part, Provider, Role, ToolDeclaration, Turn};
use reqwest::Client;
use secrecy::SecretString;

use crate::dispatcher::{Tool, ToolOutput};
use crate::error::ToolError;
use crate::registry::ToolName;

const SERVICE: &str = "image generation";

/// `generate_image` tool
pub struct ImageGenerator {
    provider: Arc<dyn Provider>,
    model: String,
}

impl ImageGenerator {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Generator backed by the Google Generative Language API
    pub fn gemini(
        config: &ImageToolConfig,
        api_key: SecretString,
        client: &Client,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let provider = GoogleProvider::new(
            "image",
            client.clone(),
            config.base_url.clone(),
            api_key,
            timeout,
        )?;

        Ok(Self::new(Arc::new(provider), config.model.clone()))
    }
}

#[async_trait]
impl Tool for ImageGenerator {
    fn declaration(&self) -> ToolDeclaration {
        ToolName::GenerateImage.declaration()
    }

    async fn call(&self, call: &FunctionCall) -> Result<ToolOutput, ToolError> {
        let prompt = call.str_arg("prompt").ok_or(ToolError::MissingArgument {
            argument: "prompt",
            hint: "No image description was provided. Ask the user to describe the image they would like.",
        })?;

        let mut request = CompletionRequest::new(&self.model, vec![Turn::text(Role::User, prompt)]);
        request.image_output = true;

        let response = self.provider.complete(&request).await.map_err(|e| match e {
            LlmError::Upstream { status, message } => ToolError::Upstream {
                service: SERVICE,
                status,
                message,
            },
            other => ToolError::Upstream {
                service: SERVICE,
                status: None,
                message: other.to_string(),
            },
        })?;

        // First media part whose payload actually decodes
        let media = response
            .turn
            .parts
            .into_iter()
            .find_map(|part| match part {
                Part::InlineMedia(media) if STANDARD.decode(media.data.as_bytes()).is_ok_and(|b| !b.is_empty()) => {
                    Some(media)
                }
                _ => None,
            })
            .ok_or(ToolError::EmptyPayload(
                "The image model did not return an image for this prompt.",
            ))?;

        tracing::debug!(model = %self.model, mime_type = %media.mime_type, "image generated");

        Ok(ToolOutput {
            summary: format!("An image for \"{prompt}\" was generated and shown to the user."),
            payload: None,
            media: Some(media),
        })
    }
}
