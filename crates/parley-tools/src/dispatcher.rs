use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use parley_config::Config;
use parley_llm::{FunctionCall, InlineMedia, ToolDeclaration};
use reqwest::Client;
use serde_json::{Map, Value};

use crate::error::ToolError;
use crate::image::ImageGenerator;
use crate::registry::{ToolCredentials, ToolName, available_tools};
use crate::result::ToolCallResult;
use crate::weather::WeatherLookup;

/// Successful tool output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolOutput {
    pub summary: String,
    pub payload: Option<Map<String, Value>>,
    pub media: Option<InlineMedia>,
}

/// A side-effecting operation the model can invoke
#[async_trait]
pub trait Tool: Send + Sync {
    /// Declaration advertised to the model
    fn declaration(&self) -> ToolDeclaration;

    /// Run the call; argument validation happens before any network access
    async fn call(&self, call: &FunctionCall) -> Result<ToolOutput, ToolError>;
}

/// Executes function calls against the registered tools
pub struct ToolDispatcher {
    tools: Vec<Arc<dyn Tool>>,
    declarations: Vec<ToolDeclaration>,
    timeout: Duration,
}

impl ToolDispatcher {
    /// Dispatcher over an explicit tool set
    pub fn new(tools: Vec<Arc<dyn Tool>>, timeout: Duration) -> Self {
        let declarations = tools.iter().map(|tool| tool.declaration()).collect();

        Self {
            tools,
            declarations,
            timeout,
        }
    }

    /// Register every tool whose backing service has a credential
    ///
    /// # Errors
    ///
    /// Returns an error if a tool backend cannot be constructed.
    pub fn from_config(config: &Config, client: &Client) -> anyhow::Result<Self> {
        let credentials = ToolCredentials::from_config(config);
        let mut tools: Vec<Arc<dyn Tool>> = Vec::new();

        for declaration in available_tools(&credentials) {
            let tool: Arc<dyn Tool> = match declaration.name.parse::<ToolName>()? {
                ToolName::GenerateImage => {
                    let (Some(image), Some(key)) = (config.tools.image.as_ref(), credentials.image.clone()) else {
                        continue;
                    };
                    Arc::new(ImageGenerator::gemini(image, key, client, config.chat.tool_timeout)?)
                }
                ToolName::GetWeather => {
                    let (Some(weather), Some(key)) = (config.tools.weather.as_ref(), credentials.weather.clone())
                    else {
                        continue;
                    };
                    Arc::new(WeatherLookup::new(weather, key, client.clone())?)
                }
            };
            tools.push(tool);
        }

        let dispatcher = Self::new(tools, config.chat.tool_timeout);
        tracing::info!(
            tools = ?dispatcher.declarations.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
            "tool registry initialized"
        );

        Ok(dispatcher)
    }

    /// Registry snapshot advertised to function-calling providers
    pub fn declarations(&self) -> &[ToolDeclaration] {
        &self.declarations
    }

    /// Execute one call, folding every failure into the result
    pub async fn execute(&self, call: &FunctionCall) -> ToolCallResult {
        let tool = self
            .declarations
            .iter()
            .position(|declaration| declaration.name == call.name)
            .map(|index| &self.tools[index]);

        let outcome = match tool {
            Some(tool) => tokio::time::timeout(self.timeout, tool.call(call))
                .await
                .unwrap_or_else(|_| {
                    Err(ToolError::Timeout {
                        tool: call.name.clone(),
                        after: self.timeout,
                    })
                }),
            None => Err(ToolError::UnknownTool(call.name.clone())),
        };

        match outcome {
            Ok(output) => {
                tracing::info!(tool = %call.name, media = output.media.is_some(), "tool call succeeded");
                ToolCallResult {
                    tool_name: call.name.clone(),
                    succeeded: true,
                    summary: output.summary,
                    payload: output.payload,
                    media: output.media,
                }
            }
            Err(error) => {
                tracing::warn!(tool = %call.name, kind = error.kind(), error = %error, "tool call failed");
                ToolCallResult::failure(call.name.clone(), error.to_string())
            }
        }
    }

    /// Execute calls concurrently, returning results in call order
    pub async fn dispatch_all(&self, calls: &[FunctionCall]) -> Vec<ToolCallResult> {
        join_all(calls.iter().map(|call| self.execute(call))).await
    }
}
