use parley_llm::{FunctionResult, InlineMedia};
use serde_json::{Map, Value};

/// Outcome of one dispatched tool call
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallResult {
    pub tool_name: String,
    pub succeeded: bool,
    /// Text the model reads back as the tool's answer
    pub summary: String,
    /// Structured data for the model
    pub payload: Option<Map<String, Value>>,
    /// Bytes that reach the client around the provider, never through it
    pub media: Option<InlineMedia>,
}

impl ToolCallResult {
    pub fn failure(tool_name: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            succeeded: false,
            summary: summary.into(),
            payload: None,
            media: None,
        }
    }

    /// Model-facing function result; media is never included
    pub fn to_function_result(&self) -> FunctionResult {
        let mut response = Map::new();

        if self.succeeded {
            response.insert("status".to_owned(), Value::from("success"));
            response.insert("summary".to_owned(), Value::from(self.summary.clone()));
            if let Some(payload) = &self.payload {
                response.insert("data".to_owned(), Value::Object(payload.clone()));
            }
        } else {
            response.insert("status".to_owned(), Value::from("error"));
            response.insert("error".to_owned(), Value::from(self.summary.clone()));
        }

        FunctionResult {
            name: self.tool_name.clone(),
            response,
        }
    }
}
