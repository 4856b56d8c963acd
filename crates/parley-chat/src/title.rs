use std::sync::Arc;
use std::time::Duration;

use parley_llm::{CompletionRequest, ModelRouter, Role, Turn};

const TITLE_INSTRUCTION: &str = "Write a short title of at most six words for a conversation that starts with the \
                                 following message. Reply with the title only, without quotes or punctuation at \
                                 the end.";

const MAX_TITLE_CHARS: usize = 80;

/// Best-effort conversation title from the first user message
pub struct TitleGenerator {
    router: Arc<ModelRouter>,
    model: String,
    timeout: Duration,
}

impl TitleGenerator {
    pub fn new(router: Arc<ModelRouter>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            router,
            model: model.into(),
            timeout,
        }
    }

    /// Propose a title; every failure yields `None`
    pub async fn generate(&self, history: &[Turn]) -> Option<String> {
        let first = history
            .iter()
            .find(|turn| turn.role == Role::User)
            .map(Turn::text_content)
            .filter(|text| !text.trim().is_empty())?;

        let resolved = match self.router.resolve(&self.model) {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::warn!(error = %e, model = %self.model, "title model unavailable");
                return None;
            }
        };

        let mut request = CompletionRequest::new(resolved.model_id, vec![Turn::text(Role::User, first)]);
        request.system_instruction = Some(TITLE_INSTRUCTION.to_owned());

        let response = match tokio::time::timeout(self.timeout, resolved.provider.complete(&request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "title generation failed");
                return None;
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.timeout, "title generation timed out");
                return None;
            }
        };

        clean_title(&response.turn.text_content())
    }
}

/// First line, trimmed of surrounding quotes and punctuation, capped in length
fn clean_title(raw: &str) -> Option<String> {
    let line = raw.lines().map(str::trim).find(|line| !line.is_empty())?;
    let trimmed = line
        .trim_start_matches(|c: char| matches!(c, '"' | '\'' | '*' | '#' | '“' | '”') || c.is_whitespace())
        .trim_end_matches(|c: char| {
            matches!(c, '"' | '\'' | '*' | '“' | '”' | '.' | '!' | '?' | ':' | ';' | ',') || c.is_whitespace()
        });

    if trimmed.is_empty() {
        return None;
    }

    Some(trimmed.chars().take(MAX_TITLE_CHARS).collect())
}
