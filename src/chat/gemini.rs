use serde::Deserialize;
use tracing::debug;

use crate::config::GeminiConfig;
use crate::error::ChatError;

pub trait LanguageModel {
    fn generate(&self, prompt: &str) -> Result<String, ChatError>;
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}

/// Single-turn client for the `generateContent` REST endpoint.
pub struct GeminiClient {
    agent: ureq::Agent,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        GeminiClient {
            agent: ureq::AgentBuilder::new().build(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base, self.config.model
        )
    }
}

impl LanguageModel for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, ChatError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ChatError::MissingApiKey)?;
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });
        debug!(model = %self.config.model, "sending generateContent request");

        // The key goes in a header so it never shows up in transport errors.
        let response = match self
            .agent
            .post(&self.endpoint())
            .set("x-goog-api-key", api_key)
            .send_json(body)
        {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(ChatError::Api { status, body });
            }
            Err(err) => return Err(ChatError::Transport(err.to_string())),
        };

        let parsed: GenerateContentResponse = response
            .into_json()
            .map_err(|err| ChatError::Decode(err.to_string()))?;
        parsed.into_text().ok_or(ChatError::EmptyReply)
    }
}
