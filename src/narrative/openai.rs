// src/narrative/openai.rs

use crate::narrative::{NarrativeError, NarrativeGenerator, NarrativePrompt};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const SYSTEM_PROMPT: &str = "You are a real estate appraisal expert.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning_effort: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat-completions client. Pricing and considerations go to `model`, recommendations
/// to `reasoning_model`.
pub struct OpenAiNarrator {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    reasoning_model: String,
}

impl OpenAiNarrator {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        reasoning_model: impl Into<String>,
    ) -> Result<Self, NarrativeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| NarrativeError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            reasoning_model: reasoning_model.into(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn request_for<'a>(&'a self, prompt: &'a NarrativePrompt) -> ChatRequest<'a> {
        let (model, reasoning_effort) = if prompt.wants_reasoning() {
            (self.reasoning_model.as_str(), Some("medium"))
        } else {
            (self.model.as_str(), None)
        };

        ChatRequest {
            model,
            messages: vec![
                Message {
                    role: "developer",
                    content: SYSTEM_PROMPT,
                },
                Message {
                    role: "user",
                    content: &prompt.text,
                },
            ],
            reasoning_effort,
        }
    }
}

impl NarrativeGenerator for OpenAiNarrator {
    fn complete(&self, prompt: &NarrativePrompt) -> Result<String, NarrativeError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| NarrativeError::Config("OPENAI_API_KEY not set".into()))?;

        let request = self.request_for(prompt);
        let start = std::time::Instant::now();

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .map_err(|e| {
                tracing::warn!(error = %e, "OpenAI request failed");
                NarrativeError::Network(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            tracing::warn!(status = %status, "OpenAI API error");
            return Err(NarrativeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = resp
            .json()
            .map_err(|e| NarrativeError::Parse(e.to_string()))?;

        tracing::debug!(
            model = request.model,
            kind = ?prompt.kind,
            duration_ms = start.elapsed().as_millis() as u64,
            "OpenAI chat completion"
        );

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(NarrativeError::Empty)
    }
}
