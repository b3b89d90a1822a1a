//! Completion-model client and the summarizer boundary.
//!
//! The gateway talks to an OpenAI-style chat completions endpoint through a
//! small [`CompletionClient`] trait so tests can substitute a recording stub.
//! The [`Summarizer`] wraps one completion call with the fixed legal-assistant
//! prompt and never lets a provider failure escape: failures are converted to
//! [`SummaryOutcome::Degraded`] and rendered as an in-band error marker, so
//! the reduction pipeline always has a string to work with.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

use crate::config::get_config;

/// System instruction sent with every summarization request.
const SYSTEM_PROMPT: &str = "You are a legal document assistant that summarizes contracts and \
agreements in simple, easy-to-understand language. Avoid legal jargon unless necessary. \
Keep the summary concise and under 600 words.";

/// Errors surfaced while attempting a completion call.
#[derive(Debug, Error)]
pub enum CompletionClientError {
    /// Provider could not be reached (network error or timeout).
    #[error("Completion provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Failed to generate completion: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// One chat-style request assembled by the summarizer.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System instruction framing the assistant's role.
    pub system: String,
    /// User content carrying the text to summarize.
    pub user: String,
}

/// Interface implemented by completion-model backends.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Issue exactly one completion request and return the generated text.
    async fn complete(&self, request: CompletionRequest)
    -> Result<String, CompletionClientError>;
}

/// Client for OpenAI-compatible `/chat/completions` endpoints.
pub struct OpenAiCompletionClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompletionClient {
    /// Construct a client for the given endpoint and model.
    pub fn new(base_url: String, api_key: String, model: String, timeout: Duration) -> Self {
        let http = Client::builder()
            .user_agent("lexsum/summarizer")
            .timeout(timeout)
            .build()
            .expect("Failed to construct reqwest::Client for summarization");
        Self {
            http,
            base_url,
            api_key,
            model,
        }
    }

    /// Construct a client from the process configuration.
    pub fn from_config() -> Self {
        let config = get_config();
        Self::new(
            config.openai_base_url.clone(),
            config.openai_api_key.clone(),
            config.summarization_model.clone(),
            Duration::from_secs(config.completion_timeout_secs),
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<String, CompletionClientError> {
        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ],
        });

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                CompletionClientError::ProviderUnavailable(format!(
                    "failed to reach completion endpoint {}: {error}",
                    self.base_url
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionClientError::GenerationFailed(format!(
                "provider returned {status}: {body}"
            )));
        }

        let body: ChatCompletionResponse = response.json().await.map_err(|error| {
            CompletionClientError::InvalidResponse(format!(
                "failed to decode completion response: {error}"
            ))
        })?;

        let choice = body.choices.into_iter().next().ok_or_else(|| {
            CompletionClientError::InvalidResponse(
                "completion response contained no choices".into(),
            )
        })?;

        Ok(choice.message.content.trim().to_string())
    }
}

/// Outcome of one summarization call.
///
/// Success and degradation are kept distinguishable here; the in-band error
/// string the gateway's response contract requires is only produced by
/// [`SummaryOutcome::into_text`] at the response boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// The provider produced a summary.
    Generated(String),
    /// The provider failed; carries the failure cause.
    Degraded(String),
}

impl SummaryOutcome {
    /// Whether this outcome carries an in-band error instead of a summary.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }

    /// Render the outcome as the text handed back to callers.
    pub fn into_text(self) -> String {
        match self {
            Self::Generated(text) => text,
            Self::Degraded(cause) => format!("Error during summarization: {cause}"),
        }
    }
}

/// Summarizes one piece of text with a single completion call.
pub struct Summarizer {
    client: Box<dyn CompletionClient>,
}

impl Summarizer {
    /// Wrap a completion client with the summarization prompts.
    pub fn new(client: Box<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Summarize `text` with exactly one provider call.
    ///
    /// Never returns an error: provider failures degrade to
    /// [`SummaryOutcome::Degraded`] so downstream reduction always has text to
    /// operate on.
    pub async fn summarize(&self, text: &str) -> SummaryOutcome {
        let request = CompletionRequest {
            system: SYSTEM_PROMPT.to_string(),
            user: build_user_prompt(text),
        };
        match self.client.complete(request).await {
            Ok(summary) => SummaryOutcome::Generated(summary),
            Err(error) => {
                tracing::warn!(error = %error, "Completion call failed; degrading to in-band error");
                SummaryOutcome::Degraded(error.to_string())
            }
        }
    }
}

/// Assemble the user prompt requesting a Markdown-structured summary.
fn build_user_prompt(text: &str) -> String {
    format!(
        "Please analyze the following legal document and return your answer in **Markdown** \
format, with headings, bullet points, and sub-points, so it can be displayed cleanly on a \
webpage:\n\n{text}\n\n\
Your response should include:\n\
1. A plain-language summary of the document.\n\
2. Key clauses, obligations, and unusual terms.\n\
3. Any potential red flags or risks.\n\
4. A note that the user can ask specific follow-up questions.\n\
5. Suggest consulting a legal professional if necessary.\n\n\
Use:\n\
- `###` for main headings\n\
- `-` for bullet points\n\
- `**bold**` for important terms"
    )
}
