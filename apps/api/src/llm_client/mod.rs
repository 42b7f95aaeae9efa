/// LLM client: the single point of entry for calls to the external reasoning API.
///
/// Talks to OpenRouter's OpenAI-compatible chat completions endpoint. Every call
/// is a single attempt: failures are reported to the caller, never retried.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod prompts;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1-distill-llama-70b";
const COMPLETIONS_PATH: &str = "/chat/completions";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("OpenRouter API key not configured")]
    MissingApiKey,

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM reply did not contain a JSON object")]
    MissingJson,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Text returned by the reasoning provider together with the model that produced it.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub model: String,
}

/// Sends a prompt to a reasoning model and returns its reply.
///
/// `AppState` carries an `Arc<dyn ReasoningClient>` so the evaluation pipeline
/// can be exercised without a network.
#[async_trait]
pub trait ReasoningClient: Send + Sync {
    async fn complete(&self, prompt: &str, system: &str) -> Result<Completion, LlmError>;
}

/// OpenRouter-backed [`ReasoningClient`].
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    url: String,
    model: String,
}

impl LlmClient {
    pub fn new(
        api_key: Option<String>,
        base_url: &str,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            url: format!("{}{COMPLETIONS_PATH}", base_url.trim_end_matches('/')),
            model: model.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        Self::new(
            config.openrouter_api_key.clone(),
            &config.openrouter_base_url,
            config.llm_model.clone(),
            Duration::from_secs(config.llm_timeout_secs),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ReasoningClient for LlmClient {
    async fn complete(&self, prompt: &str, system: &str) -> Result<Completion, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let mut messages = Vec::with_capacity(2);
        if !system.is_empty() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: prompt,
        });

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&ChatRequest {
                model: &self.model,
                messages,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Reasoning API returned {status}");
            let message = serde_json::from_str::<ProviderError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json().await?;

        if let Some(usage) = &body.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent)?;

        Ok(Completion {
            text,
            model: body.model.unwrap_or_else(|| self.model.clone()),
        })
    }
}

/// Locates the JSON object inside a model reply.
///
/// Reasoning models prefix their answer with a `<think>` block and often wrap
/// the object in a fenced code block, so the search order is: a ```json fence,
/// a bare ``` fence, then the outermost pair of braces.
pub fn extract_json_payload(text: &str) -> Option<&str> {
    let text = strip_reasoning(text);

    if let Some(body) = fenced_object(text, "```json") {
        return Some(body);
    }
    if let Some(body) = fenced_object(text, "```") {
        return Some(body);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn strip_reasoning(text: &str) -> &str {
    const CLOSE: &str = "</think>";
    match text.rfind(CLOSE) {
        Some(idx) => &text[idx + CLOSE.len()..],
        None => text,
    }
}

fn fenced_object<'a>(text: &'a str, opener: &str) -> Option<&'a str> {
    let start = text.find(opener)? + opener.len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    let body = rest[..end].trim();
    body.starts_with('{').then_some(body)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(server: &mockito::ServerGuard, api_key: Option<&str>) -> LlmClient {
        LlmClient::new(
            api_key.map(String::from),
            &server.url(),
            "test/model",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_extract_json_payload_with_json_fence() {
        let input = "Here you go:\n```json\n{\"score\": 80}\n```\nThanks";
        assert_eq!(extract_json_payload(input), Some("{\"score\": 80}"));
    }

    #[test]
    fn test_extract_json_payload_with_bare_fence() {
        let input = "```\n{\"score\": 80}\n```";
        assert_eq!(extract_json_payload(input), Some("{\"score\": 80}"));
    }

    #[test]
    fn test_extract_json_payload_without_fences() {
        let input = "{\"score\": 80}";
        assert_eq!(extract_json_payload(input), Some("{\"score\": 80}"));
    }

    #[test]
    fn test_extract_json_payload_skips_think_block() {
        let input = "<think>maybe {\"score\": 1} is right</think>\n```json\n{\"score\": 72}\n```";
        assert_eq!(extract_json_payload(input), Some("{\"score\": 72}"));
    }

    #[test]
    fn test_extract_json_payload_falls_back_to_braces() {
        let input = "The verdict is {\"score\": 55, \"analysis\": \"ok\"} as requested.";
        assert_eq!(
            extract_json_payload(input),
            Some("{\"score\": 55, \"analysis\": \"ok\"}")
        );
    }

    #[test]
    fn test_extract_json_payload_none_without_object() {
        assert_eq!(extract_json_payload("I cannot evaluate this CV."), None);
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "model": "test/model-v2",
                    "choices": [{"message": {"role": "assistant", "content": "{\"score\": 90}"}}],
                    "usage": {"prompt_tokens": 12, "completion_tokens": 4}
                }"#,
            )
            .create_async()
            .await;

        let completion = client_for(&server, Some("test-key"))
            .complete("prompt", "system")
            .await
            .unwrap();

        assert_eq!(completion.text, "{\"score\": 90}");
        assert_eq!(completion.model, "test/model-v2");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_maps_provider_error_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": {"message": "No auth credentials found", "code": 401}}"#)
            .create_async()
            .await;

        let err = client_for(&server, Some("bad-key"))
            .complete("prompt", "system")
            .await
            .unwrap_err();

        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "No auth credentials found");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .with_status(503)
            .with_body("upstream unavailable")
            .expect(1)
            .create_async()
            .await;

        let err = client_for(&server, Some("test-key"))
            .complete("prompt", "")
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::Api { status: 503, .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_choices_is_empty_content() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let err = client_for(&server, Some("test-key"))
            .complete("prompt", "system")
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .expect(0)
            .create_async()
            .await;

        let err = client_for(&server, None)
            .complete("prompt", "system")
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::MissingApiKey));
        mock.assert_async().await;
    }
}
