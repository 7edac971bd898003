//! YandexGPT adapter over the Foundation Models completion API.

use crate::backend::{Generation, TextGenerator};
use crate::error::LlmError;
use async_trait::async_trait;
use medtrain_conversation::ContextEntry;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::instrument;

pub const DEFAULT_ENDPOINT: &str =
    "https://llm.api.cloud.yandex.net/foundationModels/v1/completion";
pub const DEFAULT_MODEL: &str = "yandexgpt-lite/latest";

/// Connection and sampling settings for YandexGPT.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YandexGptConfig {
    pub api_key: String,
    pub folder_id: String,
    /// Model path within the folder, e.g. `yandexgpt-lite/latest`.
    pub model: String,
    pub endpoint: String,
    pub timeout_seconds: u64,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for YandexGptConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            folder_id: String::new(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_seconds: 30,
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

impl YandexGptConfig {
    /// Returns the `gpt://` URI that addresses the configured model.
    #[must_use]
    pub fn model_uri(&self) -> String {
        format!("gpt://{}/{}", self.folder_id, self.model)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionRequest<'a> {
    model_uri: String,
    completion_options: CompletionOptions,
    messages: &'a [ContextEntry],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionOptions {
    stream: bool,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    result: Option<CompletionResult>,
}

#[derive(Debug, Deserialize)]
struct CompletionResult {
    #[serde(default)]
    alternatives: Vec<Alternative>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    message: AlternativeMessage,
}

#[derive(Debug, Deserialize)]
struct AlternativeMessage {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Usage {
    completion_tokens: Option<JsonValue>,
}

/// A [`TextGenerator`] backed by YandexGPT.
pub struct YandexGptClient {
    client: Client,
    config: YandexGptConfig,
}

impl YandexGptClient {
    /// Creates a client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::InvalidConfig`] if the API key or folder id is
    /// missing, or the HTTP client cannot be built.
    pub fn new(config: YandexGptConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::InvalidConfig {
                reason: "API key is required".to_string(),
            });
        }
        if config.folder_id.trim().is_empty() {
            return Err(LlmError::InvalidConfig {
                reason: "folder id is required".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| LlmError::InvalidConfig {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client, config })
    }

    fn request_body<'a>(&self, context: &'a [ContextEntry]) -> CompletionRequest<'a> {
        CompletionRequest {
            model_uri: self.config.model_uri(),
            completion_options: CompletionOptions {
                stream: false,
                temperature: self.config.temperature,
                max_tokens: self.config.max_tokens,
            },
            messages: context,
        }
    }
}

#[async_trait]
impl TextGenerator for YandexGptClient {
    #[instrument(skip(self, context), fields(entries = context.len()))]
    async fn generate(&self, context: &[ContextEntry]) -> Result<Generation, LlmError> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Authorization", format!("Api-Key {}", self.config.api_key))
            .json(&self.request_body(context))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            tracing::warn!(%status, "YandexGPT rejected completion request");
            return Err(LlmError::RequestFailed {
                reason: format!("HTTP {status}: {body}"),
            });
        }

        parse_completion(&body)
    }
}

fn transport_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::RequestFailed {
            reason: e.to_string(),
        }
    }
}

/// Extracts the first alternative's text and the completion token count.
///
/// Token counts arrive either as JSON numbers or as decimal strings.
fn parse_completion(body: &str) -> Result<Generation, LlmError> {
    let response: CompletionResponse =
        serde_json::from_str(body).map_err(|e| LlmError::BadResponse {
            reason: format!("invalid JSON: {e}"),
        })?;

    let result = response.result.ok_or_else(|| LlmError::BadResponse {
        reason: "missing result".to_string(),
    })?;

    let text = result
        .alternatives
        .into_iter()
        .next()
        .map(|a| a.message.text)
        .ok_or_else(|| LlmError::BadResponse {
            reason: "no alternatives".to_string(),
        })?;

    if text.trim().is_empty() {
        return Err(LlmError::BadResponse {
            reason: "empty completion text".to_string(),
        });
    }

    let tokens = result
        .usage
        .and_then(|u| u.completion_tokens)
        .and_then(|v| match v {
            JsonValue::Number(n) => n.as_u64(),
            JsonValue::String(s) => s.parse().ok(),
            _ => None,
        })
        .map_or(0, |n| u32::try_from(n).unwrap_or(u32::MAX));

    Ok(Generation { text, tokens })
}
