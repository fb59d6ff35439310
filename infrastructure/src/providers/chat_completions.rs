//! Chat-completions HTTP backend
//!
//! Implements [`GenerationBackend`] against any OpenAI-compatible
//! `/chat/completions` endpoint. The base URL is configurable, so the same
//! adapter covers the hosted API and local inference servers that speak
//! the protocol.

use async_trait::async_trait;
use greenroom_application::ports::generation::{
    ChatMessage, GenerationBackend, GenerationError, GenerationRequest,
};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Generation backend speaking the chat-completions wire protocol.
#[derive(Clone)]
pub struct ChatCompletionsBackend {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatCompletionsBackend {
    /// Create a backend with the given API key and the default model,
    /// endpoint, and timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Self::client_with_timeout(DEFAULT_TIMEOUT),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Read the API key from the named environment variable.
    ///
    /// Fails with [`GenerationError::Unavailable`] when the variable is
    /// unset, so DI assembly can report a missing key before any session
    /// starts.
    pub fn from_env(api_key_env: &str) -> Result<Self, GenerationError> {
        let key = env::var(api_key_env).map_err(|_| {
            GenerationError::Unavailable(format!(
                "environment variable {} is not set",
                api_key_env
            ))
        })?;
        Ok(Self::new(key))
    }

    /// Read the API key from the default `OPENAI_API_KEY` variable.
    pub fn try_from_default_env() -> Result<Self, GenerationError> {
        Self::from_env(DEFAULT_API_KEY_ENV)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the backend at a different chat-completions endpoint.
    /// Trailing slashes are trimmed so URL joining stays predictable.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = Self::client_with_timeout(timeout);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn client_with_timeout(timeout: Duration) -> Client {
        match Client::builder().timeout(timeout).build() {
            Ok(client) => client,
            Err(e) => {
                warn!("Could not build HTTP client with timeout: {}", e);
                Client::new()
            }
        }
    }

    fn build_body(&self, request: &GenerationRequest) -> ChatCompletionBody {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = &request.system {
            messages.push(ChatMessage::system(system));
        }
        messages.extend(request.messages.iter().cloned());
        ChatCompletionBody {
            model: self.model.clone(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }

    async fn send(&self, body: &ChatCompletionBody) -> Result<String, GenerationError> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerationError::Timeout
                } else if e.is_connect() {
                    GenerationError::Unavailable(format!("cannot reach {}: {}", url, e))
                } else {
                    GenerationError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body_text));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;
        extract_content(parsed)
    }
}

#[async_trait]
impl GenerationBackend for ChatCompletionsBackend {
    async fn complete(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let body = self.build_body(&request);
        debug!(
            "Chat-completions request: model={}, {} messages",
            body.model,
            body.messages.len()
        );
        self.send(&body).await
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct ChatCompletionBody {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_content(response: ChatCompletionResponse) -> Result<String, GenerationError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            GenerationError::MalformedResponse("response carried no message content".to_string())
        })
}

fn map_http_error(status: StatusCode, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());

    let transient = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
    if transient {
        GenerationError::Unavailable(format!("{}: {}", status, message))
    } else if status == StatusCode::REQUEST_TIMEOUT {
        GenerationError::Timeout
    } else {
        GenerationError::RequestFailed(format!("{}: {}", status, message))
    }
}
