//! Completion client for the description fallback.
//!
//! Single-shot, temperature-0 requests against an OpenAI-compatible
//! `/chat/completions` endpoint. The client is constructed by the caller and
//! injected into [`crate::Describer`]; there is no global client state.

use serde::{Deserialize, Serialize};

use crate::DescribeError;

/// Completion client abstraction (allows mocking).
pub trait CompletionClient {
    fn complete(&self, system: &str, prompt: &str) -> Result<String, DescribeError>;
}

/// Blocking HTTP client for an OpenAI-compatible chat-completions API.
pub struct OpenAiClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OpenAiClient {
    /// `base_url` is the API root, e.g. `https://api.groq.com/openai/v1`.
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: None,
            client,
            timeout_secs,
        }
    }

    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }
}

/// Request body for `/chat/completions`.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl CompletionClient for OpenAiClient {
    fn complete(&self, system: &str, prompt: &str) -> Result<String, DescribeError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            temperature: 0.0,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().map_err(|e| {
            if e.is_connect() {
                DescribeError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                DescribeError::Timeout(self.timeout_secs)
            } else {
                DescribeError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(DescribeError::EndpointError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| DescribeError::ResponseParsing(e.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| DescribeError::ResponseParsing("no choices in response".into()))?;

        Ok(content.trim().to_string())
    }
}

/// Mock completion client for testing: returns a configurable response and
/// counts how often it was consulted.
pub struct MockCompletionClient {
    response: Result<String, ()>,
    calls: std::cell::Cell<usize>,
}

impl MockCompletionClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            calls: std::cell::Cell::new(0),
        }
    }

    /// A client whose every call fails.
    pub fn failing() -> Self {
        Self {
            response: Err(()),
            calls: std::cell::Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl CompletionClient for MockCompletionClient {
    fn complete(&self, _system: &str, _prompt: &str) -> Result<String, DescribeError> {
        self.calls.set(self.calls.get() + 1);
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(()) => Err(DescribeError::Connection("mock".to_string())),
        }
    }
}
