//! Anthropic Messages API backend.

use super::{prompts, TaskInvoker};
use crate::config::ExecutionParams;
use crate::core::TaskLabel;
use crate::errors::TaskError;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info_span};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

/// Backend that sends each task to the Messages API, one blocking request
/// per invocation. No retries.
pub struct AnthropicInvoker {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl AnthropicInvoker {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, TaskError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TaskError::transport(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: MESSAGES_URL.to_string(),
        })
    }

    /// Read the key from [`API_KEY_ENV`].
    pub fn from_env(timeout: Duration) -> Result<Self, TaskError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| TaskError::MissingCredentials(format!("{API_KEY_ENV} is not set")))?;
        Self::new(api_key, timeout)
    }

    /// Send requests somewhere other than the public endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl TaskInvoker for AnthropicInvoker {
    fn invoke(
        &self,
        task: TaskLabel,
        input: &str,
        params: &ExecutionParams,
    ) -> Result<String, TaskError> {
        let _span = info_span!("anthropic", task = task.config_key()).entered();

        let request = MessageRequest {
            model: &params.model,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            system: prompts::system_prompt(task),
            messages: vec![Message {
                role: "user",
                content: prompts::render(task, input),
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .map_err(|e| TaskError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TaskError::transport(format!("API error ({status}): {body}")));
        }

        let parsed: MessageResponse = response
            .json()
            .map_err(|e| TaskError::transport(format!("invalid response body: {e}")))?;

        let text = parsed
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .filter(|text| !text.trim().is_empty())
            .ok_or(TaskError::EmptyResponse(task))?;

        debug!(chars = text.len(), "Received task output");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serializes_messages_shape() {
        let params = ExecutionParams::default();
        let request = MessageRequest {
            model: &params.model,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            system: prompts::system_prompt(TaskLabel::Security),
            messages: vec![Message {
                role: "user",
                content: "hi".to_string(),
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "claude-3-5-haiku-20241022");
        assert_eq!(json["max_tokens"], 4096);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_response_skips_non_text_blocks() {
        let body = r#"{"content":[{"type":"tool_use","id":"x"},{"type":"text","text":"- leak"}]}"#;
        let parsed: MessageResponse = serde_json::from_str(body).unwrap();
        let texts: Vec<_> = parsed
            .content
            .into_iter()
            .filter_map(|b| match b {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .collect();
        assert_eq!(texts, vec!["- leak"]);
    }

    #[test]
    fn test_unreachable_endpoint_is_transport_error() {
        let invoker = AnthropicInvoker::new("key", Duration::from_millis(200))
            .unwrap()
            .with_endpoint("http://127.0.0.1:9/v1/messages");

        let result = invoker.invoke(TaskLabel::Security, "x", &ExecutionParams::default());

        assert!(matches!(result, Err(TaskError::Transport(_))));
    }
}
