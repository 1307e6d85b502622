// Anthropic Messages API client
//
// Thin reqwest wrapper with no pipeline awareness. The wire types mirror
// the Messages API JSON; internal callers only see `Completion`.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{Completion, LlmError, TextGenerator};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Request body for `POST /v1/messages`
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body from `POST /v1/messages`
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: WireUsage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireUsage {
    input_tokens: u64,
    output_tokens: u64,
}

impl MessagesResponse {
    fn into_completion(self) -> Result<Completion, LlmError> {
        let text = self
            .content
            .into_iter()
            .find(|block| block.block_type == "text")
            .and_then(|block| block.text)
            .ok_or(LlmError::EmptyCompletion)?;

        Ok(Completion {
            text,
            input_tokens: self.usage.input_tokens,
            output_tokens: self.usage.output_tokens,
        })
    }
}

/// HTTP client for the Anthropic Messages API
#[derive(Debug)]
pub struct AnthropicClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl AnthropicClient {
    /// Create a client against the production API
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (mock servers in tests)
    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }
}

#[async_trait::async_trait]
impl TextGenerator for AnthropicClient {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<Completion, LlmError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens,
            messages: vec![WireMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status >= 400 {
            let message = response.text().await.unwrap_or_else(|_| "(no body)".to_string());
            return Err(LlmError::Api { status, message });
        }

        let body: MessagesResponse = response.json().await?;
        body.into_completion()
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_to_messages_json() {
        let request = MessagesRequest {
            model: "claude-3-haiku-20240307",
            max_tokens: 1024,
            messages: vec![WireMessage {
                role: "user",
                content: "Parse these requirements",
            }],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "claude-3-haiku-20240307");
        assert_eq!(json["max_tokens"], 1024);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "Parse these requirements");
    }

    #[test]
    fn response_yields_first_text_block() {
        let json = r#"{
            "content": [{"type": "text", "text": "PURPOSE: a calculator"}],
            "usage": {"input_tokens": 80, "output_tokens": 40}
        }"#;

        let response: MessagesResponse = serde_json::from_str(json).unwrap();
        let completion = response.into_completion().unwrap();
        assert_eq!(completion.text, "PURPOSE: a calculator");
        assert_eq!(completion.total_tokens(), 120);
    }

    #[test]
    fn response_without_text_is_empty_completion() {
        let json = r#"{
            "content": [],
            "usage": {"input_tokens": 5, "output_tokens": 0}
        }"#;

        let response: MessagesResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            response.into_completion(),
            Err(LlmError::EmptyCompletion)
        ));
    }

    #[test]
    fn client_model_name() {
        let client = AnthropicClient::new("test-key", "claude-3-haiku-20240307");
        assert_eq!(client.model(), "claude-3-haiku-20240307");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }
}
