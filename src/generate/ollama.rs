//! Ollama chat client.
//!
//! Drives a locally hosted model through the `/api/chat` endpoint with
//! streaming disabled. A single generation regularly takes over a minute on
//! CPU-class hardware, so the request timeout is generous; hitting it is
//! reported as a transient failure and handled by the caller's retry budget.

use crate::generate::{DecodingParams, Generator};
use crate::prompt::Prompt;
use crate::{Error, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Upper bound on one generation call.
const GENERATION_TIMEOUT: Duration = Duration::from_secs(900);

/// Blocking client for one Ollama host and model.
pub struct OllamaClient {
    agent: ureq::Agent,
    host: String,
    model: String,
}

impl OllamaClient {
    /// Create a client for `host` (e.g. `http://localhost:11434`).
    pub fn new(host: &str, model: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(GENERATION_TIMEOUT)
            .build();
        Self {
            agent,
            host: host.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    /// Name of the configured model.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check whether the configured model is present on the host.
    pub fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.host);
        let response = match self.agent.get(&url).call() {
            Ok(resp) => resp,
            Err(_) => return false,
        };
        match response.into_json::<TagsResponse>() {
            Ok(tags) => tags.models.iter().any(|m| m.name == self.model),
            Err(_) => false,
        }
    }
}

impl Generator for OllamaClient {
    fn generate(&self, prompt: &Prompt, params: &DecodingParams) -> Result<String> {
        let url = format!("{}/api/chat", self.host);
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.user},
            ],
            "stream": false,
            "options": {
                "temperature": params.temperature,
                "top_p": params.top_p,
                "top_k": params.top_k,
                "repeat_penalty": params.repeat_penalty,
                "num_predict": params.max_tokens,
            },
        });

        let response = self.agent.post(&url).send_json(body);
        let resp = match response {
            Ok(resp) => resp,
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                return Err(Error::GeneratorUnavailable(format!(
                    "HTTP {} from {}: {}",
                    code, url, body
                )));
            }
            Err(e) => return Err(Error::GeneratorUnavailable(e.to_string())),
        };

        let chat: ChatResponse = resp
            .into_json()
            .map_err(|e| Error::GeneratorUnavailable(format!("invalid chat response: {}", e)))?;

        let text = chat.message.map(|m| m.content).unwrap_or_default();
        if text.trim().is_empty() {
            return Err(Error::GeneratorUnavailable(
                "no response content received".to_string(),
            ));
        }
        debug!(chars = text.len(), "generation complete");
        Ok(text.trim().to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_response_parses_content() {
        let chat: ChatResponse = serde_json::from_str(
            r#"{"model":"phi3.5","message":{"role":"assistant","content":"hello"},"done":true}"#,
        )
        .unwrap();
        assert_eq!(chat.message.unwrap().content, "hello");
    }

    #[test]
    fn test_tags_response_parses_model_names() {
        let tags: TagsResponse = serde_json::from_str(
            r#"{"models":[{"name":"phi3.5:3.8b-mini-instruct-q4_K_M","size":2200000000}]}"#,
        )
        .unwrap();
        assert_eq!(tags.models.len(), 1);
        assert_eq!(tags.models[0].name, "phi3.5:3.8b-mini-instruct-q4_K_M");
    }

    #[test]
    fn test_host_trailing_slash_is_normalized() {
        let client = OllamaClient::new("http://localhost:11434/", "phi3.5");
        assert_eq!(client.host, "http://localhost:11434");
    }
}
