use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use state_plane::SystemConfig;

use crate::{LlmClient, RelayError};

#[derive(Clone, Debug)]
pub struct HttpLlmClientConfig {
    pub endpoint: String,
    pub api_key: String,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for HttpLlmClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash-exp:generateContent"
                .to_string(),
            api_key: String::new(),
            timeout_ms: 30_000,
            user_agent: "studyhall-relay".to_string(),
        }
    }
}

impl HttpLlmClientConfig {
    pub fn from_system_config(config: &SystemConfig) -> Self {
        let timeout_ms = config.get_number("llm.timeout_ms");
        Self {
            endpoint: config.get_string("llm.endpoint"),
            api_key: config.get_string("llm.api_key"),
            timeout_ms: if timeout_ms <= 0 {
                30_000
            } else {
                timeout_ms as u64
            },
            ..Self::default()
        }
    }
}

#[derive(Clone)]
pub struct HttpLlmClient {
    client: reqwest::Client,
    config: HttpLlmClientConfig,
}

impl HttpLlmClient {
    pub fn new(config: HttpLlmClientConfig) -> Self {
        let timeout = Duration::from_millis(config.timeout_ms.max(1));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client, config }
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn generate(&self, prompt: &str) -> Result<String, RelayError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });
        let response = self
            .client
            .post(&self.config.endpoint)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|err| RelayError::Upstream(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Upstream(format!(
                "completion failed with status {}",
                status.as_u16()
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| RelayError::Upstream(err.to_string()))?;
        extract_text(&payload).ok_or_else(|| RelayError::Upstream("empty completion".to_string()))
    }
}

fn extract_text(payload: &Value) -> Option<String> {
    let text = payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()?;
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
