use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::error::ClassifyError;
use crate::llm::{CompletionModel, TEMPERATURE};

/// Azure OpenAI completions client for a single deployment.
#[derive(Debug, Clone)]
pub struct AzureOpenAi {
    client: Client,
    url: String,
    api_key: String,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    temperature: f32,
    max_tokens: u32,
}

impl AzureOpenAi {
    pub fn new(config: &Config) -> Result<Self, ClassifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.model.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: completions_url(
                &config.credentials.api_base,
                &config.model.deployment,
                &config.model.api_version,
            ),
            api_key: config.credentials.api_key.clone(),
            max_tokens: config.model.max_tokens,
        })
    }
}

#[async_trait]
impl CompletionModel for AzureOpenAi {
    async fn complete(&self, prompt: &str) -> Result<String, ClassifyError> {
        let body = CompletionRequest {
            prompt,
            temperature: TEMPERATURE,
            max_tokens: self.max_tokens,
        };

        debug!(url = %self.url, "requesting completion");

        let response = self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ClassifyError::Transport(format!(
                "completion request failed with {}: {}",
                status, detail
            )));
        }

        let data: serde_json::Value = response.json().await?;
        completion_text(&data)
    }
}

/// `{base}/openai/deployments/{deployment}/completions?api-version={version}`
fn completions_url(api_base: &str, deployment: &str, api_version: &str) -> String {
    format!(
        "{}/openai/deployments/{}/completions?api-version={}",
        api_base.trim_end_matches('/'),
        deployment,
        api_version
    )
}

/// Pull `choices[0].text` out of a completions response body.
fn completion_text(data: &serde_json::Value) -> Result<String, ClassifyError> {
    data.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("text"))
        .and_then(|t| t.as_str())
        .map(str::to_string)
        .ok_or_else(|| {
            ClassifyError::Transport(format!("no completion text in response: {}", data))
        })
}
