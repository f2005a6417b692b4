use crate::error::{Error, Result};
use crate::models::evaluation::CandidateEvaluation;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-4o";

/// Chat-completion seam. The evaluation engine depends on this trait so the
/// provider can be swapped (or stubbed) without touching the pipeline.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn evaluate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<CandidateEvaluation>;
}

#[derive(Clone)]
pub struct OpenAiService {
    client: Client,
    api_key: String,
}

impl OpenAiService {
    pub fn new(api_key: String, client: Client) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl LlmClient for OpenAiService {
    async fn evaluate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<CandidateEvaluation> {
        let payload = json!({
            "model": MODEL,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": user_prompt}
            ],
            "response_format": { "type": "json_object" },
            "temperature": 0.2
        });

        let res = self
            .client
            .post(OPENAI_CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(Duration::from_secs(120))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("OpenAI API Error {}: {}", status, text).into());
        }

        let body: Value = res.json().await?;
        let content = body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid OpenAI response format"))?;
        debug!("LLM verdict payload: {}", content);

        serde_json::from_str(content)
            .map_err(|e| Error::Internal(format!("LLM verdict failed validation: {}", e)))
    }
}
