//! Generative-text insights via the Gemini API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::AppConfig;
use crate::constants::{NO_INSIGHT_TEXT, USER_AGENT};
use crate::models::{GeminiContent, GeminiPart, GenerateContentRequest, GenerateContentResponse};
use crate::providers::endpoint;

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request failed with status: {0}")]
    Status(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for InsightError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key as a query parameter
        let err = err.without_url();
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

#[async_trait]
pub trait InsightClient: Send + Sync {
    /// Generate a free-text answer for the prompt
    async fn generate(&self, prompt: &str) -> Result<String, InsightError>;
}

pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// `None` when no Gemini key is configured.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Option<Self>> {
        let Some(api_key) = &config.gemini_api_key else {
            return Ok(None);
        };

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.insight_timeout_secs))
            .build()?;

        Ok(Some(Self::new(
            client,
            &config.gemini_base_url,
            &config.gemini_model,
            api_key,
        )))
    }

    fn first_text(response: GenerateContentResponse) -> String {
        response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .and_then(|part| part.text)
            .unwrap_or_else(|| NO_INSIGHT_TEXT.to_string())
    }
}

#[async_trait]
impl InsightClient for GeminiClient {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, InsightError> {
        let url = endpoint(
            &self.base_url,
            &format!("models/{}:generateContent", self.model),
        );
        debug!(url = %url, "Requesting insight");

        let body = GenerateContentRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(InsightError::Status(status.as_u16()));
        }

        let response: GenerateContentResponse = response.json().await?;
        Ok(Self::first_text(response))
    }
}
