//! HTTP client for the chat-completions endpoint.

use std::{future::Future, time::Duration};

use growlog_core::guide::GuideGenerator;

use crate::{
  chat::{ChatMessage, ChatRequest, ChatResponse},
  config::{GuideConfig, GuideFormat},
  error::{Error, Result},
  flatten::CareSheet,
  prompt,
};

/// Guideline generator backed by an OpenAI-compatible chat endpoint.
#[derive(Debug, Clone)]
pub struct ChatGuide {
  client: reqwest::Client,
  config: GuideConfig,
}

impl ChatGuide {
  /// Build a generator. Without an API key every request fails with
  /// [`Error::MissingApiKey`] before anything is sent.
  pub fn new(config: GuideConfig) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(Error::Client)?;

    Ok(Self { client, config })
  }

  pub fn config(&self) -> &GuideConfig { &self.config }

  pub fn has_api_key(&self) -> bool { !self.config.api_key.trim().is_empty() }

  fn endpoint(&self) -> String {
    format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
  }

  async fn complete(&self, prompt: &str) -> Result<String> {
    if !self.has_api_key() {
      return Err(Error::MissingApiKey);
    }

    let body = ChatRequest {
      model:       &self.config.model,
      messages:    vec![ChatMessage::user(prompt)],
      temperature: self.config.temperature,
      max_tokens:  self.config.max_tokens,
    };

    let response = self
      .client
      .post(self.endpoint())
      .bearer_auth(&self.config.api_key)
      .json(&body)
      .send()
      .await?;

    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
      return Err(Error::Status { status: status.as_u16(), body: text });
    }

    let parsed: ChatResponse = serde_json::from_str(&text)
      .map_err(|e| Error::Malformed(e.to_string()))?;

    let content = parsed.first_content().ok_or(Error::EmptyCompletion)?;
    let content = content.trim();
    if content.is_empty() {
      return Err(Error::EmptyCompletion);
    }
    Ok(content.to_owned())
  }

  async fn generate(&self, plant_type: &str) -> Result<String> {
    match self.config.format {
      GuideFormat::Plain => self.complete(&prompt::plain(plant_type)).await,
      GuideFormat::Structured => {
        let content = self.complete(&prompt::structured(plant_type)).await?;
        Ok(CareSheet::parse(&content, plant_type).render())
      }
    }
  }
}

impl GuideGenerator for ChatGuide {
  type Error = Error;

  fn care_guidelines<'a>(
    &'a self,
    plant_type: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a {
    async move {
      tracing::debug!(plant_type, model = %self.config.model, "requesting care guidelines");
      self.generate(plant_type).await
    }
  }
}
