//! Wire types for the chat-completions endpoint. Only the fields growlog
//! reads or writes are modelled.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
  pub model:       &'a str,
  pub messages:    Vec<ChatMessage<'a>>,
  pub temperature: f32,
  pub max_tokens:  u32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
  pub role:    &'static str,
  pub content: &'a str,
}

impl<'a> ChatMessage<'a> {
  pub fn user(content: &'a str) -> Self { Self { role: "user", content } }
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
  #[serde(default)]
  pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
  pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
  pub content: Option<String>,
}

impl ChatResponse {
  /// Content of the first choice, if any.
  pub fn first_content(self) -> Option<String> {
    self.choices.into_iter().next().and_then(|c| c.message.content)
  }
}
