//! Generator configuration, deserialised from the `[guide]` table of the
//! server configuration.

use serde::Deserialize;

/// Shape of the completion the generator asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideFormat {
  /// One paragraph of plain text.
  #[default]
  Plain,
  /// A JSON object with `description` and `care_guidelines`, rendered to
  /// text after parsing.
  Structured,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuideConfig {
  /// Base URL up to and excluding `/chat/completions`.
  #[serde(default = "default_base_url")]
  pub base_url:     String,
  /// Bearer token. Empty means generation is unavailable.
  #[serde(default)]
  pub api_key:      String,
  #[serde(default = "default_model")]
  pub model:        String,
  #[serde(default = "default_temperature")]
  pub temperature:  f32,
  #[serde(default = "default_max_tokens")]
  pub max_tokens:   u32,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
  #[serde(default)]
  pub format:       GuideFormat,
}

fn default_base_url() -> String { "https://api.deepseek.com/v1".to_owned() }
fn default_model() -> String { "deepseek-chat".to_owned() }
fn default_temperature() -> f32 { 0.7 }
fn default_max_tokens() -> u32 { 500 }
fn default_timeout_secs() -> u64 { 30 }

impl Default for GuideConfig {
  fn default() -> Self {
    Self {
      base_url:     default_base_url(),
      api_key:      String::new(),
      model:        default_model(),
      temperature:  default_temperature(),
      max_tokens:   default_max_tokens(),
      timeout_secs: default_timeout_secs(),
      format:       GuideFormat::default(),
    }
  }
}
