//! Care-guideline generation over an OpenAI-compatible chat-completions API.
//!
//! [`ChatGuide`] implements [`growlog_core::guide::GuideGenerator`]. All
//! endpoint details, including the API key, arrive through [`GuideConfig`];
//! nothing is read from the process environment here.

mod chat;
mod client;
mod flatten;
mod prompt;

pub mod config;
pub mod error;

pub use client::ChatGuide;
pub use config::{GuideConfig, GuideFormat};
pub use error::{Error, Result};
