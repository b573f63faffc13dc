//! Core types and trait definitions for the growlog plant journal.
//!
//! This crate has no HTTP or database dependencies.
//! Storage, text generation and media persistence are reached through the
//! [`store::PlantStore`], [`guide::GuideGenerator`] and [`media::MediaStore`]
//! traits; [`journal::Journal`] ties them together.

pub mod error;
pub mod fact;
pub mod guide;
pub mod journal;
pub mod media;
pub mod owner;
pub mod plant;
pub mod store;

pub use error::{Error, Result};
pub use journal::Journal;
